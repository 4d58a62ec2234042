//! Input checks shared by the commands that take audio files.

use owo_colors::OwoColorize;
use std::error::Error;
use std::path::Path;

/// Check that `path` is an existing regular file and return its size in bytes.
pub fn validate_audio_file(path: &Path) -> Result<u64, Box<dyn Error>> {
    if !path.exists() {
        return Err(format!(
            "{} File does not exist: {}",
            "Error:".red().bold(),
            path.display()
        )
        .into());
    }

    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(format!(
            "{} Not a regular file: {}",
            "Error:".red().bold(),
            path.display()
        )
        .into());
    }

    Ok(metadata.len())
}
