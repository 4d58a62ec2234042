//! Terminal progress indicators for the non-interactive commands.
//!
//! Decoding a batch of files before the player opens can take a moment, so the
//! commands show a spinner or a bar while they work.

use crate::constants::SPINNER_CHARS;
use indicatif::{ProgressBar, ProgressStyle};

/// A cyan spinner using the shared tick sequence.
///
/// ```ignore
/// let spinner = create_progress_spinner();
/// spinner.set_message("Decoding set.wav...");
/// // ... decode ...
/// spinner.finish_and_clear();
/// ```
pub fn create_progress_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(SPINNER_CHARS);
    spinner.set_style(style);
    spinner
}

/// A bar over `total` items, used when decoding several files at once
pub fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░");
    pb.set_style(style);
    pb
}
