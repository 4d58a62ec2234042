use owo_colors::OwoColorize;
use std::error::Error;
use std::path::{Path, PathBuf};
use zim_trim::config::Config;
use zim_trim::trim::{AudioSource, TrimmedClip};
use zim_trim::upload::{UploadRequest, validate_upload};
use zim_trim::utils::progress::create_progress_spinner;
use zim_trim::utils::validation::validate_audio_file;

pub struct TrimArgs {
    pub file: PathBuf,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub entity_account_id: Option<String>,
    pub author_entity_id: Option<String>,
    pub author_entity_type: Option<String>,
}

impl TrimArgs {
    fn into_request(self, config: &Config, clip: TrimmedClip) -> UploadRequest {
        let title = self.title.unwrap_or_else(|| default_title(&self.file));
        let artist = self
            .artist
            .unwrap_or_else(|| config.default_artist.clone());
        UploadRequest {
            file: self.file,
            title,
            artist,
            entity_account_id: self.entity_account_id,
            author_entity_id: self.author_entity_id,
            author_entity_type: self.author_entity_type,
            clip,
        }
    }
}

/// File stem, used as the title when none is given
pub fn default_title(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Decode a file behind a spinner
pub fn decode_with_spinner(file: &Path) -> AudioSource {
    let spinner = create_progress_spinner();
    spinner.set_message(format!("Decoding {}...", file.display()));
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    let source = AudioSource::open_or_empty(file);
    spinner.finish_and_clear();
    source
}

pub fn handle_trim(args: TrimArgs) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let size = validate_audio_file(&args.file)?;

    let title = args
        .title
        .clone()
        .unwrap_or_else(|| default_title(&args.file));
    let artist = args
        .artist
        .clone()
        .unwrap_or_else(|| config.default_artist.clone());
    validate_upload(&args.file, size, &title, &artist, &config.upload_limits())?;

    let source = decode_with_spinner(&args.file);
    if source.duration() <= 0.0 {
        eprintln!(
            "{} Could not decode {}. The trimmer will open, but confirm is disabled.",
            "Warning:".yellow(),
            args.file.display()
        );
    }

    match run_trimmer(&config, source)? {
        Some(clip) => {
            let request = args.into_request(&config, clip);
            println!("{}", serde_json::to_string_pretty(&request.to_json())?);
        }
        None => {
            eprintln!("{}", "Trim cancelled".yellow());
        }
    }

    Ok(())
}

#[cfg(feature = "player")]
fn run_trimmer(config: &Config, source: AudioSource) -> Result<Option<TrimmedClip>, Box<dyn Error>> {
    crate::player::run_trim(config, source)
}

#[cfg(not(feature = "player"))]
fn run_trimmer(_config: &Config, _source: AudioSource) -> Result<Option<TrimmedClip>, Box<dyn Error>> {
    crate::cli::play::print_player_feature_note("The trimmer");
    Ok(None)
}
