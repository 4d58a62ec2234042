use std::error::Error;
use std::path::PathBuf;

#[cfg(feature = "player")]
pub fn handle_play(files: &[PathBuf]) -> Result<(), Box<dyn Error>> {
    use owo_colors::OwoColorize;
    use rayon::prelude::*;
    use zim_trim::config::Config;
    use zim_trim::trim::AudioSource;
    use zim_trim::utils::progress::create_progress_bar;
    use zim_trim::utils::validation::validate_audio_file;

    let config = Config::load()?;
    for file in files {
        validate_audio_file(file)?;
    }

    let pb = create_progress_bar(files.len() as u64);
    pb.set_message("decoding");
    let decoded: Vec<AudioSource> = files
        .par_iter()
        .map(|file| {
            let source = AudioSource::open_or_empty(file);
            pb.inc(1);
            source
        })
        .collect();
    pb.finish_and_clear();

    let (playable, skipped): (Vec<AudioSource>, Vec<AudioSource>) =
        decoded.into_iter().partition(|s| s.duration() > 0.0);
    for source in &skipped {
        eprintln!(
            "{} Skipping {}: no local decoder or unreadable audio",
            "Warning:".yellow(),
            source.path().display()
        );
    }
    if playable.is_empty() {
        return Err("None of the given files could be decoded".into());
    }

    crate::player::run_play(&config, playable)
}

#[cfg(not(feature = "player"))]
pub fn handle_play(files: &[PathBuf]) -> Result<(), Box<dyn Error>> {
    let _ = files;
    print_player_feature_note("The clip player");
    Ok(())
}

#[cfg(not(feature = "player"))]
pub fn print_player_feature_note(what: &str) {
    use owo_colors::OwoColorize;
    println!("{} {}", "🎵".cyan(), "Audio Player".bold());
    println!();
    println!(
        "{} {what} requires the 'player' feature to be enabled.",
        "Note:".yellow()
    );
    println!();
    println!("To enable it, install with:");
    println!("  {}", "cargo install zim-trim --features player".cyan());
    println!();
    println!("Or if building from source:");
    println!("  {}", "cargo build --release --features player".cyan());
}
