//! ztrim - Terminal-based audio clip trimmer and shared clip player.
//!
//! This application provides two main functionalities:
//!
//! 1. **Trimmer**: Pick a window of at most thirty seconds out of a local audio
//!    file by dragging handles over its waveform, preview exactly that window,
//!    and hand the result (start offset and duration) to the upload step.
//!
//! 2. **Clip Player** (optional feature): A list of clips that all share one
//!    audio output, so starting one always stops whatever else was playing.
//!
//! The non-interactive commands (`plan`, `stream-url`) expose the same
//! selection and URL rules for scripting.

use clap::{CommandFactory, Parser, Subcommand, builder::PossibleValuesParser};
use clap_complete::{Generator, Shell, generate};
use std::error::Error;
use std::io;
use std::path::PathBuf;

mod cli;

#[cfg(feature = "player")]
mod player;

#[derive(Parser)]
#[command(name = "ztrim")]
#[command(about = "Terminal-based audio clip trimmer and shared clip player")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize ztrim configuration
    Init,
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Trim an audio file interactively and print the upload fields
    Trim {
        /// Audio file to trim
        file: PathBuf,
        /// Song title (defaults to the file name)
        #[arg(short, long)]
        title: Option<String>,
        /// Artist (defaults to the configured default_artist)
        #[arg(short, long)]
        artist: Option<String>,
        /// Account the upload is attributed to
        #[arg(long)]
        entity_account_id: Option<String>,
        /// Author entity id passed through to the backend
        #[arg(long)]
        author_entity_id: Option<String>,
        /// Author entity type passed through to the backend
        #[arg(long)]
        author_entity_type: Option<String>,
    },
    /// Compute the clamped selection for a start and length without a UI
    Plan {
        /// Audio file (its duration bounds the selection)
        file: PathBuf,
        /// Start offset, as seconds or m:ss.t
        #[arg(short, long, default_value = "0")]
        start: String,
        /// Selection length, as seconds or m:ss.t
        #[arg(short, long)]
        length: Option<String>,
    },
    /// Print the stream URL for a stored song
    StreamUrl {
        /// Song id (or filename with --filename)
        reference: String,
        /// Treat the reference as a legacy filename instead of an id
        #[arg(short, long)]
        filename: bool,
        /// Leave off the cache-busting parameter
        #[arg(long)]
        no_bust: bool,
    },
    /// Play clips through one shared audio output
    Play {
        /// Audio files to list
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// View current configuration
    View,
    /// Set a configuration value
    Set {
        /// Configuration key
        #[arg(value_parser = PossibleValuesParser::new([
            "api_base_url",
            "default_artist",
            "max_upload_mb",
            "allowed_extensions",
            "log_file",
        ]))]
        key: String,
        /// Configuration value
        value: String,
    },
    /// Edit configuration file in your editor
    Edit,
}

fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    generate(
        generator,
        cmd,
        cmd.get_name().to_string(),
        &mut io::stdout(),
    );
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            cli::init::handle_init()?;
        }
        Commands::Config { action } => match action {
            ConfigAction::View => {
                cli::config::handle_config_view()?;
            }
            ConfigAction::Set { key, value } => {
                cli::config::handle_config_set(&key, &value)?;
            }
            ConfigAction::Edit => {
                cli::config::handle_config_edit()?;
            }
        },
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            print_completions(shell, &mut cmd);
        }
        Commands::Trim {
            file,
            title,
            artist,
            entity_account_id,
            author_entity_id,
            author_entity_type,
        } => {
            cli::trim::handle_trim(cli::trim::TrimArgs {
                file,
                title,
                artist,
                entity_account_id,
                author_entity_id,
                author_entity_type,
            })?;
        }
        Commands::Plan {
            file,
            start,
            length,
        } => {
            cli::plan::handle_plan(&file, &start, length.as_deref())?;
        }
        Commands::StreamUrl {
            reference,
            filename,
            no_bust,
        } => {
            cli::stream_url::handle_stream_url(&reference, filename, no_bust)?;
        }
        Commands::Play { files } => {
            cli::play::handle_play(&files)?;
        }
    }

    Ok(())
}
