pub mod app;
pub mod audio;
pub mod playlist;
pub mod ui;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::error::Error;
use std::io::{self, Stdout};
use zim_trim::config::Config;
use zim_trim::constants::WAVEFORM_BARS;
use zim_trim::trim::{AudioSource, TrimEditor, TrimmedClip};

use audio::{Deck, RodioPreview};

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Open the trimmer for one decoded file. Returns the confirmed clip, or
/// `None` if the user cancelled.
pub fn run_trim(config: &Config, source: AudioSource) -> Result<Option<TrimmedClip>, Box<dyn Error>> {
    init_logging(config)?;
    info!("Starting trimmer for {}", source.path().display());

    let preview = RodioPreview::new(Deck::open(), &source);
    let silent = !preview.has_sound();
    let mut editor = TrimEditor::new(source.duration(), source.waveform(WAVEFORM_BARS), preview);
    if silent {
        editor.flash("No audio output found; preview is silent");
    }
    let mut app = app::TrimApp::new(editor, &source);

    let mut terminal = setup_terminal()?;
    let res = app::run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    res?;

    Ok(app.outcome())
}

/// Open the clip list; every row plays through the same output
pub fn run_play(config: &Config, sources: Vec<AudioSource>) -> Result<(), Box<dyn Error>> {
    init_logging(config)?;
    info!("Starting clip player with {} clips", sources.len());

    let mut app = playlist::PlayListApp::new(Deck::open(), &sources);

    let mut terminal = setup_terminal()?;
    let res = playlist::run_app(&mut terminal, &mut app);
    restore_terminal(&mut terminal)?;
    app.shutdown();
    res
}

fn setup_terminal() -> Result<Tui, Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Tui) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

fn init_logging(config: &Config) -> Result<(), Box<dyn Error>> {
    use simplelog::{CombinedLogger, LevelFilter, WriteLogger};
    use std::fs::File;

    CombinedLogger::init(vec![WriteLogger::new(
        LevelFilter::Debug,
        simplelog::Config::default(),
        File::create(config.log_path())?,
    )])?;

    Ok(())
}
