//! Event loop and input handling for the interactive trimmer.
//!
//! Keyboard and mouse input are translated into [`TrimEditor`] calls. The
//! waveform's on-screen rectangle is captured every frame so mouse columns map
//! onto clip time the same way the bars were laid out.

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::{Terminal, layout::Rect};
use std::{error::Error, time::Duration};
use zim_trim::trim::{AudioSource, Container, PreviewOutput, TrimEditor, TrimHandler, TrimmedClip};

use super::ui;

/// One frame; the preview can overrun the window end by at most this much
const FRAME: Duration = Duration::from_millis(20);

/// Seconds per arrow-key nudge, and with Shift held
const NUDGE_FINE: f64 = 0.1;
const NUDGE_COARSE: f64 = 1.0;

/// Seconds per `[` / `]` resize
const RESIZE_STEP: f64 = 0.5;

/// How close (in terminal columns) a press must land to grab a handle
const HANDLE_TOLERANCE: f64 = 1.0;

#[derive(Debug, Default)]
struct Outcome {
    clip: Option<TrimmedClip>,
    cancelled: bool,
}

impl TrimHandler for Outcome {
    fn on_trimmed(&mut self, clip: TrimmedClip) {
        self.clip = Some(clip);
    }

    fn on_cancel(&mut self) {
        self.cancelled = true;
    }
}

pub struct TrimApp<P: PreviewOutput> {
    pub editor: TrimEditor<P>,
    pub file_name: String,
    waveform_area: Rect,
    outcome: Outcome,
}

impl<P: PreviewOutput> TrimApp<P> {
    pub fn new(editor: TrimEditor<P>, source: &AudioSource) -> Self {
        let file_name = source
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| source.path().display().to_string());
        Self {
            editor,
            file_name,
            waveform_area: Rect::default(),
            outcome: Outcome::default(),
        }
    }

    pub fn is_done(&self) -> bool {
        self.editor.is_finished()
    }

    pub fn outcome(&self) -> Option<TrimmedClip> {
        self.outcome.clip
    }

    /// Record where the waveform was drawn this frame
    pub fn set_waveform_area(&mut self, area: Rect) {
        self.waveform_area = area;
        self.editor.set_container(
            Container::new(area.x as f64, area.width as f64),
            HANDLE_TOLERANCE,
        );
    }

    pub fn confirm(&mut self) {
        self.editor.confirm(&mut self.outcome);
    }

    pub fn cancel(&mut self) {
        self.editor.cancel(&mut self.outcome);
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let coarse = key.modifiers.contains(KeyModifiers::SHIFT);
        let step = if coarse { NUDGE_COARSE } else { NUDGE_FINE };

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.cancel(),
            KeyCode::Enter => self.confirm(),
            KeyCode::Char(' ') => self.editor.toggle_playback(),
            KeyCode::Left => self.editor.nudge_start(-step),
            KeyCode::Right => self.editor.nudge_start(step),
            KeyCode::Char('[') => self.editor.nudge_length(-RESIZE_STEP),
            KeyCode::Char(']') => self.editor.nudge_length(RESIZE_STEP),
            KeyCode::Char('u') => {
                self.editor.undo();
            }
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        // Centre of the cell under the pointer
        let x = mouse.column as f64 + 0.5;
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if self.in_waveform(mouse) => {
                self.editor.pointer_down(x);
            }
            MouseEventKind::Drag(MouseButton::Left) => self.editor.pointer_move(x),
            MouseEventKind::Up(MouseButton::Left) => self.editor.pointer_up(),
            _ => {}
        }
    }

    fn in_waveform(&self, mouse: MouseEvent) -> bool {
        let area = self.waveform_area;
        mouse.column >= area.x
            && mouse.column < area.x + area.width
            && mouse.row >= area.y
            && mouse.row < area.y + area.height
    }
}

pub fn run_app<B: ratatui::backend::Backend, P: PreviewOutput>(
    terminal: &mut Terminal<B>,
    app: &mut TrimApp<P>,
) -> Result<(), Box<dyn Error>> {
    loop {
        app.editor.tick();

        let mut waveform_area = Rect::default();
        terminal.draw(|f| waveform_area = ui::draw_trim(f, app))?;
        app.set_waveform_area(waveform_area);

        if event::poll(FRAME)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if app.is_done() {
            return Ok(());
        }
    }
}
