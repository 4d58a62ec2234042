//! Clip list where every row shares one audio output.
//!
//! Each row registers with the [`PlaybackService`] under a random media id.
//! Starting a row makes it the active media, which pauses and replaces
//! whatever the previous row was playing.

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use log::{info, warn};
use ratatui::{Terminal, layout::Rect};
use std::{error::Error, time::Duration};
use uuid::Uuid;
use zim_trim::playback::{AudioResource, MediaDescriptor, PlaybackService};
use zim_trim::trim::{AudioSource, WaveformSample};

use super::audio::{Deck, RodioResource};
use super::ui;

const FRAME: Duration = Duration::from_millis(50);

/// Bars in the per-row waveform strip
pub const STRIP_BARS: usize = 32;

const SEEK_STEP: f64 = 5.0;

pub struct Card {
    pub media_id: String,
    pub title: String,
    pub duration: f64,
    pub strip: WaveformSample,
}

pub struct PlayListApp<R: AudioResource> {
    pub service: PlaybackService<R>,
    pub cards: Vec<Card>,
    pub selected: usize,
    pub should_quit: bool,
    pub message: Option<String>,
    list_area: Rect,
    list_offset: usize,
}

impl PlayListApp<RodioResource> {
    pub fn new(deck: Deck, sources: &[AudioSource]) -> Self {
        let mut resource = RodioResource::new(deck);
        let entries: Vec<(Card, MediaDescriptor)> = sources
            .iter()
            .map(|source| {
                let url = resource.add(source);
                let card = Card::from_source(source);
                let descriptor = MediaDescriptor::new(url).with_title(card.title.clone());
                (card, descriptor)
            })
            .collect();
        Self::with_resource(resource, entries)
    }
}

impl Card {
    pub fn from_source(source: &AudioSource) -> Self {
        let title = source
            .path()
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| source.path().display().to_string());
        Self {
            media_id: Uuid::new_v4().to_string(),
            title,
            duration: source.duration(),
            strip: source.waveform(STRIP_BARS),
        }
    }
}

impl<R: AudioResource> PlayListApp<R> {
    pub fn with_resource(resource: R, entries: Vec<(Card, MediaDescriptor)>) -> Self {
        let mut service = PlaybackService::new();
        service.init(resource);

        let mut cards = Vec::with_capacity(entries.len());
        for (card, descriptor) in entries {
            service.register(card.media_id.clone(), descriptor);
            cards.push(card);
        }

        Self {
            service,
            cards,
            selected: 0,
            should_quit: false,
            message: None,
            list_area: Rect::default(),
            list_offset: 0,
        }
    }

    pub fn shutdown(&mut self) {
        self.service.dispose();
    }

    pub fn selected_card(&self) -> Option<&Card> {
        self.cards.get(self.selected)
    }

    /// Play or pause the selected row
    pub fn toggle_selected(&mut self) {
        let Some(card) = self.cards.get(self.selected) else {
            return;
        };
        let media_id = card.media_id.clone();
        match self.service.toggle(&media_id) {
            Ok(playing) => {
                self.message = None;
                info!("{} {}", if playing { "Playing" } else { "Paused" }, card.title);
            }
            Err(e) => {
                warn!("Could not play {}: {e}", card.title);
                self.message = Some(e.to_string());
            }
        }
    }

    pub fn seek_by(&mut self, delta: f64) {
        let target = self.service.current_time() + delta;
        if let Err(e) = self.service.seek(target) {
            self.message = Some(e.to_string());
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.cards.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Remember where the list was drawn and which row is at its top
    pub fn set_list_area(&mut self, area: Rect, offset: usize) {
        self.list_area = area;
        self.list_offset = offset;
    }

    /// First visible row so that the selection stays on screen
    pub fn scroll_offset(&self, visible_rows: usize) -> usize {
        if visible_rows == 0 {
            return 0;
        }
        self.selected.saturating_sub(visible_rows - 1)
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let coarse = key.modifiers.contains(KeyModifiers::SHIFT);
        let step = if coarse { SEEK_STEP * 4.0 } else { SEEK_STEP };

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Left => self.seek_by(-step),
            KeyCode::Right => self.seek_by(step),
            _ => {}
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let area = self.list_area;
        if mouse.column < area.x
            || mouse.column >= area.x + area.width
            || mouse.row < area.y
            || mouse.row >= area.y + area.height
        {
            return;
        }
        let index = self.list_offset + (mouse.row - area.y) as usize;
        if index < self.cards.len() {
            self.selected = index;
            self.toggle_selected();
        }
    }
}

pub fn run_app<B: ratatui::backend::Backend, R: AudioResource>(
    terminal: &mut Terminal<B>,
    app: &mut PlayListApp<R>,
) -> Result<(), Box<dyn Error>> {
    loop {
        app.service.sync();

        let mut drawn = (Rect::default(), 0);
        terminal.draw(|f| drawn = ui::draw_playlist(f, app))?;
        app.set_list_area(drawn.0, drawn.1);

        if event::poll(FRAME)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
