//! Trim editor session: one source, one selection, one preview.
//!
//! Ties the selection model, undo history, drag controller and preview clock
//! together behind pointer and keyboard entry points, and emits the result to a
//! [`TrimHandler`] exactly once.

use super::clock::{ClockTick, PlaybackClock, PlaybackState, PreviewOutput};
use super::drag::{Container, DragController, DragEffect, DragSession, DragState, Handle};
use super::history::UndoHistory;
use super::selection::{Selection, SelectionModel};
use super::waveform::{BarInstruction, WaveformSample, render_bars};
use crate::constants::STATUS_MESSAGE_FRAMES;
use log::info;
use serde::Serialize;

/// Interval handed to the upload boundary on confirm
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrimmedClip {
    pub start_offset: f64,
    pub duration: f64,
}

impl From<Selection> for TrimmedClip {
    fn from(selection: Selection) -> Self {
        Self {
            start_offset: selection.start_offset,
            duration: selection.length,
        }
    }
}

pub trait TrimHandler {
    fn on_trimmed(&mut self, clip: TrimmedClip);
    fn on_cancel(&mut self);
}

/// Where a pointer landed relative to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    StartHandle,
    EndHandle,
    Body,
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    frames_left: u32,
}

pub struct TrimEditor<P: PreviewOutput> {
    model: SelectionModel,
    history: UndoHistory,
    drag: DragController,
    session: Option<DragSession>,
    clock: PlaybackClock<P>,
    waveform: WaveformSample,
    container: Container,
    handle_tolerance: f64,
    status: Option<StatusMessage>,
    finished: bool,
}

impl<P: PreviewOutput> TrimEditor<P> {
    pub fn new(total_duration: f64, waveform: WaveformSample, output: P) -> Self {
        let model = SelectionModel::new(total_duration);
        let mut clock = PlaybackClock::new(output);
        clock.seek(model.selection().start_offset);

        Self {
            model,
            history: UndoHistory::default(),
            drag: DragController::new(),
            session: None,
            clock,
            waveform,
            container: Container::new(0.0, 1.0),
            handle_tolerance: 1.0,
            status: None,
            finished: false,
        }
    }

    pub fn selection(&self) -> Selection {
        self.model.selection()
    }

    pub fn total_duration(&self) -> f64 {
        self.model.total_duration()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.clock.state()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn output(&self) -> &P {
        self.clock.output()
    }

    pub fn bars(&self) -> Vec<BarInstruction> {
        render_bars(
            &self.waveform,
            self.model.total_duration(),
            self.model.selection(),
            self.clock.state(),
        )
    }

    /// Update the on-screen extent of the waveform and how close (in pointer
    /// units) a press must be to grab a handle.
    pub fn set_container(&mut self, container: Container, handle_tolerance: f64) {
        self.container = container;
        self.handle_tolerance = handle_tolerance;
    }

    pub fn hit_test(&self, x: f64) -> Hit {
        let total = self.model.total_duration();
        let sel = self.model.selection();
        let start_x = self.container.x_at(sel.start_offset, total);
        let end_x = self.container.x_at(sel.end(), total);

        let to_start = (x - start_x).abs();
        let to_end = (x - end_x).abs();
        if to_start <= self.handle_tolerance || to_end <= self.handle_tolerance {
            // Prefer the nearer handle when the window is narrow on screen
            if to_end < to_start {
                Hit::EndHandle
            } else {
                Hit::StartHandle
            }
        } else {
            Hit::Body
        }
    }

    pub fn pointer_down(&mut self, x: f64) {
        if self.finished {
            return;
        }
        match self.hit_test(x) {
            Hit::StartHandle => self.begin_drag(Handle::Start),
            Hit::EndHandle => self.begin_drag(Handle::End),
            Hit::Body => self.click(x),
        }
    }

    fn begin_drag(&mut self, handle: Handle) {
        if let Some(session) = self
            .drag
            .pointer_down(handle, &self.model, &mut self.history)
        {
            self.session = Some(session);
        }
    }

    pub fn pointer_move(&mut self, x: f64) {
        let Some(session) = &self.session else {
            return;
        };
        let effect = self
            .drag
            .pointer_move(session, x, self.container, &mut self.model);
        self.apply_effect(effect);
    }

    pub fn pointer_up(&mut self) {
        if let Some(session) = self.session.take() {
            self.drag.pointer_up(session);
        }
    }

    pub fn click(&mut self, x: f64) {
        if self.finished {
            return;
        }
        let effect = self
            .drag
            .click(x, self.container, &mut self.model, &mut self.history);
        if let DragEffect::StartMoved(start) = effect {
            // A click always moves the preview to the new start
            self.clock.seek(start);
        }
    }

    fn apply_effect(&mut self, effect: DragEffect) {
        if let DragEffect::StartMoved(start) = effect
            && !self.clock.is_playing()
        {
            self.clock.seek(start);
        }
    }

    /// Keyboard move of the window by `delta` seconds
    pub fn nudge_start(&mut self, delta: f64) {
        if self.finished || self.session.is_some() {
            return;
        }
        self.history.push(self.model.selection());
        let start = self.model.selection().start_offset + delta;
        let applied = self.model.set_start(start);
        self.apply_effect(DragEffect::StartMoved(applied));
    }

    /// Keyboard resize of the window by `delta` seconds
    pub fn nudge_length(&mut self, delta: f64) {
        if self.finished || self.session.is_some() {
            return;
        }
        self.history.push(self.model.selection());
        let length = self.model.selection().length + delta;
        self.model.set_length(length);
    }

    pub fn undo(&mut self) -> bool {
        if self.session.is_some() {
            return false;
        }
        match self.history.pop() {
            Some(snapshot) => {
                self.model.restore(snapshot);
                if !self.clock.is_playing() {
                    self.clock.seek(snapshot.start_offset);
                }
                true
            }
            None => {
                self.flash("Nothing to undo");
                false
            }
        }
    }

    pub fn toggle_playback(&mut self) {
        if self.finished {
            return;
        }
        let was_playing = self.clock.is_playing();
        self.clock.toggle(self.model.selection());
        if !was_playing && !self.clock.is_playing() {
            self.flash("Nothing to preview");
        }
    }

    /// Per-frame work: advance the preview loop and age the status message
    pub fn tick(&mut self) -> ClockTick {
        if let Some(status) = &mut self.status {
            status.frames_left = status.frames_left.saturating_sub(1);
            if status.frames_left == 0 {
                self.status = None;
            }
        }
        self.clock.tick(self.model.selection())
    }

    /// Show a transient message that clears itself after a while
    pub fn flash(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            frames_left: STATUS_MESSAGE_FRAMES,
        });
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.text.as_str())
    }

    pub fn can_confirm(&self) -> bool {
        !self.finished && !self.model.is_degenerate()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn confirm(&mut self, handler: &mut dyn TrimHandler) -> Option<TrimmedClip> {
        if self.finished {
            return None;
        }
        if !self.can_confirm() {
            self.flash("Audio is too short or could not be decoded");
            return None;
        }

        self.dispose();
        let clip = TrimmedClip::from(self.model.selection());
        info!(
            "Trim confirmed: start {:.2}s, duration {:.2}s",
            clip.start_offset, clip.duration
        );
        handler.on_trimmed(clip);
        Some(clip)
    }

    pub fn cancel(&mut self, handler: &mut dyn TrimHandler) {
        if self.finished {
            return;
        }
        self.dispose();
        info!("Trim cancelled");
        handler.on_cancel();
    }

    fn dispose(&mut self) {
        self.pointer_up();
        self.clock.dispose();
        self.finished = true;
    }
}
