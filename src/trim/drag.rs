//! Pointer interaction state machine for the trimmer handles.
//!
//! `Idle --down(handle)--> Dragging{Start,End} --move--> same --up--> Idle`.
//! A drag is represented by an owned [`DragSession`]; ending it (or dropping it,
//! e.g. when the editor is torn down mid-drag) always returns the controller to
//! `Idle`. Only one session can exist at a time.

use super::history::UndoHistory;
use super::selection::SelectionModel;
use std::cell::Cell;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    DraggingStart,
    DraggingEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handle {
    Start,
    End,
}

/// Horizontal extent of the waveform on screen, in pointer units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    pub left: f64,
    pub width: f64,
}

impl Container {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Inverse pixel to time mapping: `(x - left) / width * total`
    pub fn time_at(&self, x: f64, total_duration: f64) -> f64 {
        if self.width <= 0.0 {
            return 0.0;
        }
        (x - self.left) / self.width * total_duration
    }

    pub fn x_at(&self, time: f64, total_duration: f64) -> f64 {
        if total_duration <= 0.0 {
            return self.left;
        }
        self.left + time / total_duration * self.width
    }
}

/// What a pointer event changed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEffect {
    None,
    StartMoved(f64),
    LengthChanged(f64),
}

pub struct DragSession {
    handle: Handle,
    state: Rc<Cell<DragState>>,
}

impl DragSession {
    pub fn handle(&self) -> Handle {
        self.handle
    }
}

impl Drop for DragSession {
    fn drop(&mut self) {
        self.state.set(DragState::Idle);
    }
}

#[derive(Debug)]
pub struct DragController {
    state: Rc<Cell<DragState>>,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub fn new() -> Self {
        Self {
            state: Rc::new(Cell::new(DragState::Idle)),
        }
    }

    pub fn state(&self) -> DragState {
        self.state.get()
    }

    /// Begin dragging a handle. Returns `None` if a drag is already active.
    ///
    /// The current selection is pushed to `history` before anything moves.
    pub fn pointer_down(
        &mut self,
        handle: Handle,
        model: &SelectionModel,
        history: &mut UndoHistory,
    ) -> Option<DragSession> {
        if self.state.get() != DragState::Idle {
            return None;
        }

        history.push(model.selection());
        self.state.set(match handle {
            Handle::Start => DragState::DraggingStart,
            Handle::End => DragState::DraggingEnd,
        });

        Some(DragSession {
            handle,
            state: Rc::clone(&self.state),
        })
    }

    pub fn pointer_move(
        &self,
        session: &DragSession,
        x: f64,
        container: Container,
        model: &mut SelectionModel,
    ) -> DragEffect {
        let time = container.time_at(x, model.total_duration());
        match session.handle {
            Handle::Start => DragEffect::StartMoved(model.set_start(time)),
            Handle::End => {
                let start = model.selection().start_offset;
                DragEffect::LengthChanged(model.set_length(time - start))
            }
        }
    }

    pub fn pointer_up(&self, session: DragSession) {
        drop(session);
    }

    /// Click on the waveform body: move the window so it starts at the clicked time.
    ///
    /// Ignored while a drag is in progress.
    pub fn click(
        &self,
        x: f64,
        container: Container,
        model: &mut SelectionModel,
        history: &mut UndoHistory,
    ) -> DragEffect {
        if self.state.get() != DragState::Idle {
            return DragEffect::None;
        }

        history.push(model.selection());
        let time = container.time_at(x, model.total_duration());
        DragEffect::StartMoved(model.set_start(time))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trim::selection::Selection;

    fn setup(total: f64) -> (DragController, SelectionModel, UndoHistory, Container) {
        (
            DragController::new(),
            SelectionModel::new(total),
            UndoHistory::default(),
            // One pointer unit per 0.1s keeps the arithmetic readable
            Container::new(0.0, total * 10.0),
        )
    }

    #[test]
    fn test_container_mapping() {
        let container = Container::new(100.0, 200.0);
        assert_eq!(container.time_at(100.0, 40.0), 0.0);
        assert_eq!(container.time_at(200.0, 40.0), 20.0);
        assert_eq!(container.time_at(300.0, 40.0), 40.0);
        assert_eq!(container.x_at(20.0, 40.0), 200.0);
        assert_eq!(Container::new(0.0, 0.0).time_at(5.0, 40.0), 0.0);
    }

    #[test]
    fn test_drag_end_handle_is_clamped() {
        let (mut drag, mut model, mut history, container) = setup(45.0);

        let session = drag.pointer_down(Handle::End, &model, &mut history).unwrap();
        assert_eq!(drag.state(), DragState::DraggingEnd);

        let effect = drag.pointer_move(&session, 400.0, container, &mut model);
        assert_eq!(effect, DragEffect::LengthChanged(30.0));
        assert_eq!(model.selection().length, 30.0);

        // Far past the clip boundary
        drag.pointer_move(&session, 5000.0, container, &mut model);
        assert!(model.selection().length <= 30.0);

        drag.pointer_up(session);
        assert_eq!(drag.state(), DragState::Idle);
    }

    #[test]
    fn test_drag_start_handle_keeps_window_in_clip() {
        let (mut drag, mut model, mut history, container) = setup(45.0);

        let session = drag
            .pointer_down(Handle::Start, &model, &mut history)
            .unwrap();
        assert_eq!(drag.state(), DragState::DraggingStart);

        let effect = drag.pointer_move(&session, 300.0, container, &mut model);
        assert_eq!(effect, DragEffect::StartMoved(15.0));

        drag.pointer_move(&session, -80.0, container, &mut model);
        assert_eq!(model.selection().start_offset, 0.0);
        drag.pointer_up(session);
    }

    #[test]
    fn test_history_pushed_before_mutation() {
        let (mut drag, mut model, mut history, container) = setup(45.0);
        let before = model.selection();

        let session = drag.pointer_down(Handle::End, &model, &mut history).unwrap();
        drag.pointer_move(&session, 120.0, container, &mut model);
        drag.pointer_move(&session, 150.0, container, &mut model);
        drag.pointer_up(session);

        assert_eq!(history.len(), 1);
        assert_eq!(history.pop(), Some(before));
    }

    #[test]
    fn test_single_session_at_a_time() {
        let (mut drag, model, mut history, _) = setup(45.0);

        let session = drag.pointer_down(Handle::Start, &model, &mut history);
        assert!(session.is_some());
        assert!(drag.pointer_down(Handle::End, &model, &mut history).is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_dropping_session_returns_to_idle() {
        let (mut drag, model, mut history, _) = setup(45.0);
        {
            let _session = drag.pointer_down(Handle::End, &model, &mut history).unwrap();
            assert_eq!(drag.state(), DragState::DraggingEnd);
        }
        assert_eq!(drag.state(), DragState::Idle);
        assert!(drag.pointer_down(Handle::Start, &model, &mut history).is_some());
    }

    #[test]
    fn test_click_moves_window() {
        let (drag, mut model, mut history, container) = setup(45.0);
        model.set_length(10.0);

        let effect = drag.click(200.0, container, &mut model, &mut history);
        assert_eq!(effect, DragEffect::StartMoved(20.0));
        assert_eq!(
            model.selection(),
            Selection {
                start_offset: 20.0,
                length: 10.0
            }
        );

        // Click near the end clamps so the window still fits
        drag.click(440.0, container, &mut model, &mut history);
        assert_eq!(model.selection().start_offset, 35.0);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn test_click_ignored_while_dragging() {
        let (mut drag, mut model, mut history, container) = setup(45.0);
        let _session = drag.pointer_down(Handle::End, &model, &mut history).unwrap();

        let effect = drag.click(200.0, container, &mut model, &mut history);
        assert_eq!(effect, DragEffect::None);
        assert_eq!(model.selection().start_offset, 0.0);
    }
}
