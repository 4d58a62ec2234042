//! Confined preview playback of the current selection.
//!
//! The clock does not own a thread or timer. The host calls [`PlaybackClock::tick`]
//! once per rendered frame; when a tick observes the preview position at or past
//! the selection end it pauses the output and rewinds to the selection start in
//! that same tick, so overrun is bounded by a single frame of audio.

use super::selection::Selection;
use log::debug;

/// Local preview output for one loaded source
pub trait PreviewOutput {
    /// Current position in seconds
    fn current_time(&self) -> f64;
    fn seek(&mut self, time: f64);
    /// Start output. Returns `false` if there is nothing to play.
    fn play(&mut self) -> bool;
    fn pause(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackState {
    pub current_time: f64,
    pub is_playing: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockTick {
    /// The loop is not armed
    Idle,
    /// Still inside the window at this position
    Running(f64),
    /// Crossed the window end; output was paused and rewound
    Stopped,
}

pub struct PlaybackClock<P: PreviewOutput> {
    output: P,
    state: PlaybackState,
    armed: bool,
    disposed: bool,
}

impl<P: PreviewOutput> PlaybackClock<P> {
    pub fn new(output: P) -> Self {
        let current_time = output.current_time();
        Self {
            output,
            state: PlaybackState {
                current_time,
                is_playing: false,
            },
            armed: false,
            disposed: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn output(&self) -> &P {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut P {
        &mut self.output
    }

    pub fn play(&mut self, selection: Selection) {
        if self.disposed || self.armed {
            return;
        }

        let position = self.output.current_time();
        if position < selection.start_offset || position >= selection.end() {
            self.output.seek(selection.start_offset);
        }
        let started = self.output.play();

        self.armed = started;
        self.state = PlaybackState {
            current_time: self.output.current_time(),
            is_playing: started,
        };
        if !started {
            debug!("Preview output did not start");
            return;
        }
        debug!(
            "Preview started at {:.2}s (window {:.2}s..{:.2}s)",
            self.state.current_time,
            selection.start_offset,
            selection.end()
        );
    }

    /// One iteration of the per-frame loop
    pub fn tick(&mut self, selection: Selection) -> ClockTick {
        if !self.armed {
            return ClockTick::Idle;
        }

        let position = self.output.current_time();
        if position >= selection.end() {
            self.output.pause();
            self.output.seek(selection.start_offset);
            self.armed = false;
            self.state = PlaybackState {
                current_time: selection.start_offset,
                is_playing: false,
            };
            debug!("Preview reached window end at {position:.2}s, rewound");
            return ClockTick::Stopped;
        }

        self.state.current_time = position;
        ClockTick::Running(position)
    }

    pub fn pause(&mut self) {
        self.armed = false;
        self.output.pause();
        self.state = PlaybackState {
            current_time: self.output.current_time(),
            is_playing: false,
        };
    }

    pub fn toggle(&mut self, selection: Selection) {
        if self.armed {
            self.pause();
        } else {
            self.play(selection);
        }
    }

    /// Reposition the preview without changing play state
    pub fn seek(&mut self, time: f64) {
        if self.disposed {
            return;
        }
        self.output.seek(time);
        self.state.current_time = time;
    }

    /// Stop for good; later `play` and `tick` calls do nothing
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.pause();
        self.disposed = true;
    }
}
