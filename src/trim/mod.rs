//! Clip trimmer core: selection math, undo, waveform projection, pointer
//! interaction and confined preview playback.

pub mod clock;
pub mod drag;
pub mod editor;
pub mod history;
pub mod selection;
pub mod source;
pub mod waveform;

pub use clock::{ClockTick, PlaybackClock, PlaybackState, PreviewOutput};
pub use drag::{Container, DragController, DragSession, DragState, Handle};
pub use editor::{TrimEditor, TrimHandler, TrimmedClip};
pub use history::UndoHistory;
pub use selection::{Selection, SelectionModel, clamp_length, clamp_start, initial_selection};
pub use source::AudioSource;
pub use waveform::{BarInstruction, BarState, WaveformSample, render_bars};
