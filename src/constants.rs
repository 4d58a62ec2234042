//! Project-wide constants used across multiple modules.
//!
//! This module centralizes constant definitions to avoid duplication and ensure
//! consistency between the trimmer, the shared player and the upload boundary.

/// Hard ceiling on the length of any trim selection, in seconds
pub const MAX_LENGTH_SECS: f64 = 30.0;

/// Shortest selection the trimmer will produce, in seconds
pub const MIN_LENGTH_SECS: f64 = 1.0;

/// Number of bars in the trimmer waveform
pub const WAVEFORM_BARS: usize = 200;

/// How many selections the undo history keeps
pub const UNDO_DEPTH: usize = 10;

/// How many frames a transient status message stays on screen
pub const STATUS_MESSAGE_FRAMES: u32 = 90;

/// Query parameter appended to stream URLs to defeat caches
pub const CACHE_BUST_PARAM: &str = "t";

/// Spinner animation characters for progress indicators
pub const SPINNER_CHARS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Audio file extensions the trimmer accepts by default
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "m4a", "ogg"];

/// Extensions the local decoder can open for waveform and preview
pub const DECODABLE_EXTENSIONS: &[&str] = &["wav", "flac"];
