//! Shared playback of already-trimmed clips.

pub mod coordinator;
pub mod stream;

pub use coordinator::{AudioResource, MediaDescriptor, PlayTicket, PlaybackService};
pub use stream::{SongRef, playable_url, same_source, stream_url};
