//! One audio output shared by many independent cards.
//!
//! Cards identify themselves with a media id. [`PlaybackService`] keeps the
//! registrations, the single active descriptor and the "playing" id, so mutual
//! exclusion falls out of there being one resource: making another id active
//! swaps the source, and only the playing id can report `is_playing`.
//!
//! Starting playback is split into [`PlaybackService::request_play`] and
//! [`PlaybackService::complete_play`] because backends may start
//! asynchronously. A completion is applied only if its media id is still the
//! active one when it settles.

use super::stream::{normalize_source, same_source};
use crate::error::{ClipError, Result};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The single underlying audio-rendering object
pub trait AudioResource {
    /// Normalized source currently assigned, if any
    fn source(&self) -> Option<&str>;
    /// Assign a new source (or clear it with `None`), positioned at 0
    fn set_source(&mut self, source: Option<&str>) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn is_paused(&self) -> bool;
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, time: f64);
    /// Duration of the assigned source, 0 when unknown
    fn duration(&self) -> f64;
    /// Whether the assigned source played through to its end
    fn has_ended(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub source_url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

impl MediaDescriptor {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            title: None,
            artist: None,
            thumbnail: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }
}

/// Proof that a start was requested for a media id
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct PlayTicket {
    media_id: String,
    epoch: u64,
}

impl PlayTicket {
    pub fn media_id(&self) -> &str {
        &self.media_id
    }
}

pub struct PlaybackService<R: AudioResource> {
    resource: Option<R>,
    registrations: HashMap<String, MediaDescriptor>,
    active_id: Option<String>,
    playing_id: Option<String>,
    current_time: f64,
    duration: f64,
    epoch: u64,
}

impl<R: AudioResource> Default for PlaybackService<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: AudioResource> PlaybackService<R> {
    /// An uninitialized service; call [`Self::init`] before use
    pub fn new() -> Self {
        Self {
            resource: None,
            registrations: HashMap::new(),
            active_id: None,
            playing_id: None,
            current_time: 0.0,
            duration: 0.0,
            epoch: 0,
        }
    }

    pub fn init(&mut self, resource: R) {
        if self.resource.is_some() {
            self.dispose();
        }
        self.resource = Some(resource);
        self.epoch += 1;
        info!("Playback service initialized");
    }

    /// Release the resource and forget all state. Outstanding tickets go stale.
    pub fn dispose(&mut self) {
        if let Some(mut resource) = self.resource.take() {
            resource.pause();
            if let Err(e) = resource.set_source(None) {
                warn!("Failed to clear source on dispose: {e}");
            }
        }
        self.registrations.clear();
        self.active_id = None;
        self.playing_id = None;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.epoch += 1;
        info!("Playback service disposed");
    }

    pub fn is_initialized(&self) -> bool {
        self.resource.is_some()
    }

    fn resource_mut(&mut self) -> Result<&mut R> {
        self.resource
            .as_mut()
            .ok_or_else(|| ClipError::playback("playback service is not initialized"))
    }

    pub fn resource(&self) -> Option<&R> {
        self.resource.as_ref()
    }

    pub fn register(&mut self, media_id: impl Into<String>, descriptor: MediaDescriptor) {
        self.registrations.insert(media_id.into(), descriptor);
    }

    /// Forget a card. If it owned the resource the resource is cleared.
    pub fn unregister(&mut self, media_id: &str) -> Result<()> {
        self.registrations.remove(media_id);
        if self.active_id.as_deref() == Some(media_id) {
            self.set_active(media_id, None)?;
        }
        Ok(())
    }

    pub fn registration(&self, media_id: &str) -> Option<&MediaDescriptor> {
        self.registrations.get(media_id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    pub fn active_descriptor(&self) -> Option<&MediaDescriptor> {
        self.active_id
            .as_deref()
            .and_then(|id| self.registrations.get(id))
    }

    /// Point the shared resource at `media_id`.
    ///
    /// A different source pauses the resource, swaps the source and rewinds to
    /// 0. An equivalent source keeps the current position. `None` clears the
    /// resource entirely.
    pub fn set_active(&mut self, media_id: &str, descriptor: Option<MediaDescriptor>) -> Result<()> {
        let Some(descriptor) = descriptor else {
            let resource = self.resource_mut()?;
            resource.pause();
            resource.set_source(None)?;
            self.active_id = None;
            self.playing_id = None;
            self.current_time = 0.0;
            self.duration = 0.0;
            debug!("Cleared shared source for {media_id}");
            return Ok(());
        };

        let wanted = normalize_source(&descriptor.source_url);
        let resource = self.resource_mut()?;
        let unchanged = resource
            .source()
            .map(|current| same_source(current, &wanted))
            .unwrap_or(false);

        if unchanged {
            // Same audio keeps playing under the new owner
            if self.active_id.as_deref() != Some(media_id) && self.playing_id.is_some() {
                self.playing_id = Some(media_id.to_string());
            }
        } else {
            resource.pause();
            resource.set_source(Some(&wanted))?;
            resource.set_current_time(0.0);
            self.duration = resource.duration();
            self.current_time = 0.0;
            self.playing_id = None;
            info!("Shared source switched to {media_id}: {wanted}");
        }

        self.registrations.insert(media_id.to_string(), descriptor);
        self.active_id = Some(media_id.to_string());
        Ok(())
    }

    /// Ask the resource to start playing `media_id`, activating its
    /// registration first if another card owns the resource.
    pub fn request_play(&mut self, media_id: &str) -> Result<PlayTicket> {
        if self.active_id.as_deref() != Some(media_id) {
            let descriptor = self
                .registrations
                .get(media_id)
                .cloned()
                .ok_or_else(|| ClipError::playback(format!("unknown media id: {media_id}")))?;
            self.set_active(media_id, Some(descriptor))?;
        }

        self.resource_mut()?.play()?;
        Ok(PlayTicket {
            media_id: media_id.to_string(),
            epoch: self.epoch,
        })
    }

    /// Settle a start request. Returns whether `media_id` is now playing.
    ///
    /// Stale tickets (another id became active, or the service was disposed
    /// in between) are ignored.
    pub fn complete_play(&mut self, ticket: PlayTicket, started: bool) -> bool {
        let current = ticket.epoch == self.epoch
            && self.active_id.as_deref() == Some(ticket.media_id.as_str());
        if !current {
            debug!("Ignoring stale play completion for {}", ticket.media_id);
            return false;
        }

        if started {
            self.playing_id = Some(ticket.media_id);
            true
        } else {
            warn!("Playback failed to start for {}", ticket.media_id);
            self.playing_id = None;
            false
        }
    }

    /// Request and settle in one step, for backends that start synchronously
    pub fn play(&mut self, media_id: &str) -> Result<bool> {
        let ticket = self.request_play(media_id)?;
        Ok(self.complete_play(ticket, true))
    }

    pub fn pause(&mut self) {
        if let Some(resource) = self.resource.as_mut() {
            resource.pause();
            self.current_time = resource.current_time();
        }
        self.playing_id = None;
    }

    /// Toggle `media_id`. Returns whether it is playing afterwards.
    pub fn toggle(&mut self, media_id: &str) -> Result<bool> {
        if self.is_playing(media_id) {
            self.pause();
            Ok(false)
        } else {
            self.play(media_id)
        }
    }

    pub fn is_playing(&self, media_id: &str) -> bool {
        let Some(resource) = self.resource.as_ref() else {
            return false;
        };
        self.playing_id.as_deref() == Some(media_id)
            && self.active_id.as_deref() == Some(media_id)
            && !resource.is_paused()
    }

    pub fn is_active(&self, media_id: &str) -> bool {
        self.active_id.as_deref() == Some(media_id)
    }

    /// Seek the active source, clamped to `[0, duration]`
    pub fn seek(&mut self, time: f64) -> Result<f64> {
        if self.active_id.is_none() {
            return Err(ClipError::playback("nothing is loaded"));
        }
        let duration = self.duration;
        let resource = self.resource_mut()?;
        let clamped = time.clamp(0.0, duration.max(0.0));
        resource.set_current_time(clamped);
        self.current_time = clamped;
        Ok(clamped)
    }

    /// The resource reported that it reached the end of the source
    pub fn handle_ended(&mut self) {
        if let Some(resource) = self.resource.as_mut() {
            resource.pause();
            resource.set_current_time(0.0);
        }
        if let Some(id) = self.playing_id.take() {
            debug!("{id} played to the end");
        }
        self.current_time = 0.0;
    }

    /// Per-frame refresh of the tracked position; detects natural end
    pub fn sync(&mut self) {
        let Some(resource) = self.resource.as_ref() else {
            return;
        };
        if self.active_id.is_none() {
            return;
        }
        if resource.has_ended() {
            self.handle_ended();
            return;
        }
        self.current_time = resource.current_time();
        let duration = resource.duration();
        if duration > 0.0 {
            self.duration = duration;
        }
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Position as a fraction in `[0, 1]`
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.current_time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::AudioResource;
    use crate::error::{ClipError, Result};

    /// In-memory resource with a manually driven clock
    #[derive(Debug)]
    pub struct FakeResource {
        pub source: Option<String>,
        pub paused: bool,
        pub time: f64,
        pub source_duration: f64,
        pub ended: bool,
        pub fail_play: bool,
        pub loads: usize,
    }

    impl Default for FakeResource {
        fn default() -> Self {
            Self {
                source: None,
                paused: true,
                time: 0.0,
                source_duration: 120.0,
                ended: false,
                fail_play: false,
                loads: 0,
            }
        }
    }

    impl AudioResource for FakeResource {
        fn source(&self) -> Option<&str> {
            self.source.as_deref()
        }

        fn set_source(&mut self, source: Option<&str>) -> Result<()> {
            self.source = source.map(str::to_string);
            self.time = 0.0;
            self.ended = false;
            self.loads += 1;
            Ok(())
        }

        fn play(&mut self) -> Result<()> {
            if self.fail_play || self.source.is_none() {
                return Err(ClipError::playback("cannot start"));
            }
            self.paused = false;
            Ok(())
        }

        fn pause(&mut self) {
            self.paused = true;
        }

        fn is_paused(&self) -> bool {
            self.paused
        }

        fn current_time(&self) -> f64 {
            self.time
        }

        fn set_current_time(&mut self, time: f64) {
            self.time = time;
        }

        fn duration(&self) -> f64 {
            if self.source.is_some() {
                self.source_duration
            } else {
                0.0
            }
        }

        fn has_ended(&self) -> bool {
            self.ended
        }
    }
}
