//! rodio-backed outputs for the trimmer preview and the shared clip player.
//!
//! Both sit on a [`Deck`]: decoded mono PCM queued on one `Sink`. Seeking
//! requeues the tail of the buffer from the requested sample, and the position
//! is tracked against the wall clock while the sink plays. When no output
//! device can be opened the deck still keeps time, it just makes no sound.

use log::{info, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink, buffer::SamplesBuffer};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use zim_trim::error::{ClipError, Result};
use zim_trim::playback::AudioResource;
use zim_trim::playback::stream::normalize_source;
use zim_trim::trim::{AudioSource, PreviewOutput};

#[derive(Clone)]
struct Pcm {
    sample_rate: u32,
    samples: Arc<Vec<f32>>,
}

impl Pcm {
    fn from_source(source: &AudioSource) -> Self {
        Self {
            sample_rate: source.sample_rate(),
            samples: Arc::new(source.samples().to_vec()),
        }
    }

    fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

pub struct Deck {
    // The stream must outlive the sink
    output: Option<(OutputStream, Sink)>,
    pcm: Option<Pcm>,
    base: f64,
    since: Option<Instant>,
}

impl Deck {
    /// Open the default output device, or fall back to a silent deck
    pub fn open() -> Self {
        match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => {
                let sink = Sink::connect_new(stream.mixer());
                sink.pause();
                info!("Opened default audio output");
                Self::with_output(Some((stream, sink)))
            }
            Err(e) => {
                warn!("No audio output ({e}); continuing without sound");
                Self::silent()
            }
        }
    }

    pub fn silent() -> Self {
        Self::with_output(None)
    }

    fn with_output(output: Option<(OutputStream, Sink)>) -> Self {
        Self {
            output,
            pcm: None,
            base: 0.0,
            since: None,
        }
    }

    pub fn has_sound(&self) -> bool {
        self.output.is_some()
    }

    fn sink(&self) -> Option<&Sink> {
        self.output.as_ref().map(|(_, sink)| sink)
    }

    fn load(&mut self, pcm: Pcm) {
        self.pcm = Some(pcm);
        self.since = None;
        self.cue(0.0);
    }

    fn unload(&mut self) {
        if let Some(sink) = self.sink() {
            sink.clear();
        }
        self.pcm = None;
        self.base = 0.0;
        self.since = None;
    }

    pub fn duration(&self) -> f64 {
        self.pcm.as_ref().map(Pcm::duration).unwrap_or(0.0)
    }

    pub fn position(&self) -> f64 {
        let elapsed = self
            .since
            .map(|since| since.elapsed().as_secs_f64())
            .unwrap_or(0.0);
        (self.base + elapsed).min(self.duration())
    }

    /// Queue the buffer from `time`, keeping the play state
    fn cue(&mut self, time: f64) {
        let was_playing = self.since.is_some();
        self.base = time.clamp(0.0, self.duration());
        self.since = None;

        if let Some((_, sink)) = &self.output {
            sink.clear();
            if let Some(pcm) = &self.pcm
                && pcm.sample_rate > 0
            {
                let first = ((self.base * pcm.sample_rate as f64) as usize).min(pcm.samples.len());
                let tail = pcm.samples[first..].to_vec();
                if !tail.is_empty() {
                    sink.append(SamplesBuffer::new(1, pcm.sample_rate, tail));
                }
            }
        }

        if was_playing {
            self.start();
        }
    }

    fn start(&mut self) -> bool {
        if self.since.is_some() {
            return true;
        }
        if self.pcm.is_none() || self.base >= self.duration() {
            return false;
        }
        if let Some(sink) = self.sink() {
            sink.play();
        }
        self.since = Some(Instant::now());
        true
    }

    fn stop(&mut self) {
        if let Some(since) = self.since.take() {
            self.base = (self.base + since.elapsed().as_secs_f64()).min(self.duration());
        }
        if let Some(sink) = self.sink() {
            sink.pause();
        }
    }

    pub fn is_paused(&self) -> bool {
        self.since.is_none()
    }

    fn reached_end(&self) -> bool {
        self.since.is_some() && self.position() >= self.duration()
    }
}

/// Preview output for the trimmer: one decoded file on its own deck
pub struct RodioPreview {
    deck: Deck,
}

impl RodioPreview {
    pub fn new(deck: Deck, source: &AudioSource) -> Self {
        let mut deck = deck;
        deck.load(Pcm::from_source(source));
        Self { deck }
    }

    pub fn has_sound(&self) -> bool {
        self.deck.has_sound()
    }
}

impl PreviewOutput for RodioPreview {
    fn current_time(&self) -> f64 {
        self.deck.position()
    }

    fn seek(&mut self, time: f64) {
        self.deck.cue(time);
    }

    fn play(&mut self) -> bool {
        let started = self.deck.start();
        if !started {
            warn!("Preview has nothing to play");
        }
        started
    }

    fn pause(&mut self) {
        self.deck.stop();
    }
}

/// Shared output for the clip list. Sources are looked up by their
/// normalized form in a library of already decoded files; file sources that
/// are not in the library are decoded on demand.
pub struct RodioResource {
    deck: Deck,
    library: HashMap<String, Pcm>,
    source: Option<String>,
}

impl RodioResource {
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            library: HashMap::new(),
            source: None,
        }
    }

    /// Make a decoded file available; returns the source string to register
    pub fn add(&mut self, source: &AudioSource) -> String {
        let key = normalize_source(&source.path().to_string_lossy());
        self.library.insert(key.clone(), Pcm::from_source(source));
        key
    }

    fn lookup(&mut self, source: &str) -> Result<Pcm> {
        if let Some(pcm) = self.library.get(source) {
            return Ok(pcm.clone());
        }

        let path = url::Url::parse(source)
            .ok()
            .filter(|u| u.scheme() == "file")
            .and_then(|u| u.to_file_path().ok())
            .ok_or_else(|| {
                ClipError::playback(format!("cannot stream {source} with the local player"))
            })?;
        let pcm = Pcm::from_source(&AudioSource::open(&path)?);
        self.library.insert(source.to_string(), pcm.clone());
        Ok(pcm)
    }
}

impl AudioResource for RodioResource {
    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn set_source(&mut self, source: Option<&str>) -> Result<()> {
        match source {
            Some(source) => {
                let pcm = self.lookup(source)?;
                self.deck.load(pcm);
                self.source = Some(source.to_string());
            }
            None => {
                self.deck.unload();
                self.source = None;
            }
        }
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Err(ClipError::playback("no source loaded"));
        }
        if self.deck.start() {
            Ok(())
        } else {
            Err(ClipError::playback("source has nothing left to play"))
        }
    }

    fn pause(&mut self) {
        self.deck.stop();
    }

    fn is_paused(&self) -> bool {
        self.deck.is_paused()
    }

    fn current_time(&self) -> f64 {
        self.deck.position()
    }

    fn set_current_time(&mut self, time: f64) {
        self.deck.cue(time);
    }

    fn duration(&self) -> f64 {
        self.deck.duration()
    }

    fn has_ended(&self) -> bool {
        self.deck.reached_end()
    }
}
