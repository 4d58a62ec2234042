//! Shared playback across cards, driven through a scripted resource.

use zim_trim::error::{ClipError, Result};
use zim_trim::playback::{AudioResource, MediaDescriptor, PlaybackService, SongRef, stream_url};

#[derive(Default)]
struct ScriptedResource {
    source: Option<String>,
    playing: bool,
    time: f64,
    ended: bool,
    history: Vec<String>,
}

impl AudioResource for ScriptedResource {
    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn set_source(&mut self, source: Option<&str>) -> Result<()> {
        self.history.push(source.unwrap_or("<none>").to_string());
        self.source = source.map(str::to_string);
        self.time = 0.0;
        self.ended = false;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        if self.source.is_none() {
            return Err(ClipError::playback("empty"));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn is_paused(&self) -> bool {
        !self.playing
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, time: f64) {
        self.time = time;
    }

    fn duration(&self) -> f64 {
        if self.source.is_some() { 180.0 } else { 0.0 }
    }

    fn has_ended(&self) -> bool {
        self.ended
    }
}

const BASE: &str = "https://api.example.com/api";

fn card_url(id: &str) -> String {
    stream_url(BASE, &SongRef::Id(id.to_string()))
        .unwrap()
        .to_string()
}

#[test]
fn test_two_cards_share_one_output() {
    let mut service = PlaybackService::new();
    service.init(ScriptedResource::default());
    service.register("card-a", MediaDescriptor::new(card_url("a")).with_title("A"));
    service.register("card-b", MediaDescriptor::new(card_url("b")).with_title("B"));

    assert!(service.play("card-a").unwrap());
    service.sync();
    assert!(service.is_playing("card-a"));

    // B asks for the output while A is audible
    service
        .set_active("card-b", Some(MediaDescriptor::new(card_url("b"))))
        .unwrap();
    assert!(!service.is_playing("card-a"));
    assert!(service.play("card-b").unwrap());
    assert!(service.is_playing("card-b"));
    assert!(!service.is_playing("card-a"));

    let resource = service.resource().unwrap();
    assert_eq!(resource.history.len(), 2);
    assert_eq!(resource.source(), Some(card_url("b").as_str()));
}

#[test]
fn test_cache_busted_reactivation_keeps_position() {
    let mut service = PlaybackService::new();
    service.init(ScriptedResource::default());
    let plain = card_url("a");
    service.register("card-a", MediaDescriptor::new(plain.clone()));
    service.play("card-a").unwrap();
    service.seek(90.0).unwrap();

    let busted = format!("{plain}?t=1700000000000");
    service
        .set_active("card-a", Some(MediaDescriptor::new(busted)))
        .unwrap();

    assert_eq!(service.current_time(), 90.0);
    assert_eq!(service.resource().unwrap().history.len(), 1);
    assert!((service.progress() - 0.5).abs() < 1e-9);
}

#[test]
fn test_end_of_stream_and_dispose() {
    let mut service = PlaybackService::new();
    service.init(ScriptedResource::default());
    service.register("card-a", MediaDescriptor::new(card_url("a")));
    let ticket = service.request_play("card-a").unwrap();
    assert_eq!(ticket.media_id(), "card-a");
    assert!(service.complete_play(ticket, true));

    service.seek(179.0).unwrap();
    service.handle_ended();
    assert!(!service.is_playing("card-a"));
    assert_eq!(service.current_time(), 0.0);

    service.dispose();
    assert!(!service.is_initialized());
    assert!(service.play("card-a").is_err());
}
