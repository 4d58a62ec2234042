//! End-to-end trimmer flow over a real WAV file: decode, edit, preview,
//! confirm, and build the upload fields.

use std::path::Path;
use tempfile::TempDir;
use zim_trim::constants::WAVEFORM_BARS;
use zim_trim::trim::{
    AudioSource, BarState, ClockTick, Container, PreviewOutput, TrimEditor, TrimHandler, TrimmedClip,
};
use zim_trim::upload::{FieldValue, UploadLimits, UploadRequest, validate_upload};

/// Preview that only moves when the test says so
#[derive(Default)]
struct SteppedPreview {
    time: f64,
    playing: bool,
}

impl PreviewOutput for SteppedPreview {
    fn current_time(&self) -> f64 {
        self.time
    }
    fn seek(&mut self, time: f64) {
        self.time = time;
    }
    fn play(&mut self) -> bool {
        self.playing = true;
        true
    }
    fn pause(&mut self) {
        self.playing = false;
    }
}

#[derive(Default)]
struct Collector {
    clips: Vec<TrimmedClip>,
    cancels: usize,
}

impl TrimHandler for Collector {
    fn on_trimmed(&mut self, clip: TrimmedClip) {
        self.clips.push(clip);
    }
    fn on_cancel(&mut self) {
        self.cancels += 1;
    }
}

fn write_wav(path: &Path, seconds: u32, sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..seconds * sample_rate {
        let sample = if (i / 100) % 2 == 0 { 8000 } else { -8000 };
        writer.write_sample(sample as i16).unwrap();
    }
    writer.finalize().unwrap();
}

fn editor_for(path: &Path) -> TrimEditor<SteppedPreview> {
    let source = AudioSource::open(path).unwrap();
    let mut editor = TrimEditor::new(
        source.duration(),
        source.waveform(WAVEFORM_BARS),
        SteppedPreview::default(),
    );
    // One pointer unit per second
    editor.set_container(Container::new(0.0, source.duration()), 0.5);
    editor
}

#[test]
fn test_trim_and_upload_fields() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("long.wav");
    write_wav(&path, 60, 1000);

    let mut editor = editor_for(&path);
    assert_eq!(editor.total_duration(), 60.0);
    assert_eq!(editor.selection().length, 30.0);
    assert_eq!(editor.bars().len(), WAVEFORM_BARS);

    // Click the body at 20s, then drag the end handle to 40s
    editor.pointer_down(20.0);
    editor.pointer_up();
    assert_eq!(editor.selection().start_offset, 20.0);

    editor.pointer_down(50.0);
    editor.pointer_move(40.0);
    editor.pointer_up();
    assert_eq!(editor.selection().length, 20.0);

    let mut collector = Collector::default();
    let clip = editor.confirm(&mut collector).unwrap();
    assert_eq!(collector.clips, vec![clip]);
    assert!(editor.confirm(&mut collector).is_none());
    assert_eq!(collector.clips.len(), 1);

    let size = std::fs::metadata(&path).unwrap().len();
    let limits = UploadLimits {
        allowed_extensions: vec!["wav".into()],
        max_bytes: 10 * 1_048_576,
    };
    validate_upload(&path, size, "Long", "Tester", &limits).unwrap();

    let request = UploadRequest {
        file: path.clone(),
        title: "Long".into(),
        artist: "Tester".into(),
        entity_account_id: None,
        author_entity_id: None,
        author_entity_type: None,
        clip,
    };
    let fields = request.form_fields();
    assert_eq!(fields[0], ("file", FieldValue::File(path)));
    assert!(fields.contains(&("audioStartOffset", FieldValue::Text("20".into()))));
    assert!(fields.contains(&("audioDuration", FieldValue::Text("20".into()))));
}

#[test]
fn test_preview_starts_at_window_start() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("preview.wav");
    write_wav(&path, 45, 1000);

    let mut editor = editor_for(&path);
    editor.nudge_start(5.0);
    editor.toggle_playback();
    assert!(editor.playback_state().is_playing);
    assert!(editor.output().playing);
    assert_eq!(editor.output().time, 5.0);

    assert_eq!(editor.tick(), ClockTick::Running(5.0));
    assert!(editor.bars().iter().any(|b| b.state == BarState::Playing));

    editor.toggle_playback();
    assert!(!editor.playback_state().is_playing);
    assert!(!editor.output().playing);
    assert_eq!(editor.tick(), ClockTick::Idle);

    // Shrinking is clamped to the minimum length
    editor.nudge_length(-40.0);
    assert_eq!(editor.selection().length, 1.0);
    assert!(editor.undo());
    assert_eq!(editor.selection().length, 30.0);
}

#[test]
fn test_undecodable_file_cannot_confirm() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("clip.mp3");
    std::fs::write(&path, b"ID3 not decodable here").unwrap();

    let source = AudioSource::open_or_empty(&path);
    assert_eq!(source.duration(), 0.0);

    let mut editor = TrimEditor::new(
        source.duration(),
        source.waveform(WAVEFORM_BARS),
        SteppedPreview::default(),
    );
    assert!(!editor.can_confirm());

    let mut collector = Collector::default();
    assert!(editor.confirm(&mut collector).is_none());
    assert!(collector.clips.is_empty());
    assert!(editor.status().is_some());

    editor.cancel(&mut collector);
    assert_eq!(collector.cancels, 1);
}
