//! Waveform bars for the trimmer.
//!
//! A [`WaveformSample`] is computed once per source from decoded PCM: the clip is
//! split into a fixed number of buckets and each bucket keeps its absolute peak,
//! normalized against the loudest bucket. [`render_bars`] then projects those
//! amplitudes plus the current selection and playhead into per-bar draw
//! instructions that any backend can paint.

use super::clock::PlaybackState;
use super::selection::Selection;

/// Fixed-length amplitude sequence, one value in `[0, 1]` per bar
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformSample {
    amplitudes: Vec<f32>,
}

impl WaveformSample {
    /// Bucket mono PCM into `bars` peak amplitudes.
    ///
    /// Short or empty input still yields exactly `bars` values; buckets with no
    /// samples are silent.
    pub fn from_pcm(samples: &[f32], bars: usize) -> Self {
        let total = samples.len();
        let mut amplitudes: Vec<f32> = (0..bars)
            .map(|i| {
                let start = i * total / bars;
                let end = ((i + 1) * total / bars).min(total);
                if start >= end {
                    return 0.0;
                }
                samples[start..end]
                    .iter()
                    .map(|s| s.abs())
                    .fold(0.0_f32, f32::max)
            })
            .collect();

        let loudest = amplitudes.iter().copied().fold(0.0_f32, f32::max);
        if loudest > 0.0 {
            for a in &mut amplitudes {
                *a = (*a / loudest).min(1.0);
            }
        }

        Self { amplitudes }
    }

    /// Build directly from amplitude values, clamping each into `[0, 1]`
    pub fn from_amplitudes(amplitudes: Vec<f32>) -> Self {
        Self {
            amplitudes: amplitudes
                .into_iter()
                .map(|a| if a.is_finite() { a.clamp(0.0, 1.0) } else { 0.0 })
                .collect(),
        }
    }

    pub fn amplitudes(&self) -> &[f32] {
        &self.amplitudes
    }

    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarState {
    Unselected,
    Selected,
    Playing,
}

/// Backend-agnostic description of one bar.
///
/// `x` and `width` are fractions of the container width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarInstruction {
    pub index: usize,
    pub x: f64,
    pub width: f64,
    pub amplitude: f32,
    pub state: BarState,
}

pub fn render_bars(
    waveform: &WaveformSample,
    total_duration: f64,
    selection: Selection,
    playback: PlaybackState,
) -> Vec<BarInstruction> {
    let n = waveform.len();
    if n == 0 {
        return Vec::new();
    }

    let bar_width = 1.0 / n as f64;
    let has_duration = total_duration.is_finite() && total_duration > 0.0;

    let (start_frac, end_frac, playhead) = if has_duration {
        let confined = playback
            .current_time
            .clamp(selection.start_offset, selection.end());
        (
            selection.start_offset / total_duration,
            selection.end() / total_duration,
            confined / total_duration,
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    waveform
        .amplitudes()
        .iter()
        .enumerate()
        .map(|(index, &amplitude)| {
            let bar_percent = index as f64 / n as f64;
            let selected = has_duration && bar_percent >= start_frac && bar_percent <= end_frac;
            let playing =
                playback.is_playing && selected && (bar_percent - playhead).abs() <= bar_width;

            let state = if playing {
                BarState::Playing
            } else if selected {
                BarState::Selected
            } else {
                BarState::Unselected
            };

            BarInstruction {
                index,
                x: bar_percent,
                width: bar_width,
                amplitude,
                state,
            }
        })
        .collect()
}

const BLOCKS: [&str; 9] = [" ", "▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];

/// Terminal block glyph for an amplitude; any audible bar gets at least `▁`
pub fn amplitude_to_block(amplitude: f32) -> &'static str {
    if amplitude.is_nan() || amplitude <= 0.0 {
        return BLOCKS[0];
    }
    let level = (amplitude.min(1.0) * 8.0).ceil() as usize;
    BLOCKS[level.clamp(1, 8)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stopped() -> PlaybackState {
        PlaybackState {
            current_time: 0.0,
            is_playing: false,
        }
    }

    #[test]
    fn test_from_pcm_bucket_count_and_normalization() {
        let mut pcm = vec![0.1_f32; 1000];
        pcm[999] = -0.5;
        let waveform = WaveformSample::from_pcm(&pcm, 10);

        assert_eq!(waveform.len(), 10);
        assert_eq!(waveform.amplitudes()[9], 1.0);
        assert!((waveform.amplitudes()[0] - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_from_pcm_short_input() {
        let waveform = WaveformSample::from_pcm(&[0.5, -1.0, 0.25], 8);
        assert_eq!(waveform.len(), 8);
        assert!(waveform.amplitudes().iter().all(|a| (0.0..=1.0).contains(a)));
        assert!(waveform.amplitudes().contains(&1.0));
    }

    #[test]
    fn test_from_pcm_silence() {
        let waveform = WaveformSample::from_pcm(&[], 200);
        assert_eq!(waveform.len(), 200);
        assert!(waveform.amplitudes().iter().all(|&a| a == 0.0));
    }

    #[test]
    fn test_from_amplitudes_clamps() {
        let waveform = WaveformSample::from_amplitudes(vec![-1.0, 0.5, 3.0, f32::NAN]);
        assert_eq!(waveform.amplitudes(), &[0.0, 0.5, 1.0, 0.0]);
    }

    #[test]
    fn test_selected_bars_follow_window() {
        let waveform = WaveformSample::from_amplitudes(vec![0.5; 100]);
        let selection = Selection {
            start_offset: 10.0,
            length: 30.0,
        };
        let bars = render_bars(&waveform, 100.0, selection, stopped());

        assert_eq!(bars.len(), 100);
        assert_eq!(bars[9].state, BarState::Unselected);
        assert_eq!(bars[10].state, BarState::Selected);
        assert_eq!(bars[40].state, BarState::Selected);
        assert_eq!(bars[41].state, BarState::Unselected);
        assert!((bars[50].x - 0.5).abs() < 1e-12);
        assert!((bars[0].width - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_playing_overrides_selected() {
        let waveform = WaveformSample::from_amplitudes(vec![0.5; 100]);
        let selection = Selection {
            start_offset: 10.0,
            length: 30.0,
        };
        let playback = PlaybackState {
            current_time: 25.0,
            is_playing: true,
        };
        let bars = render_bars(&waveform, 100.0, selection, playback);

        assert_eq!(bars[25].state, BarState::Playing);
        assert_eq!(bars[20].state, BarState::Selected);
        assert_eq!(bars[30].state, BarState::Selected);
        let playing = bars.iter().filter(|b| b.state == BarState::Playing).count();
        assert!((1..=3).contains(&playing));
    }

    #[test]
    fn test_paused_playhead_not_highlighted() {
        let waveform = WaveformSample::from_amplitudes(vec![0.5; 100]);
        let selection = Selection {
            start_offset: 0.0,
            length: 30.0,
        };
        let playback = PlaybackState {
            current_time: 15.0,
            is_playing: false,
        };
        let bars = render_bars(&waveform, 100.0, selection, playback);
        assert!(bars.iter().all(|b| b.state != BarState::Playing));
    }

    #[test]
    fn test_playhead_confined_to_window() {
        let waveform = WaveformSample::from_amplitudes(vec![0.5; 100]);
        let selection = Selection {
            start_offset: 10.0,
            length: 20.0,
        };
        // A stale playhead outside the window is drawn at the window edge
        let playback = PlaybackState {
            current_time: 80.0,
            is_playing: true,
        };
        let bars = render_bars(&waveform, 100.0, selection, playback);
        assert_eq!(bars[30].state, BarState::Playing);
        assert_eq!(bars[80].state, BarState::Unselected);
    }

    #[test]
    fn test_zero_duration_renders_unselected() {
        let waveform = WaveformSample::from_amplitudes(vec![0.3; 20]);
        let selection = Selection {
            start_offset: 0.0,
            length: 1.0,
        };
        let bars = render_bars(&waveform, 0.0, selection, stopped());
        assert_eq!(bars.len(), 20);
        assert!(bars.iter().all(|b| b.state == BarState::Unselected));
    }

    #[test]
    fn test_amplitude_to_block() {
        assert_eq!(amplitude_to_block(0.0), " ");
        assert_eq!(amplitude_to_block(-0.3), " ");
        assert_eq!(amplitude_to_block(0.01), "▁");
        assert_eq!(amplitude_to_block(0.125), "▁");
        assert_eq!(amplitude_to_block(0.5), "▄");
        assert_eq!(amplitude_to_block(0.99), "█");
        assert_eq!(amplitude_to_block(1.0), "█");
        assert_eq!(amplitude_to_block(4.0), "█");
    }
}
