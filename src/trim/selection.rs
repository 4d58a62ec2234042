//! Selection interval math for the trimmer.
//!
//! A selection is a `(start_offset, length)` window over a clip of known total
//! duration. All mutation goes through [`SelectionModel`], whose setters apply
//! [`clamp_start`] and [`clamp_length`] so the window can never leave the clip
//! or exceed [`MAX_LENGTH_SECS`].

use crate::constants::{MAX_LENGTH_SECS, MIN_LENGTH_SECS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub start_offset: f64,
    pub length: f64,
}

impl Selection {
    pub fn end(&self) -> f64 {
        self.start_offset + self.length
    }

    /// Whether `time` falls inside `[start_offset, end]`
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start_offset && time <= self.end()
    }
}

fn sanitize_duration(total_duration: f64) -> f64 {
    if total_duration.is_finite() && total_duration > 0.0 {
        total_duration
    } else {
        0.0
    }
}

/// Default selection for a freshly loaded clip: the whole clip when it is
/// shorter than the ceiling, otherwise the first [`MAX_LENGTH_SECS`] seconds.
pub fn initial_selection(total_duration: f64) -> Selection {
    let total = sanitize_duration(total_duration);
    let length = if total < MAX_LENGTH_SECS {
        total
    } else {
        MAX_LENGTH_SECS
    };
    Selection {
        start_offset: 0.0,
        length: length.max(MIN_LENGTH_SECS),
    }
}

/// `max(0, min(candidate, total - length))`
pub fn clamp_start(candidate: f64, total_duration: f64, length: f64) -> f64 {
    let total = sanitize_duration(total_duration);
    candidate.min(total - length).max(0.0)
}

/// `max(1, min(candidate, MAX_LENGTH, total - start))`
pub fn clamp_length(candidate: f64, total_duration: f64, start_offset: f64) -> f64 {
    let total = sanitize_duration(total_duration);
    candidate
        .min(MAX_LENGTH_SECS)
        .min(total - start_offset)
        .max(MIN_LENGTH_SECS)
}

#[derive(Debug, Clone, Copy)]
enum Fit {
    Start,
    Length,
}

/// Next representable value below a positive finite `x`
fn step_down(x: f64) -> f64 {
    if x > 0.0 {
        f64::from_bits(x.to_bits() - 1)
    } else {
        x
    }
}

/// Owns the current selection for one clip and enforces its invariants.
#[derive(Debug, Clone)]
pub struct SelectionModel {
    total_duration: f64,
    selection: Selection,
}

impl SelectionModel {
    pub fn new(total_duration: f64) -> Self {
        let total_duration = sanitize_duration(total_duration);
        Self {
            total_duration,
            selection: initial_selection(total_duration),
        }
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// A clip shorter than the minimum selection can be displayed but not confirmed
    pub fn is_degenerate(&self) -> bool {
        self.total_duration < MIN_LENGTH_SECS
    }

    /// Move the window, keeping its length. Returns the applied start.
    pub fn set_start(&mut self, candidate: f64) -> f64 {
        self.selection.start_offset =
            clamp_start(candidate, self.total_duration, self.selection.length);
        self.fit_end(Fit::Start);
        self.selection.start_offset
    }

    /// Resize the window, keeping its start. Returns the applied length.
    pub fn set_length(&mut self, candidate: f64) -> f64 {
        self.selection.length =
            clamp_length(candidate, self.total_duration, self.selection.start_offset);
        self.fit_end(Fit::Length);
        self.selection.length
    }

    /// Resize so the window ends at `end_time` (subject to the length clamp)
    pub fn set_end(&mut self, end_time: f64) -> f64 {
        self.set_length(end_time - self.selection.start_offset)
    }

    /// `total - length + length` can land one ulp past `total`, so pull the
    /// window back until its end is exactly inside the clip. Degenerate clips
    /// keep their minimum length and are left alone.
    fn fit_end(&mut self, prefer: Fit) {
        let total = self.total_duration;
        if total < MIN_LENGTH_SECS {
            return;
        }
        let sel = &mut self.selection;
        while sel.start_offset + sel.length > total {
            let shorter = step_down(sel.length);
            let shrink_length = match prefer {
                Fit::Length => shorter >= MIN_LENGTH_SECS || sel.start_offset <= 0.0,
                Fit::Start => sel.start_offset <= 0.0,
            };
            if shrink_length {
                sel.length = shorter;
            } else {
                sel.start_offset = step_down(sel.start_offset).max(0.0);
            }
        }
    }

    /// Restore a snapshot taken from this model, e.g. from the undo history.
    ///
    /// Snapshots were valid when taken, so they are applied verbatim.
    pub fn restore(&mut self, snapshot: Selection) {
        self.selection = snapshot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_invariants(model: &SelectionModel) {
        let total = model.total_duration();
        let sel = model.selection();
        assert!(sel.start_offset >= 0.0, "start below zero: {sel:?}");
        assert!(sel.length >= MIN_LENGTH_SECS, "length below minimum: {sel:?}");
        if total >= MIN_LENGTH_SECS {
            assert!(sel.length <= MAX_LENGTH_SECS.min(total) + 1e-9);
            assert!(sel.end() <= total, "window past end: {sel:?}");
        }
    }

    #[test]
    fn test_initial_selection_long_clip() {
        let sel = initial_selection(45.0);
        assert_eq!(sel.start_offset, 0.0);
        assert_eq!(sel.length, 30.0);
    }

    #[test]
    fn test_initial_selection_short_clip() {
        let sel = initial_selection(10.0);
        assert_eq!(sel.start_offset, 0.0);
        assert_eq!(sel.length, 10.0);
    }

    #[test]
    fn test_initial_selection_exactly_max() {
        assert_eq!(initial_selection(30.0).length, 30.0);
    }

    #[test]
    fn test_initial_selection_degenerate() {
        assert_eq!(initial_selection(0.4).length, 1.0);
        assert_eq!(initial_selection(0.0).length, 1.0);
        assert_eq!(initial_selection(f64::NAN).length, 1.0);
        assert_eq!(initial_selection(-5.0).length, 1.0);
    }

    #[test]
    fn test_clamp_start() {
        assert_eq!(clamp_start(-3.0, 45.0, 30.0), 0.0);
        assert_eq!(clamp_start(10.0, 45.0, 30.0), 10.0);
        assert_eq!(clamp_start(20.0, 45.0, 30.0), 15.0);
        // Degenerate clip never produces a negative start
        assert_eq!(clamp_start(2.0, 0.5, 1.0), 0.0);
    }

    #[test]
    fn test_clamp_length() {
        assert_eq!(clamp_length(40.0, 45.0, 0.0), 30.0);
        assert_eq!(clamp_length(40.0, 45.0, 20.0), 25.0);
        assert_eq!(clamp_length(0.2, 45.0, 0.0), 1.0);
        assert_eq!(clamp_length(12.5, 45.0, 5.0), 12.5);
        // Less than a second left after start still yields the minimum length
        assert_eq!(clamp_length(5.0, 10.0, 9.5), 1.0);
    }

    #[test]
    fn test_clamp_length_range_property() {
        for &total in &[1.0, 2.5, 10.0, 29.9, 30.0, 45.0, 600.0] {
            let mut start = 0.0;
            while start + MIN_LENGTH_SECS <= total {
                for &candidate in &[-10.0, 0.0, 0.5, 1.0, 7.0, 29.0, 31.0, 1000.0] {
                    let length = clamp_length(candidate, total, start);
                    let upper = MAX_LENGTH_SECS.min(total - start);
                    assert!(length >= MIN_LENGTH_SECS);
                    assert!(length <= upper.max(MIN_LENGTH_SECS));
                }
                start += 0.75;
            }
        }
    }

    #[test]
    fn test_clamp_start_bounds_property() {
        for &total in &[1.0, 10.0, 45.0, 120.0] {
            let length = clamp_length(30.0, total, 0.0);
            for &candidate in &[-50.0, 0.0, 3.3, 44.0, 119.0, 500.0] {
                let start = clamp_start(candidate, total, length);
                assert!(start >= 0.0);
                assert!(start + length <= total + 1e-9);
            }
        }
    }

    #[test]
    fn test_model_set_end_past_clip_boundary() {
        let mut model = SelectionModel::new(45.0);
        model.set_end(40.0);
        assert_eq!(model.selection().length, 30.0);

        model.set_start(10.0);
        model.set_end(80.0);
        assert_eq!(model.selection().length, 30.0);
        assert_invariants(&model);
    }

    #[test]
    fn test_model_set_start_keeps_length() {
        let mut model = SelectionModel::new(45.0);
        model.set_length(12.0);
        let applied = model.set_start(40.0);
        assert_eq!(applied, 33.0);
        assert_eq!(model.selection().length, 12.0);
        assert_invariants(&model);
    }

    #[test]
    fn test_model_mutations_keep_invariants() {
        let mut model = SelectionModel::new(37.0);
        let moves = [5.0, -2.0, 36.0, 11.1, 0.0, 100.0];
        for (i, &m) in moves.iter().enumerate() {
            if i % 2 == 0 {
                model.set_start(m);
            } else {
                model.set_length(m);
            }
            assert_invariants(&model);
        }
    }

    #[test]
    fn test_window_pushed_to_end_stays_inside_clip() {
        for total in [30.5617, 17.3, 45.123456789, 1.1, 29.99, 61.7] {
            let mut model = SelectionModel::new(total);
            model.set_length(12.1);
            model.set_start(1e9);
            assert_invariants(&model);

            model.set_start(total / 3.0);
            model.set_end(f64::MAX);
            assert_invariants(&model);

            model.set_start(0.7);
            model.set_length(total);
            model.set_start(total);
            assert_invariants(&model);
        }
    }

    #[test]
    fn test_model_degenerate_clip() {
        let mut model = SelectionModel::new(0.6);
        assert!(model.is_degenerate());
        assert_eq!(model.selection().length, 1.0);
        model.set_start(3.0);
        model.set_length(10.0);
        assert_eq!(model.selection().start_offset, 0.0);
        assert_eq!(model.selection().length, 1.0);
    }

    #[test]
    fn test_restore_is_verbatim() {
        let mut model = SelectionModel::new(60.0);
        let snapshot = Selection {
            start_offset: 12.25,
            length: 7.5,
        };
        model.restore(snapshot);
        assert_eq!(model.selection(), snapshot);
    }

    #[test]
    fn test_selection_contains() {
        let sel = Selection {
            start_offset: 2.0,
            length: 3.0,
        };
        assert!(sel.contains(2.0));
        assert!(sel.contains(5.0));
        assert!(!sel.contains(5.01));
        assert!(!sel.contains(1.99));
    }
}
