use owo_colors::OwoColorize;
use std::error::Error;
use std::path::Path;
use zim_trim::config::Config;
use zim_trim::trim::{Selection, SelectionModel, TrimmedClip};
use zim_trim::upload::UploadRequest;
use zim_trim::utils::time::{format_time, parse_time};
use zim_trim::utils::validation::validate_audio_file;

use super::trim::{decode_with_spinner, default_title};

/// Apply a requested start and length the way the trimmer would.
///
/// The length is applied first so that a late start is clamped against the
/// requested window rather than the default one.
pub fn plan_selection(total_duration: f64, start: f64, length: Option<f64>) -> SelectionModel {
    let mut model = SelectionModel::new(total_duration);
    if let Some(length) = length {
        model.set_length(length);
    }
    model.set_start(start);
    model
}

pub fn handle_plan(file: &Path, start: &str, length: Option<&str>) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    validate_audio_file(file)?;

    let start = parse_time(start)?;
    let length = length.map(parse_time).transpose()?;

    let source = decode_with_spinner(file);
    let model = plan_selection(source.duration(), start, length);
    if model.is_degenerate() {
        return Err(format!(
            "{} is too short to trim ({})",
            file.display(),
            format_time(model.total_duration())
        )
        .into());
    }

    let selection = model.selection();
    report_clamping(start, length, selection);

    let request = UploadRequest {
        file: file.to_path_buf(),
        title: default_title(file),
        artist: config.default_artist.clone(),
        entity_account_id: None,
        author_entity_id: None,
        author_entity_type: None,
        clip: TrimmedClip::from(selection),
    };
    println!("{}", serde_json::to_string_pretty(&request.to_json())?);

    Ok(())
}

fn report_clamping(start: f64, length: Option<f64>, selection: Selection) {
    if (selection.start_offset - start).abs() > f64::EPSILON {
        eprintln!(
            "{} start {} adjusted to {}",
            "Note:".yellow(),
            format_time(start),
            format_time(selection.start_offset)
        );
    }
    if let Some(length) = length
        && (selection.length - length).abs() > f64::EPSILON
    {
        eprintln!(
            "{} length {} adjusted to {}",
            "Note:".yellow(),
            format_time(length),
            format_time(selection.length)
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_late_start_keeps_requested_length() {
        let model = plan_selection(100.0, 90.0, Some(5.0));
        assert_eq!(model.selection().start_offset, 90.0);
        assert_eq!(model.selection().length, 5.0);
    }

    #[test]
    fn test_plan_without_length_uses_default_window() {
        let model = plan_selection(100.0, 90.0, None);
        assert_eq!(model.selection().length, 30.0);
        assert_eq!(model.selection().start_offset, 70.0);
    }

    #[test]
    fn test_plan_clamps_length() {
        let model = plan_selection(100.0, 0.0, Some(45.0));
        assert_eq!(model.selection().length, 30.0);
    }
}
