//! Human-readable clip times.

use std::error::Error;

/// Format seconds as `m:ss.t`, rounded to the nearest tenth
pub fn format_time(seconds: f64) -> String {
    let tenths = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 10.0).round() as u64
    } else {
        0
    };
    let minutes = tenths / 600;
    let secs = (tenths % 600) / 10;
    let tenth = tenths % 10;
    format!("{minutes}:{secs:02}.{tenth}")
}

/// Parse `75.5`, `1:15.5` or `1:15` into seconds
pub fn parse_time(input: &str) -> Result<f64, Box<dyn Error>> {
    let input = input.trim();
    let seconds = match input.split_once(':') {
        Some((minutes, rest)) => {
            let minutes: u64 = minutes
                .parse()
                .map_err(|_| format!("Invalid minutes in '{input}'"))?;
            let rest: f64 = rest
                .parse()
                .map_err(|_| format!("Invalid seconds in '{input}'"))?;
            if !(0.0..60.0).contains(&rest) {
                return Err(format!("Seconds out of range in '{input}'").into());
            }
            minutes as f64 * 60.0 + rest
        }
        None => input
            .parse::<f64>()
            .map_err(|_| format!("Invalid time '{input}'"))?,
    };

    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("Time must be a non-negative number: '{input}'").into());
    }
    Ok(seconds)
}
