//! Numeric field parsing for probe output
//!
//! ffprobe reports numbers as strings. Durations and frame rates must come out
//! finite and positive; anything else is malformed, never a zero default.

/// Parse a decimal string into a finite positive number
pub fn parse_positive_finite(raw: &str) -> Option<f64> {
    let value = raw.trim().parse::<f64>().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Parse a frame rate given as a rational (`30000/1001`) or decimal (`29.97`)
pub fn parse_frame_rate(raw: &str) -> Option<f64> {
    match raw.trim().split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>().ok()?;
            let den = den.trim().parse::<f64>().ok()?;
            if den == 0.0 {
                return None;
            }
            let value = num / den;
            (value.is_finite() && value > 0.0).then_some(value)
        }
        None => parse_positive_finite(raw),
    }
}

/// Parse a bitrate in bits per second; `N/A` and garbage become `None`
pub fn parse_bitrate(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|&bits| bits > 0)
}
