//! Timestamp conversion between seconds and subtitle time strings.
//!
//! ASS uses `H:MM:SS.CC` with centisecond precision, SRT uses
//! `HH:MM:SS,mmm`. Both directions are lossy only below the format's
//! resolution.

use super::error::{CaptionError, Result};

/// Guards against `x.yz * 100` landing a hair below the integer it names.
const FLOOR_EPSILON: f64 = 1e-6;

fn check_time(t: f64) -> Result<()> {
    if !t.is_finite() || t < 0.0 {
        return Err(CaptionError::InvalidTime(t));
    }
    Ok(())
}

/// Format seconds as an ASS timestamp (`H:MM:SS.CC`).
///
/// Centiseconds are truncated, never rounded up, so a cue never starts
/// later than its source time suggests.
pub fn seconds_to_ass_time(t: f64) -> Result<String> {
    check_time(t)?;

    let total_cs = (t * 100.0 + FLOOR_EPSILON).floor() as u64;
    let hours = total_cs / 360_000;
    let minutes = (total_cs % 360_000) / 6_000;
    let seconds = (total_cs % 6_000) / 100;
    let centiseconds = total_cs % 100;

    Ok(format!(
        "{}:{:02}:{:02}.{:02}",
        hours, minutes, seconds, centiseconds
    ))
}

/// Parse an ASS timestamp back into seconds.
///
/// Accepts `H:MM:SS.ss` and the short editor form `MM:SS.ss`.
pub fn ass_time_to_seconds(s: &str) -> Result<f64> {
    let trimmed = s.trim();
    let parts: Vec<&str> = trimmed.split(':').collect();

    let (hours, minutes, seconds) = match parts.as_slice() {
        [h, m, sec] => (
            parse_whole(trimmed, h, "hours")?,
            parse_whole(trimmed, m, "minutes")?,
            *sec,
        ),
        [m, sec] => (0, parse_whole(trimmed, m, "minutes")?, *sec),
        _ => {
            return Err(CaptionError::parse(
                trimmed,
                format!("expected 2 or 3 ':'-separated segments, found {}", parts.len()),
            ));
        }
    };

    let seconds = parse_seconds(trimmed, seconds)?;
    Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`).
pub fn seconds_to_srt_time(t: f64) -> Result<String> {
    check_time(t)?;

    let total_ms = (t * 1000.0 + FLOOR_EPSILON).floor() as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;

    Ok(format!(
        "{:02}:{:02}:{:02},{:03}",
        hours, minutes, seconds, millis
    ))
}

/// Parse an SRT timestamp (`HH:MM:SS,mmm`, `.` also accepted) into seconds.
pub fn srt_time_to_seconds(s: &str) -> Result<f64> {
    let cleaned = s.trim().replace(',', ".");
    let parts: Vec<&str> = cleaned.split(':').collect();
    let [h, m, sec] = parts.as_slice() else {
        return Err(CaptionError::parse(
            s.trim(),
            "timestamp must have hours, minutes and seconds",
        ));
    };

    let hours = parse_whole(s.trim(), h, "hours")?;
    let minutes = parse_whole(s.trim(), m, "minutes")?;
    let seconds = parse_seconds(s.trim(), sec)?;
    Ok(hours as f64 * 3600.0 + minutes as f64 * 60.0 + seconds)
}

fn parse_whole(input: &str, value: &str, what: &str) -> Result<u64> {
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(CaptionError::parse(input, format!("invalid {what} '{value}'")));
    }
    value
        .parse::<u64>()
        .map_err(|e| CaptionError::parse(input, format!("invalid {what}: {e}")))
}

fn parse_seconds(input: &str, value: &str) -> Result<f64> {
    let value = value.trim();
    let well_formed = !value.is_empty()
        && value.chars().all(|c| c.is_ascii_digit() || c == '.')
        && value.matches('.').count() <= 1
        && value.chars().next().is_some_and(|c| c.is_ascii_digit());
    if !well_formed {
        return Err(CaptionError::parse(input, format!("invalid seconds '{value}'")));
    }
    value
        .parse::<f64>()
        .map_err(|e| CaptionError::parse(input, format!("invalid seconds: {e}")))
}
