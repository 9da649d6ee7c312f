//! Subtitle timecodes / 字幕时间码
//!
//! Dialog timestamps are stored as strings, `HH:MM:SS` or `HH:MM:SS,mmm`
//! (SRT style; `.` is accepted as the millisecond separator as well).

use crate::error::{CatalogError, CatalogResult};

/// Parse a timecode into milliseconds / 解析时间码为毫秒
pub fn parse_timecode(value: &str) -> CatalogResult<u64> {
    let invalid = || CatalogError::Validation(format!("invalid timecode: {:?}", value));

    let value = value.trim();
    let (clock, millis) = match value.find([',', '.']) {
        Some(pos) => (&value[..pos], Some(&value[pos + 1..])),
        None => (value, None),
    };

    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }

    let mut fields = [0u64; 3];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        *slot = part.parse().map_err(|_| invalid())?;
    }
    let [hours, minutes, seconds] = fields;
    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    let millis = match millis {
        Some(ms) if !ms.is_empty() && ms.len() <= 3 && ms.chars().all(|c| c.is_ascii_digit()) => {
            // ",5" means 500ms, ",05" means 50ms
            let padded = format!("{:0<3}", ms);
            padded.parse::<u64>().map_err(|_| invalid())?
        }
        Some(_) => return Err(invalid()),
        None => 0,
    };

    // hours is unbounded, so the total can overflow u64
    hours
        .checked_mul(3600)
        .and_then(|secs| secs.checked_add(minutes * 60 + seconds))
        .and_then(|secs| secs.checked_mul(1000))
        .and_then(|ms| ms.checked_add(millis))
        .ok_or_else(invalid)
}

/// Parse a timecode into whole seconds / 解析时间码为秒
pub fn timecode_seconds(value: &str) -> CatalogResult<u64> {
    parse_timecode(value).map(|ms| ms / 1000)
}

/// Format seconds for display: `M:SS`, or `H:MM:SS` past the hour
pub fn format_seconds(total: u64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Whether a dialog falls inside an optional `[from, to]` window (seconds).
/// A dialog whose timestamps cannot be parsed is kept.
pub fn within_window(start: &str, end: &str, from: Option<u64>, to: Option<u64>) -> bool {
    let (Ok(start), Ok(end)) = (timecode_seconds(start), timecode_seconds(end)) else {
        return true;
    };
    if let Some(from) = from {
        if end < from {
            return false;
        }
    }
    if let Some(to) = to {
        if start > to {
            return false;
        }
    }
    true
}
