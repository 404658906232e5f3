//! Cue timestamp formatting.

use crate::error::{Result, UndertekstError};

const MS_PER_HOUR: u64 = 3_600_000;
const MS_PER_MINUTE: u64 = 60_000;
const MS_PER_SECOND: u64 = 1_000;

/// Timestamp rendering policy of a subtitle format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampFormat {
    /// Emit the hour field even when it is zero.
    pub always_include_hours: bool,
    /// Separator between seconds and milliseconds.
    pub decimal_marker: &'static str,
}

impl TimestampFormat {
    /// SubRip: `HH:MM:SS,mmm`.
    pub const SRT: Self = Self {
        always_include_hours: true,
        decimal_marker: ",",
    };

    /// WebVTT: `[HH:]MM:SS.mmm`, hours only when nonzero.
    pub const VTT: Self = Self {
        always_include_hours: false,
        decimal_marker: ".",
    };

    /// Format seconds with this policy.
    pub fn format(&self, seconds: f64) -> Result<String> {
        format_timestamp(seconds, self.always_include_hours, self.decimal_marker)
    }
}

/// Format seconds as `[HH:]MM:SS<marker>mmm`, rounded to the millisecond.
pub fn format_timestamp(
    seconds: f64,
    always_include_hours: bool,
    decimal_marker: &str,
) -> Result<String> {
    // `!(x >= 0.0)` also rejects NaN
    if !(seconds >= 0.0) || !seconds.is_finite() {
        return Err(UndertekstError::InvalidTimestamp(seconds));
    }

    let mut milliseconds = (seconds * 1000.0).round() as u64;

    let hours = milliseconds / MS_PER_HOUR;
    milliseconds -= hours * MS_PER_HOUR;

    let minutes = milliseconds / MS_PER_MINUTE;
    milliseconds -= minutes * MS_PER_MINUTE;

    let secs = milliseconds / MS_PER_SECOND;
    milliseconds -= secs * MS_PER_SECOND;

    let hours_marker = if always_include_hours || hours > 0 {
        format!("{:02}:", hours)
    } else {
        String::new()
    };

    Ok(format!(
        "{}{:02}:{:02}{}{:03}",
        hours_marker, minutes, secs, decimal_marker, milliseconds
    ))
}
