//! Rendering options and their validation.

use crate::error::{Result, UndertekstError};
use serde::{Deserialize, Serialize};

/// Line width used when the caller sets no limit. A soft cap, not a wrap.
pub const DEFAULT_MAX_LINE_WIDTH: usize = 1000;

/// Options controlling how words are grouped into cues.
///
/// `max_line_width` and `max_line_count` keep the caller's raw choice: whether
/// a limit was given at all changes how segment boundaries are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationOptions {
    /// Maximum characters per line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_line_width: Option<usize>,
    /// Maximum lines per cue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_line_count: Option<usize>,
    /// Emit one cue per timed word with that word underlined.
    pub highlight_words: bool,
}

impl SegmentationOptions {
    /// Build options from raw command-line style values.
    ///
    /// Limits accept an integer or `None`; the highlight flag accepts
    /// `True` or `False`.
    pub fn parse(
        max_line_width: Option<&str>,
        max_line_count: Option<&str>,
        highlight_words: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            max_line_width: max_line_width.map(optional_int).transpose()?.flatten(),
            max_line_count: max_line_count.map(optional_int).transpose()?.flatten(),
            highlight_words: highlight_words.map(str2bool).transpose()?.unwrap_or(false),
        })
    }

    /// Line width actually enforced.
    pub fn effective_max_line_width(&self) -> usize {
        self.max_line_width.unwrap_or(DEFAULT_MAX_LINE_WIDTH)
    }

    /// Segment boundaries are hard breaks unless both limits were given.
    pub fn preserve_segments(&self) -> bool {
        self.max_line_count.is_none() || self.max_line_width.is_none()
    }
}

/// Parse an optional integer limit: `"None"` or a non-negative integer.
pub fn optional_int(value: &str) -> Result<Option<usize>> {
    let value = value.trim();
    if value == "None" {
        return Ok(None);
    }
    value
        .parse::<usize>()
        .map(Some)
        .map_err(|_| UndertekstError::InvalidOption(format!("expected an integer or None, got {:?}", value)))
}

/// Parse a boolean spelled `True` or `False`.
pub fn str2bool(value: &str) -> Result<bool> {
    match value {
        "True" => Ok(true),
        "False" => Ok(false),
        _ => Err(UndertekstError::InvalidOption(format!(
            "expected one of True, False, got {:?}",
            value
        ))),
    }
}
