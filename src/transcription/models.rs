//! Data models for aligned transcripts.

use crate::error::{Result, UndertekstError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single word with optional timing from the alignment stage.
///
/// Words without `start`/`end` are "untimed", e.g. punctuation or numerals
/// the aligner could not place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    /// The word text, possibly with leading whitespace.
    pub word: String,
    /// Start time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    /// End time in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    /// Alignment confidence, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl WordTiming {
    /// Create a timed word.
    pub fn new(word: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            word: word.into(),
            start: Some(start),
            end: Some(end),
            score: None,
        }
    }

    /// Create a word without timing information.
    pub fn untimed(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            start: None,
            end: None,
            score: None,
        }
    }

    /// Whether the aligner placed this word in time.
    pub fn is_timed(&self) -> bool {
        self.start.is_some()
    }
}

/// A transcription segment with its time span and optional word timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Transcribed text content.
    pub text: String,
    /// Per-word timings, ordered by time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<WordTiming>>,
    /// Speaker label from diarization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

impl Segment {
    /// Create a segment without word timings.
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            words: None,
            speaker: None,
        }
    }

    /// Attach word timings.
    pub fn with_words(mut self, words: Vec<WordTiming>) -> Self {
        self.words = Some(words);
        self
    }

    /// Attach a speaker label.
    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }
}

/// A complete aligned transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResult {
    /// Language code (e.g. "en").
    pub language: String,
    /// Ordered transcript segments.
    #[serde(default)]
    pub segments: Vec<Segment>,
}

impl TranscriptResult {
    /// Create a transcript from segments.
    pub fn new(language: impl Into<String>, segments: Vec<Segment>) -> Self {
        Self {
            language: language.into(),
            segments,
        }
    }

    /// Parse a transcript from its JSON representation.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| UndertekstError::InvalidInput(e.to_string()))
    }

    /// Load a transcript JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| UndertekstError::InvalidInput(format!("{}: {}", path.display(), e)))
    }

    /// Whether word-level rendering applies.
    ///
    /// Requires every segment to carry `words`; a transcript where only some
    /// segments do is rendered segment by segment so no text is lost.
    pub fn has_word_timings(&self) -> bool {
        !self.segments.is_empty() && self.segments.iter().all(|s| s.words.is_some())
    }

    /// Total number of words across all segments.
    pub fn word_count(&self) -> usize {
        self.segments
            .iter()
            .map(|s| s.words.as_ref().map_or(0, Vec::len))
            .sum()
    }
}
