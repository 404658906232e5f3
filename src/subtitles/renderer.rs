//! Rendering of subtitle groups into timed cues.

use super::options::SegmentationOptions;
use super::segmenter::{GroupKind, SubtitleGroup, SubtitleSegmenter};
use super::timestamp::TimestampFormat;
use crate::error::Result;
use crate::language::word_joiner;
use crate::transcription::{TranscriptResult, WordTiming};
use regex::Regex;
use std::sync::LazyLock;

/// Leading whitespace (including a line-break marker) and the word itself.
static WORD_PARTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)(.*)$").expect("word pattern is valid"));

/// One timed subtitle display unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// Formatted start timestamp.
    pub start: String,
    /// Formatted end timestamp.
    pub end: String,
    /// Cue text, possibly spanning several lines.
    pub text: String,
}

impl Cue {
    pub fn new(start: impl Into<String>, end: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            text: text.into(),
        }
    }
}

/// `[speaker]: ` prefix, or nothing without a speaker.
pub fn speaker_prefix(speaker: Option<&str>) -> String {
    speaker.map(|s| format!("[{}]: ", s)).unwrap_or_default()
}

/// Wrap a word in underline markup, after any leading whitespace.
fn underline(word: &str) -> String {
    WORD_PARTS.replace(word, "${1}<u>${2}</u>").into_owned()
}

/// Turns subtitle groups into cues for one subtitle format.
#[derive(Debug, Clone)]
pub struct CueRenderer {
    format: TimestampFormat,
    joiner: &'static str,
    highlight_words: bool,
}

impl CueRenderer {
    pub fn new(format: TimestampFormat, language: &str, highlight_words: bool) -> Self {
        Self {
            format,
            joiner: word_joiner(language),
            highlight_words,
        }
    }

    /// Render one group, expanding it into per-word cues in highlight mode.
    pub fn render_group(&self, group: &SubtitleGroup) -> Result<Vec<Cue>> {
        let Some(span) = group.span() else {
            return Ok(Vec::new());
        };
        let prefix = speaker_prefix(group.speaker());
        let start = self.format.format(span.start)?;
        let end = self.format.format(span.end)?;

        if group.kind == GroupKind::Segment {
            let text = group
                .words
                .iter()
                .map(|w| w.word.trim().replace("-->", "->"))
                .collect::<Vec<_>>()
                .join(self.joiner);
            return Ok(vec![Cue::new(start, end, prefix + &text)]);
        }

        let text = self.join(group.words.iter().map(|w| w.word.clone()));

        if !self.highlight_words || !group.has_timing() {
            return Ok(vec![Cue::new(start, end, prefix + &text)]);
        }

        let mut cues = Vec::new();
        let mut cursor = start;

        for (index, word) in group.words.iter().enumerate() {
            let Some(word_start) = word.start else {
                continue;
            };
            let word_start_ts = self.format.format(word_start)?;
            let word_end_ts = self.format.format(word.end.unwrap_or(word_start))?;

            if cursor != word_start_ts {
                cues.push(Cue::new(cursor, word_start_ts.clone(), format!("{}{}", prefix, text)));
            }

            let highlighted = self.highlight(&group.words, index);
            cues.push(Cue::new(word_start_ts, word_end_ts.clone(), format!("{}{}", prefix, highlighted)));
            cursor = word_end_ts;
        }

        Ok(cues)
    }

    /// Render a stream of groups lazily, one group at a time.
    pub fn render<'a, I>(&'a self, groups: I) -> impl Iterator<Item = Result<Cue>> + 'a
    where
        I: IntoIterator<Item = SubtitleGroup>,
        I::IntoIter: 'a,
    {
        groups
            .into_iter()
            .flat_map(move |group| match self.render_group(&group) {
                Ok(cues) => cues.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            })
    }

    fn join(&self, words: impl Iterator<Item = String>) -> String {
        words.collect::<Vec<_>>().join(self.joiner)
    }

    fn highlight(&self, words: &[WordTiming], current: usize) -> String {
        self.join(words.iter().enumerate().map(|(i, w)| {
            if i == current {
                underline(&w.word)
            } else {
                w.word.clone()
            }
        }))
    }
}

/// Lazy cue sequence of one transcript: segmentation followed by rendering.
pub struct Cues<'a> {
    groups: SubtitleSegmenter<'a>,
    renderer: CueRenderer,
    pending: std::vec::IntoIter<Cue>,
}

impl Iterator for Cues<'_> {
    type Item = Result<Cue>;

    fn next(&mut self) -> Option<Result<Cue>> {
        loop {
            if let Some(cue) = self.pending.next() {
                return Some(Ok(cue));
            }
            let group = self.groups.next()?;
            match self.renderer.render_group(&group) {
                Ok(cues) => self.pending = cues.into_iter(),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Iterate the cues of a transcript for the given timestamp format.
pub fn iterate_result<'a>(
    result: &'a TranscriptResult,
    options: &SegmentationOptions,
    format: TimestampFormat,
) -> Cues<'a> {
    Cues {
        groups: SubtitleSegmenter::new(result, options),
        renderer: CueRenderer::new(format, &result.language, options.highlight_words),
        pending: Vec::new().into_iter(),
    }
}

/// Render all cues of a transcript.
pub fn render_cues(
    result: &TranscriptResult,
    options: &SegmentationOptions,
    format: TimestampFormat,
) -> Result<Vec<Cue>> {
    iterate_result(result, options, format).collect()
}
