//! Greedy grouping of transcript words into subtitle groups.
//!
//! Words are walked segment by segment. Each word either continues the
//! current line, starts a new line inside the current group, or closes the
//! group and opens a new one. The decision depends on the line width, the
//! number of lines already in the group, long pauses between words and, when
//! segment boundaries are preserved, the start of a new segment.

use super::options::SegmentationOptions;
use crate::transcription::{Segment, TranscriptResult, WordTiming};
use tracing::trace;

/// Gap in seconds between consecutive word starts that forces a new group.
pub const LONG_PAUSE_SECS: f64 = 3.0;

/// Time span and speaker of the segment a word came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSpan {
    pub start: f64,
    pub end: f64,
    pub speaker: Option<String>,
}

impl From<&Segment> for SegmentSpan {
    fn from(segment: &Segment) -> Self {
        Self {
            start: segment.start,
            end: segment.end,
            speaker: segment.speaker.clone(),
        }
    }
}

/// How a group was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Built from word timings; words carry line-break markup.
    Words,
    /// A whole segment from a transcript without word timings.
    Segment,
}

/// Words destined for a single cue, before highlight expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleGroup {
    pub kind: GroupKind,
    /// Words with leading whitespace trimmed or replaced by `\n` at line starts.
    pub words: Vec<WordTiming>,
    /// Originating segment of each word, parallel to `words`.
    pub times: Vec<SegmentSpan>,
}

impl SubtitleGroup {
    fn from_segment(segment: &Segment) -> Self {
        Self {
            kind: GroupKind::Segment,
            words: vec![WordTiming::untimed(segment.text.clone())],
            times: vec![SegmentSpan::from(segment)],
        }
    }

    /// Time span of the group.
    ///
    /// This is the span of the segment the *first* word came from, not an
    /// aggregate over all words.
    pub fn span(&self) -> Option<&SegmentSpan> {
        self.times.first()
    }

    /// Speaker of the first word's segment.
    pub fn speaker(&self) -> Option<&str> {
        self.span().and_then(|s| s.speaker.as_deref())
    }

    /// Whether any word in the group is timed.
    pub fn has_timing(&self) -> bool {
        self.words.iter().any(WordTiming::is_timed)
    }
}

/// Accumulator for the group being built.
#[derive(Debug)]
struct LineState {
    current_line: Vec<WordTiming>,
    times: Vec<SegmentSpan>,
    line_length: usize,
    line_count: usize,
    last_timestamp: f64,
}

impl LineState {
    fn new(last_timestamp: f64) -> Self {
        Self {
            current_line: Vec::new(),
            times: Vec::new(),
            line_length: 0,
            line_count: 1,
            last_timestamp,
        }
    }

    fn take_group(&mut self) -> SubtitleGroup {
        self.line_count = 1;
        SubtitleGroup {
            kind: GroupKind::Words,
            words: std::mem::take(&mut self.current_line),
            times: std::mem::take(&mut self.times),
        }
    }

    /// Add one word; returns the group it closed, if any.
    fn push_word(
        &mut self,
        word: &WordTiming,
        index_in_segment: usize,
        segment: &Segment,
        options: &SegmentationOptions,
    ) -> Option<SubtitleGroup> {
        let preserve_segments = options.preserve_segments();
        let word_len = word.word.chars().count();

        let long_pause = !preserve_segments
            && word
                .start
                .is_some_and(|start| start - self.last_timestamp > LONG_PAUSE_SECS);
        let has_room = self.line_length + word_len <= options.effective_max_line_width();
        let seg_break = index_in_segment == 0 && !self.current_line.is_empty() && preserve_segments;

        let mut timing = word.clone();
        let mut closed = None;

        if self.line_length > 0 && has_room && !long_pause && !seg_break {
            self.line_length += word_len;
        } else {
            let stripped = word.word.trim();
            let subtitle_break = !self.current_line.is_empty()
                && (seg_break
                    || options
                        .max_line_count
                        .is_some_and(|max| long_pause || self.line_count >= max));

            if subtitle_break {
                trace!(seg_break, long_pause, line_count = self.line_count, "subtitle break");
                closed = Some(self.take_group());
                timing.word = stripped.to_string();
            } else if self.line_length > 0 {
                self.line_count += 1;
                timing.word = format!("\n{}", stripped);
            } else {
                timing.word = stripped.to_string();
            }
            self.line_length = stripped.chars().count();
        }

        self.current_line.push(timing);
        self.times.push(SegmentSpan::from(segment));

        if let Some(start) = word.start {
            self.last_timestamp = start;
        }

        closed
    }
}

/// Lazy iterator over the subtitle groups of one transcript.
///
/// Every call to [`SubtitleSegmenter::new`] starts from a fresh accumulator.
pub struct SubtitleSegmenter<'a> {
    segments: &'a [Segment],
    options: SegmentationOptions,
    word_level: bool,
    segment_index: usize,
    word_index: usize,
    state: LineState,
}

impl<'a> SubtitleSegmenter<'a> {
    pub fn new(result: &'a TranscriptResult, options: &SegmentationOptions) -> Self {
        let last_timestamp = result.segments.first().map_or(0.0, |s| s.start);

        Self {
            segments: &result.segments,
            options: *options,
            word_level: result.has_word_timings(),
            segment_index: 0,
            word_index: 0,
            state: LineState::new(last_timestamp),
        }
    }

    /// Whether groups are built from word timings.
    pub fn is_word_level(&self) -> bool {
        self.word_level
    }
}

impl Iterator for SubtitleSegmenter<'_> {
    type Item = SubtitleGroup;

    fn next(&mut self) -> Option<SubtitleGroup> {
        if !self.word_level {
            let segment = self.segments.get(self.segment_index)?;
            self.segment_index += 1;
            return Some(SubtitleGroup::from_segment(segment));
        }

        while let Some(segment) = self.segments.get(self.segment_index) {
            let words = segment.words.as_deref().unwrap_or_default();

            match words.get(self.word_index) {
                Some(word) => {
                    let index = self.word_index;
                    self.word_index += 1;
                    if let Some(group) = self.state.push_word(word, index, segment, &self.options) {
                        return Some(group);
                    }
                }
                None => {
                    self.segment_index += 1;
                    self.word_index = 0;
                }
            }
        }

        if self.state.current_line.is_empty() {
            None
        } else {
            Some(self.state.take_group())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timed_segment(start: f64, end: f64, words: &[(&str, f64, f64)]) -> Segment {
        let text = words.iter().map(|(w, _, _)| *w).collect::<Vec<_>>().join(" ");
        Segment::new(start, end, text).with_words(
            words
                .iter()
                .map(|(w, s, e)| WordTiming::new(*w, *s, *e))
                .collect(),
        )
    }

    fn texts(group: &SubtitleGroup) -> Vec<&str> {
        group.words.iter().map(|w| w.word.as_str()).collect()
    }

    fn both_limits(width: usize, count: usize) -> SegmentationOptions {
        SegmentationOptions {
            max_line_width: Some(width),
            max_line_count: Some(count),
            highlight_words: false,
        }
    }

    #[test]
    fn test_single_segment_single_group() {
        let result = TranscriptResult::new(
            "en",
            vec![timed_segment(0.0, 1.0, &[("Hello", 0.0, 0.4), ("world", 0.5, 1.0)])],
        );

        let groups: Vec<_> = SubtitleSegmenter::new(&result, &SegmentationOptions::default()).collect();

        match &groups[..] {
            [group] => {
                assert_eq!(texts(group), ["Hello", "world"]);
                assert_eq!(group.kind, GroupKind::Words);
                assert_eq!(group.times.len(), 2);
            }
            _ => panic!("expected 1 group, got {}", groups.len()),
        }
    }

    #[test]
    fn test_empty_transcript_yields_nothing() {
        let result = TranscriptResult::new("en", vec![]);
        assert_eq!(SubtitleSegmenter::new(&result, &SegmentationOptions::default()).count(), 0);
    }

    #[test]
    fn test_segments_with_empty_words_yield_nothing() {
        let result = TranscriptResult::new(
            "en",
            vec![Segment::new(0.0, 1.0, "").with_words(vec![])],
        );
        assert_eq!(SubtitleSegmenter::new(&result, &SegmentationOptions::default()).count(), 0);
    }

    #[test]
    fn test_long_pause_breaks_group() {
        let result = TranscriptResult::new(
            "en",
            vec![
                timed_segment(0.0, 1.0, &[("Hello", 0.0, 0.5)]),
                timed_segment(6.0, 7.0, &[("again", 6.0, 6.5)]),
            ],
        );

        let groups: Vec<_> = SubtitleSegmenter::new(&result, &both_limits(42, 2)).collect();

        assert_eq!(groups.len(), 2);
        assert_eq!(texts(&groups[0]), ["Hello"]);
        assert_eq!(texts(&groups[1]), ["again"]);
    }

    #[test]
    fn test_short_gap_merges_segments_when_both_limits_set() {
        let result = TranscriptResult::new(
            "en",
            vec![
                timed_segment(0.0, 1.0, &[("Hello", 0.0, 0.5)]),
                timed_segment(1.0, 2.0, &[("again", 1.2, 1.8)]),
            ],
        );

        let groups: Vec<_> = SubtitleSegmenter::new(&result, &both_limits(42, 2)).collect();

        match &groups[..] {
            [group] => assert_eq!(texts(group), ["Hello", "again"]),
            _ => panic!("expected 1 group, got {}", groups.len()),
        }
    }

    #[test]
    fn test_segment_boundaries_break_by_default() {
        let result = TranscriptResult::new(
            "en",
            vec![
                timed_segment(0.0, 1.0, &[("One", 0.0, 0.5)]),
                timed_segment(1.0, 2.0, &[("two", 1.0, 1.5)]),
                timed_segment(2.0, 3.0, &[("three", 2.0, 2.5)]),
            ],
        );

        for options in [
            SegmentationOptions::default(),
            SegmentationOptions {
                max_line_width: Some(42),
                ..Default::default()
            },
            SegmentationOptions {
                max_line_count: Some(2),
                ..Default::default()
            },
        ] {
            let groups: Vec<_> = SubtitleSegmenter::new(&result, &options).collect();
            assert_eq!(groups.len(), 3, "options: {:?}", options);
            for (group, segment) in groups.iter().zip(&result.segments) {
                assert_eq!(group.span().unwrap().start, segment.start);
            }
        }
    }

    #[test]
    fn test_line_break_within_group() {
        let result = TranscriptResult::new(
            "en",
            vec![timed_segment(
                0.0,
                2.0,
                &[("The", 0.0, 0.3), ("quick", 0.4, 0.8), ("brown", 0.9, 1.3), ("fox", 1.4, 2.0)],
            )],
        );
        let options = SegmentationOptions {
            max_line_width: Some(8),
            ..Default::default()
        };

        let groups: Vec<_> = SubtitleSegmenter::new(&result, &options).collect();

        match &groups[..] {
            [group] => assert_eq!(texts(group), ["The", "quick", "\nbrown", "fox"]),
            _ => panic!("expected 1 group, got {}", groups.len()),
        }
    }

    #[test]
    fn test_line_count_limit_breaks_group() {
        let result = TranscriptResult::new(
            "en",
            vec![timed_segment(
                0.0,
                2.0,
                &[("The", 0.0, 0.3), ("quick", 0.4, 0.8), ("brown", 0.9, 1.3), ("fox", 1.4, 2.0)],
            )],
        );

        let groups: Vec<_> = SubtitleSegmenter::new(&result, &both_limits(8, 1)).collect();

        assert_eq!(groups.len(), 2);
        assert_eq!(texts(&groups[0]), ["The", "quick"]);
        assert_eq!(texts(&groups[1]), ["brown", "fox"]);
    }

    #[test]
    fn test_new_line_trims_whitespace() {
        let result = TranscriptResult::new(
            "en",
            vec![timed_segment(0.0, 2.0, &[(" Hi ", 0.0, 0.5), (" there", 0.6, 1.0), (" you", 1.1, 1.5)])],
        );
        let options = SegmentationOptions {
            max_line_width: Some(9),
            ..Default::default()
        };

        let groups: Vec<_> = SubtitleSegmenter::new(&result, &options).collect();

        // " there" fits after "Hi" (2 + 6), " you" does not (8 + 4)
        assert_eq!(texts(&groups[0]), ["Hi", " there", "\nyou"]);
    }

    #[test]
    fn test_untimed_words_do_not_reset_pause_clock() {
        let result = TranscriptResult::new(
            "en",
            vec![Segment::new(0.0, 6.0, "a % b").with_words(vec![
                WordTiming::new("a", 0.0, 0.5),
                WordTiming::untimed("%"),
                WordTiming::new("b", 5.0, 5.5),
            ])],
        );

        let groups: Vec<_> = SubtitleSegmenter::new(&result, &both_limits(42, 2)).collect();

        assert_eq!(groups.len(), 2);
        assert_eq!(texts(&groups[0]), ["a", "%"]);
        assert_eq!(texts(&groups[1]), ["b"]);
    }

    #[test]
    fn test_group_span_comes_from_first_word() {
        let result = TranscriptResult::new(
            "en",
            vec![
                timed_segment(0.0, 1.0, &[("first", 0.1, 0.6)]).with_speaker("A"),
                timed_segment(1.0, 2.5, &[("second", 1.1, 2.4)]).with_speaker("B"),
            ],
        );

        let groups: Vec<_> = SubtitleSegmenter::new(&result, &both_limits(42, 2)).collect();

        let group = &groups[0];
        assert_eq!(group.words.len(), 2);
        let span = group.span().unwrap();
        assert_eq!((span.start, span.end), (0.0, 1.0));
        assert_eq!(group.speaker(), Some("A"));
        assert_eq!(group.times[1].speaker.as_deref(), Some("B"));
    }

    #[test]
    fn test_every_word_is_kept_in_order() {
        let words: Vec<(String, f64)> = (0..40)
            .map(|i| (format!("w{}", i), i as f64 * 0.7 + if i > 20 { 4.0 } else { 0.0 }))
            .collect();
        let segments: Vec<Segment> = words
            .chunks(7)
            .map(|chunk| {
                let start = chunk[0].1;
                let end = chunk[chunk.len() - 1].1 + 0.5;
                Segment::new(start, end, "").with_words(
                    chunk
                        .iter()
                        .map(|(w, s)| WordTiming::new(w.clone(), *s, s + 0.5))
                        .collect(),
                )
            })
            .collect();
        let result = TranscriptResult::new("en", segments);

        for options in [SegmentationOptions::default(), both_limits(12, 2), both_limits(5, 1)] {
            let emitted: Vec<String> = SubtitleSegmenter::new(&result, &options)
                .flat_map(|g| g.words)
                .map(|w| w.word.trim_start_matches('\n').to_string())
                .collect();
            let expected: Vec<String> = words.iter().map(|(w, _)| w.clone()).collect();
            assert_eq!(emitted, expected, "options: {:?}", options);
        }
    }

    #[test]
    fn test_continuations_respect_line_width() {
        let words = ["alpha", "be", "gamma", "de", "epsilon", "zeta", "eta", "theta", "io", "kappa"];
        let result = TranscriptResult::new(
            "en",
            vec![Segment::new(0.0, 10.0, "").with_words(
                words
                    .iter()
                    .enumerate()
                    .map(|(i, w)| WordTiming::new(*w, i as f64, i as f64 + 0.5))
                    .collect(),
            )],
        );
        let width = 10;

        for group in SubtitleSegmenter::new(&result, &both_limits(width, 3)) {
            let mut line = 0;
            for word in &group.words {
                if word.word.starts_with('\n') {
                    line = 0;
                }
                line += word.word.trim_start_matches('\n').chars().count();
                assert!(line <= width, "line exceeds {}: {:?}", width, group.words);
            }
        }
    }

    #[test]
    fn test_fresh_state_per_render() {
        let result = TranscriptResult::new(
            "en",
            vec![
                timed_segment(0.0, 1.0, &[("a", 0.0, 0.5), ("b", 0.5, 1.0)]),
                timed_segment(5.0, 6.0, &[("c", 5.0, 5.5)]),
            ],
        );
        let options = both_limits(42, 2);

        let first: Vec<_> = SubtitleSegmenter::new(&result, &options).collect();
        let second: Vec<_> = SubtitleSegmenter::new(&result, &options).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn test_segment_level_without_word_timings() {
        let result = TranscriptResult::new(
            "en",
            vec![
                Segment::new(0.0, 2.0, " Hello there.").with_speaker("SPEAKER_01"),
                Segment::new(2.0, 4.0, " General Kenobi."),
            ],
        );

        let segmenter = SubtitleSegmenter::new(&result, &both_limits(5, 1));
        assert!(!segmenter.is_word_level());
        let groups: Vec<_> = segmenter.collect();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].kind, GroupKind::Segment);
        assert_eq!(texts(&groups[0]), [" Hello there."]);
        assert_eq!(groups[0].speaker(), Some("SPEAKER_01"));
        assert!(!groups[1].has_timing());
    }
}
