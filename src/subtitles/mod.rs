//! Subtitle segmentation and cue rendering.
//!
//! Turns an aligned transcript into display-ready cues:
//!
//! 1. [`SubtitleSegmenter`] groups words into subtitle groups, breaking lines
//!    at the configured width and groups at line-count limits, long pauses
//!    and (by default) segment boundaries.
//! 2. [`CueRenderer`] turns each group into one cue, or into one cue per
//!    timed word when word highlighting is enabled.
//! 3. [`TimestampFormat`] renders cue times for SRT or WebVTT.
//!
//! [`iterate_result`] composes all three into a lazy cue sequence.

mod options;
mod renderer;
mod segmenter;
mod timestamp;

pub use options::{optional_int, str2bool, SegmentationOptions, DEFAULT_MAX_LINE_WIDTH};
pub use renderer::{iterate_result, render_cues, speaker_prefix, Cue, CueRenderer, Cues};
pub use segmenter::{GroupKind, SegmentSpan, SubtitleGroup, SubtitleSegmenter, LONG_PAUSE_SECS};
pub use timestamp::{format_timestamp, TimestampFormat};
