//! Undertekst - subtitles from word-timed transcripts
//!
//! Turns the output of a speech-recognition and alignment pipeline (segments
//! with per-word timings and optional speaker labels) into subtitle cues and
//! writes them as SRT, WebVTT and a handful of plain-text formats.
//!
//! # Architecture
//!
//! - `transcription` - Transcript data model and JSON loading
//! - `subtitles` - Line/cue segmentation, cue rendering and timestamps
//! - `output` - Format writers and WebVTT companion files
//! - `anonymize` - Pseudonymization of persons and organizations
//! - `language` - Language codes, names and word spacing
//! - `config` - Configuration management
//!
//! # Example
//!
//! ```rust
//! use undertekst::subtitles::{render_cues, SegmentationOptions, TimestampFormat};
//! use undertekst::transcription::{Segment, TranscriptResult, WordTiming};
//!
//! let result = TranscriptResult::new(
//!     "en",
//!     vec![Segment::new(0.0, 1.0, " Hello world").with_words(vec![
//!         WordTiming::new("Hello", 0.0, 0.5),
//!         WordTiming::new("world", 0.5, 1.0),
//!     ])],
//! );
//!
//! let cues = render_cues(&result, &SegmentationOptions::default(), TimestampFormat::SRT)?;
//! assert_eq!(cues[0].start, "00:00:00,000");
//! assert_eq!(cues[0].text, "Hello world");
//! # Ok::<(), undertekst::UndertekstError>(())
//! ```

pub mod anonymize;
pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod output;
pub mod subtitles;
pub mod transcription;

pub use error::{Result, UndertekstError};
