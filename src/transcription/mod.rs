//! Transcript data model.
//!
//! Holds the aligned transcript produced by the upstream transcription stage:
//! segments with time spans, optional per-word timings and optional speaker
//! labels.

mod models;

pub use models::{Segment, TranscriptResult, WordTiming};
