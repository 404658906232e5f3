//! Segment-level writers: plain text, TSV, JSON and Audacity labels.

use super::ResultWriter;
use crate::error::Result;
use crate::subtitles::SegmentationOptions;
use crate::transcription::TranscriptResult;
use std::io::Write;

/// One trimmed segment text per line.
pub struct WriteTxt;

impl ResultWriter for WriteTxt {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn write_result(
        &self,
        result: &TranscriptResult,
        out: &mut dyn Write,
        _options: &SegmentationOptions,
    ) -> Result<()> {
        for segment in &result.segments {
            writeln!(out, "{}", segment.text.trim())?;
        }
        Ok(())
    }
}

/// Tab-separated `start`, `end`, `text` with integer millisecond times.
///
/// Integer milliseconds avoid locale-dependent decimal separators.
pub struct WriteTsv;

impl ResultWriter for WriteTsv {
    fn extension(&self) -> &'static str {
        "tsv"
    }

    fn write_result(
        &self,
        result: &TranscriptResult,
        out: &mut dyn Write,
        _options: &SegmentationOptions,
    ) -> Result<()> {
        writeln!(out, "start\tend\ttext")?;
        for segment in &result.segments {
            writeln!(
                out,
                "{}\t{}\t{}",
                (segment.start * 1000.0).round() as i64,
                (segment.end * 1000.0).round() as i64,
                segment.text.trim().replace('\t', " ")
            )?;
        }
        Ok(())
    }
}

/// The whole transcript as JSON.
pub struct WriteJson;

impl ResultWriter for WriteJson {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn write_result(
        &self,
        result: &TranscriptResult,
        out: &mut dyn Write,
        _options: &SegmentationOptions,
    ) -> Result<()> {
        serde_json::to_writer(&mut *out, result)?;
        Ok(())
    }
}

/// Audacity label track: `start\tend\t[[speaker]]text` in seconds, no header.
///
/// Uses the `.aud` extension so it does not clash with the plain text output.
pub struct WriteAudacity;

impl ResultWriter for WriteAudacity {
    fn extension(&self) -> &'static str {
        "aud"
    }

    fn write_result(
        &self,
        result: &TranscriptResult,
        out: &mut dyn Write,
        _options: &SegmentationOptions,
    ) -> Result<()> {
        for segment in &result.segments {
            let speaker = segment
                .speaker
                .as_deref()
                .map(|s| format!("[[{}]]", s))
                .unwrap_or_default();
            writeln!(
                out,
                "{:?}\t{:?}\t{}{}",
                segment.start,
                segment.end,
                speaker,
                segment.text.trim().replace('\t', " ")
            )?;
        }
        Ok(())
    }
}
