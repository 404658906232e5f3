//! Cue-based writers (WebVTT, SRT) and the plain-text companions of a WebVTT file.

use super::ResultWriter;
use crate::anonymize::{self, EntityDetector};
use crate::error::Result;
use crate::subtitles::{iterate_result, render_cues, Cue, SegmentationOptions, TimestampFormat};
use crate::transcription::TranscriptResult;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// WebVTT subtitles.
pub struct WriteVtt;

impl ResultWriter for WriteVtt {
    fn extension(&self) -> &'static str {
        "vtt"
    }

    fn write_result(
        &self,
        result: &TranscriptResult,
        out: &mut dyn Write,
        options: &SegmentationOptions,
    ) -> Result<()> {
        writeln!(out, "WEBVTT\n")?;
        for cue in iterate_result(result, options, TimestampFormat::VTT) {
            let cue = cue?;
            writeln!(out, "{} --> {}\n{}\n", cue.start, cue.end, cue.text)?;
        }
        Ok(())
    }
}

/// SubRip subtitles, cues numbered from 1.
pub struct WriteSrt;

impl ResultWriter for WriteSrt {
    fn extension(&self) -> &'static str {
        "srt"
    }

    fn write_result(
        &self,
        result: &TranscriptResult,
        out: &mut dyn Write,
        options: &SegmentationOptions,
    ) -> Result<()> {
        for (i, cue) in iterate_result(result, options, TimestampFormat::SRT).enumerate() {
            let cue = cue?;
            writeln!(out, "{}\n{} --> {}\n{}\n", i + 1, cue.start, cue.end, cue.text)?;
        }
        Ok(())
    }
}

/// Cue texts with the speaker label on its own line, e.g.
/// `[SPEAKER_00]: Hello` becomes `SPEAKER_00:\nHello`. Each cue is followed
/// by a blank line.
pub fn speaker_text(cues: &[Cue]) -> String {
    cues.iter()
        .map(|cue| {
            let text = cue.text.replace(": ", "\n").replace('[', "").replace(']', ":");
            format!("{}\n\n", text)
        })
        .collect()
}

/// All cue texts joined by blank lines with persons and organizations
/// replaced by pseudonyms.
pub async fn anonymized_text(cues: &[Cue], detector: &dyn EntityDetector) -> Result<String> {
    let text = cues
        .iter()
        .map(|cue| cue.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    anonymize::anonymize(detector, &text).await
}

/// Write `<stem>-v.txt` and, with a detector, `<stem>-v3.txt` next to `vtt_path`.
///
/// Returns the paths written.
pub async fn write_vtt_companions(
    result: &TranscriptResult,
    options: &SegmentationOptions,
    vtt_path: &Path,
    detector: Option<&dyn EntityDetector>,
) -> Result<Vec<PathBuf>> {
    let cues = render_cues(result, options, TimestampFormat::VTT)?;
    let companion = |suffix: &str| {
        let stem = vtt_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        vtt_path.with_file_name(format!("{}-{}.txt", stem, suffix))
    };

    let mut written = Vec::new();

    let speaker_path = companion("v");
    tokio::fs::write(&speaker_path, speaker_text(&cues)).await?;
    written.push(speaker_path);

    match detector {
        Some(detector) => {
            let anonymized = anonymized_text(&cues, detector).await?;
            let anonymized_path = companion("v3");
            tokio::fs::write(&anonymized_path, anonymized).await?;
            info!("Anonymized text saved to {}", anonymized_path.display());
            written.push(anonymized_path);
        }
        None => warn!(
            "No entity detector configured, skipping anonymized text for {}",
            vtt_path.display()
        ),
    }

    Ok(written)
}
