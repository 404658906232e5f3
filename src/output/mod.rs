//! Transcript output writers (TXT, VTT, SRT, TSV, JSON, Audacity labels).
//!
//! Each writer serializes one transcript into one file named after the
//! input audio, e.g. `talk.wav` becomes `<output_dir>/talk.srt`.

mod subtitle;
mod text;

pub use subtitle::{anonymized_text, speaker_text, write_vtt_companions, WriteSrt, WriteVtt};
pub use text::{WriteAudacity, WriteJson, WriteTsv, WriteTxt};

use crate::error::{Result, UndertekstError};
use crate::subtitles::SegmentationOptions;
use crate::transcription::TranscriptResult;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Txt,
    Vtt,
    Srt,
    Tsv,
    Json,
    /// Audacity label track; only written when asked for explicitly.
    Aud,
    /// Every format except the Audacity labels.
    All,
}

impl OutputFormat {
    /// Concrete formats written for this selection.
    pub fn expand(self) -> Vec<OutputFormat> {
        match self {
            OutputFormat::All => vec![
                OutputFormat::Txt,
                OutputFormat::Vtt,
                OutputFormat::Srt,
                OutputFormat::Tsv,
                OutputFormat::Json,
            ],
            other => vec![other],
        }
    }

    /// Writers for this selection, in output order.
    pub fn writers(self) -> Vec<Box<dyn ResultWriter>> {
        self.expand()
            .into_iter()
            .filter_map(|format| -> Option<Box<dyn ResultWriter>> {
                match format {
                    OutputFormat::Txt => Some(Box::new(WriteTxt)),
                    OutputFormat::Vtt => Some(Box::new(WriteVtt)),
                    OutputFormat::Srt => Some(Box::new(WriteSrt)),
                    OutputFormat::Tsv => Some(Box::new(WriteTsv)),
                    OutputFormat::Json => Some(Box::new(WriteJson)),
                    OutputFormat::Aud => Some(Box::new(WriteAudacity)),
                    OutputFormat::All => None,
                }
            })
            .collect()
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = UndertekstError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" => Ok(OutputFormat::Txt),
            "vtt" | "webvtt" => Ok(OutputFormat::Vtt),
            "srt" => Ok(OutputFormat::Srt),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            "aud" => Ok(OutputFormat::Aud),
            "all" => Ok(OutputFormat::All),
            _ => Err(UndertekstError::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Vtt => "vtt",
            OutputFormat::Srt => "srt",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
            OutputFormat::Aud => "aud",
            OutputFormat::All => "all",
        };
        write!(f, "{}", name)
    }
}

/// Writers for a format name such as `"srt"` or `"all"`.
pub fn get_writers(format: &str) -> Result<Vec<Box<dyn ResultWriter>>> {
    Ok(format.parse::<OutputFormat>()?.writers())
}

/// Path of the output file for `audio_path` with the given extension.
pub fn output_path(output_dir: &Path, audio_path: &Path, extension: &str) -> PathBuf {
    let stem = audio_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "transcript".to_string());
    output_dir.join(format!("{}.{}", stem, extension))
}

/// A serializer for one output format.
pub trait ResultWriter: Send + Sync {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// Serialize `result` into `out`, records in input order.
    fn write_result(
        &self,
        result: &TranscriptResult,
        out: &mut dyn Write,
        options: &SegmentationOptions,
    ) -> Result<()>;

    /// Write `<output_dir>/<audio stem>.<extension>` and return its path.
    fn write_to_dir(
        &self,
        result: &TranscriptResult,
        audio_path: &Path,
        output_dir: &Path,
        options: &SegmentationOptions,
    ) -> Result<PathBuf> {
        let path = output_path(output_dir, audio_path, self.extension());
        let mut file = BufWriter::new(File::create(&path)?);
        self.write_result(result, &mut file, options)?;
        file.flush()?;
        Ok(path)
    }
}
