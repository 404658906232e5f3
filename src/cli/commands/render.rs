//! Render command implementation.

use crate::anonymize::{EntityDetector, HttpEntityDetector};
use crate::cli::{format_duration, Output, RenderArgs};
use crate::config::Settings;
use crate::error::UndertekstError;
use crate::language::to_language_code;
use crate::output::{output_path, write_vtt_companions, OutputFormat};
use crate::subtitles::SegmentationOptions;
use crate::transcription::TranscriptResult;
use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Everything a render needs, resolved from flags over settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderPlan {
    pub format: OutputFormat,
    pub options: SegmentationOptions,
    pub output_dir: PathBuf,
    /// Language forced onto every transcript.
    pub language: Option<&'static str>,
    /// Write the anonymized WebVTT companion.
    pub anonymize: bool,
}

impl RenderPlan {
    pub fn resolve(args: &RenderArgs, settings: &Settings) -> Result<Self> {
        let format = match args.format {
            Some(format) => format,
            None => settings.output.format.parse()?,
        };

        let mut options = settings.segmentation_options();
        if let Some(limit) = args.max_line_width {
            options.max_line_width = limit.0;
        }
        if let Some(limit) = args.max_line_count {
            options.max_line_count = limit.0;
        }
        if let Some(highlight) = args.highlight_words {
            options.highlight_words = highlight;
        }

        let language = args
            .language
            .as_deref()
            .map(|lang| {
                to_language_code(lang).ok_or_else(|| {
                    UndertekstError::InvalidOption(format!("unsupported language: {}", lang))
                })
            })
            .transpose()?;

        let output_dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| settings.output_dir());

        let anonymize = settings.anonymize.enabled
            && !args.no_anonymize
            && format.expand().contains(&OutputFormat::Vtt);

        Ok(Self {
            format,
            options,
            output_dir,
            language,
            anonymize,
        })
    }
}

/// Files written for one transcript.
#[derive(Debug)]
struct Rendered {
    written: Vec<PathBuf>,
    duration: f64,
}

/// Run the render command.
pub async fn run_render(args: &RenderArgs, settings: Settings) -> Result<()> {
    let plan = RenderPlan::resolve(args, &settings)?;
    debug!(?plan, "Resolved render plan");

    std::fs::create_dir_all(&plan.output_dir)?;

    let detector = if plan.anonymize {
        Some(HttpEntityDetector::from_settings(&settings.anonymize)?)
    } else {
        None
    };
    let detector: Option<&dyn EntityDetector> = detector.as_ref().map(|d| d as &dyn EntityDetector);

    let pb = Output::progress_bar(args.inputs.len() as u64, "Rendering");

    let mut results = Vec::with_capacity(args.inputs.len());
    let plan = &plan;

    let mut stream = stream::iter(args.inputs.iter().enumerate())
        .map(|(idx, input)| async move {
            let result = render_transcript(input, plan, detector).await;
            (idx, input, result)
        })
        .buffer_unordered(args.jobs.max(1));

    while let Some(rendered) = stream.next().await {
        pb.inc(1);
        results.push(rendered);
    }

    pb.finish_and_clear();

    results.sort_by_key(|(idx, _, _)| *idx);

    let mut failed = 0;
    for (_, input, result) in results {
        match result {
            Ok(rendered) => {
                Output::success(&format!(
                    "{} ({}, {} files)",
                    input.display(),
                    format_duration(rendered.duration),
                    rendered.written.len()
                ));
                for path in &rendered.written {
                    Output::written(path);
                }
            }
            Err(e) => {
                failed += 1;
                Output::error(&format!("{}: {}", input.display(), e));
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} transcripts failed to render", failed, args.inputs.len());
    }

    Ok(())
}

/// Render one transcript file into every requested format.
async fn render_transcript(
    input: &Path,
    plan: &RenderPlan,
    detector: Option<&dyn EntityDetector>,
) -> crate::Result<Rendered> {
    let mut result = TranscriptResult::from_json_file(input)?;

    if let Some(code) = plan.language {
        result.language = code.to_string();
    }

    if !result.segments.is_empty() && !result.has_word_timings() {
        warn!(
            input = %input.display(),
            "Transcript has segments without word timings, rendering one cue per segment"
        );
    }

    let mut written = Vec::new();
    let mut vtt_path = None;
    for writer in plan.format.writers() {
        let target = output_path(&plan.output_dir, input, writer.extension());
        if is_same_file(input, &target) {
            warn!(
                input = %input.display(),
                "Skipping {} output, it would overwrite the input",
                writer.extension()
            );
            continue;
        }

        let path = writer.write_to_dir(&result, input, &plan.output_dir, &plan.options)?;
        debug!("Wrote {}", path.display());

        if writer.extension() == "vtt" {
            vtt_path = Some(path.clone());
        }
        written.push(path);
    }

    // companions go after every format file
    if let Some(vtt_path) = vtt_path {
        let detector = if plan.anonymize { detector } else { None };
        written.extend(write_vtt_companions(&result, &plan.options, &vtt_path, detector).await?);
    }

    info!(
        input = %input.display(),
        segments = result.segments.len(),
        words = result.word_count(),
        files = written.len(),
        "Rendered transcript"
    );

    Ok(Rendered {
        written,
        duration: result.segments.last().map(|s| s.end).unwrap_or(0.0),
    })
}

/// Whether both paths name the same existing file.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
