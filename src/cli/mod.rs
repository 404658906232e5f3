//! CLI module for Undertekst.

pub mod commands;
mod output;

pub use output::{format_duration, Output};

use crate::error::Result;
use crate::output::OutputFormat;
use crate::subtitles::{optional_int, str2bool};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Undertekst - subtitles from word-timed transcripts
///
/// Turns aligned speech-recognition output (JSON with per-word timings and
/// optional speaker labels) into SRT, WebVTT and plain-text files.
#[derive(Parser, Debug)]
#[command(name = "undertekst")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "UNDERTEKST_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render transcripts into subtitle and text files
    Render(RenderArgs),

    /// List supported language codes and names
    Languages,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// A line limit from the command line: an integer, or `None` for no limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLimit(pub Option<usize>);

fn parse_line_limit(value: &str) -> Result<LineLimit> {
    optional_int(value).map(LineLimit)
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Transcript JSON files
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory to write into (default: general.output_dir)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Output format (txt, vtt, srt, tsv, json, aud, all)
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Maximum characters per line, or None
    #[arg(long, value_parser = parse_line_limit)]
    pub max_line_width: Option<LineLimit>,

    /// Maximum lines per cue, or None
    #[arg(long, value_parser = parse_line_limit)]
    pub max_line_count: Option<LineLimit>,

    /// Underline each word as it is spoken (True or False)
    #[arg(long, value_parser = str2bool, action = clap::ArgAction::Set)]
    pub highlight_words: Option<bool>,

    /// Override the transcript language (code or English name)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Skip the anonymized text next to WebVTT output
    #[arg(long)]
    pub no_anonymize: bool,

    /// Number of transcripts rendered at the same time
    #[arg(short, long, default_value = "4")]
    pub jobs: usize,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_args(args: &[&str]) -> RenderArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Render(args) => args,
            other => panic!("expected render, got {:?}", other),
        }
    }

    #[test]
    fn test_render_defaults() {
        let args = render_args(&["undertekst", "render", "a.json", "b.json"]);

        assert_eq!(args.inputs, vec![PathBuf::from("a.json"), PathBuf::from("b.json")]);
        assert_eq!(args.format, None);
        assert_eq!(args.max_line_width, None);
        assert_eq!(args.highlight_words, None);
        assert_eq!(args.jobs, 4);
        assert!(!args.no_anonymize);
    }

    #[test]
    fn test_render_options() {
        let args = render_args(&[
            "undertekst",
            "render",
            "talk.json",
            "-f",
            "srt",
            "--max-line-width",
            "42",
            "--max-line-count",
            "None",
            "--highlight-words",
            "True",
            "--language",
            "Norwegian",
        ]);

        assert_eq!(args.format, Some(OutputFormat::Srt));
        assert_eq!(args.max_line_width, Some(LineLimit(Some(42))));
        assert_eq!(args.max_line_count, Some(LineLimit(None)));
        assert_eq!(args.highlight_words, Some(true));
        assert_eq!(args.language.as_deref(), Some("Norwegian"));
    }

    #[test]
    fn test_render_rejects_bad_values() {
        assert!(Cli::try_parse_from(["undertekst", "render", "a.json", "--highlight-words", "yes"]).is_err());
        assert!(Cli::try_parse_from(["undertekst", "render", "a.json", "--max-line-width", "wide"]).is_err());
        assert!(Cli::try_parse_from(["undertekst", "render", "a.json", "-f", "docx"]).is_err());
        assert!(Cli::try_parse_from(["undertekst", "render"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::try_parse_from(["undertekst", "-vv", "--config", "/tmp/u.toml", "config", "show"]).unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config.as_deref(), Some("/tmp/u.toml"));
        assert!(matches!(cli.command, Commands::Config { action: ConfigAction::Show }));
    }
}
