//! Languages command implementation.

use crate::cli::Output;
use crate::language::{uses_spaces, LANGUAGES};
use anyhow::Result;

/// Run the languages command.
pub fn run_languages() -> Result<()> {
    Output::header(&format!("Supported languages ({})", LANGUAGES.len()));
    for (code, name) in LANGUAGES {
        let note = if uses_spaces(code) { "" } else { " (no word spacing)" };
        Output::kv(code, &format!("{}{}", name, note));
    }
    Ok(())
}
