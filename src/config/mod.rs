//! Configuration module for Undertekst.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    AnonymizeSettings, GeneralSettings, OutputSettings, Settings, SubtitleSettings,
};
