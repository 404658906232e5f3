//! Configuration settings for Undertekst.

use crate::error::{Result, UndertekstError};
use crate::subtitles::SegmentationOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub subtitles: SubtitleSettings,
    pub output: OutputSettings,
    pub anonymize: AnonymizeSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory rendered files are written to.
    pub output_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Subtitle layout defaults; command-line flags override them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct SubtitleSettings {
    /// Maximum characters per line (unset: no width limit).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_line_width: Option<usize>,
    /// Maximum lines per cue (unset: no line limit).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_line_count: Option<usize>,
    /// Underline each word as it is spoken.
    pub highlight_words: bool,
}

impl From<&SubtitleSettings> for SegmentationOptions {
    fn from(settings: &SubtitleSettings) -> Self {
        Self {
            max_line_width: settings.max_line_width,
            max_line_count: settings.max_line_count,
            highlight_words: settings.highlight_words,
        }
    }
}

/// Output file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Output format (txt, vtt, srt, tsv, json, aud, all).
    pub format: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: "all".to_string(),
        }
    }
}

/// Anonymized companion text settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonymizeSettings {
    /// Write the anonymized `-v3.txt` companion next to WebVTT output.
    /// Off until an entity service is configured.
    pub enabled: bool,
    /// Named-entity-recognition service URL.
    pub endpoint: String,
    /// Environment variable holding a bearer token for the service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for AnonymizeSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: "http://127.0.0.1:8080/ner".to_string(),
            api_key_env: None,
            timeout_secs: 60,
        }
    }
}

impl Settings {
    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| UndertekstError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check values that cannot be expressed in the types.
    pub fn validate(&self) -> Result<()> {
        if self.anonymize.enabled {
            let url = Url::parse(&self.anonymize.endpoint).map_err(|e| {
                UndertekstError::Config(format!("anonymize.endpoint: {}", e))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(UndertekstError::Config(format!(
                    "anonymize.endpoint must be http(s), got {}",
                    url.scheme()
                )));
            }
        }
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("undertekst")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }

    /// Layout options from the `[subtitles]` section.
    pub fn segmentation_options(&self) -> SegmentationOptions {
        SegmentationOptions::from(&self.subtitles)
    }
}
