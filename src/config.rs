//! Configuration types for the sketch pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::canvas::MAX_DIMENSION;
use crate::locale::Language;

/// Primary environment variable holding the inference API key.
pub const API_KEY_ENV: &str = "API_KEY";

/// Secondary environment variable consulted when [`API_KEY_ENV`] is unset.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// Drawing surface settings.
    pub canvas: CanvasConfig,
    /// Quiet-period settings for the capture gate.
    pub debounce: DebounceConfig,
    /// Remote inference settings.
    pub inference: InferenceConfig,
    /// Response language settings.
    pub locale: LocaleConfig,
}

/// Drawing surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Initial canvas width in pixels.
    pub width: u32,
    /// Initial canvas height in pixels.
    pub height: u32,
    /// Stroke width in pixels for both pencil and eraser.
    pub stroke_width: f32,
    /// Maximum number of undo snapshots kept.
    pub undo_capacity: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            stroke_width: 4.0,
            undo_capacity: 10,
        }
    }
}

/// Debounce configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Quiet interval in milliseconds that must elapse after the last frame
    /// before an analysis cycle starts.
    pub quiet_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self { quiet_ms: 800 }
    }
}

impl DebounceConfig {
    /// Quiet interval as a [`Duration`].
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_ms)
    }
}

/// Remote inference configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// API base URL (without the `/v1beta` suffix).
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// API key override. When `None`, the key is read from the environment.
    pub api_key: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_owned(),
            model: "gemini-3-flash-preview".to_owned(),
            api_key: None,
        }
    }
}

impl InferenceConfig {
    /// Resolve the API key: config override first, then `API_KEY`, then
    /// `GEMINI_API_KEY`. Blank values count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|key| std::env::var(key).ok())
    }

    /// Key resolution with an injectable variable lookup.
    pub fn resolve_api_key_with<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.api_key
            .clone()
            .into_iter()
            .chain(lookup(API_KEY_ENV))
            .chain(lookup(GEMINI_API_KEY_ENV))
            .map(|k| k.trim().to_owned())
            .find(|k| !k.is_empty())
    }
}

/// Response language configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Explicit language. When `None`, the language is detected from the
    /// process locale at startup.
    pub language: Option<Language>,
}

impl LocaleConfig {
    /// The session language: the override if set, otherwise detection.
    pub fn resolve(&self) -> Language {
        self.language.unwrap_or_else(Language::detect)
    }
}

impl SketchConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| crate::error::SketchError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::SketchError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `<config dir>/sketchguess/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| std::env::temp_dir().join("sketchguess-config"))
            .join("sketchguess")
            .join("config.toml")
    }

    /// Load from the default path if it exists, otherwise use defaults.
    ///
    /// A present but unreadable file is an error rather than a silent default.
    pub fn load_or_default() -> crate::error::Result<Self> {
        let path = Self::default_config_path();
        if path.exists() {
            tracing::info!(path = %path.display(), "loading config");
            Self::from_file(&path)
        } else {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            Ok(Self::default())
        }
    }

    /// Check values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::Config`](crate::error::SketchError::Config)
    /// describing the first invalid field.
    pub fn validate(&self) -> crate::error::Result<()> {
        let invalid = |msg: &str| Err(crate::error::SketchError::Config(msg.to_owned()));
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return invalid("canvas.width and canvas.height must be non-zero");
        }
        if self.canvas.width > MAX_DIMENSION || self.canvas.height > MAX_DIMENSION {
            return Err(crate::error::SketchError::Config(format!(
                "canvas.width and canvas.height must not exceed {MAX_DIMENSION}"
            )));
        }
        if !(self.canvas.stroke_width.is_finite() && self.canvas.stroke_width > 0.0) {
            return invalid("canvas.stroke_width must be a positive number");
        }
        if self.canvas.undo_capacity == 0 {
            return invalid("canvas.undo_capacity must be at least 1");
        }
        if self.inference.model.trim().is_empty() {
            return invalid("inference.model cannot be empty");
        }
        if self.inference.base_url.trim().is_empty() {
            return invalid("inference.base_url cannot be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SketchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce.quiet_ms, 800);
        assert_eq!(config.canvas.undo_capacity, 10);
        assert!((config.canvas.stroke_width - 4.0).abs() < f32::EPSILON);
        assert_eq!(config.inference.model, "gemini-3-flash-preview");
        assert!(config.locale.language.is_none());
    }

    #[test]
    fn quiet_period_converts_millis() {
        let config = DebounceConfig { quiet_ms: 250 };
        assert_eq!(config.quiet_period(), Duration::from_millis(250));
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = SketchConfig::default();
        config.canvas.width = 1024;
        config.debounce.quiet_ms = 500;
        config.locale.language = Some(Language::Pt);

        config.save_to_file(&path).unwrap();
        assert!(path.exists());

        let loaded = SketchConfig::from_file(&path).unwrap();
        assert_eq!(loaded.canvas.width, 1024);
        assert_eq!(loaded.debounce.quiet_ms, 500);
        assert_eq!(loaded.locale.language, Some(Language::Pt));
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = SketchConfig::from_file(std::path::Path::new("/nonexistent/path/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").unwrap();

        let result = SketchConfig::from_file(&path);
        assert!(matches!(result, Err(crate::error::SketchError::Config(_))));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: SketchConfig = toml::from_str(
            r#"
            [debounce]
            quiet_ms = 300

            [locale]
            language = "zh"
            "#,
        )
        .unwrap();
        assert_eq!(config.debounce.quiet_ms, 300);
        assert_eq!(config.locale.language, Some(Language::Zh));
        assert_eq!(config.canvas.width, 800);
        assert_eq!(config.inference.model, "gemini-3-flash-preview");
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = SketchConfig::default_config_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.ends_with("config.toml"));
        assert!(path_str.contains("sketchguess"));
    }

    #[test]
    fn validate_rejects_zero_sized_canvas() {
        let mut config = SketchConfig::default();
        config.canvas.height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_oversized_canvas() {
        let mut config = SketchConfig::default();
        config.canvas.width = MAX_DIMENSION + 1;
        assert!(config.validate().is_err());
        config.canvas.width = MAX_DIMENSION;
        config.canvas.height = u32::MAX;
        assert!(config.validate().is_err());
        config.canvas.height = MAX_DIMENSION;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_stroke_width() {
        let mut config = SketchConfig::default();
        config.canvas.stroke_width = f32::NAN;
        assert!(config.validate().is_err());
        config.canvas.stroke_width = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn api_key_prefers_config_override() {
        let config = InferenceConfig {
            api_key: Some("from-config".into()),
            ..InferenceConfig::default()
        };
        let key = config.resolve_api_key_with(|_| Some("from-env".into()));
        assert_eq!(key.as_deref(), Some("from-config"));
    }

    #[test]
    fn api_key_falls_back_through_env_vars() {
        let config = InferenceConfig::default();
        let key = config.resolve_api_key_with(|name| match name {
            API_KEY_ENV => Some("   ".into()),
            GEMINI_API_KEY_ENV => Some("gemini-key".into()),
            _ => None,
        });
        assert_eq!(key.as_deref(), Some("gemini-key"));
    }

    #[test]
    fn api_key_absent_when_nothing_set() {
        let config = InferenceConfig::default();
        assert!(config.resolve_api_key_with(|_| None).is_none());
    }

    #[test]
    fn locale_override_skips_detection() {
        let config = LocaleConfig {
            language: Some(Language::Fr),
        };
        assert_eq!(config.resolve(), Language::Fr);
    }
}
