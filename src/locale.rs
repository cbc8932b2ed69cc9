//! Response language selection.
//!
//! The language is chosen once at startup from the process locale and never
//! changes for the lifetime of a session. It only affects which language the
//! remote model is asked to answer in.

use serde::{Deserialize, Serialize};

/// Environment variables consulted for the locale, in priority order.
const LOCALE_ENV_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// Supported response languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pt,
    Es,
    Fr,
    Zh,
}

impl Language {
    /// Two-letter language code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Pt => "pt",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::Zh => "zh",
        }
    }

    /// Language name used in the model instruction.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Pt => "Portuguese (Brazil)",
            Self::Es => "Spanish",
            Self::Fr => "French",
            Self::Zh => "Chinese (Simplified)",
        }
    }

    /// Parse a locale tag such as `pt-BR`, `fr_FR.UTF-8` or `zh`.
    ///
    /// Returns `None` for anything outside the supported set.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag
            .split(['-', '_', '.', '@'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Self::En),
            "pt" => Some(Self::Pt),
            "es" => Some(Self::Es),
            "fr" => Some(Self::Fr),
            "zh" => Some(Self::Zh),
            _ => None,
        }
    }

    /// Map a locale tag to a language, defaulting to English.
    #[must_use]
    pub fn from_tag_or_default(tag: &str) -> Self {
        Self::from_tag(tag).unwrap_or_default()
    }

    /// Detect the language from the process locale environment.
    ///
    /// The first non-empty variable among `LC_ALL`, `LC_MESSAGES` and `LANG`
    /// decides; `C`/`POSIX` and unknown locales fall back to English.
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_with(|key| std::env::var(key).ok())
    }

    /// Detection with an injectable variable lookup.
    pub fn detect_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let tag = LOCALE_ENV_VARS
            .iter()
            .filter_map(|key| lookup(key))
            .find(|value| !value.trim().is_empty());

        let language = tag
            .as_deref()
            .map(Self::from_tag_or_default)
            .unwrap_or_default();
        tracing::debug!(locale = ?tag, language = language.code(), "detected response language");
        language
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
