//! Language type: validated language tag.
//!
//! A `Language` can only be built from a code present in the registry, so
//! every value can be sent to the translation endpoint as its target tag.

use crate::i18n::{LanguageConfig, LanguageRegistry, LanguageStrings};
use anyhow::{bail, Result};
use std::fmt;

/// A validated language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "ko", "en")
    code: &'static str,
}

impl Language {
    pub const KOREAN: Language = Language { code: "ko" };

    pub const ENGLISH: Language = Language { code: "en" };

    /// Create a Language from a language code string.
    ///
    /// The code is trimmed and lower-cased first, so persisted values like
    /// `"EN"` or `" ko\n"` still resolve.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is registered
    /// * `Err` if the code is unknown
    pub fn from_code(code: &str) -> Result<Language> {
        let normalized = code.trim().to_ascii_lowercase();

        match LanguageRegistry::get().get_by_code(&normalized) {
            Some(config) => Ok(Language { code: config.code }),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Get the canonical language, i.e. the language content is authored in.
    pub fn canonical() -> Language {
        let config = LanguageRegistry::get().canonical();
        Language { code: config.code }
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the language code is not found in the registry. This cannot
    /// happen for values built through `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// Get the English name of the language.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Get the native name of the language (e.g., "한국어").
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn emoji(&self) -> &'static str {
        self.config().emoji
    }

    /// Localized overlay strings for this language.
    pub fn strings(&self) -> &'static LanguageStrings {
        self.config().strings
    }

    /// Check if this is the canonical language.
    pub fn is_canonical(&self) -> bool {
        self.config().is_canonical
    }

    /// The other registered language, as selected by the language switcher.
    pub fn toggled(&self) -> Language {
        LanguageRegistry::get()
            .list_all()
            .into_iter()
            .find(|config| config.code != self.code)
            .map(|config| Language { code: config.code })
            .unwrap_or(*self)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}
