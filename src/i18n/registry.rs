//! Language registry: Single source of truth for all supported languages.
//!
//! The blog is authored in one native language and offers exactly one
//! foreign language as a translation target. The registry is initialised
//! once through `OnceLock` and is immutable afterwards.

use crate::i18n::strings::{ENGLISH_STRINGS, KOREAN_STRINGS};
use crate::i18n::LanguageStrings;
use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// ISO 639-1 language code, also the endpoint's target tag (e.g., "ko", "en")
    pub code: &'static str,

    /// English name of the language (e.g., "Korean", "English")
    pub name: &'static str,

    /// Native name of the language (e.g., "한국어", "English")
    pub native_name: &'static str,

    /// Flag emoji shown next to the language switcher
    pub emoji: &'static str,

    /// Whether this is the language the content is authored in (only one should be true)
    pub is_canonical: bool,

    /// Localized overlay strings
    pub strings: &'static LanguageStrings,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    ///
    /// # Returns
    /// * `Some(&LanguageConfig)` if the language exists
    /// * `None` if the language is not found
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// Get all languages.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Get the canonical (native content) language configuration.
    ///
    /// # Panics
    /// Panics if the registry does not define exactly one canonical language.
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }
}

/// Korean is the authoring language, English the translation target.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            code: "ko",
            name: "Korean",
            native_name: "한국어",
            emoji: "🇰🇷",
            is_canonical: true,
            strings: &KOREAN_STRINGS,
        },
        LanguageConfig {
            code: "en",
            name: "English",
            native_name: "English",
            emoji: "🇺🇸",
            is_canonical: false,
            strings: &ENGLISH_STRINGS,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LanguageRegistry::get();
        let registry2 = LanguageRegistry::get();

        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_korean() {
        let config = LanguageRegistry::get()
            .get_by_code("ko")
            .expect("Korean should be registered");

        assert_eq!(config.code, "ko");
        assert_eq!(config.name, "Korean");
        assert_eq!(config.native_name, "한국어");
        assert_eq!(config.emoji, "🇰🇷");
        assert!(config.is_canonical);
    }

    #[test]
    fn test_get_by_code_english() {
        let config = LanguageRegistry::get()
            .get_by_code("en")
            .expect("English should be registered");

        assert_eq!(config.native_name, "English");
        assert_eq!(config.emoji, "🇺🇸");
        assert!(!config.is_canonical);
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        assert!(LanguageRegistry::get().get_by_code("fr").is_none());
        assert!(LanguageRegistry::get().get_by_code("").is_none());
    }

    #[test]
    fn test_exactly_two_languages() {
        let all = LanguageRegistry::get().list_all();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_canonical_returns_korean() {
        let canonical = LanguageRegistry::get().canonical();
        assert_eq!(canonical.code, "ko");
    }
}
