//! Durable storage for the reader's language choice.

use crate::i18n::Language;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Read once at startup, written on every language change.
pub trait PreferenceStore: Send + Sync {
    /// Stored language, or `None` when nothing usable is stored.
    fn load(&self) -> Option<Language>;

    fn save(&self, language: Language) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredPreference {
    language: String,
}

/// JSON file store: `{"language":"en"}`.
#[derive(Debug, Clone)]
pub struct FilePreferenceStore {
    path: PathBuf,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn load(&self) -> Option<Language> {
        let contents = std::fs::read_to_string(&self.path).ok()?;

        let stored: StoredPreference = match serde_json::from_str(&contents) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(
                    "Ignoring unreadable language preference {}: {}",
                    self.path.display(),
                    e
                );
                return None;
            }
        };

        match Language::from_code(&stored.language) {
            Ok(language) => Some(language),
            Err(e) => {
                warn!("Ignoring stored language preference: {}", e);
                None
            }
        }
    }

    fn save(&self, language: Language) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let stored = StoredPreference {
            language: language.code().to_string(),
        };
        let json = serde_json::to_string(&stored)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

/// Process-local store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    language: Mutex<Option<Language>>,
}

impl MemoryPreferenceStore {
    pub fn new(initial: Option<Language>) -> Self {
        Self {
            language: Mutex::new(initial),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Option<Language> {
        *self
            .language
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn save(&self, language: Language) -> Result<()> {
        *self
            .language
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(language);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = TempDir::new().expect("Temp dir");
        let store = FilePreferenceStore::new(dir.path().join("nested/language.json"));

        assert_eq!(store.load(), None);
        store.save(Language::ENGLISH).expect("Should save");
        assert_eq!(store.load(), Some(Language::ENGLISH));

        let raw = std::fs::read_to_string(store.path()).expect("File exists");
        assert_eq!(raw, r#"{"language":"en"}"#);
    }

    #[test]
    fn test_file_store_overwrites() {
        let dir = TempDir::new().expect("Temp dir");
        let store = FilePreferenceStore::new(dir.path().join("language.json"));

        store.save(Language::ENGLISH).expect("Should save");
        store.save(Language::KOREAN).expect("Should save");
        assert_eq!(store.load(), Some(Language::KOREAN));
    }

    #[test]
    fn test_file_store_ignores_corrupt_file() {
        let dir = TempDir::new().expect("Temp dir");
        let path = dir.path().join("language.json");
        std::fs::write(&path, "not json").expect("Write");

        assert_eq!(FilePreferenceStore::new(&path).load(), None);
    }

    #[test]
    fn test_file_store_ignores_unknown_language() {
        let dir = TempDir::new().expect("Temp dir");
        let path = dir.path().join("language.json");
        std::fs::write(&path, r#"{"language":"fr"}"#).expect("Write");

        assert_eq!(FilePreferenceStore::new(&path).load(), None);
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryPreferenceStore::new(None);
        assert_eq!(store.load(), None);
        store.save(Language::ENGLISH).expect("Should save");
        assert_eq!(store.load(), Some(Language::ENGLISH));
    }
}
