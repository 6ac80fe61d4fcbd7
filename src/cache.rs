//! Bounded in-memory translation cache.
//!
//! Entries are keyed by the exact source text and target language. The cache
//! is constructed once and shared by reference; nothing here is global.

use crate::i18n::Language;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::debug;

pub const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source_text: String,
    target: Language,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    translated: String,
    inserted_at: Instant,
}

#[derive(Debug)]
pub struct TranslationCache {
    entries: Mutex<LruCache<CacheKey, CacheEntry>>,
    ttl: Option<Duration>,
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, None)
    }
}

impl TranslationCache {
    /// A capacity of zero is treated as one.
    pub fn new(capacity: usize, ttl: Option<Duration>) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Look up a translation; expired entries are evicted on access.
    pub fn get(&self, source_text: &str, target: Language) -> Option<String> {
        let key = CacheKey {
            source_text: source_text.to_string(),
            target,
        };
        let mut entries = self.lock();

        let expired = match entries.get(&key) {
            None => return None,
            Some(entry) => self.is_expired(entry),
        };

        if expired {
            debug!("Evicting expired translation for target {}", target);
            entries.pop(&key);
            return None;
        }

        entries.get(&key).map(|entry| entry.translated.clone())
    }

    /// Store a translation, replacing any previous value for the same key.
    pub fn insert(&self, source_text: &str, target: Language, translated: String) {
        let key = CacheKey {
            source_text: source_text.to_string(),
            target,
        };
        let entry = CacheEntry {
            translated,
            inserted_at: Instant::now(),
        };

        if let Some((evicted, _)) = self.lock().push(key, entry) {
            if evicted.source_text != source_text || evicted.target != target {
                debug!("Translation cache full, evicted entry for {}", evicted.target);
            }
        }
    }

    pub fn remove(&self, source_text: &str, target: Language) -> bool {
        let key = CacheKey {
            source_text: source_text.to_string(),
            target,
        };
        self.lock().pop(&key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_expired(&self, entry: &CacheEntry) -> bool {
        self.ttl
            .map(|ttl| entry.inserted_at.elapsed() > ttl)
            .unwrap_or(false)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<CacheKey, CacheEntry>> {
        // The cache holds no invariants a panicking writer could break.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
