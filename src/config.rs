use crate::cache::DEFAULT_CAPACITY;
use crate::i18n::Language;
use crate::translation::{DEFAULT_CLIENT_ID, DEFAULT_ENDPOINT};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Translation endpoint
    pub translate_api_url: String,
    pub translate_client_id: String,
    pub translate_timeout_secs: u64,

    // Cache
    pub translation_cache_capacity: usize,
    pub translation_cache_ttl: Option<Duration>,

    // Reader language
    pub default_language: Language,
    pub language_preference_file: PathBuf,

    // Extraction
    pub noise_rules_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            translate_api_url: std::env::var("TRANSLATE_API_URL")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            translate_client_id: std::env::var("TRANSLATE_CLIENT_ID")
                .unwrap_or_else(|_| DEFAULT_CLIENT_ID.to_string()),
            translate_timeout_secs: std::env::var("TRANSLATE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),

            translation_cache_capacity: std::env::var("TRANSLATION_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
            // Unset or 0 means entries never expire
            translation_cache_ttl: std::env::var("TRANSLATION_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),

            default_language: match std::env::var("DEFAULT_LANGUAGE") {
                Ok(code) => Language::from_code(&code).context("Invalid DEFAULT_LANGUAGE")?,
                Err(_) => Language::canonical(),
            },
            language_preference_file: std::env::var("LANGUAGE_PREFERENCE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".blog-translator/language.json")),

            noise_rules_file: std::env::var("NOISE_RULES_FILE").ok().map(PathBuf::from),
        })
    }
}
