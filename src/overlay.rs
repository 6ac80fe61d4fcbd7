//! Toggle between the original and the machine-translated post text.
//!
//! The controller is driven by the reader's language selection. Work happens
//! in three steps so that a slow translation can be raced by a language or
//! content change: `begin_translation` hands out a `TranslationTicket`, the
//! caller awaits the translation, and `complete_translation` applies the
//! result only if the ticket still matches the current content snapshot,
//! language and request generation.

use crate::config::Config;
use crate::content::ContentGraph;
use crate::extractor::Extractor;
use crate::i18n::Language;
use crate::noise::NoiseFilter;
use crate::preference::PreferenceStore;
use crate::translation::TranslationClient;
use anyhow::Result;
use std::collections::HashMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayViewState {
    pub current_language: Language,
    pub show_translated: bool,
    pub is_translating: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Original,
    TranslationPending,
    Translated,
}

/// An in-flight translation request, bound to the state it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationTicket {
    content_epoch: u64,
    generation: u64,
    language: Language,
    source_text: String,
}

impl TranslationTicket {
    pub fn language(&self) -> Language {
        self.language
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }
}

/// The language switcher: shows the current language, selects `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSwitch {
    pub label: String,
    pub target: Language,
}

impl LanguageSwitch {
    fn for_language(current: Language) -> Self {
        Self {
            label: format!("{} {}", current.emoji(), current.native_name()),
            target: current.toggled(),
        }
    }
}

/// What the overlay shows right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayView {
    pub phase: OverlayPhase,
    pub text: String,
    /// Label of the toggle control; `None` when the control is hidden or disabled
    pub toggle_label: Option<&'static str>,
    /// Disclosure shown only alongside translated text
    pub translation_note: Option<&'static str>,
    /// Heading for the original text shown below a translation
    pub original_heading: Option<&'static str>,
    /// Loading indicator while a translation is pending
    pub loading: Option<&'static str>,
    pub language_switch: LanguageSwitch,
}

pub struct OverlayController {
    native: Language,
    state: OverlayViewState,
    extractor: Extractor,
    preferences: Box<dyn PreferenceStore>,
    content_epoch: u64,
    generation: u64,
    extracted: String,
    translations: HashMap<Language, String>,
}

impl OverlayController {
    /// The starting language is the stored preference, else `native`.
    pub fn new(
        native: Language,
        extractor: Extractor,
        preferences: Box<dyn PreferenceStore>,
    ) -> Self {
        Self::with_default_language(native, native, extractor, preferences)
    }

    pub fn with_default_language(
        native: Language,
        default_language: Language,
        extractor: Extractor,
        preferences: Box<dyn PreferenceStore>,
    ) -> Self {
        let current_language = preferences.load().unwrap_or(default_language);
        debug!("Overlay starting in {}", current_language);

        Self {
            native,
            state: OverlayViewState {
                current_language,
                show_translated: false,
                is_translating: false,
            },
            extractor,
            preferences,
            content_epoch: 0,
            generation: 0,
            extracted: String::new(),
            translations: HashMap::new(),
        }
    }

    /// Build from configuration, loading a replacement noise rule set if one
    /// is configured.
    pub fn from_config(config: &Config, preferences: Box<dyn PreferenceStore>) -> Result<Self> {
        let noise = match &config.noise_rules_file {
            Some(path) => NoiseFilter::from_file(path)?,
            None => NoiseFilter::default(),
        };

        Ok(Self::with_default_language(
            Language::canonical(),
            config.default_language,
            Extractor::new(noise),
            preferences,
        ))
    }

    pub fn state(&self) -> &OverlayViewState {
        &self.state
    }

    pub fn current_language(&self) -> Language {
        self.state.current_language
    }

    pub fn native_language(&self) -> Language {
        self.native
    }

    pub fn phase(&self) -> OverlayPhase {
        if self.state.is_translating {
            OverlayPhase::TranslationPending
        } else if self.state.show_translated {
            OverlayPhase::Translated
        } else {
            OverlayPhase::Original
        }
    }

    pub fn extracted_text(&self) -> &str {
        &self.extracted
    }

    /// Translation retained for the current language, if any.
    pub fn translated_text(&self) -> Option<&str> {
        self.translations
            .get(&self.state.current_language)
            .map(String::as_str)
    }

    /// Replace the content snapshot. Extraction runs once here; translations
    /// of the previous snapshot are dropped and in-flight work is invalidated.
    pub fn load_content(&mut self, graph: &ContentGraph) {
        self.content_epoch += 1;
        self.generation += 1;
        self.extracted = self.extractor.extract(graph);
        self.translations.clear();
        self.state.show_translated = false;
        self.state.is_translating = false;

        info!(
            "Loaded content snapshot {} ({} chars extracted)",
            self.content_epoch,
            self.extracted.len()
        );
    }

    /// Switch the reader's language and persist the choice.
    pub fn set_language(&mut self, language: Language) {
        if let Err(e) = self.preferences.save(language) {
            warn!("Failed to persist language preference: {:#}", e);
        }

        if language == self.state.current_language {
            return;
        }

        info!(
            "Language changed {} -> {}",
            self.state.current_language, language
        );
        self.state.current_language = language;
        self.generation += 1;
        self.state.is_translating = false;
        self.state.show_translated = false;
    }

    /// Flip to the other language of the pair, as the language switcher does.
    pub fn switch_language(&mut self) {
        self.set_language(self.state.current_language.toggled());
    }

    fn is_native(&self) -> bool {
        self.state.current_language == self.native
    }

    /// The toggle is hidden for the native language and disabled while
    /// extraction produced nothing or a translation is pending.
    pub fn toggle_available(&self) -> bool {
        !self.is_native() && !self.extracted.trim().is_empty() && !self.state.is_translating
    }

    /// Request the translated view.
    ///
    /// Returns a ticket when a translation has to be fetched. Returns `None`
    /// when no work is needed: native language, nothing extracted, a request
    /// already pending, or a translation retained from earlier this session
    /// (which is shown immediately).
    pub fn begin_translation(&mut self) -> Option<TranslationTicket> {
        if self.is_native() {
            self.state.show_translated = false;
            return None;
        }
        if self.extracted.trim().is_empty() || self.state.is_translating {
            return None;
        }

        if self.translations.contains_key(&self.state.current_language) {
            self.state.show_translated = true;
            return None;
        }

        self.state.is_translating = true;
        Some(TranslationTicket {
            content_epoch: self.content_epoch,
            generation: self.generation,
            language: self.state.current_language,
            source_text: self.extracted.clone(),
        })
    }

    fn is_current(&self, ticket: &TranslationTicket) -> bool {
        let current = ticket.content_epoch == self.content_epoch
            && ticket.generation == self.generation
            && ticket.language == self.state.current_language;

        if !current {
            debug!(
                "Discarding stale translation for {} (snapshot {}, generation {})",
                ticket.language, ticket.content_epoch, ticket.generation
            );
        }
        current
    }

    /// Apply a finished translation. Returns `false` when the ticket is stale
    /// and the result was discarded.
    pub fn complete_translation(&mut self, ticket: TranslationTicket, translated: String) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }

        self.translations.insert(ticket.language, translated);
        self.state.is_translating = false;
        self.state.show_translated = true;
        true
    }

    /// Record that a translation could not be produced. The original text is
    /// shown in its place and nothing is retained, so the next toggle fetches
    /// again. Returns `false` when the ticket is stale.
    pub fn fail_translation(&mut self, ticket: TranslationTicket) -> bool {
        if !self.is_current(&ticket) {
            return false;
        }

        self.state.is_translating = false;
        self.state.show_translated = true;
        true
    }

    /// Back to the original text. The translation is kept for re-toggling;
    /// a pending request is abandoned.
    pub fn show_original(&mut self) {
        if self.state.is_translating {
            self.generation += 1;
            self.state.is_translating = false;
        }
        self.state.show_translated = false;
    }

    /// Flip between original and translated view, fetching if needed.
    pub async fn toggle(&mut self, client: &TranslationClient) -> OverlayPhase {
        if self.state.show_translated {
            self.show_original();
        } else if let Some(ticket) = self.begin_translation() {
            match client
                .try_translate_markup(ticket.source_text(), ticket.language())
                .await
            {
                Ok(translated) => {
                    self.complete_translation(ticket, translated);
                }
                Err(e) => {
                    warn!(
                        "Translation to {} failed, showing original: {}",
                        ticket.language(),
                        e
                    );
                    self.fail_translation(ticket);
                }
            }
        }
        self.phase()
    }

    pub fn view(&self) -> OverlayView {
        let strings = self.state.current_language.strings();
        let phase = self.phase();
        let language_switch = LanguageSwitch::for_language(self.state.current_language);

        match phase {
            OverlayPhase::Original => OverlayView {
                phase,
                text: self.extracted.clone(),
                toggle_label: self
                    .toggle_available()
                    .then_some(strings.view_translation),
                translation_note: None,
                original_heading: None,
                loading: None,
                language_switch,
            },
            OverlayPhase::TranslationPending => OverlayView {
                phase,
                text: self.extracted.clone(),
                toggle_label: None,
                translation_note: None,
                original_heading: None,
                loading: Some(strings.translating),
                language_switch,
            },
            OverlayPhase::Translated => {
                // A failed request shows the original without the disclosure
                let translated = self.translated_text();
                OverlayView {
                    phase,
                    text: translated.unwrap_or(self.extracted.as_str()).to_string(),
                    toggle_label: Some(strings.view_original),
                    translation_note: translated.map(|_| strings.translation_note),
                    original_heading: translated.map(|_| strings.original_heading),
                    loading: None,
                    language_switch,
                }
            }
        }
    }
}
