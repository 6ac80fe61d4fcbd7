/// All localized user-facing strings of the translation overlay.
///
/// The strings a reader sees are chosen by the reader's current language,
/// not by the language the content is written in.
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    // ==================== Toggle Labels ====================
    /// Toggle label while the original text is shown
    pub view_translation: &'static str,

    /// Toggle label while the translated text is shown
    pub view_original: &'static str,

    // ==================== Status Messages ====================
    /// Loading indicator shown while a translation is pending
    pub translating: &'static str,

    /// Disclosure note shown whenever translated text is displayed
    pub translation_note: &'static str,

    /// Heading above the untouched original content
    pub original_heading: &'static str,
}

pub const KOREAN_STRINGS: LanguageStrings = LanguageStrings {
    view_translation: "번역 보기",
    view_original: "원문 보기",
    translating: "번역 중...",
    translation_note: "* Google 번역을 통해 자동 번역되었습니다.",
    original_heading: "원문",
};

pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    view_translation: "View Translation",
    view_original: "View Original",
    translating: "Translating...",
    translation_note: "* Automatically translated via Google Translate.",
    original_heading: "Original",
};
