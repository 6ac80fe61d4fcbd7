//! Internationalization (i18n) module for the translation overlay.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the supported language pair
//! - `language`: Validated `Language` tag, used as the translation target
//! - `strings`: Localized overlay labels and notes
//! - `metrics`: Translation cache and endpoint counters
//!
//! # Example
//!
//! ```rust
//! use blog_translator::i18n::Language;
//!
//! let native = Language::canonical();
//! let english = Language::from_code("en").unwrap();
//! assert_ne!(native, english);
//! ```

mod language;
mod metrics;
mod registry;
mod strings;

pub use language::Language;
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use strings::LanguageStrings;
