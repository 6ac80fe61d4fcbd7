//! Blog translation overlay.
//!
//! Linearizes a pre-fetched content graph into plain text, translates it
//! through an external endpoint with markup protection and caching, and
//! drives the original/translated toggle shown to readers.

pub mod cache;
pub mod config;
pub mod content;
pub mod extractor;
pub mod i18n;
pub mod markup;
pub mod noise;
pub mod overlay;
pub mod preference;
pub mod translation;
