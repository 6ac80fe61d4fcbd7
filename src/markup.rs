//! Markup protection for translation round-trips.
//!
//! Tag-like spans (`<...>`) are swapped for opaque `__TAG__<base64>__TAG__`
//! tokens before text is sent to the translation endpoint and swapped back
//! afterwards. Text that already contains the literal `__TAG__` delimiter is
//! not escaped and may not round-trip.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::debug;

pub const TOKEN_DELIMITER: &str = "__TAG__";

fn markup_span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("markup span pattern is valid"))
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"__TAG__([A-Za-z0-9+/=]+)__TAG__").expect("token pattern is valid")
    })
}

/// Result of decoding a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// The payload decoded to the original span
    Restored(String),
    /// The payload was corrupt; the token is kept as-is
    Verbatim,
}

/// Reversible encoder for markup spans.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupGuard;

impl MarkupGuard {
    pub fn new() -> Self {
        Self
    }

    /// Replace every markup span with a token.
    pub fn encode(&self, text: &str) -> String {
        markup_span_re()
            .replace_all(text, |caps: &Captures| encode_token(&caps[0]))
            .into_owned()
    }

    /// Restore every token. Never fails and never drops content.
    pub fn decode(&self, text: &str) -> String {
        token_re()
            .replace_all(text, |caps: &Captures| match decode_payload(&caps[1]) {
                DecodeOutcome::Restored(span) => span,
                DecodeOutcome::Verbatim => caps[0].to_string(),
            })
            .into_owned()
    }
}

fn encode_token(span: &str) -> String {
    format!(
        "{TOKEN_DELIMITER}{}{TOKEN_DELIMITER}",
        STANDARD.encode(span.as_bytes())
    )
}

/// Decode one token payload, falling back to `Verbatim` on bad base64 or
/// non UTF-8 bytes.
pub fn decode_payload(payload: &str) -> DecodeOutcome {
    let bytes = match STANDARD.decode(payload) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Keeping markup token verbatim, invalid base64: {}", e);
            return DecodeOutcome::Verbatim;
        }
    };

    match String::from_utf8(bytes) {
        Ok(span) => DecodeOutcome::Restored(span),
        Err(e) => {
            debug!("Keeping markup token verbatim, payload is not UTF-8: {}", e);
            DecodeOutcome::Verbatim
        }
    }
}
