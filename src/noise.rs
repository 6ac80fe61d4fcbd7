//! Metadata-noise classifier for extracted text candidates.
//!
//! The content graph stores file metadata (attachment ids, sizes, camera
//! filenames) in the same slots as authored prose. These rules are tuned to
//! one workspace's conventions and will misclassify some real prose (for
//! example a sentence starting with "3 days"), so the set is replaceable.

use anyhow::{Context, Result};
use regex::{Regex, RegexBuilder};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid noise rule `{name}`: {source}")]
pub struct NoiseRuleError {
    pub name: String,
    #[source]
    pub source: regex::Error,
}

/// A named, case-insensitive pattern.
#[derive(Debug, Clone)]
pub struct NoiseRule {
    name: String,
    pattern: Regex,
}

impl NoiseRule {
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, NoiseRuleError> {
        let name = name.into();
        let pattern = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| NoiseRuleError {
                name: name.clone(),
                source,
            })?;
        Ok(Self { name, pattern })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matches(&self, candidate: &str) -> bool {
        self.pattern.is_match(candidate)
    }
}

const DEFAULT_RULES: &[(&str, &str)] = &[
    // "133 d," style duration/count artifacts
    ("duration_count", r"^\d+\s*[d,]"),
    ("object_placeholder", r"\[object Object\]"),
    ("attachment_ref", r"^attachment:"),
    // "2.1 MB", "Public 3.5 MB", "473.4KB"
    ("size_annotation", r"^(?:public\s*)?\d+(?:\.\d+)?\s*[mk]b\b"),
    // bare uuids, optionally "uuid:uuid"
    ("hex_identifier", r"^[a-f0-9-]+(?::[a-f0-9-]+)?$"),
    // "Post JW-133"
    ("title_code", r"^post\s+[a-z]{1,4}-\d+"),
    // "u, 5cba3530-6cb4-4235-807b-f098d646735a"
    ("label_hex", r"^[a-z]+\s*,\s*[a-f0-9-]+$"),
    ("image_filename", r"^(?:img|dsc|pxl)_[\d_]+\.(?:jpe?g|png|gif|heic|webp)$"),
];

/// Ordered set of rules; any match disqualifies a candidate.
#[derive(Debug, Clone)]
pub struct NoiseFilter {
    rules: Vec<NoiseRule>,
}

impl Default for NoiseFilter {
    fn default() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|(name, pattern)| {
                NoiseRule::new(*name, pattern).expect("default noise rules are valid")
            })
            .collect();
        Self { rules }
    }
}

impl NoiseFilter {
    pub fn new(rules: Vec<NoiseRule>) -> Self {
        Self { rules }
    }

    /// A filter that keeps every candidate.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    pub fn with_rule(mut self, name: &str, pattern: &str) -> Result<Self, NoiseRuleError> {
        self.rules.push(NoiseRule::new(name, pattern)?);
        Ok(self)
    }

    /// Load a replacement rule set: one pattern per line, `#` comments and
    /// blank lines ignored. `name = pattern` lines keep their name.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read noise rules from {}", path.display()))?;
        Self::parse_rules(&contents)
    }

    fn parse_rules(contents: &str) -> Result<Self> {
        let mut rules = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (name, pattern) = match line.split_once(" = ") {
                Some((name, pattern)) => (name.trim().to_string(), pattern.trim()),
                None => (format!("rule_{}", index + 1), line),
            };
            rules.push(NoiseRule::new(name, pattern)?);
        }
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[NoiseRule] {
        &self.rules
    }

    /// Name of the first rule matching the trimmed candidate.
    pub fn matching_rule(&self, candidate: &str) -> Option<&str> {
        let trimmed = candidate.trim();
        self.rules
            .iter()
            .find(|rule| rule.matches(trimmed))
            .map(NoiseRule::name)
    }

    pub fn is_noise(&self, candidate: &str) -> bool {
        self.matching_rule(candidate).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn filter() -> NoiseFilter {
        NoiseFilter::default()
    }

    // ==================== Default Rule Tests ====================

    #[test]
    fn test_sizes_are_noise() {
        assert_eq!(filter().matching_rule("2.1 MB"), Some("size_annotation"));
        assert_eq!(filter().matching_rule("Public 3.5 MB"), Some("size_annotation"));
        assert_eq!(filter().matching_rule("473.4KB"), Some("size_annotation"));
    }

    #[test]
    fn test_image_filenames_are_noise() {
        assert!(filter().is_noise("IMG_0001.jpg"));
        assert!(filter().is_noise("img_20240101_1200.JPEG"));
        assert!(filter().is_noise("PXL_20231005_093012.png"));
        assert!(!filter().is_noise("holiday.jpg is my favourite photo"));
    }

    #[test]
    fn test_attachment_and_identifiers_are_noise() {
        assert_eq!(
            filter().matching_rule("attachment:abc-123"),
            Some("attachment_ref")
        );
        assert!(filter().is_noise("5cba3530-6cb4-4235-807b-f098d646735a"));
        assert!(filter().is_noise("5cba3530:f098d646735a"));
        assert!(filter().is_noise("u, 5cba3530-6cb4-4235-807b-f098d646735a"));
    }

    #[test]
    fn test_misc_artifacts_are_noise() {
        assert!(filter().is_noise("133 d,"));
        assert!(filter().is_noise("[object Object]"));
        assert!(filter().is_noise("Post JW-133"));
    }

    #[test]
    fn test_candidate_is_trimmed_and_case_insensitive() {
        assert!(filter().is_noise("   ATTACHMENT:xyz  "));
    }

    #[test]
    fn test_prose_is_kept() {
        assert!(!filter().is_noise("Hello world"));
        assert!(!filter().is_noise("안녕하세요, 반갑습니다"));
        assert!(!filter().is_noise("The MB of data"));
    }

    #[test]
    fn test_known_misclassification_of_prose() {
        // Short prose that happens to be hex-like or start with "<number>d" is dropped.
        assert!(filter().is_noise("3 days later"));
        assert!(filter().is_noise("decade"));
    }

    // ==================== Configuration Tests ====================

    #[test]
    fn test_empty_filter_keeps_everything() {
        assert!(!NoiseFilter::empty().is_noise("IMG_0001.jpg"));
    }

    #[test]
    fn test_with_rule_extends_set() {
        let filter = NoiseFilter::empty()
            .with_rule("draft", r"^draft:")
            .expect("Valid pattern");
        assert!(filter.is_noise("DRAFT: todo"));
        assert_eq!(filter.rules().len(), 1);
    }

    #[test]
    fn test_with_rule_invalid_pattern() {
        let err = NoiseFilter::empty()
            .with_rule("broken", "(unclosed")
            .unwrap_err();
        assert_eq!(err.name, "broken");
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Temp file");
        writeln!(file, "# custom rules").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "caption = ^caption:").unwrap();
        writeln!(file, r"^\d+ views$").unwrap();

        let filter = NoiseFilter::from_file(file.path()).expect("Should load");
        assert_eq!(filter.rules().len(), 2);
        assert_eq!(filter.matching_rule("Caption: sunset"), Some("caption"));
        assert_eq!(filter.matching_rule("120 views"), Some("rule_4"));
        // Defaults are replaced, not merged
        assert!(!filter.is_noise("IMG_0001.jpg"));
    }

    #[test]
    fn test_from_file_missing() {
        let result = NoiseFilter::from_file(Path::new("/nonexistent/noise-rules.txt"));
        assert!(result.is_err());
    }
}
