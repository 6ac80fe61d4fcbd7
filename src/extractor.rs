//! Linearize a content graph into plain text in reading order.

use crate::content::{BlockType, ContentGraph};
use crate::noise::NoiseFilter;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("content graph has no blocks")]
    EmptyGraph,
}

/// Text of one block after noise filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedBlock {
    pub source_block_id: String,
    pub content: String,
    pub block_type: BlockType,
    pub order: f64,
}

fn excess_breaks_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n[^\S\n]*\n(?:[^\S\n]*\n)+").expect("valid pattern"))
}

fn horizontal_space_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\S\n]+").expect("valid pattern"))
}

#[derive(Debug, Clone, Default)]
pub struct Extractor {
    noise: NoiseFilter,
}

impl Extractor {
    pub fn new(noise: NoiseFilter) -> Self {
        Self { noise }
    }

    pub fn noise_filter(&self) -> &NoiseFilter {
        &self.noise
    }

    /// Extract the linearized text, or `""` when extraction is unavailable.
    ///
    /// An empty result means "nothing to translate", not "the post is empty".
    pub fn extract(&self, graph: &ContentGraph) -> String {
        match self.try_extract(graph) {
            Ok(text) => text,
            Err(e) => {
                warn!("Text extraction unavailable: {}", e);
                String::new()
            }
        }
    }

    pub fn try_extract(&self, graph: &ContentGraph) -> Result<String, ExtractionError> {
        if graph.is_empty() {
            return Err(ExtractionError::EmptyGraph);
        }

        let blocks = self.extract_blocks(graph);
        debug!(
            "Extracted {} text blocks from {} graph blocks",
            blocks.len(),
            graph.len()
        );

        Ok(linearize(&blocks))
    }

    /// Filtered, non-empty blocks sorted by order hint. Ties keep graph order.
    pub fn extract_blocks(&self, graph: &ContentGraph) -> Vec<ExtractedBlock> {
        let mut blocks: Vec<ExtractedBlock> = graph
            .blocks()
            .iter()
            .filter_map(|block| {
                let content = block
                    .text_runs
                    .iter()
                    .map(|run| run.text())
                    .filter(|text| !text.trim().is_empty())
                    .filter(|text| match self.noise.matching_rule(text) {
                        Some(rule) => {
                            debug!("Dropping {:?} from block {} ({})", text, block.id, rule);
                            false
                        }
                        None => true,
                    })
                    .collect::<Vec<_>>()
                    .join(" ");

                let content = content.trim();
                if content.is_empty() {
                    return None;
                }

                Some(ExtractedBlock {
                    source_block_id: block.id.clone(),
                    content: content.to_string(),
                    block_type: block.block_type.clone(),
                    order: block.order,
                })
            })
            .collect();

        // sort_by is stable
        blocks.sort_by(|a, b| a.order.total_cmp(&b.order));
        blocks
    }
}

fn block_separator(block_type: &BlockType) -> &'static str {
    if block_type.is_heading() {
        "\n\n"
    } else {
        "\n"
    }
}

fn linearize(blocks: &[ExtractedBlock]) -> String {
    let mut text = String::new();
    for block in blocks {
        text.push_str(&block.content);
        text.push_str(block_separator(&block.block_type));
    }

    let text = excess_breaks_re().replace_all(&text, "\n\n");
    let text = horizontal_space_re().replace_all(&text, " ");
    text.trim().to_string()
}
