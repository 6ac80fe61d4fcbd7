//! Typed view over an externally supplied content graph.
//!
//! The record map produced by the document workspace is loosely typed: every
//! block is an object whose `properties.title` holds nested arrays of strings
//! and formatting annotations. This module validates that shape once and
//! exposes `BlockNode`s with a closed `BlockType` and typed `RichTextRun`s, so
//! the extractor never inspects raw JSON.

use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("record map has no `block` table")]
    MissingBlockTable,

    #[error("duplicate block id: {0}")]
    DuplicateBlock(String),

    #[error("invalid record map JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Structural role of a block, which decides the line breaks after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockType {
    Header,
    SubHeader,
    SubSubHeader,
    Text,
    BulletedListItem,
    NumberedListItem,
    /// Any tag outside the known set, kept for logging
    Other(String),
}

impl BlockType {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "header" => BlockType::Header,
            "sub_header" => BlockType::SubHeader,
            "sub_sub_header" => BlockType::SubSubHeader,
            "text" | "paragraph" => BlockType::Text,
            "bulleted_list" | "bulleted_list_item" => BlockType::BulletedListItem,
            "numbered_list" | "numbered_list_item" => BlockType::NumberedListItem,
            other => BlockType::Other(other.to_string()),
        }
    }

    pub fn is_heading(&self) -> bool {
        matches!(
            self,
            BlockType::Header | BlockType::SubHeader | BlockType::SubSubHeader
        )
    }
}

/// One element of a rich-text property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RichTextRun {
    /// A bare string
    Plain(String),
    /// A formatted span; only its leading string is displayable
    Span { first: String },
}

impl RichTextRun {
    pub fn text(&self) -> &str {
        match self {
            RichTextRun::Plain(text) => text,
            RichTextRun::Span { first } => first,
        }
    }
}

/// One unit of authored content.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockNode {
    pub id: String,
    pub block_type: BlockType,
    pub text_runs: Vec<RichTextRun>,
    /// Position hint within the parent; not unique, may be fractional
    pub order: f64,
}

impl BlockNode {
    pub fn new(id: impl Into<String>, block_type: BlockType, order: impl Into<f64>) -> Self {
        Self {
            id: id.into(),
            block_type,
            text_runs: Vec::new(),
            order: order.into(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_runs.push(RichTextRun::Plain(text.into()));
        self
    }

    pub fn with_run(mut self, run: RichTextRun) -> Self {
        self.text_runs.push(run);
        self
    }
}

/// Read-only snapshot of blocks in graph-encounter order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentGraph {
    blocks: Vec<BlockNode>,
    ids: HashSet<String>,
}

impl ContentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block. Ids must be unique within a graph.
    pub fn push(&mut self, block: BlockNode) -> Result<(), GraphError> {
        if !self.ids.insert(block.id.clone()) {
            return Err(GraphError::DuplicateBlock(block.id));
        }
        self.blocks.push(block);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&BlockNode> {
        if !self.ids.contains(id) {
            return None;
        }
        self.blocks.iter().find(|block| block.id == id)
    }

    /// Blocks in the order they were encountered in the source graph.
    pub fn blocks(&self) -> &[BlockNode] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn from_json_str(json: &str) -> Result<Self, GraphError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_record_map(&value)
    }

    /// Build a graph from a record map of the form
    /// `{"block": {"<id>": {"value": {"type": .., "properties": {"title": [..]}}}}}`.
    ///
    /// Entries without a `value` object are skipped rather than rejected.
    pub fn from_record_map(record_map: &Value) -> Result<Self, GraphError> {
        let table = record_map
            .get("block")
            .and_then(Value::as_object)
            .ok_or(GraphError::MissingBlockTable)?;

        let mut graph = ContentGraph::new();
        for (id, entry) in table {
            let Some(value) = block_value(entry) else {
                debug!("Skipping block {} without a value object", id);
                continue;
            };

            let block_type = value
                .get("type")
                .and_then(Value::as_str)
                .map(BlockType::from_tag)
                .unwrap_or_else(|| BlockType::Other(String::new()));

            let text_runs = value
                .get("properties")
                .and_then(|properties| {
                    properties
                        .get("title")
                        .or_else(|| properties.get("rich_text"))
                })
                .map(parse_runs)
                .unwrap_or_default();

            graph.push(BlockNode {
                id: id.clone(),
                block_type,
                text_runs,
                order: order_hint(value),
            })?;
        }

        Ok(graph)
    }
}

/// Some record maps wrap the block in a second `value` layer.
fn block_value(entry: &Value) -> Option<&Value> {
    let value = entry.get("value").filter(|v| v.is_object())?;
    match value.get("value") {
        Some(inner) if inner.get("type").is_some() => Some(inner),
        _ => Some(value),
    }
}

/// Integer and fractional hints are both kept as `f64`; JSON numbers are
/// never NaN, so they sort totally.
fn order_hint(value: &Value) -> f64 {
    value
        .get("order")
        .and_then(Value::as_f64)
        .or_else(|| {
            value
                .get("content")
                .and_then(|content| content.get("index"))
                .and_then(Value::as_f64)
        })
        .unwrap_or(0.0)
}

fn parse_runs(property: &Value) -> Vec<RichTextRun> {
    let Some(segments) = property.as_array() else {
        return Vec::new();
    };

    let mut runs = Vec::new();
    for segment in segments {
        match segment {
            Value::String(text) => runs.push(RichTextRun::Plain(text.clone())),
            Value::Array(elements) => runs.extend(elements.iter().filter_map(parse_element)),
            _ => {}
        }
    }
    runs
}

fn parse_element(element: &Value) -> Option<RichTextRun> {
    match element {
        Value::String(text) => Some(RichTextRun::Plain(text.clone())),
        Value::Array(items) => match items.first() {
            Some(Value::String(first)) => Some(RichTextRun::Span {
                first: first.clone(),
            }),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ==================== BlockType Tests ====================

    #[test]
    fn test_block_type_from_known_tags() {
        assert_eq!(BlockType::from_tag("header"), BlockType::Header);
        assert_eq!(BlockType::from_tag("sub_header"), BlockType::SubHeader);
        assert_eq!(BlockType::from_tag("sub_sub_header"), BlockType::SubSubHeader);
        assert_eq!(BlockType::from_tag("text"), BlockType::Text);
        assert_eq!(BlockType::from_tag("bulleted_list"), BlockType::BulletedListItem);
        assert_eq!(BlockType::from_tag("numbered_list"), BlockType::NumberedListItem);
    }

    #[test]
    fn test_block_type_unknown_tag() {
        assert_eq!(
            BlockType::from_tag("image"),
            BlockType::Other("image".to_string())
        );
        assert!(!BlockType::from_tag("image").is_heading());
        assert!(BlockType::SubSubHeader.is_heading());
    }

    // ==================== Record Map Tests ====================

    #[test]
    fn test_from_record_map_preserves_encounter_order() {
        let record_map = json!({
            "block": {
                "zzz": {"value": {"type": "text", "properties": {"title": [["first"]]}}},
                "aaa": {"value": {"type": "text", "properties": {"title": [["second"]]}}}
            }
        });

        let graph = ContentGraph::from_record_map(&record_map).expect("Should parse");
        let ids: Vec<_> = graph.blocks().iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["zzz", "aaa"]);
    }

    #[test]
    fn test_from_record_map_parses_runs() {
        let record_map = json!({
            "block": {
                "b1": {"value": {
                    "type": "header",
                    "properties": {"title": [["Hello "], ["world", [["b"]]], [[["nested"]]]]}
                }}
            }
        });

        let graph = ContentGraph::from_record_map(&record_map).expect("Should parse");
        let block = graph.get("b1").expect("Block should exist");

        assert_eq!(block.block_type, BlockType::Header);
        assert_eq!(
            block.text_runs,
            vec![
                RichTextRun::Plain("Hello ".to_string()),
                RichTextRun::Plain("world".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_record_map_structured_span() {
        let record_map = json!({
            "block": {
                "b1": {"value": {"type": "text", "properties": {"title": [[["linked", "meta"]]]}}}
            }
        });

        let graph = ContentGraph::from_record_map(&record_map).expect("Should parse");
        assert_eq!(
            graph.blocks()[0].text_runs,
            vec![RichTextRun::Span {
                first: "linked".to_string()
            }]
        );
    }

    #[test]
    fn test_from_record_map_rich_text_fallback() {
        let record_map = json!({
            "block": {
                "b1": {"value": {"type": "text", "properties": {"rich_text": [["body"]]}}}
            }
        });

        let graph = ContentGraph::from_record_map(&record_map).expect("Should parse");
        assert_eq!(graph.blocks()[0].text_runs[0].text(), "body");
    }

    #[test]
    fn test_from_record_map_order_hint() {
        let record_map = json!({
            "block": {
                "a": {"value": {"type": "text", "order": 3}},
                "b": {"value": {"type": "text", "content": {"index": 2}}},
                "c": {"value": {"type": "text", "content": ["child-1"]}}
            }
        });

        let graph = ContentGraph::from_record_map(&record_map).expect("Should parse");
        let orders: Vec<_> = graph.blocks().iter().map(|b| b.order).collect();
        assert_eq!(orders, vec![3.0, 2.0, 0.0]);
    }

    #[test]
    fn test_from_record_map_nested_value_layer() {
        let record_map = json!({
            "block": {
                "b1": {"value": {"role": "reader", "value": {"type": "text", "properties": {"title": [["inner"]]}}}}
            }
        });

        let graph = ContentGraph::from_record_map(&record_map).expect("Should parse");
        assert_eq!(graph.blocks()[0].text_runs[0].text(), "inner");
    }

    #[test]
    fn test_from_record_map_skips_entries_without_value() {
        let record_map = json!({
            "block": {
                "broken": {"role": "none"},
                "ok": {"value": {"type": "text"}}
            }
        });

        let graph = ContentGraph::from_record_map(&record_map).expect("Should parse");
        assert_eq!(graph.len(), 1);
        assert!(graph.get("broken").is_none());
    }

    #[test]
    fn test_from_record_map_missing_block_table() {
        let result = ContentGraph::from_record_map(&json!({"collection": {}}));
        assert!(matches!(result, Err(GraphError::MissingBlockTable)));
    }

    #[test]
    fn test_from_json_str_invalid() {
        assert!(matches!(
            ContentGraph::from_json_str("{not json"),
            Err(GraphError::InvalidJson(_))
        ));
    }

    // ==================== Builder Tests ====================

    #[test]
    fn test_push_rejects_duplicate_ids() {
        let mut graph = ContentGraph::new();
        graph
            .push(BlockNode::new("x", BlockType::Text, 0))
            .expect("First push should succeed");

        let result = graph.push(BlockNode::new("x", BlockType::Header, 1));
        assert!(matches!(result, Err(GraphError::DuplicateBlock(id)) if id == "x"));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_from_record_map_fractional_order_hint() {
        let record_map = json!({
            "block": {
                "late": {"value": {"type": "text", "order": 2}},
                "between": {"value": {"type": "text", "order": 1.5}},
                "early": {"value": {"type": "text", "order": 1}}
            }
        });

        let graph = ContentGraph::from_record_map(&record_map).expect("Should parse");
        assert_eq!(graph.get("between").map(|b| b.order), Some(1.5));
    }

    #[test]
    fn test_get_after_many_pushes() {
        let mut graph = ContentGraph::new();
        for i in 0..500 {
            graph
                .push(BlockNode::new(format!("block-{i}"), BlockType::Text, i))
                .expect("Unique ids");
        }

        assert_eq!(graph.len(), 500);
        assert_eq!(graph.get("block-499").map(|b| b.order), Some(499.0));
        assert!(graph.get("block-500").is_none());
        assert!(graph
            .push(BlockNode::new("block-0", BlockType::Text, 0))
            .is_err());
    }
}
