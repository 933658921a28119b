//! Rich-text document tree model.
//!
//! # Responsibility
//! - Define the canonical tree representation of entry content.
//! - Round-trip the persisted JSON form without losing unknown data.
//! - Normalize legacy flat-markup content at the storage boundary.
//!
//! # Invariants
//! - Nodes are owned values with owned children; trees are acyclic by
//!   construction and never aliased.
//! - Unknown node kinds and unknown sibling fields survive a
//!   deserialize/serialize round trip unchanged.
//! - `decode_stored` is total: any persisted string yields a `Document`.

use crate::model::legacy::normalize_flat_markup;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Tagged node kind, serialized as the node's `type` string.
///
/// Kinds outside the known set are preserved verbatim in `Other`, so
/// content written by a newer editor never fails to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeKind {
    Doc,
    Paragraph,
    Text,
    Image,
    BulletList,
    OrderedList,
    ListItem,
    /// Catch-all for kinds this build does not know about.
    Other(String),
}

impl NodeKind {
    /// Returns the wire string for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Doc => "doc",
            Self::Paragraph => "paragraph",
            Self::Text => "text",
            Self::Image => "image",
            Self::BulletList => "bulletList",
            Self::OrderedList => "orderedList",
            Self::ListItem => "listItem",
            Self::Other(value) => value.as_str(),
        }
    }

    /// True when the kind carries no tag at all (node arrived without `type`).
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Other(value) if value.is_empty())
    }
}

impl Default for NodeKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for NodeKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "doc" => Self::Doc,
            "paragraph" => Self::Paragraph,
            "text" => Self::Text,
            "image" => Self::Image,
            "bulletList" => Self::BulletList,
            "orderedList" => Self::OrderedList,
            "listItem" => Self::ListItem,
            _ => Self::Other(value),
        }
    }
}

impl From<NodeKind> for String {
    fn from(value: NodeKind) -> Self {
        value.as_str().to_string()
    }
}

/// One node of a document tree.
///
/// All payload fields are optional so partially-shaped content loads
/// without error; fields this model does not know about are kept in
/// `extra` and written back untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Node {
    /// Node kind, serialized as `type`. Absent tags stay absent on write.
    #[serde(rename = "type", default, skip_serializing_if = "NodeKind::is_unset")]
    pub kind: NodeKind,
    /// Text payload; meaningful on `text` nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Attribute map; e.g. `image` nodes carry `src` here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Map<String, Value>>,
    /// Ordered child nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
    /// Unknown sibling fields (editor marks etc.), preserved for round trip.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Node {
    /// Creates a plain text run.
    pub fn text_run(text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::Text,
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Creates a paragraph wrapping the given children.
    pub fn paragraph(children: Vec<Node>) -> Self {
        Self {
            kind: NodeKind::Paragraph,
            content: Some(children),
            ..Self::default()
        }
    }

    /// Creates an image node pointing at `src`.
    pub fn image(src: impl Into<String>) -> Self {
        let mut attrs = Map::new();
        attrs.insert("src".to_string(), Value::String(src.into()));
        Self {
            kind: NodeKind::Image,
            attrs: Some(attrs),
            ..Self::default()
        }
    }

    /// Returns child nodes, or an empty slice when none are present.
    pub fn children(&self) -> &[Node] {
        self.content.as_deref().unwrap_or(&[])
    }

    /// Returns a string attribute by key, when present and a string.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs
            .as_ref()
            .and_then(|attrs| attrs.get(key))
            .and_then(Value::as_str)
    }
}

/// Root of one entry's rich-text content.
///
/// Serialized shape matches the editor output (`{"type":"doc",
/// "content":[...]}`); a root without `type` is equally valid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Node);

impl Document {
    /// Wraps an existing root node.
    pub fn new(root: Node) -> Self {
        Self(root)
    }

    /// Creates a `doc` root over the given block nodes.
    pub fn from_blocks(blocks: Vec<Node>) -> Self {
        Self(Node {
            kind: NodeKind::Doc,
            content: Some(blocks),
            ..Node::default()
        })
    }

    /// The root node of the tree.
    pub fn root(&self) -> &Node {
        &self.0
    }

    /// Top-level block nodes.
    pub fn blocks(&self) -> &[Node] {
        self.0.children()
    }

    /// True when the document carries no blocks and no text.
    pub fn is_empty(&self) -> bool {
        self.0.text.is_none() && self.blocks().is_empty()
    }

    /// Decodes a persisted content string into a document. Total.
    ///
    /// # Contract
    /// - JSON-object input parses as the tree form; a malformed tree
    ///   degrades to the empty document rather than an error.
    /// - Any other non-blank input is treated as the legacy flat-markup
    ///   form and normalized into a tree before extraction ever sees it.
    pub fn decode_stored(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::default();
        }
        if trimmed.starts_with('{') {
            return serde_json::from_str(trimmed).unwrap_or_default();
        }
        normalize_flat_markup(raw)
    }

    /// Encodes the document into its persisted JSON string.
    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
