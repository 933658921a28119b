//! Derived-view extraction over document trees.
//!
//! # Responsibility
//! - Find the first embedded image of an entry for its list-view card.
//! - Produce a bounded plain-text preview of an entry's content.
//!
//! # Invariants
//! - Both operations are pure and total: malformed trees degrade to
//!   "no image" / empty preview, never an error.
//! - Traversal is depth-first pre-order; document order decides every tie.

use crate::model::document::{Document, Node, NodeKind};

/// Default preview length in characters.
pub const DEFAULT_PREVIEW_CHARS: usize = 100;

const PREVIEW_ELLIPSIS: &str = "...";

/// Returns the `src` of the first image node in document order.
///
/// Image nodes without a usable `src` contribute nothing and the walk
/// continues past them.
pub fn find_first_image(doc: &Document) -> Option<String> {
    first_image_in(doc.root())
}

fn first_image_in(node: &Node) -> Option<String> {
    if node.kind == NodeKind::Image {
        if let Some(src) = node.attr_str("src") {
            if !src.is_empty() {
                return Some(src.to_string());
            }
        }
    }
    node.children().iter().find_map(first_image_in)
}

/// Concatenates every text run in document order and bounds the result.
///
/// Adjacent runs concatenate directly; block boundaries insert nothing.
/// When the full text exceeds `max_chars` characters it is cut to exactly
/// `max_chars` and `"..."` is appended, so the result never exceeds
/// `max_chars + 3`.
pub fn extract_preview(doc: &Document, max_chars: usize) -> String {
    let mut full = String::new();
    collect_text(doc.root(), &mut full);

    if full.chars().count() <= max_chars {
        return full;
    }
    let mut clipped: String = full.chars().take(max_chars).collect();
    clipped.push_str(PREVIEW_ELLIPSIS);
    clipped
}

fn collect_text(node: &Node, out: &mut String) {
    if node.kind == NodeKind::Text {
        if let Some(text) = node.text.as_deref() {
            out.push_str(text);
        }
    }
    for child in node.children() {
        collect_text(child, out);
    }
}
