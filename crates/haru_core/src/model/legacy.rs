//! Legacy flat-markup normalization.
//!
//! # Responsibility
//! - Convert the pre-tree content representation (an HTML/markdown-ish
//!   string) into the document tree at the storage boundary.
//!
//! # Invariants
//! - Normalization is total: any input string yields a `Document`.
//! - Image references (`<img src=...>` and `![..](..)`) become `image`
//!   nodes in their original order relative to surrounding text.
//! - Extraction code never sees markup; it only walks the produced tree.

use crate::model::document::{Document, Node};
use once_cell::sync::Lazy;
use regex::Regex;

static IMAGE_MARKUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<img[^>]*\bsrc\s*=\s*["']([^"']+)["'][^>]*>|!\[[^\]]*]\(([^)]+)\)"#)
        .expect("valid image markup regex")
});
static BLOCK_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</p>|</div>|</li>|<br\s*/?>|\r?\n").expect("valid block break regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid tag regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Converts one legacy flat-markup string into a document tree.
///
/// Block breaks (`</p>`, `<br>`, newlines) delimit paragraphs; inside a
/// paragraph, text runs and image nodes keep their source order. Markup
/// that is neither an image nor a link is stripped down to its text.
pub fn normalize_flat_markup(raw: &str) -> Document {
    let mut blocks = Vec::new();

    for segment in BLOCK_BREAK_RE.split(raw) {
        let mut children = Vec::new();
        let mut cursor = 0;

        for caps in IMAGE_MARKUP_RE.captures_iter(segment) {
            let Some(whole) = caps.get(0) else { continue };
            push_text_run(&segment[cursor..whole.start()], &mut children);
            let src = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|group| group.as_str().trim());
            if let Some(src) = src {
                if !src.is_empty() {
                    children.push(Node::image(src));
                }
            }
            cursor = whole.end();
        }
        push_text_run(&segment[cursor..], &mut children);

        if !children.is_empty() {
            blocks.push(Node::paragraph(children));
        }
    }

    if blocks.is_empty() {
        Document::default()
    } else {
        Document::from_blocks(blocks)
    }
}

fn push_text_run(fragment: &str, children: &mut Vec<Node>) {
    let without_links = MARKDOWN_LINK_RE.replace_all(fragment, "$1");
    let without_tags = TAG_RE.replace_all(&without_links, " ");
    let decoded = decode_entities(&without_tags);
    let collapsed = WHITESPACE_RE.replace_all(&decoded, " ");
    let text = collapsed.trim();
    if !text.is_empty() {
        children.push(Node::text_run(text));
    }
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
