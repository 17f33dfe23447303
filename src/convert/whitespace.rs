//! Whitespace normalization applied to a duplicate before rendering.
//!
//! Markup whitespace is mostly insignificant: runs collapse to one space, and spaces touching a
//! block boundary disappear. Preformatted content (`pre`, `textarea`) is left untouched.

use super::{is_block, is_void};
use crate::document::{Document, NodeId, NodeKind};

const PREFORMATTED: &[&str] = &["pre", "textarea"];

/// Collapses insignificant whitespace in text nodes beneath `root`.
pub fn collapse(doc: &mut Document, root: NodeId) {
    let mut state = Collapser {
        prev_text: None,
        keep_leading: false,
    };
    state.visit(doc, root);
    state.trim_prev(doc);
}

struct Collapser {
    prev_text: Option<NodeId>,
    keep_leading: bool,
}

impl Collapser {
    fn visit(&mut self, doc: &mut Document, id: NodeId) {
        match doc.kind(id) {
            Some(NodeKind::Text(text)) => {
                let mut collapsed = collapse_runs(text);
                let prev_ends_in_space = self
                    .prev_text
                    .and_then(|p| doc.text(p))
                    .is_none_or(|t| t.ends_with(' '));
                if prev_ends_in_space && !self.keep_leading && collapsed.starts_with(' ') {
                    collapsed.remove(0);
                }
                let empty = collapsed.is_empty();
                doc.set_text(id, collapsed);
                if !empty {
                    self.prev_text = Some(id);
                    self.keep_leading = false;
                }
            }
            Some(NodeKind::Element(el)) => {
                let tag = el.tag.clone();
                let boundary = is_block(&tag) || tag == "br";
                if boundary {
                    self.trim_prev(doc);
                    self.prev_text = None;
                    self.keep_leading = false;
                } else if is_void(&tag) || PREFORMATTED.contains(&tag.as_str()) {
                    self.prev_text = None;
                    self.keep_leading = true;
                }
                if PREFORMATTED.contains(&tag.as_str()) {
                    return;
                }
                let children = doc.children(id).to_vec();
                for child in children {
                    self.visit(doc, child);
                }
                if boundary {
                    self.trim_prev(doc);
                    self.prev_text = None;
                    self.keep_leading = false;
                }
            }
            Some(NodeKind::Document) => {
                let children = doc.children(id).to_vec();
                for child in children {
                    self.visit(doc, child);
                }
            }
            Some(NodeKind::Comment(_)) | None => {}
        }
    }

    fn trim_prev(&self, doc: &mut Document) {
        if let Some(prev) = self.prev_text {
            if let Some(text) = doc.text(prev) {
                if text.ends_with(' ') {
                    let trimmed = text[..text.len() - 1].to_string();
                    doc.set_text(prev, trimmed);
                }
            }
        }
    }
}

/// Replaces every run of ASCII whitespace with a single space.
fn collapse_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}
