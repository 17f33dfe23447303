//! HTML parsing into the document arena, plus page-load live state.
//!
//! Parsing goes through `html5ever` into a `markup5ever_rcdom` tree, which is then lowered into
//! [`Document`]. A freshly parsed page has no user interaction yet, so live state is seeded from
//! markup exactly as a browser would on load. A JSON overlay can then replay what the user typed.

use crate::document::{ControlKind, Document, NodeId, NodeKind};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
/// Live values to apply to one element, keyed in the overlay by element id.
pub struct LiveOverride {
    #[serde(default)]
    /// Replacement for the control's current text.
    pub value: Option<String>,
    #[serde(default)]
    /// Replacement for a checkbox or radio checked flag.
    pub checked: Option<bool>,
    #[serde(default)]
    /// Replacement for a select's current option index.
    pub selected_index: Option<i64>,
}

/// Element id to live values, as read from a state file.
pub type StateOverlay = BTreeMap<String, LiveOverride>;

#[must_use]
/// Parses HTML and seeds live state from markup.
pub fn parse_html(source: &str) -> Document {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(source);
    let mut doc = Document::new();
    for child in dom.document.children.borrow().iter() {
        lower(&mut doc, Document::ROOT, child);
    }
    seed_live_state(&mut doc);
    tracing::debug!(nodes = doc.len(), "parsed html document");
    doc
}

fn lower(doc: &mut Document, parent: NodeId, handle: &Handle) {
    let id = match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let attrs: Vec<(String, String)> = attrs
                .borrow()
                .iter()
                .map(|a| (a.name.local.to_string(), a.value.to_string()))
                .collect();
            let borrowed: Vec<(&str, &str)> = attrs
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            doc.append_element(parent, &name.local, &borrowed)
        }
        NodeData::Text { contents } => {
            doc.append(parent, NodeKind::Text(contents.borrow().to_string()));
            return;
        }
        NodeData::Comment { contents } => {
            doc.append(parent, NodeKind::Comment(contents.to_string()));
            return;
        }
        _ => return,
    };
    for child in handle.children.borrow().iter() {
        lower(doc, id, child);
    }
}

/// Gives every form control the state a browser assigns at page load.
fn seed_live_state(doc: &mut Document) {
    for id in doc.descendants(Document::ROOT) {
        let Some(kind) = doc.control_kind(id) else {
            continue;
        };
        match kind {
            ControlKind::Toggle => {
                let checked = doc.has_attr(id, "checked");
                if let Some(live) = doc.live_mut(id) {
                    live.checked = Some(checked);
                }
            }
            ControlKind::TextEntry | ControlKind::Hidden | ControlKind::Button => {
                if doc.tag(id) != Some("input") {
                    continue;
                }
                let value = doc.attr(id, "value").unwrap_or_default().to_string();
                if let Some(live) = doc.live_mut(id) {
                    live.value = Some(value);
                }
            }
            ControlKind::MultiLine => {
                let value = doc.text_content(id);
                if let Some(live) = doc.live_mut(id) {
                    live.value = Some(value);
                }
            }
            ControlKind::Choice => {
                let options = doc.options(id);
                let index = options
                    .iter()
                    .rposition(|&o| doc.has_attr(o, "selected"))
                    .or(if options.is_empty() { None } else { Some(0) })
                    .and_then(|i| i64::try_from(i).ok())
                    .unwrap_or(-1);
                if let Some(live) = doc.live_mut(id) {
                    live.selected_index = Some(index);
                }
            }
        }
    }
}

/// Parses a JSON state overlay.
///
/// # Errors
///
/// Returns `InvalidData` if the JSON does not describe an id-keyed object of overrides.
pub fn parse_overlay(json: &str) -> io::Result<StateOverlay> {
    serde_json::from_str(json).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Writes overlay values into the live state of matching elements.
///
/// Returns how many overlay entries found their element; the rest are logged and skipped.
pub fn apply_overlay(doc: &mut Document, overlay: &StateOverlay) -> usize {
    let mut applied = 0;
    for (element_id, values) in overlay {
        let Some(node) = doc.find_by_id(element_id) else {
            tracing::warn!(id = %element_id, "no element for live state override");
            continue;
        };
        if let Some(live) = doc.live_mut(node) {
            if let Some(value) = &values.value {
                live.value = Some(value.clone());
            }
            if let Some(checked) = values.checked {
                live.checked = Some(checked);
            }
            if let Some(index) = values.selected_index {
                live.selected_index = Some(index);
            }
            applied += 1;
        }
    }
    applied
}

#[cfg(test)]
#[path = "tests/html.rs"]
mod tests;
