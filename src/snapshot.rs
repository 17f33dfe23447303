//! Structural duplication of a live subtree.
//!
//! Markup converters only see attributes and text, never the live state of form controls. Before
//! conversion we copy the chosen subtree into a fresh, disconnected [`Document`] and write the
//! live state into it as plain structure: `value` attributes, `checked` and `selected` markers,
//! and textarea text. The live tree is only ever read.

use crate::document::{ControlKind, Document, NodeId};

#[derive(Clone, Debug)]
/// Disconnected deep copy of a subtree with live state flattened into markup.
pub struct StructuralDuplicate {
    doc: Document,
    root: NodeId,
    pairs: Vec<(NodeId, NodeId)>,
}

impl StructuralDuplicate {
    #[must_use]
    /// The duplicate tree. It carries no live state.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    #[must_use]
    /// Copy of the subtree root inside [`Self::document`].
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    /// Pre-order (original, copy) correspondence recorded while duplicating.
    pub fn correspondence(&self) -> &[(NodeId, NodeId)] {
        &self.pairs
    }

    #[must_use]
    /// Takes the duplicate tree and its root apart.
    pub fn into_parts(self) -> (Document, NodeId) {
        (self.doc, self.root)
    }
}

#[must_use]
/// Copies the subtree at `root` and flattens its live state into the copy.
///
/// An unknown `root` yields an empty duplicate, which converts to empty output.
pub fn snapshot(live: &Document, root: NodeId) -> StructuralDuplicate {
    let mut doc = Document::new();
    let pairs = copy_subtree(live, root, &mut doc);
    let copy_root = pairs.first().map_or(Document::ROOT, |&(_, copy)| copy);

    for &(original, copy) in &pairs {
        match live.control_kind(original) {
            Some(ControlKind::Toggle) => flatten_checked(live, original, &mut doc, copy),
            Some(ControlKind::Choice) => flatten_selection(live, original, &mut doc, copy),
            Some(ControlKind::MultiLine) => {
                if let Some(value) = live_value(live, original) {
                    doc.replace_children_with_text(copy, value);
                }
            }
            Some(ControlKind::TextEntry | ControlKind::Hidden | ControlKind::Button) => {
                if live.tag(original) == Some("input") {
                    if let Some(value) = live_value(live, original) {
                        doc.set_attr(copy, "value", value);
                    }
                }
            }
            None => {}
        }
    }

    tracing::debug!(
        nodes = pairs.len(),
        root = %live.describe(root),
        "created structural duplicate"
    );

    StructuralDuplicate {
        doc,
        root: copy_root,
        pairs,
    }
}

/// Copies nodes in pre-order, one copy per original, preserving order.
fn copy_subtree(live: &Document, root: NodeId, doc: &mut Document) -> Vec<(NodeId, NodeId)> {
    let mut pairs = Vec::new();
    let Some(kind) = live.kind(root) else {
        return pairs;
    };
    let copy_root = doc.append(Document::ROOT, kind.clone());
    pairs.push((root, copy_root));

    let mut stack: Vec<(NodeId, NodeId)> = live
        .children(root)
        .iter()
        .rev()
        .map(|&child| (child, copy_root))
        .collect();
    while let Some((original, parent_copy)) = stack.pop() {
        let Some(kind) = live.kind(original) else {
            continue;
        };
        let copy = doc.append(parent_copy, kind.clone());
        pairs.push((original, copy));
        stack.extend(live.children(original).iter().rev().map(|&c| (c, copy)));
    }
    pairs
}

fn live_value(live: &Document, id: NodeId) -> Option<&str> {
    live.live(id)
        .and_then(|s| s.value.as_deref())
        .filter(|v| !v.is_empty())
}

fn flatten_checked(live: &Document, original: NodeId, doc: &mut Document, copy: NodeId) {
    let checked = live.live(original).and_then(|s| s.checked).unwrap_or(false);
    if checked {
        doc.set_attr(copy, "checked", "checked");
    } else {
        doc.remove_attr(copy, "checked");
    }
}

fn flatten_selection(live: &Document, original: NodeId, doc: &mut Document, copy: NodeId) {
    let options = doc.options(copy);
    for &option in &options {
        doc.remove_attr(option, "selected");
    }
    let index = live
        .live(original)
        .and_then(|s| s.selected_index)
        .and_then(|i| usize::try_from(i).ok());
    if let Some(&option) = index.and_then(|i| options.get(i)) {
        doc.set_attr(option, "selected", "selected");
    }
}

#[cfg(test)]
#[path = "tests/snapshot.rs"]
mod tests;
