//! Rules for form controls and links.
//!
//! Every reader here merges two paths with a fixed precedence: live state when the node has
//! it, markup attributes otherwise. A structural duplicate has no live state, so on a duplicate
//! the attributes written by the snapshotter are what get read.

use super::{Options, Rule};
use crate::document::{ControlKind, NodeRef};

#[must_use]
/// Form and link rules, highest priority first.
pub fn rules() -> Vec<Rule> {
    vec![
        Rule {
            name: "form-checkbox-radio",
            filter: |node| node.control_kind() == Some(ControlKind::Toggle),
            replacement: checkbox,
        },
        Rule {
            name: "form-text-input",
            filter: |node| node.control_kind() == Some(ControlKind::TextEntry),
            replacement: text_input,
        },
        Rule {
            name: "form-select",
            filter: |node| node.control_kind() == Some(ControlKind::Choice),
            replacement: select,
        },
        Rule {
            name: "form-textarea",
            filter: |node| node.control_kind() == Some(ControlKind::MultiLine),
            replacement: textarea,
        },
        Rule {
            name: "form-button-remove",
            filter: |node| node.control_kind() == Some(ControlKind::Button),
            replacement: |_, _, _| String::new(),
        },
        Rule {
            name: "link",
            filter: |node| node.is(&["a"]),
            replacement: link,
        },
    ]
}

#[must_use]
/// Whether a checkbox or radio is checked, live flag first.
pub fn is_checked(node: NodeRef<'_>) -> bool {
    node.live()
        .and_then(|s| s.checked)
        .unwrap_or_else(|| node.has_attr("checked"))
}

#[must_use]
/// Current text of a field, live value first, trimmed.
pub fn field_value(node: NodeRef<'_>) -> String {
    node.live()
        .and_then(|s| s.value.as_deref())
        .or_else(|| node.attr("value"))
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[must_use]
/// Visible label of the option a choice control currently shows, if any.
///
/// A live index decides on its own, even when it points nowhere. Without one, the first option
/// carrying a `selected` marker is used.
pub fn selected_label(node: NodeRef<'_>) -> Option<String> {
    let options = node.doc.options(node.id);
    let chosen = match node.live().and_then(|s| s.selected_index) {
        Some(index) => usize::try_from(index)
            .ok()
            .and_then(|i| options.get(i).copied()),
        None => options
            .iter()
            .copied()
            .find(|&o| node.doc.has_attr(o, "selected")),
    }?;
    let option = NodeRef::new(node.doc, chosen);
    let text = collapse_whitespace(&option.text_content());
    [
        Some(text),
        option.attr("label").map(str::to_string),
        option.attr("value").map(str::to_string),
    ]
    .into_iter()
    .flatten()
    .map(|s| s.trim().to_string())
    .find(|s| !s.is_empty())
}

fn checkbox(_content: &str, node: NodeRef<'_>, _options: &Options) -> String {
    if is_checked(node) {
        "[x]".to_string()
    } else {
        "[ ]".to_string()
    }
}

fn text_input(_content: &str, node: NodeRef<'_>, _options: &Options) -> String {
    field_value(node)
}

fn select(_content: &str, node: NodeRef<'_>, _options: &Options) -> String {
    selected_label(node).unwrap_or_default()
}

fn textarea(_content: &str, node: NodeRef<'_>, options: &Options) -> String {
    let value = node
        .live()
        .and_then(|s| s.value.clone())
        .unwrap_or_else(|| node.text_content());
    let value = value.trim();
    if value.is_empty() {
        String::new()
    } else if value.contains('\n') {
        let fence = &options.code_fence;
        format!("\n{fence}\n{value}\n{fence}\n")
    } else {
        value.to_string()
    }
}

fn link(content: &str, node: NodeRef<'_>, _options: &Options) -> String {
    let text = collapse_whitespace(content);
    let Some(href) = node.attr("href").filter(|h| !h.is_empty()) else {
        return text;
    };
    let title = node
        .attr("title")
        .filter(|t| !t.is_empty())
        .map(|t| format!(" \"{}\"", t.replace('"', "\\\"")))
        .unwrap_or_default();
    format!("[{text}]({href}{title})")
}

/// Collapses every whitespace run to one space and trims the ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "../tests/forms.rs"]
mod tests;
