//! Rule-driven conversion of a document tree into Markdown.
//!
//! The [`Engine`] walks a tree bottom-up: every node's children are converted and joined first,
//! then the first [`Rule`] whose filter accepts the node turns that joined content into the
//! node's own output. Rules are plain data (a name and two function pointers) scanned in order,
//! so each one can be tested in isolation and the table can be reordered or extended.

pub mod forms;
pub mod markdown;
pub mod whitespace;

use crate::config::Config;
use crate::document::{Document, NodeId, NodeKind, NodeRef};
use crate::snapshot::StructuralDuplicate;

/// Decides whether a rule applies to a node.
pub type Filter = fn(NodeRef<'_>) -> bool;

/// Produces a node's output from its joined children output.
pub type Replacement = fn(&str, NodeRef<'_>, &Options) -> String;

#[derive(Clone, Copy)]
/// A named (filter, replacement) pair.
pub struct Rule {
    /// Identifier used in logs and tests.
    pub name: &'static str,
    /// Match predicate.
    pub filter: Filter,
    /// Transform applied to (children output, node).
    pub replacement: Replacement,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Output style knobs shared by all rules.
pub struct Options {
    /// Marker for unordered list items.
    pub bullet_marker: String,
    /// Fence used for code blocks and multi-line fields.
    pub code_fence: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            bullet_marker: "-".to_string(),
            code_fence: "```".to_string(),
        }
    }
}

impl From<&Config> for Options {
    fn from(cfg: &Config) -> Self {
        Self {
            bullet_marker: cfg.bullet_marker.clone(),
            code_fence: cfg.code_fence.clone(),
        }
    }
}

/// Elements laid out as blocks; whitespace next to them is insignificant.
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "audio",
    "blockquote",
    "body",
    "canvas",
    "center",
    "dd",
    "details",
    "dialog",
    "dir",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "frameset",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "html",
    "legend",
    "li",
    "main",
    "menu",
    "nav",
    "noframes",
    "noscript",
    "ol",
    "output",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

/// Elements that never have content.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

#[must_use]
/// True for block-level tags.
pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

#[must_use]
/// True for void tags.
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Converts structural duplicates into Markdown with an ordered rule table.
pub struct Engine {
    rules: Vec<Rule>,
    options: Options,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl Engine {
    #[must_use]
    /// Form and link rules first, then the default structural rules.
    pub fn new(options: Options) -> Self {
        let mut rules = forms::rules();
        rules.extend(markdown::rules());
        Self::with_rules(rules, options)
    }

    #[must_use]
    /// Uses exactly the given rule table, in order.
    pub fn with_rules(rules: Vec<Rule>, options: Options) -> Self {
        Self { rules, options }
    }

    #[must_use]
    /// The rule table in priority order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    /// Active output options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    #[must_use]
    /// First rule whose filter accepts the node.
    pub fn rule_for(&self, node: NodeRef<'_>) -> Option<&Rule> {
        self.rules.iter().find(|rule| (rule.filter)(node))
    }

    #[must_use]
    /// Normalizes whitespace in the duplicate, then renders it.
    pub fn convert(&self, duplicate: StructuralDuplicate) -> String {
        let (mut doc, root) = duplicate.into_parts();
        whitespace::collapse(&mut doc, root);
        let markdown = self.render(&doc, root);
        tracing::debug!(chars = markdown.len(), "converted capture to markdown");
        markdown
    }

    #[must_use]
    /// Renders any subtree as-is, without whitespace preparation.
    ///
    /// On a live tree the form rules read live state in preference to attributes.
    pub fn render(&self, doc: &Document, id: NodeId) -> String {
        let raw = self.render_node(doc, id);
        raw.trim_start_matches(['\n', '\r', '\t'])
            .trim_end()
            .to_string()
    }

    fn render_node(&self, doc: &Document, id: NodeId) -> String {
        match doc.kind(id) {
            Some(NodeKind::Text(text)) => text.clone(),
            Some(NodeKind::Comment(_)) | None => String::new(),
            Some(NodeKind::Document) => self.render_children(doc, id),
            Some(NodeKind::Element(_)) => {
                let content = self.render_children(doc, id);
                let node = NodeRef::new(doc, id);
                match self.rule_for(node) {
                    Some(rule) => (rule.replacement)(&content, node, &self.options),
                    None => content,
                }
            }
        }
    }

    fn render_children(&self, doc: &Document, id: NodeId) -> String {
        let mut output = String::new();
        for &child in doc.children(id) {
            join(&mut output, &self.render_node(doc, child));
        }
        output
    }
}

/// Appends `piece`, merging the newlines on either side of the seam.
///
/// Empty pieces leave no trace. Otherwise the seam keeps the larger of the two newline runs,
/// capped at a blank line.
pub fn join(output: &mut String, piece: &str) {
    if piece.is_empty() {
        return;
    }
    let kept = output.trim_end_matches('\n').len();
    let trailing = output.len() - kept;
    let body = piece.trim_start_matches('\n');
    let leading = piece.len() - body.len();
    let separator = trailing.max(leading).min(2);
    output.truncate(kept);
    output.push_str(&"\n".repeat(separator));
    output.push_str(body);
}

#[cfg(test)]
#[path = "tests/convert.rs"]
mod tests;
