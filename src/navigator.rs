//! The capture session: a single selection pointer moved around the tree by directional
//! commands.
//!
//! Every transition is a total function of (tree, current node). Moves that would leave the
//! tree, land on the `html`/`body` roots, or run out of siblings resolve to a well-defined node
//! instead of failing:
//!
//! ```text
//!          Parent                     FirstChild
//!   current ─────▶ parent element     current ─────▶ first element child
//!     (none: stay; html/body: first element child instead)
//!
//!   PreviousSibling / NextSibling
//!   current ─────▶ adjacent element sibling
//!     (none: walk up; the first ancestor with a sibling hands over that sibling's
//!      last/first element child; walk exhausted: stay)
//! ```
//!
//! [`Selector`] owns the highlight collaborator and lends it to one [`CaptureSession`] at a
//! time. Ending a session consumes it, and dropping it always clears the highlight.

use crate::convert::Engine;
use crate::document::{Document, NodeId};
use crate::snapshot::snapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// A pointer move.
pub enum Navigation {
    /// Up to the parent element (also the wheel-up zoom).
    Parent,
    /// Down to the first element child (also the wheel-down zoom).
    FirstChild,
    /// To the previous element, crossing levels when the sibling list runs out.
    PreviousSibling,
    /// To the next element, crossing levels when the sibling list runs out.
    NextSibling,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Anything a user can ask of an active session.
pub enum Command {
    /// Move the pointer.
    Navigate(Navigation),
    /// End the session without output.
    Cancel,
    /// End the session and convert the current node.
    Commit,
}

impl Command {
    #[must_use]
    /// Maps a key name (`ArrowUp`, `Escape`, `k`, ...) onto a command.
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "ArrowUp" | "Up" | "k" => Self::Navigate(Navigation::Parent),
            "ArrowDown" | "Down" | "j" => Self::Navigate(Navigation::FirstChild),
            "ArrowLeft" | "Left" | "h" => Self::Navigate(Navigation::PreviousSibling),
            "ArrowRight" | "Right" | "l" => Self::Navigate(Navigation::NextSibling),
            "Escape" | "Esc" => Self::Cancel,
            "Enter" => Self::Commit,
            _ => return None,
        })
    }

    #[must_use]
    /// Maps a vertical wheel delta onto a zoom: away from the user selects the parent.
    pub fn from_wheel(delta_y: f64) -> Option<Self> {
        if delta_y < 0.0 {
            Some(Self::Navigate(Navigation::Parent))
        } else if delta_y > 0.0 {
            Some(Self::Navigate(Navigation::FirstChild))
        } else {
            None
        }
    }
}

/// Receives the node to mark after every transition.
pub trait Highlighter {
    /// Marks `node` as the current candidate, replacing any previous mark.
    fn highlight(&mut self, doc: &Document, node: NodeId);
    /// Removes any mark.
    fn clear(&mut self);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Highlighter that remembers the marked node, for front-ends that render from state.
pub struct MarkedNode {
    /// Currently marked node.
    pub node: Option<NodeId>,
}

impl Highlighter for MarkedNode {
    fn highlight(&mut self, _doc: &Document, node: NodeId) {
        self.node = Some(node);
    }

    fn clear(&mut self) {
        self.node = None;
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Result of a committed session.
pub struct Capture {
    /// Node that was current at commit.
    pub node: NodeId,
    /// Markdown produced from its structural duplicate.
    pub markdown: String,
}

#[must_use]
/// Applies one move. Total: unknown or degenerate positions return `current`.
pub fn navigate(doc: &Document, current: NodeId, nav: Navigation) -> NodeId {
    let next = match nav {
        Navigation::Parent => select_parent(doc, current),
        Navigation::FirstChild => select_first_child(doc, current),
        Navigation::PreviousSibling => select_previous_sibling(doc, current),
        Navigation::NextSibling => select_next_sibling(doc, current),
    };
    tracing::debug!(
        ?nav,
        from = %doc.describe(current),
        to = %doc.describe(next),
        "navigation transition"
    );
    next
}

#[must_use]
/// Moves to the parent element, skipping over the `html`/`body` roots.
pub fn select_parent(doc: &Document, current: NodeId) -> NodeId {
    doc.parent_element(current)
        .map_or(current, |parent| land(doc, parent, current))
}

#[must_use]
/// Moves to the first element child.
pub fn select_first_child(doc: &Document, current: NodeId) -> NodeId {
    doc.first_element_child(current).unwrap_or(current)
}

#[must_use]
/// Moves to the previous element sibling, or the last child of the nearest ancestor's
/// previous sibling.
pub fn select_previous_sibling(doc: &Document, current: NodeId) -> NodeId {
    if let Some(prev) = doc.previous_element_sibling(current) {
        return land(doc, prev, current);
    }
    match walk_up(doc, current, Direction::Backward) {
        Walk::Found(target) => land(doc, target, current),
        Walk::Exhausted => current,
    }
}

#[must_use]
/// Moves to the next element sibling, or the first child of the nearest ancestor's next
/// sibling.
pub fn select_next_sibling(doc: &Document, current: NodeId) -> NodeId {
    if let Some(next) = doc.next_element_sibling(current) {
        return land(doc, next, current);
    }
    match walk_up(doc, current, Direction::Forward) {
        Walk::Found(target) => land(doc, target, current),
        Walk::Exhausted => current,
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Backward,
    Forward,
}

/// Outcome of the upward search, kept distinct from "no parent".
enum Walk {
    Found(NodeId),
    Exhausted,
}

fn walk_up(doc: &Document, start: NodeId, direction: Direction) -> Walk {
    let mut cursor = start;
    while let Some(parent) = doc.parent_element(cursor) {
        let sibling = match direction {
            Direction::Backward => doc.previous_element_sibling(parent),
            Direction::Forward => doc.next_element_sibling(parent),
        };
        if let Some(sibling) = sibling {
            let edge = match direction {
                Direction::Backward => doc.last_element_child(sibling),
                Direction::Forward => doc.first_element_child(sibling),
            };
            return Walk::Found(edge.unwrap_or(sibling));
        }
        cursor = parent;
    }
    Walk::Exhausted
}

/// Roots are never a stopping point: `html` and `body` hand over to their first element child.
/// If a root has no element child the move is abandoned and `fallback` is kept.
fn land(doc: &Document, target: NodeId, fallback: NodeId) -> NodeId {
    let mut node = target;
    while is_root_marker(doc, node) {
        match doc.first_element_child(node) {
            Some(child) => node = child,
            None => return fallback,
        }
    }
    node
}

fn is_root_marker(doc: &Document, node: NodeId) -> bool {
    matches!(doc.tag(node), Some("html" | "body"))
}

/// Hands out capture sessions one at a time.
///
/// [`Selector::begin`] borrows the selector mutably for as long as the session lives, so a second
/// session cannot start before the first has been committed, cancelled or dropped.
pub struct Selector<H: Highlighter> {
    highlighter: H,
}

impl<H: Highlighter> Selector<H> {
    #[must_use]
    /// Wraps the highlight collaborator.
    pub fn new(highlighter: H) -> Self {
        Self { highlighter }
    }

    #[must_use]
    /// The highlight collaborator, for inspection between sessions.
    pub fn highlighter(&self) -> &H {
        &self.highlighter
    }

    /// Opens a session on the node under the pointer.
    ///
    /// Non-element targets (text, the document node) start at their nearest element ancestor,
    /// falling back to the document element.
    pub fn begin<'a>(&'a mut self, doc: &'a Document, target: NodeId) -> CaptureSession<'a, H> {
        let current = start_node(doc, target);
        tracing::debug!(start = %doc.breadcrumb(current), "capture session started");
        self.highlighter.clear();
        self.highlighter.highlight(doc, current);
        CaptureSession {
            doc,
            current,
            highlighter: &mut self.highlighter,
        }
    }
}

fn start_node(doc: &Document, target: NodeId) -> NodeId {
    let mut cursor = Some(target);
    while let Some(node) = cursor {
        if doc.is_element(node) {
            return node;
        }
        cursor = doc.parent(node);
    }
    doc.document_element().unwrap_or(target)
}

/// An active capture session holding the single selection pointer.
pub struct CaptureSession<'a, H: Highlighter> {
    doc: &'a Document,
    current: NodeId,
    highlighter: &'a mut H,
}

impl<H: Highlighter> CaptureSession<'_, H> {
    #[must_use]
    /// Node the pointer is on.
    pub fn current(&self) -> NodeId {
        self.current
    }

    #[must_use]
    /// Tree being navigated.
    pub fn document(&self) -> &Document {
        self.doc
    }

    #[must_use]
    /// The highlight collaborator as the session left it.
    pub fn highlighter(&self) -> &H {
        &*self.highlighter
    }

    /// Moves the pointer and re-emits the highlight. Returns the new current node.
    pub fn navigate(&mut self, nav: Navigation) -> NodeId {
        self.current = navigate(self.doc, self.current, nav);
        self.highlighter.clear();
        self.highlighter.highlight(self.doc, self.current);
        self.current
    }

    #[must_use]
    /// Markdown the current node would produce if committed now.
    pub fn preview(&self, engine: &Engine) -> String {
        engine.convert(snapshot(self.doc, self.current))
    }

    #[must_use]
    /// Ends the session, converting the current node.
    pub fn commit(self, engine: &Engine) -> Capture {
        let markdown = self.preview(engine);
        tracing::debug!(
            node = %self.doc.breadcrumb(self.current),
            chars = markdown.len(),
            "capture committed"
        );
        Capture {
            node: self.current,
            markdown,
        }
    }

    /// Ends the session without output.
    pub fn cancel(self) {
        tracing::debug!("capture cancelled");
    }
}

impl<H: Highlighter> Drop for CaptureSession<'_, H> {
    fn drop(&mut self) {
        self.highlighter.clear();
    }
}

#[cfg(test)]
#[path = "tests/navigator.rs"]
mod tests;
