//! The terminal front-end state around capture sessions.
//!
//! A TUI needs a single source of truth that can be interrogated and mutated as the user moves
//! between picking a node and reviewing what it converted to. The session itself borrows the
//! document and the highlight, so it lives in the event loop; everything that outlives a
//! session (the last capture, the editor buffer, command input, status) lives here.

use crate::config::Config;
use crate::document::{Document, NodeId};
use crate::export::{default_file_name, Export};
use crate::navigator::Capture;
use edtui::{EditorState, Lines};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// Determines which UI screen renders and how input is interpreted.
pub enum View {
    /// Element tree with the selection pointer and live preview.
    Select,
    /// Editable Markdown of the last capture.
    Preview,
    /// Captures vim-style command input after ':' is pressed in the preview.
    Command,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
/// What the event loop should do after a command.
pub enum CommandOutcome {
    /// Keep running.
    Continue,
    /// Leave the application.
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// One line of the element tree pane.
pub struct TreeRow {
    /// Element shown on this line.
    pub node: NodeId,
    /// Nesting depth below the document element.
    pub depth: usize,
    /// Selector-like label of the element.
    pub label: String,
}

#[must_use]
/// Flattens the element tree into indented rows, in document order.
pub fn element_rows(doc: &Document) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<(NodeId, usize)> = doc
        .element_children(Document::ROOT)
        .map(|n| (n, 0))
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    while let Some((node, depth)) = stack.pop() {
        rows.push(TreeRow {
            node,
            depth,
            label: doc.describe(node),
        });
        let children: Vec<NodeId> = doc.element_children(node).collect();
        stack.extend(children.into_iter().rev().map(|c| (c, depth + 1)));
    }
    rows
}

/// Everything the front-end keeps between capture sessions.
pub struct AppState {
    /// HTML file being captured from.
    pub source: PathBuf,
    /// Document title, used to name exports.
    pub title: Option<String>,
    /// Active UI screen determining input handling.
    pub current_view: View,
    /// Element tree pane contents.
    pub rows: Vec<TreeRow>,
    /// Where the next session starts; the last captured node once there is one.
    pub anchor: Option<NodeId>,
    /// Most recent committed capture.
    pub capture: Option<Capture>,
    /// Editor buffer while the preview is open.
    pub editor_state: Option<EditorState>,
    /// Accumulates vim-style command input after ':' is pressed.
    pub command_buffer: String,
    /// Status feedback displayed in the help bar.
    pub message: Option<String>,
    /// File the current capture was last written to.
    pub written_to: Option<PathBuf>,
    /// Column limit for preview and editor text.
    pub wrap_width: usize,
    /// Whether the selection view shows the live preview pane.
    pub show_preview: bool,
}

impl AppState {
    #[must_use]
    /// Initialises state for a freshly loaded document.
    pub fn new(source: PathBuf, doc: &Document, cfg: &Config) -> Self {
        Self {
            source,
            title: doc.title(),
            current_view: View::Select,
            rows: element_rows(doc),
            anchor: None,
            capture: None,
            editor_state: None,
            command_buffer: String::new(),
            message: None,
            written_to: None,
            wrap_width: cfg.wrap_width,
            show_preview: cfg.show_preview,
        }
    }

    #[must_use]
    /// Node a new session should start on.
    ///
    /// Without an anchor this is the first element in `body`, standing in for "whatever the
    /// pointer is over" in a terminal that has no pointer.
    pub fn start_node(&self, doc: &Document) -> NodeId {
        self.anchor
            .or_else(|| doc.body().and_then(|b| doc.first_element_child(b)))
            .or_else(|| doc.body())
            .or_else(|| doc.document_element())
            .unwrap_or(Document::ROOT)
    }

    #[must_use]
    /// Columns wrapped text may use inside an area `available` columns wide.
    pub fn text_width(&self, available: u16) -> u16 {
        u16::try_from(self.wrap_width).map_or(available, |w| w.min(available))
    }

    #[must_use]
    /// Tree pane row showing `node`.
    pub fn row_index(&self, node: NodeId) -> Option<usize> {
        self.rows.iter().position(|r| r.node == node)
    }

    /// Opens the editable preview on a fresh capture.
    pub fn enter_preview(&mut self, capture: Capture) {
        let lines = Lines::from(capture.markdown.as_str());
        self.editor_state = Some(EditorState::new(lines));
        self.anchor = Some(capture.node);
        self.capture = Some(capture);
        self.written_to = None;
        self.message = None;
        self.current_view = View::Preview;
    }

    /// Returns to node selection, keeping the capture and any edits made to it.
    pub fn exit_preview(&mut self) {
        if let Some(markdown) = self.editor_markdown() {
            if let Some(capture) = self.capture.as_mut() {
                capture.markdown = markdown;
            }
        }
        self.editor_state = None;
        self.command_buffer.clear();
        self.current_view = View::Select;
    }

    #[must_use]
    /// Markdown as it currently stands, including edits made in the preview.
    pub fn editor_markdown(&self) -> Option<String> {
        match &self.editor_state {
            Some(editor_state) => Some(
                editor_state
                    .lines
                    .iter_row()
                    .map(|line| line.iter().collect::<String>())
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            None => self.capture.as_ref().map(|c| c.markdown.clone()),
        }
    }

    #[must_use]
    /// Export record for the current capture.
    pub fn export(&self, doc: &Document) -> Option<Export> {
        let capture = self.capture.as_ref()?;
        Some(Export {
            source: self.source.display().to_string(),
            node: doc.breadcrumb(capture.node),
            markdown: self.editor_markdown().unwrap_or_default(),
        })
    }

    /// Write the current capture, to `path` or to a name derived from the document title.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no capture or the file cannot be written.
    pub fn save(&mut self, doc: &Document, path: Option<&Path>) -> io::Result<PathBuf> {
        let export = self
            .export(doc)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "nothing captured yet"))?;
        let target = path.map_or_else(|| default_file_name(self.title.as_deref()), Path::to_path_buf);
        export.write_to(&target)?;
        self.message = Some(format!("Wrote {}", target.display()));
        self.written_to = Some(target.clone());
        Ok(target)
    }

    /// Runs a `:` command typed in the preview.
    ///
    /// `w [path]` writes, `x [path]` writes and quits, `q` returns to selection, `q!` quits.
    pub fn run_command(&mut self, doc: &Document, cmd: &str) -> CommandOutcome {
        let mut parts = cmd.trim().splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty()).map(Path::new);
        self.current_view = View::Preview;
        match name {
            "w" => {
                if let Err(e) = self.save(doc, arg) {
                    self.message = Some(format!("Error saving: {e}"));
                }
                CommandOutcome::Continue
            }
            "x" => match self.save(doc, arg) {
                Ok(_) => CommandOutcome::Quit,
                Err(e) => {
                    self.message = Some(format!("Error saving: {e}"));
                    CommandOutcome::Continue
                }
            },
            "q" => {
                self.exit_preview();
                CommandOutcome::Continue
            }
            "q!" => CommandOutcome::Quit,
            _ => {
                self.message = Some(format!("Unknown command: {cmd}"));
                CommandOutcome::Continue
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/app_state.rs"]
mod tests;
