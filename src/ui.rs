//! The UI renders the application state into something visible and vim-able.
//!
//! The selection view shows the element tree with the highlighted node beside a live Markdown
//! preview. The preview view opens the committed Markdown in a vim-like editor.

use crate::app_state::{AppState, View};
use crate::document::Document;
use crate::navigator::MarkedNode;
use edtui::{EditorTheme, EditorView, SyntaxHighlighter};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Keys available while a capture session is active.
pub const GUIDE: &str =
    "↑/k: Parent | ↓/j: First child | ←/h: Previous | →/l: Next | Wheel: Zoom | Enter: Capture | Esc/q: Quit";

const PREVIEW_HELP: &str = ":w [path] Save | :x Save & Quit | :q Back to selection | :q! Quit";

/// Renders the selection view: tree, live preview and guide.
pub fn draw_select(
    f: &mut Frame,
    app: &AppState,
    doc: &Document,
    highlight: &MarkedNode,
    preview: Option<&str>,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Breadcrumb
            Constraint::Min(0),    // Tree and preview
            Constraint::Length(3), // Guide
        ])
        .split(f.area());

    let breadcrumb = highlight
        .node
        .map(|n| doc.breadcrumb(n))
        .unwrap_or_default();
    let breadcrumb_widget = Paragraph::new(breadcrumb)
        .block(Block::default().borders(Borders::ALL).title("Selection"));
    f.render_widget(breadcrumb_widget, rows[0]);

    let panes = if preview.is_some() {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[1])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(rows[1])
    };

    let items: Vec<ListItem> = app
        .rows
        .iter()
        .map(|row| {
            let style = if Some(row.node) == highlight.node {
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::REVERSED | Modifier::BOLD)
            } else if doc.control_kind(row.node).is_some() {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            };
            let line = Line::from(vec![
                Span::raw("  ".repeat(row.depth)),
                Span::raw(row.label.clone()),
            ]);
            ListItem::new(line).style(style)
        })
        .collect();

    let title = app
        .title
        .clone()
        .unwrap_or_else(|| app.source.display().to_string());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(title));
    let mut list_state =
        ListState::default().with_selected(highlight.node.and_then(|n| app.row_index(n)));
    f.render_stateful_widget(list, panes[0], &mut list_state);

    if let Some(markdown) = preview {
        let block = Block::default().borders(Borders::ALL).title("Markdown");
        let inner = block.inner(panes[1]);
        f.render_widget(block, panes[1]);
        let preview_widget = Paragraph::new(markdown.to_string()).wrap(Wrap { trim: false });
        f.render_widget(preview_widget, wrap_area(app, inner));
    }

    let help = app.message.clone().unwrap_or_else(|| GUIDE.to_string());
    let help_widget = Paragraph::new(help).block(Block::default().borders(Borders::ALL));
    f.render_widget(help_widget, rows[2]);
}

/// Renders the editable preview of the last capture.
pub fn draw_preview(f: &mut Frame, app: &mut AppState, doc: &Document) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Breadcrumb
            Constraint::Min(0),    // Editor
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let breadcrumb = app
        .capture
        .as_ref()
        .map(|c| doc.breadcrumb(c.node))
        .unwrap_or_default();
    let breadcrumb_widget = Paragraph::new(breadcrumb)
        .block(Block::default().borders(Borders::ALL).title("Captured"));
    f.render_widget(breadcrumb_widget, chunks[0]);

    let title = format!("Markdown (wrap at {} chars)", app.wrap_width);
    let block = Block::default().borders(Borders::ALL).title(title);
    let text_area = wrap_area(app, block.inner(chunks[1]));
    f.render_widget(block, chunks[1]);

    if let Some(ref mut editor_state) = app.editor_state {
        let syntax_highlighter = SyntaxHighlighter::new("dracula", "md");
        let editor = EditorView::new(editor_state)
            .theme(EditorTheme::default())
            .syntax_highlighter(Some(syntax_highlighter))
            .wrap(true);

        f.render_widget(editor, text_area);
    }

    let help_text = if app.current_view == View::Command {
        format!(":{}", app.command_buffer)
    } else if let Some(ref msg) = app.message {
        msg.clone()
    } else {
        PREVIEW_HELP.to_string()
    };

    let help = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

/// Narrows `area` to the configured wrap width, keeping it left-aligned.
fn wrap_area(app: &AppState, area: Rect) -> Rect {
    Rect {
        width: app.text_width(area.width),
        ..area
    }
}
