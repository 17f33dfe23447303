//! Loading documents and live state overlays from disk.

use crate::document::Document;
use crate::html::{apply_overlay, parse_html, parse_overlay, StateOverlay};
use std::fs;
use std::io;
use std::path::Path;

/// Read and parse an HTML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn load_document(path: &Path) -> io::Result<Document> {
    let source = fs::read_to_string(path)?;
    Ok(parse_html(&source))
}

/// Read a JSON live state overlay.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid overlay.
pub fn load_overlay(path: &Path) -> io::Result<StateOverlay> {
    let json = fs::read_to_string(path)?;
    parse_overlay(&json)
}

/// Load an HTML file and, if given, replay a live state overlay onto it.
///
/// # Errors
///
/// Returns an error if either file cannot be read or the overlay is malformed.
pub fn load_with_state(path: &Path, state: Option<&Path>) -> io::Result<Document> {
    let mut doc = load_document(path)?;
    if let Some(state_path) = state {
        let overlay = load_overlay(state_path)?;
        let applied = apply_overlay(&mut doc, &overlay);
        tracing::debug!(applied, total = overlay.len(), "applied live state overlay");
    }
    Ok(doc)
}

#[cfg(test)]
#[path = "tests/input.rs"]
mod tests;
