//! The export record turns a committed capture into something on disk or on stdout.
//!
//! The record is serialisable so a batch run can hand the capture to other tooling as JSON,
//! and it knows how to write its Markdown to a file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
/// A committed capture together with where it came from.
pub struct Export {
    /// HTML file the capture was taken from.
    pub source: String,
    /// Ancestor chain of the captured node, e.g. `html > body > form#signup`.
    pub node: String,
    /// Converted Markdown.
    pub markdown: String,
}

impl Export {
    /// Write the Markdown to `path`, ending with exactly one newline.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        let body = format!("{}\n", self.markdown.trim_end());
        fs::write(path, body)?;
        tracing::debug!(path = %path.display(), "wrote markdown export");
        Ok(())
    }

    /// Serialise the record as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json(&self) -> io::Result<String> {
        serde_json::to_string_pretty(self).map_err(io::Error::other)
    }
}

/// Characters that file systems or note-taking apps refuse in file names.
const HOSTILE_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

#[must_use]
/// File name for an export, derived from the document title.
///
/// Spaces and hostile characters become `_`; a missing or blank title falls back to `capture`.
pub fn default_file_name(title: Option<&str>) -> PathBuf {
    let stem: String = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("capture")
        .chars()
        .map(|c| {
            if c.is_whitespace() || HOSTILE_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();
    PathBuf::from(format!("{stem}.md"))
}

#[cfg(test)]
#[path = "tests/export.rs"]
mod tests;
