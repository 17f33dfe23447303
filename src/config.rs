//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! Specifically, we try to find a pickdown.toml, and if present we load settings from there.
//! This provides Markdown style, preview and wrapping preferences.

use facet::Facet;
use std::fs;
use std::path::Path;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "pickdown.toml";

#[derive(Facet, Clone, Debug)]
/// User preferences loaded from pickdown.toml or falling back to defaults.
pub struct Config {
    #[facet(default = "-".to_string())]
    /// Marker written before unordered list items.
    pub bullet_marker: String,
    #[facet(default = "```".to_string())]
    /// Fence written around code blocks and multi-line fields.
    pub code_fence: String,
    #[facet(default = true)]
    /// Whether the selection view shows a live Markdown preview pane.
    pub show_preview: bool,
    #[facet(default = 100)]
    /// Column at which the preview and the editor wrap Markdown text.
    pub wrap_width: usize,
}

impl Config {
    #[must_use]
    /// Load configuration from pickdown.toml if present.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    #[must_use]
    /// Load configuration from a specific file, falling back to defaults when it is missing
    /// or unreadable.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        if let Ok(contents) = fs::read_to_string(path) {
            if let Ok(config) = facet_toml::from_str::<Self>(&contents) {
                return config;
            }
            tracing::warn!(path = %path.display(), "ignoring unparseable config");
        }
        facet_toml::from_str::<Self>("").unwrap()
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
