//! pickdown: pick a node in an HTML document tree and capture it as Markdown.
//!
//! The pipeline is load ([`html`], [`input`]) → navigate ([`navigator`]) → snapshot
//! ([`snapshot`]) → convert ([`convert`]) → export ([`export`]). The terminal front-end lives in
//! [`app_state`] and [`ui`].

pub mod app_state;
pub mod config;
pub mod convert;
pub mod document;
pub mod export;
pub mod html;
pub mod input;
pub mod navigator;
pub mod snapshot;
pub mod ui;
