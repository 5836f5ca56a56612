//! Output rendering: deck HTML, hosted pages, manifest and directory layout.

pub mod html;
mod json;
mod writer;

pub use html::{escape_html, section_body, HtmlTemplates};
pub use json::{to_json, JsonFormat};
pub use writer::{DeckWriter, FileWrite, WriteReport, MANIFEST_FILE, PLUGIN_DIR, PLUGIN_FILE};
