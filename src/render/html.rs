//! HTML rendering for decks.
//!
//! Templates use `{%NAME%}` placeholders. Substitution is a single pass, so
//! values containing placeholder text are inserted verbatim.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Write;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::assemble::DeckBody;
use crate::error::{Error, Result};
use crate::model::PageFragment;
use crate::pipeline::Deck;

/// Deck page template.
pub const INDEX_TEMPLATE: &str = include_str!("../../templates/index.html");
/// Hosted page template.
pub const PAGE_TEMPLATE: &str = include_str!("../../templates/page.html");
/// Browser plugin applying the embedding and transition rules.
pub const PLUGIN_SCRIPT: &str = include_str!("../../templates/pdf-slides.js");

/// Placeholders the index template must contain.
pub const INDEX_PLACEHOLDERS: &[&str] = &["TITLE", "SECTIONS", "WIDTH", "HEIGHT"];
/// Placeholders the page template must contain.
pub const PAGE_PLACEHOLDERS: &[&str] = &["svg", "css"];

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{%([A-Za-z_]+)%\}").expect("valid placeholder pattern"));

/// Substitute `{%NAME%}` placeholders. Unknown names are left as written.
pub fn fill(template: &str, values: &HashMap<&str, &str>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures<'_>| {
            values
                .get(&caps[1])
                .map(|v| v.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Fail with [`Error::Template`] unless every placeholder in `names` occurs.
pub fn check_placeholders(template: &str, names: &[&str]) -> Result<()> {
    let present: Vec<&str> = PLACEHOLDER
        .captures_iter(template)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    let missing: Vec<&str> = names
        .iter()
        .copied()
        .filter(|n| !present.contains(n))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::Template(format!(
            "missing placeholder(s): {}",
            missing
                .iter()
                .map(|n| format!("{{%{}%}}", n))
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

/// Escape text for HTML content and attribute values.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(text)
}

/// Render the nested `<section>` markup for a deck body.
///
/// Zero-width sections produce no markup.
pub fn section_body(body: &DeckBody) -> String {
    let mut out = String::new();
    for section in body.sections.iter().filter(|s| !s.is_empty()) {
        out.push_str("<section>\n");
        for page in &section.pages {
            let _ = writeln!(
                out,
                "    <section class=\"pdf\" data-file=\"{}\" data-label=\"{}\"></section>",
                escape_html(&page.file),
                escape_html(&page.label)
            );
        }
        out.push_str("</section>\n");
    }
    out
}

/// Index and page templates.
#[derive(Debug, Clone)]
pub struct HtmlTemplates {
    index: String,
    page: String,
}

impl Default for HtmlTemplates {
    fn default() -> Self {
        Self {
            index: INDEX_TEMPLATE.to_string(),
            page: PAGE_TEMPLATE.to_string(),
        }
    }
}

impl HtmlTemplates {
    /// Build from template strings, checking their placeholders.
    pub fn new(index: impl Into<String>, page: impl Into<String>) -> Result<Self> {
        let index = index.into();
        let page = page.into();
        check_placeholders(&index, INDEX_PLACEHOLDERS)?;
        check_placeholders(&page, PAGE_PLACEHOLDERS)?;
        Ok(Self { index, page })
    }

    /// Load `index.html` and `page.html` from a directory.
    ///
    /// Either file may be absent, in which case the built-in one is used.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let read = |name: &str, builtin: &str| -> Result<String> {
            let path = dir.join(name);
            if path.exists() {
                log::debug!("Using template {}", path.display());
                Ok(std::fs::read_to_string(path)?)
            } else {
                Ok(builtin.to_string())
            }
        };
        Self::new(
            read("index.html", INDEX_TEMPLATE)?,
            read("page.html", PAGE_TEMPLATE)?,
        )
    }

    /// Render the deck's `index.html`.
    pub fn render_index(&self, deck: &Deck) -> String {
        let title = escape_html(&deck.title);
        let sections = section_body(&deck.body);
        let width = deck.viewport.pixel_width().to_string();
        let height = deck.viewport.pixel_height().to_string();

        let values = HashMap::from([
            ("TITLE", title.as_ref()),
            ("SECTIONS", sections.as_str()),
            ("WIDTH", width.as_str()),
            ("HEIGHT", height.as_str()),
        ]);
        fill(&self.index, &values)
    }

    /// Render one hosted page.
    pub fn render_page(&self, fragment: &PageFragment) -> String {
        let values = HashMap::from([
            ("svg", fragment.vector_markup.as_str()),
            ("css", fragment.style_fragment.as_str()),
        ]);
        fill(&self.page, &values)
    }
}
