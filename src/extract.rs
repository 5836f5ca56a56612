//! Page → (vector markup, style fragment).
//!
//! The renderer's output is normalized in three steps: tag-level namespace
//! prefixes are stripped, character entities are decoded, and the first
//! top-level `<defs>` block is cut out of the markup. Its inner content
//! (the `@font-face` rules) becomes the page's style fragment.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use regex::Regex;

use crate::backend::DocumentSource;
use crate::error::Result;
use crate::model::{Page, PageFragment};
use crate::svg::{PageScope, RenderContext, SvgRenderer, VectorRenderer};

/// `<svg:rect` → `<rect`, `</svg:g` → `</g`. Attributes are left alone.
static TAG_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(/?)[A-Za-z_][A-Za-z0-9_.\-]*:([A-Za-z_])").expect("valid tag prefix pattern")
});

static ENTITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:#[0-9]{1,7}|#[xX][0-9A-Fa-f]{1,6}|[A-Za-z][A-Za-z0-9]{0,31});")
        .expect("valid entity pattern")
});

/// Converts pages to [`PageFragment`]s through a [`VectorRenderer`].
#[derive(Debug, Clone)]
pub struct VectorFragmentExtractor<R = SvgRenderer> {
    renderer: R,
}

impl Default for VectorFragmentExtractor<SvgRenderer> {
    fn default() -> Self {
        Self::new(SvgRenderer::default())
    }
}

impl<R: VectorRenderer> VectorFragmentExtractor<R> {
    /// Create an extractor around a renderer.
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    /// The wrapped renderer.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Render one page and split its output into markup and style.
    ///
    /// A render failure is returned as a page-level
    /// [`Error::Render`](crate::Error::Render); nothing else can fail.
    pub fn extract(&self, page: &Page, context: &dyn RenderContext) -> Result<PageFragment> {
        let raw = self.renderer.render(page, context)?;
        Ok(normalize(page.number, &raw))
    }

    /// Load page `number` from `source` and extract it.
    pub fn extract_page<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
        number: u32,
    ) -> Result<PageFragment> {
        let page = source.page(number)?;
        let scope = PageScope::new(source, &page);
        self.extract(&page, &scope)
    }
}

/// Normalize raw renderer output into a fragment.
pub fn normalize(page_number: u32, raw: &str) -> PageFragment {
    let markup = strip_namespace_prefixes(raw);
    let markup = decode_entities(&markup);
    let (markup, style) = split_defs(&markup);
    PageFragment::new(page_number, markup, style)
}

/// Strip namespace qualifiers from opening and closing tag names.
pub fn strip_namespace_prefixes(markup: &str) -> Cow<'_, str> {
    TAG_PREFIX.replace_all(markup, "<$1$2")
}

/// Decode character entities to literal characters.
///
/// Numeric references and HTML5 named entities are resolved. Results that
/// are markup-significant (`<`, `>`, `&`, `"`, `'`) are written back in their
/// predefined form so text content cannot open tags or end attributes.
/// Unknown entities are left as written.
pub fn decode_entities(markup: &str) -> Cow<'_, str> {
    ENTITY.replace_all(markup, |caps: &regex::Captures| {
        let entity = &caps[0];
        match unescape_with(entity, resolve_html5_entity) {
            Ok(decoded) => match &*decoded {
                "<" => "&lt;".to_string(),
                ">" => "&gt;".to_string(),
                "&" => "&amp;".to_string(),
                "\"" => "&quot;".to_string(),
                "'" => "&apos;".to_string(),
                _ => decoded.into_owned(),
            },
            Err(_) => entity.to_string(),
        }
    })
}

/// Byte offsets of a `<defs>` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefsBlock {
    /// Start of the opening tag
    pub start: usize,
    /// End of the closing tag (exclusive)
    pub end: usize,
    /// Start of the inner content
    pub inner_start: usize,
    /// End of the inner content (exclusive)
    pub inner_end: usize,
}

/// Split markup into `(markup without the first defs block, its inner content)`.
///
/// Without a complete defs block the markup is returned unchanged with an
/// empty style.
pub fn split_defs(markup: &str) -> (String, String) {
    match find_defs(markup) {
        Some(block) => {
            let style = markup[block.inner_start..block.inner_end].to_string();
            let mut rest = String::with_capacity(markup.len() - (block.end - block.start));
            rest.push_str(&markup[..block.start]);
            rest.push_str(&markup[block.end..]);
            (rest, style)
        }
        None => (markup.to_string(), String::new()),
    }
}

/// Locate the first outermost `<defs>` element.
///
/// Comments, CDATA sections and processing instructions are skipped, nested
/// `<defs>` are balanced and `<defs/>` counts as an empty block.
pub fn find_defs(markup: &str) -> Option<DefsBlock> {
    let bytes = markup.as_bytes();
    let mut pos = 0;
    let mut open: Option<(usize, usize)> = None;
    let mut depth = 0usize;

    while let Some(offset) = markup[pos..].find('<') {
        let tag_start = pos + offset;
        let rest = &markup[tag_start..];

        let skip_to = if rest.starts_with("<!--") {
            Some("-->")
        } else if rest.starts_with("<![CDATA[") {
            Some("]]>")
        } else if rest.starts_with("<?") {
            Some("?>")
        } else if rest.starts_with("<!") {
            Some(">")
        } else {
            None
        };
        if let Some(terminator) = skip_to {
            match rest.find(terminator) {
                Some(end) => {
                    pos = tag_start + end + terminator.len();
                    continue;
                }
                None => break,
            }
        }

        let Some(tag_end) = tag_end(bytes, tag_start) else {
            break;
        };
        let tag = Tag::parse(&markup[tag_start..tag_end]);
        pos = tag_end;

        if tag.name != "defs" {
            continue;
        }

        match (open, tag.kind) {
            (None, TagKind::SelfClosing) => {
                return Some(DefsBlock {
                    start: tag_start,
                    end: tag_end,
                    inner_start: tag_end,
                    inner_end: tag_end,
                });
            }
            (None, TagKind::Open) => {
                open = Some((tag_start, tag_end));
                depth = 1;
            }
            (None, TagKind::Close) => {
                log::debug!("Ignoring stray </defs> at byte {}", tag_start);
            }
            (Some(_), TagKind::Open) => depth += 1,
            (Some(_), TagKind::SelfClosing) => {}
            (Some((start, inner_start)), TagKind::Close) => {
                depth -= 1;
                if depth == 0 {
                    return Some(DefsBlock {
                        start,
                        end: tag_end,
                        inner_start,
                        inner_end: tag_start,
                    });
                }
            }
        }
    }

    if let Some((start, _)) = open {
        log::debug!("Unclosed <defs> at byte {}; keeping markup as is", start);
    }
    None
}

/// End (exclusive) of the tag starting at `start`, honoring quoted attributes.
fn tag_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate().skip(start + 1) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i + 1),
            None => {}
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Open,
    Close,
    SelfClosing,
}

struct Tag<'a> {
    name: &'a str,
    kind: TagKind,
}

impl<'a> Tag<'a> {
    /// Parse `<name ...>`, `</name>` or `<name .../>`.
    fn parse(raw: &'a str) -> Self {
        let inner = raw.trim_start_matches('<').trim_end_matches('>');
        let (closing, inner) = match inner.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, inner),
        };
        let name_end = inner
            .find(|c: char| c.is_whitespace() || c == '/')
            .unwrap_or(inner.len());

        let kind = if closing {
            TagKind::Close
        } else if inner.trim_end().ends_with('/') {
            TagKind::SelfClosing
        } else {
            TagKind::Open
        };

        Self {
            name: &inner[..name_end],
            kind,
        }
    }
}
