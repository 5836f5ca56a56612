//! Vector rendering of page paint operations.
//!
//! [`SvgRenderer`] walks a page's decoded content stream and writes one SVG
//! document whose tags carry the `svg:` prefix. Everything the renderer needs
//! from the document beyond the page itself comes through the narrow
//! [`RenderContext`] capability interface.

mod renderer;
mod state;

pub use renderer::SvgRenderer;
pub use state::{Color, GraphicsState, Matrix, TextState};

use crate::backend::DocumentSource;
use crate::error::Result;
use crate::model::{Page, PageFont};

/// Capabilities the renderer may call while drawing one page.
pub trait RenderContext {
    /// Font declared under `resource_name`, with its embedded program if any.
    fn font(&self, resource_name: &[u8]) -> Option<&PageFont>;

    /// Decode a string shown with the font under `resource_name`.
    fn decode_text(&self, resource_name: &[u8], bytes: &[u8]) -> String;
}

/// Turns one page's paint operations into a vector-markup string.
pub trait VectorRenderer: Sync {
    /// Render the page at scale 1.0.
    ///
    /// Fails with [`Error::Render`](crate::Error::Render) on malformed
    /// operator streams.
    fn render(&self, page: &Page, context: &dyn RenderContext) -> Result<String>;
}

/// [`RenderContext`] for one page of a [`DocumentSource`].
pub struct PageScope<'a, S: ?Sized> {
    source: &'a S,
    page: &'a Page,
}

impl<'a, S: DocumentSource + ?Sized> PageScope<'a, S> {
    /// Scope `source` to one of its pages.
    pub fn new(source: &'a S, page: &'a Page) -> Self {
        Self { source, page }
    }
}

impl<S: DocumentSource + ?Sized> RenderContext for PageScope<'_, S> {
    fn font(&self, resource_name: &[u8]) -> Option<&PageFont> {
        self.page.font(resource_name)
    }

    fn decode_text(&self, resource_name: &[u8], bytes: &[u8]) -> String {
        self.source
            .decode_text(self.page.number, resource_name, bytes)
    }
}
