//! Document-level types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document metadata read from the Info dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document author
    pub author: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Keywords
    pub keywords: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// PDF producer
    pub producer: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,

    /// Last modification date
    pub modified: Option<DateTime<Utc>>,

    /// PDF version (e.g., "1.7")
    pub pdf_version: String,

    /// Total number of pages
    pub page_count: u32,

    /// Whether the document is encrypted
    pub encrypted: bool,
}

impl Metadata {
    /// Create new metadata with PDF version.
    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            pdf_version: version.into(),
            ..Default::default()
        }
    }

    /// Title shown in the deck's `<title>`.
    ///
    /// Blank titles count as missing; `fallback` is typically the source
    /// file stem.
    pub fn display_title<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(fallback)
    }
}

/// Page size in points at scale 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in points (1 point = 1/72 inch)
    pub width: f32,
    /// Height in points
    pub height: f32,
}

impl Viewport {
    /// Create a viewport.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// US Letter, used when a page has no usable MediaBox.
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    /// Width rounded up to whole pixels, as the deck template expects.
    pub fn pixel_width(&self) -> u32 {
        self.width.ceil().max(0.0) as u32
    }

    /// Height rounded up to whole pixels.
    pub fn pixel_height(&self) -> u32 {
        self.height.ceil().max(0.0) as u32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::letter()
    }
}
