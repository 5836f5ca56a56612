//! Error types for reveal-pdf.

use std::io;
use thiserror::Error;

/// Result type alias for reveal-pdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while building a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input does not start with a PDF header.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// The PDF header names a version we cannot read.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// The source bytes could not be parsed into a document.
    #[error("Cannot open PDF file: {0}")]
    UnreadableDocument(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// An outline entry points somewhere that does not map to a page.
    #[error("Outline entry \"{title}\" has an unresolvable destination: {reason}")]
    UnresolvableDestination {
        /// Title of the offending outline entry
        title: String,
        /// Why resolution failed
        reason: String,
    },

    /// An outline entry points before the section that precedes it.
    #[error("Outline entry \"{title}\" points to page {page}, before the current section start {start}")]
    OutOfOrderOutline {
        /// Title of the offending outline entry
        title: String,
        /// Resolved page number (1-indexed)
        page: u32,
        /// Start of the running section
        start: u32,
    },

    /// Page number is out of range.
    #[error("Page {0} not found (document has {1} pages)")]
    PageNotFound(u32, u32),

    /// A page's paint operations could not be turned into vector markup.
    #[error("Rendering page {page} failed: {reason}")]
    Render {
        /// Page number (1-indexed)
        page: u32,
        /// Renderer message
        reason: String,
    },

    /// A template is missing a required placeholder.
    #[error("Template error: {0}")]
    Template(String),

    /// The output directory cannot be used.
    #[error("Output directory error: {0}")]
    OutputDirectory(String),

    /// Manifest serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a render error for a page.
    pub fn render(page: u32, reason: impl Into<String>) -> Self {
        Error::Render {
            page,
            reason: reason.into(),
        }
    }

    /// Whether the error only affects a single page.
    ///
    /// Page-level errors are reported and skipped by the deck pipeline;
    /// everything else aborts the run.
    pub fn is_page_local(&self) -> bool {
        matches!(self, Error::Render { .. } | Error::PageNotFound(..))
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::UnreadableDocument(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Encrypted;
        assert_eq!(err.to_string(), "Document is encrypted");

        let err = Error::PageNotFound(10, 5);
        assert_eq!(err.to_string(), "Page 10 not found (document has 5 pages)");

        let err = Error::render(3, "bad operand");
        assert_eq!(err.to_string(), "Rendering page 3 failed: bad operand");
    }

    #[test]
    fn test_page_local_errors() {
        assert!(Error::render(1, "x").is_page_local());
        assert!(Error::PageNotFound(4, 3).is_page_local());
        assert!(!Error::UnknownFormat.is_page_local());
        assert!(!Error::UnresolvableDestination {
            title: "Intro".into(),
            reason: "missing".into(),
        }
        .is_page_local());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
