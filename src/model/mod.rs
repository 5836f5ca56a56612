//! Document model types shared by the partitioner, extractor and assembler.
//!
//! The model is produced by a [`DocumentSource`](crate::backend::DocumentSource)
//! and only read by the core: nothing here mutates after construction.

mod document;
mod outline;
mod page;
mod section;

pub use document::{Metadata, Viewport};
pub use outline::{Destination, FlattenRule, Outline, OutlineEntry};
pub use page::{
    FontFormat, FontProgram, Operand, Page, PageFont, PaintOp, XObject, XObjectKind, DEFAULT_GLYPH_WIDTH,
};
pub use section::{PageFragment, Section};
