//! Page-level types: the paint-operation stream handed to the renderer.

use std::fmt::Write;

use super::Viewport;
use serde::{Deserialize, Serialize};

/// One page as the renderer sees it.
#[derive(Debug, Clone)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Natural page size at scale 1.0
    pub viewport: Viewport,

    /// Origin of the MediaBox, subtracted before drawing
    pub origin: (f32, f32),

    /// Page rotation in degrees (0, 90, 180, 270)
    pub rotation: u16,

    /// Decoded content-stream operations in paint order
    pub operations: Vec<PaintOp>,

    /// Fonts the page's resources declare
    pub fonts: Vec<PageFont>,

    /// Image and form XObjects the page's resources declare
    pub xobjects: Vec<XObject>,
}

impl Page {
    /// Create an empty page of the given size.
    pub fn new(number: u32, viewport: Viewport) -> Self {
        Self {
            number,
            viewport,
            origin: (0.0, 0.0),
            rotation: 0,
            operations: Vec::new(),
            fonts: Vec::new(),
            xobjects: Vec::new(),
        }
    }

    /// Builder: set the operation stream.
    pub fn with_operations(mut self, operations: Vec<PaintOp>) -> Self {
        self.operations = operations;
        self
    }

    /// Builder: add a font resource.
    pub fn with_font(mut self, font: PageFont) -> Self {
        self.fonts.push(font);
        self
    }

    /// Builder: add an XObject resource.
    pub fn with_xobject(mut self, xobject: XObject) -> Self {
        self.xobjects.push(xobject);
        self
    }

    /// Look up an XObject by its resource name.
    pub fn xobject(&self, name: &[u8]) -> Option<&XObject> {
        self.xobjects.iter().find(|x| x.name == name)
    }

    /// Look up a font by its resource name (`/F1` → `b"F1"`).
    pub fn font(&self, resource_name: &[u8]) -> Option<&PageFont> {
        self.fonts.iter().find(|f| f.resource_name == resource_name)
    }
}

/// A value from a content stream operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Integer(i64),
    Real(f32),
    Name(Vec<u8>),
    Str(Vec<u8>),
    Array(Vec<Operand>),
    Other,
}

impl Operand {
    /// Numeric value, if the operand is a number.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Operand::Integer(i) => Some(*i as f32),
            Operand::Real(r) => Some(*r),
            _ => None,
        }
    }

    /// Name bytes, if the operand is a name.
    pub fn as_name(&self) -> Option<&[u8]> {
        match self {
            Operand::Name(n) => Some(n),
            _ => None,
        }
    }
}

/// A single operation from a content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintOp {
    /// Operator keyword (e.g., `re`, `Tj`)
    pub operator: String,
    /// Operands in stream order
    pub operands: Vec<Operand>,
}

impl PaintOp {
    /// Create an operation.
    pub fn new(operator: impl Into<String>, operands: Vec<Operand>) -> Self {
        Self {
            operator: operator.into(),
            operands,
        }
    }

    /// Numeric operands, failing if any operand is not a number or the
    /// count differs from `N`.
    pub fn numbers<const N: usize>(&self) -> Option<[f32; N]> {
        if self.operands.len() != N {
            return None;
        }
        let mut out = [0.0; N];
        for (slot, operand) in out.iter_mut().zip(&self.operands) {
            *slot = operand.as_f32()?;
        }
        Some(out)
    }
}

/// A named XObject resource.
#[derive(Debug, Clone)]
pub struct XObject {
    /// Resource name used by `Do`
    pub name: Vec<u8>,
    /// Image or form content
    pub kind: XObjectKind,
}

/// XObject payload.
#[derive(Debug, Clone)]
pub enum XObjectKind {
    /// An image in a format browsers decode directly, drawn into the unit square.
    Image {
        mime_type: String,
        data: Vec<u8>,
        width: u32,
        height: u32,
    },
    /// A form XObject: a nested operation stream with its own matrix.
    Form {
        matrix: [f32; 6],
        operations: Vec<PaintOp>,
    },
}

/// Container format of an embedded font program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontFormat {
    /// `/FontFile`: Type 1
    Type1,
    /// `/FontFile2`: TrueType
    TrueType,
    /// `/FontFile3`: CFF or OpenType
    OpenType,
}

impl FontFormat {
    /// MIME type used in the `data:` URL.
    pub fn mime_type(&self) -> &'static str {
        match self {
            FontFormat::Type1 => "font/type1",
            FontFormat::TrueType => "font/ttf",
            FontFormat::OpenType => "font/otf",
        }
    }
}

/// An embedded font program.
#[derive(Debug, Clone)]
pub struct FontProgram {
    /// Program format, which picks the `data:` MIME type
    pub format: FontFormat,
    /// Raw (decoded) program bytes
    pub data: Vec<u8>,
}

/// Advance used for glyphs the font's width table does not cover, in
/// thousandths of an em.
pub const DEFAULT_GLYPH_WIDTH: f32 = 500.0;

/// A font declared in a page's resources.
#[derive(Debug, Clone)]
pub struct PageFont {
    /// Resource name used by `Tf`
    pub resource_name: Vec<u8>,
    /// BaseFont (e.g., "ABCDEF+CMR10")
    pub base_font: String,
    /// Embedded program, if the PDF carries one
    pub program: Option<FontProgram>,
    /// Character code of `widths[0]`
    pub first_char: u32,
    /// Glyph advances in thousandths of an em (`/Widths`)
    pub widths: Vec<f32>,
    /// Type0 fonts use two-byte character codes
    pub composite: bool,
}

impl PageFont {
    /// Create a font without an embedded program.
    pub fn new(resource_name: impl Into<Vec<u8>>, base_font: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            base_font: base_font.into(),
            program: None,
            first_char: 0,
            widths: Vec::new(),
            composite: false,
        }
    }

    /// Builder: attach an embedded program.
    pub fn with_program(mut self, format: FontFormat, data: Vec<u8>) -> Self {
        self.program = Some(FontProgram { format, data });
        self
    }

    /// Builder: set the width table.
    pub fn with_widths(mut self, first_char: u32, widths: Vec<f32>) -> Self {
        self.first_char = first_char;
        self.widths = widths;
        self
    }

    /// Builder: mark the font as composite (two-byte codes).
    pub fn with_composite(mut self, composite: bool) -> Self {
        self.composite = composite;
        self
    }

    /// Split a shown string into character codes.
    pub fn codes(&self, bytes: &[u8]) -> Vec<u32> {
        if self.composite {
            bytes
                .chunks(2)
                .map(|c| c.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b)))
                .collect()
        } else {
            bytes.iter().map(|b| u32::from(*b)).collect()
        }
    }

    /// Advance of one character code in thousandths of an em.
    pub fn glyph_width(&self, code: u32) -> f32 {
        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .filter(|w| *w > 0.0)
            .unwrap_or(DEFAULT_GLYPH_WIDTH)
    }

    /// CSS family name: the resource name, which is unique within a page.
    ///
    /// Bytes outside `[A-Za-z0-9_-]` are written as `_XX` hex, so the name
    /// is safe inside both an SVG attribute and a CSS string.
    pub fn css_family(&self) -> String {
        let mut family = String::from("f_");
        for &b in &self.resource_name {
            if b.is_ascii_alphanumeric() || b == b'-' || b == b'_' {
                family.push(char::from(b));
            } else {
                let _ = write!(family, "_{:02X}", b);
            }
        }
        family
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operand_numbers() {
        let op = PaintOp::new(
            "re",
            vec![
                Operand::Integer(10),
                Operand::Real(20.5),
                Operand::Integer(100),
                Operand::Integer(50),
            ],
        );
        assert_eq!(op.numbers::<4>(), Some([10.0, 20.5, 100.0, 50.0]));
        assert_eq!(op.numbers::<2>(), None);

        let bad = PaintOp::new("m", vec![Operand::Integer(1), Operand::Other]);
        assert_eq!(bad.numbers::<2>(), None);
    }

    #[test]
    fn test_page_font_lookup() {
        let page = Page::new(1, Viewport::letter())
            .with_font(PageFont::new(b"F1".to_vec(), "Helvetica"))
            .with_font(PageFont::new(b"F2".to_vec(), "CMR10").with_program(FontFormat::OpenType, vec![1, 2]));

        assert_eq!(page.font(b"F1").map(|f| f.base_font.as_str()), Some("Helvetica"));
        assert!(page.font(b"F2").and_then(|f| f.program.as_ref()).is_some());
        assert!(page.font(b"F3").is_none());
        assert_eq!(page.font(b"F2").unwrap().css_family(), "f_F2");
    }

    #[test]
    fn test_css_family_hex_escapes_markup_bytes() {
        let font = PageFont::new(b"F\"><script>x</script>".to_vec(), "Helvetica");
        let family = font.css_family();
        assert_eq!(family, "f_F_22_3E_3Cscript_3Ex_3C_2Fscript_3E");
        assert!(family
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
    }

    #[test]
    fn test_glyph_widths() {
        let font = PageFont::new(b"F1".to_vec(), "Helvetica").with_widths(32, vec![278.0, 0.0, 355.0]);
        assert_eq!(font.glyph_width(32), 278.0);
        assert_eq!(font.glyph_width(33), DEFAULT_GLYPH_WIDTH);
        assert_eq!(font.glyph_width(34), 355.0);
        assert_eq!(font.glyph_width(10), DEFAULT_GLYPH_WIDTH);
        assert_eq!(font.codes(b"AB"), vec![65, 66]);

        let cid = PageFont::new(b"F2".to_vec(), "Noto").with_composite(true);
        assert_eq!(cid.codes(&[0x01, 0x02, 0x00, 0x41]), vec![0x0102, 0x41]);
    }
}
