//! Graphics state tracked while walking a content stream.

use std::fmt::Write;

/// Affine transform `[a b c d e f]` in PDF row-vector convention:
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Matrix = Matrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// Create a matrix from its six coefficients.
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Translation by `(tx, ty)`.
    pub fn translate(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self` applied first, then `then`.
    pub fn then(&self, then: &Matrix) -> Matrix {
        Matrix {
            a: self.a * then.a + self.b * then.c,
            b: self.a * then.b + self.b * then.d,
            c: self.c * then.a + self.d * then.c,
            d: self.c * then.b + self.d * then.d,
            e: self.e * then.a + self.f * then.c + then.e,
            f: self.e * then.b + self.f * then.d + then.f,
        }
    }

    /// Transform a point.
    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    /// Whether this is the identity transform.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Write as an SVG `matrix(...)` transform.
    pub fn write_svg(&self, out: &mut String) {
        out.push_str("matrix(");
        for (i, v) in [self.a, self.b, self.c, self.d, self.e, self.f]
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                out.push(' ');
            }
            write_num(out, v);
        }
        out.push(')');
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Fill or stroke color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Gray(f32),
    Rgb(f32, f32, f32),
    Cmyk(f32, f32, f32, f32),
}

impl Color {
    /// Initial fill and stroke color.
    pub const BLACK: Color = Color::Gray(0.0);

    /// Convert to 8-bit RGB.
    pub fn to_rgb(&self) -> (u8, u8, u8) {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        match *self {
            Color::Gray(g) => (channel(g), channel(g), channel(g)),
            Color::Rgb(r, g, b) => (channel(r), channel(g), channel(b)),
            Color::Cmyk(c, m, y, k) => (
                channel((1.0 - c) * (1.0 - k)),
                channel((1.0 - m) * (1.0 - k)),
                channel((1.0 - y) * (1.0 - k)),
            ),
        }
    }

    /// Write in `#rrggbb` form.
    pub fn write_hex(&self, out: &mut String) {
        let (r, g, b) = self.to_rgb();
        let _ = write!(out, "#{:02x}{:02x}{:02x}", r, g, b);
    }
}

/// Text state parameters (`Tc`, `Tw`, `Tz`, `TL`, `Tf`, `Ts`).
#[derive(Debug, Clone, PartialEq)]
pub struct TextState {
    /// Font resource name from `Tf`
    pub font: Vec<u8>,
    /// Font size from `Tf`
    pub size: f32,
    /// `Tc`
    pub char_spacing: f32,
    /// `Tw`
    pub word_spacing: f32,
    /// `Tz` / 100
    pub horizontal_scale: f32,
    /// `TL`
    pub leading: f32,
    /// `Ts`
    pub rise: f32,
    /// `Tr`; modes 3 and 7 draw nothing
    pub render_mode: u8,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font: Vec::new(),
            size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
            render_mode: 0,
        }
    }
}

/// State saved and restored by `q` / `Q`.
#[derive(Debug, Clone)]
pub struct GraphicsState {
    /// Current transformation matrix
    pub ctm: Matrix,
    /// Non-stroking color
    pub fill: Color,
    /// Stroking color
    pub stroke: Color,
    /// `w`
    pub line_width: f32,
    /// `J`
    pub line_cap: u8,
    /// `j`
    pub line_join: u8,
    /// Dash array from `d`; empty for solid lines
    pub dash: Vec<f32>,
    /// Text parameters, saved with the rest of the state
    pub text: TextState,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            fill: Color::BLACK,
            stroke: Color::BLACK,
            line_width: 1.0,
            line_cap: 0,
            line_join: 0,
            dash: Vec::new(),
            text: TextState::default(),
        }
    }
}

/// Write a number with at most 3 decimals and no trailing zeros.
pub fn write_num(out: &mut String, n: f32) {
    let n = f64::from(n);
    if !n.is_finite() {
        out.push('0');
        return;
    }
    if n.fract() == 0.0 && n.abs() < 1e10 {
        let _ = write!(out, "{}", n as i64);
        return;
    }

    let rounded = (n * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        out.push('0');
        return;
    }
    let mut buffer = ryu::Buffer::new();
    let s = buffer.format(rounded);
    if s.contains('.') && !s.contains('e') {
        out.push_str(s.trim_end_matches('0').trim_end_matches('.'));
    } else {
        out.push_str(s);
    }
}
