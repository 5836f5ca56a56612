//! Content-stream walker that writes SVG.

use std::collections::BTreeSet;
use std::fmt::Write;

use base64::Engine;
use quick_xml::escape::escape;

use super::state::{write_num, Color, GraphicsState, Matrix};
use super::{RenderContext, VectorRenderer};
use crate::error::{Error, Result};
use crate::model::{Operand, Page, PageFont, PaintOp, XObjectKind, DEFAULT_GLYPH_WIDTH};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Form XObjects invoking forms deeper than this are not drawn.
const MAX_FORM_NESTING: usize = 8;

/// Renders pages to SVG with `svg:`-prefixed tags.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    embed_fonts: bool,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self { embed_fonts: true }
    }
}

impl SvgRenderer {
    /// Create a renderer that embeds font programs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed font programs as `@font-face` rules (default: true).
    pub fn with_embed_fonts(mut self, embed: bool) -> Self {
        self.embed_fonts = embed;
        self
    }
}

impl VectorRenderer for SvgRenderer {
    fn render(&self, page: &Page, context: &dyn RenderContext) -> Result<String> {
        let mut walker = Walker::new(page, context, self.embed_fonts);
        walker.run(&page.operations, 0)?;

        let mut out = String::with_capacity(walker.body.len() + 512);
        let _ = write!(
            out,
            "<svg:svg xmlns:svg=\"{ns}\" xmlns=\"{ns}\" version=\"1.1\" width=\"",
            ns = SVG_NS
        );
        write_num(&mut out, page.viewport.width);
        out.push_str("px\" height=\"");
        write_num(&mut out, page.viewport.height);
        out.push_str("px\" viewBox=\"0 0 ");
        write_num(&mut out, page.viewport.width);
        out.push(' ');
        write_num(&mut out, page.viewport.height);
        out.push_str("\" preserveAspectRatio=\"none\">");

        if self.embed_fonts {
            let css = font_faces(&walker.used_fonts, context);
            if !css.is_empty() {
                out.push_str("<svg:defs><svg:style type=\"text/css\">");
                out.push_str(&css);
                out.push_str("</svg:style></svg:defs>");
            }
        }

        out.push_str("<svg:g transform=\"");
        page_matrix(page).write_svg(&mut out);
        out.push_str("\">");
        out.push_str(&walker.body);
        out.push_str("</svg:g></svg:svg>");

        Ok(out)
    }
}

/// Maps PDF user space onto the SVG viewport: origin shift, y-flip and
/// page rotation.
fn page_matrix(page: &Page) -> Matrix {
    let (x0, y0) = page.origin;
    let (w, h) = if page.rotation == 90 || page.rotation == 270 {
        (page.viewport.height, page.viewport.width)
    } else {
        (page.viewport.width, page.viewport.height)
    };

    let flip = Matrix::new(1.0, 0.0, 0.0, -1.0, -x0, y0 + h);
    let rotate = match page.rotation {
        90 => Matrix::new(0.0, 1.0, -1.0, 0.0, h, 0.0),
        180 => Matrix::new(-1.0, 0.0, 0.0, -1.0, w, h),
        270 => Matrix::new(0.0, -1.0, 1.0, 0.0, 0.0, w),
        _ => Matrix::IDENTITY,
    };
    flip.then(&rotate)
}

fn font_faces(used: &BTreeSet<Vec<u8>>, context: &dyn RenderContext) -> String {
    let engine = base64::engine::general_purpose::STANDARD;
    let mut css = String::new();

    for name in used {
        let Some(font) = context.font(name) else {
            continue;
        };
        if let Some(program) = &font.program {
            let _ = write!(
                css,
                "@font-face{{font-family:\"{}\";src:url(data:{};base64,{});}}",
                font.css_family(),
                program.format.mime_type(),
                engine.encode(&program.data)
            );
        }
    }

    css
}

/// Font stack for text whose program is not embedded.
fn fallback_family(base_font: &str) -> String {
    let name = base_font.split_once('+').map_or(base_font, |(_, name)| name);
    let name: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    let lower = name.to_ascii_lowercase();
    let generic = if lower.contains("courier") || lower.contains("mono") || lower.starts_with("cmtt")
    {
        "monospace"
    } else if lower.contains("helvetica")
        || lower.contains("arial")
        || lower.contains("sans")
        || lower.starts_with("cmss")
    {
        "sans-serif"
    } else {
        "serif"
    };

    if name.is_empty() {
        generic.to_string()
    } else {
        format!("{}, {}", name, generic)
    }
}

/// One element of a text-showing operator.
enum Piece<'o> {
    Text(&'o [u8]),
    /// `TJ` adjustment in thousandths of an em
    Shift(f32),
}

struct Walker<'a> {
    page: &'a Page,
    context: &'a dyn RenderContext,
    embed_fonts: bool,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    path: String,
    current: Option<(f32, f32)>,
    subpath_start: Option<(f32, f32)>,
    text_matrix: Matrix,
    line_matrix: Matrix,
    body: String,
    used_fonts: BTreeSet<Vec<u8>>,
}

impl<'a> Walker<'a> {
    fn new(page: &'a Page, context: &'a dyn RenderContext, embed_fonts: bool) -> Self {
        Self {
            page,
            context,
            embed_fonts,
            state: GraphicsState::default(),
            stack: Vec::new(),
            path: String::new(),
            current: None,
            subpath_start: None,
            text_matrix: Matrix::IDENTITY,
            line_matrix: Matrix::IDENTITY,
            body: String::new(),
            used_fonts: BTreeSet::new(),
        }
    }

    fn run(&mut self, operations: &'a [PaintOp], depth: usize) -> Result<()> {
        for op in operations {
            self.apply(op, depth)?;
        }
        Ok(())
    }

    fn malformed(&self, op: &PaintOp) -> Error {
        Error::render(
            self.page.number,
            format!(
                "malformed operands for '{}': {:?}",
                op.operator, op.operands
            ),
        )
    }

    fn numbers<const N: usize>(&self, op: &PaintOp) -> Result<[f32; N]> {
        op.numbers::<N>().ok_or_else(|| self.malformed(op))
    }

    fn apply(&mut self, op: &'a PaintOp, depth: usize) -> Result<()> {
        match op.operator.as_str() {
            // Graphics state
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(saved) = self.stack.pop() {
                    self.state = saved;
                }
            }
            "cm" => {
                let [a, b, c, d, e, f] = self.numbers::<6>(op)?;
                self.state.ctm = Matrix::new(a, b, c, d, e, f).then(&self.state.ctm);
            }
            "w" => {
                let [w] = self.numbers::<1>(op)?;
                self.state.line_width = w;
            }
            "J" => {
                let [cap] = self.numbers::<1>(op)?;
                self.state.line_cap = cap.clamp(0.0, 2.0) as u8;
            }
            "j" => {
                let [join] = self.numbers::<1>(op)?;
                self.state.line_join = join.clamp(0.0, 2.0) as u8;
            }
            "d" => match op.operands.as_slice() {
                [Operand::Array(items), _phase] => {
                    self.state.dash = items
                        .iter()
                        .map(Operand::as_f32)
                        .collect::<Option<Vec<_>>>()
                        .ok_or_else(|| self.malformed(op))?;
                }
                _ => return Err(self.malformed(op)),
            },

            // Color
            "g" => {
                let [g] = self.numbers::<1>(op)?;
                self.state.fill = Color::Gray(g);
            }
            "G" => {
                let [g] = self.numbers::<1>(op)?;
                self.state.stroke = Color::Gray(g);
            }
            "rg" => {
                let [r, g, b] = self.numbers::<3>(op)?;
                self.state.fill = Color::Rgb(r, g, b);
            }
            "RG" => {
                let [r, g, b] = self.numbers::<3>(op)?;
                self.state.stroke = Color::Rgb(r, g, b);
            }
            "k" => {
                let [c, m, y, k] = self.numbers::<4>(op)?;
                self.state.fill = Color::Cmyk(c, m, y, k);
            }
            "K" => {
                let [c, m, y, k] = self.numbers::<4>(op)?;
                self.state.stroke = Color::Cmyk(c, m, y, k);
            }
            "sc" | "scn" => {
                if let Some(color) = color_from(&op.operands) {
                    self.state.fill = color;
                }
            }
            "SC" | "SCN" => {
                if let Some(color) = color_from(&op.operands) {
                    self.state.stroke = color;
                }
            }

            // Path construction
            "m" => {
                let [x, y] = self.numbers::<2>(op)?;
                self.move_to(x, y);
            }
            "l" => {
                let [x, y] = self.numbers::<2>(op)?;
                self.line_to(x, y);
            }
            "c" => {
                let [x1, y1, x2, y2, x3, y3] = self.numbers::<6>(op)?;
                self.curve_to(x1, y1, x2, y2, x3, y3);
            }
            "v" => {
                let [x2, y2, x3, y3] = self.numbers::<4>(op)?;
                let (x1, y1) = self.current.unwrap_or((x2, y2));
                self.curve_to(x1, y1, x2, y2, x3, y3);
            }
            "y" => {
                let [x1, y1, x3, y3] = self.numbers::<4>(op)?;
                self.curve_to(x1, y1, x3, y3, x3, y3);
            }
            "h" => self.close_path(),
            "re" => {
                let [x, y, w, h] = self.numbers::<4>(op)?;
                self.move_to(x, y);
                self.line_to(x + w, y);
                self.line_to(x + w, y + h);
                self.line_to(x, y + h);
                self.close_path();
            }

            // Path painting
            "S" => self.paint(false, None, true),
            "s" => self.paint(true, None, true),
            "f" | "F" => self.paint(false, Some(FillRule::NonZero), false),
            "f*" => self.paint(false, Some(FillRule::EvenOdd), false),
            "B" => self.paint(false, Some(FillRule::NonZero), true),
            "B*" => self.paint(false, Some(FillRule::EvenOdd), true),
            "b" => self.paint(true, Some(FillRule::NonZero), true),
            "b*" => self.paint(true, Some(FillRule::EvenOdd), true),
            "n" => self.end_path(),

            // Text objects and state
            "BT" => {
                self.text_matrix = Matrix::IDENTITY;
                self.line_matrix = Matrix::IDENTITY;
            }
            "ET" => {}
            "Tf" => match op.operands.as_slice() {
                [Operand::Name(font), size] => {
                    let size = size.as_f32().ok_or_else(|| self.malformed(op))?;
                    self.state.text.font = font.clone();
                    self.state.text.size = size;
                }
                _ => return Err(self.malformed(op)),
            },
            "Tc" => {
                let [v] = self.numbers::<1>(op)?;
                self.state.text.char_spacing = v;
            }
            "Tw" => {
                let [v] = self.numbers::<1>(op)?;
                self.state.text.word_spacing = v;
            }
            "Tz" => {
                let [v] = self.numbers::<1>(op)?;
                self.state.text.horizontal_scale = v / 100.0;
            }
            "TL" => {
                let [v] = self.numbers::<1>(op)?;
                self.state.text.leading = v;
            }
            "Ts" => {
                let [v] = self.numbers::<1>(op)?;
                self.state.text.rise = v;
            }
            "Tr" => {
                let [v] = self.numbers::<1>(op)?;
                self.state.text.render_mode = v.clamp(0.0, 7.0) as u8;
            }

            // Text positioning
            "Td" => {
                let [tx, ty] = self.numbers::<2>(op)?;
                self.move_text(tx, ty);
            }
            "TD" => {
                let [tx, ty] = self.numbers::<2>(op)?;
                self.state.text.leading = -ty;
                self.move_text(tx, ty);
            }
            "Tm" => {
                let [a, b, c, d, e, f] = self.numbers::<6>(op)?;
                self.line_matrix = Matrix::new(a, b, c, d, e, f);
                self.text_matrix = self.line_matrix;
            }
            "T*" => self.move_text(0.0, -self.state.text.leading),

            // Text showing
            "Tj" => match op.operands.as_slice() {
                [Operand::Str(bytes)] => self.show(&[Piece::Text(bytes)]),
                _ => return Err(self.malformed(op)),
            },
            "TJ" => match op.operands.as_slice() {
                [Operand::Array(items)] => {
                    let pieces: Vec<Piece> = items
                        .iter()
                        .filter_map(|item| match item {
                            Operand::Str(bytes) => Some(Piece::Text(bytes)),
                            other => other.as_f32().map(Piece::Shift),
                        })
                        .collect();
                    self.show(&pieces);
                }
                _ => return Err(self.malformed(op)),
            },
            "'" => match op.operands.as_slice() {
                [Operand::Str(bytes)] => {
                    self.move_text(0.0, -self.state.text.leading);
                    self.show(&[Piece::Text(bytes)]);
                }
                _ => return Err(self.malformed(op)),
            },
            "\"" => match op.operands.as_slice() {
                [aw, ac, Operand::Str(bytes)] => {
                    let (aw, ac) = aw
                        .as_f32()
                        .zip(ac.as_f32())
                        .ok_or_else(|| self.malformed(op))?;
                    self.state.text.word_spacing = aw;
                    self.state.text.char_spacing = ac;
                    self.move_text(0.0, -self.state.text.leading);
                    self.show(&[Piece::Text(bytes)]);
                }
                _ => return Err(self.malformed(op)),
            },

            // External objects
            "Do" => {
                let name = op
                    .operands
                    .first()
                    .and_then(Operand::as_name)
                    .ok_or_else(|| self.malformed(op))?;
                self.draw_xobject(name, depth)?;
            }

            other => log::trace!("page {}: skipping operator {}", self.page.number, other),
        }
        Ok(())
    }

    fn move_to(&mut self, x: f32, y: f32) {
        push_command(&mut self.path, 'M', &[x, y]);
        self.current = Some((x, y));
        self.subpath_start = Some((x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        if self.current.is_none() {
            self.move_to(x, y);
            return;
        }
        push_command(&mut self.path, 'L', &[x, y]);
        self.current = Some((x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) {
        if self.current.is_none() {
            self.move_to(x1, y1);
        }
        push_command(&mut self.path, 'C', &[x1, y1, x2, y2, x3, y3]);
        self.current = Some((x3, y3));
    }

    fn close_path(&mut self) {
        if self.current.is_some() {
            push_command(&mut self.path, 'Z', &[]);
            self.current = self.subpath_start;
        }
    }

    fn end_path(&mut self) {
        self.path.clear();
        self.current = None;
        self.subpath_start = None;
    }

    fn paint(&mut self, close: bool, fill: Option<FillRule>, stroke: bool) {
        if close {
            self.close_path();
        }
        if self.path.is_empty() {
            return;
        }

        let state = &self.state;
        let out = &mut self.body;
        out.push_str("<svg:path d=\"");
        out.push_str(&self.path);
        out.push('"');
        write_transform(out, &state.ctm);

        match fill {
            Some(rule) => {
                out.push_str(" fill=\"");
                state.fill.write_hex(out);
                out.push('"');
                if rule == FillRule::EvenOdd {
                    out.push_str(" fill-rule=\"evenodd\"");
                }
            }
            None => out.push_str(" fill=\"none\""),
        }

        if stroke {
            out.push_str(" stroke=\"");
            state.stroke.write_hex(out);
            out.push_str("\" stroke-width=\"");
            if state.line_width > 0.0 {
                write_num(out, state.line_width);
                out.push('"');
            } else {
                // Zero width means the thinnest line the device can draw
                out.push_str("1\" vector-effect=\"non-scaling-stroke\"");
            }
            match state.line_cap {
                1 => out.push_str(" stroke-linecap=\"round\""),
                2 => out.push_str(" stroke-linecap=\"square\""),
                _ => {}
            }
            match state.line_join {
                1 => out.push_str(" stroke-linejoin=\"round\""),
                2 => out.push_str(" stroke-linejoin=\"bevel\""),
                _ => {}
            }
            if !state.dash.is_empty() && state.dash.iter().any(|d| *d > 0.0) {
                out.push_str(" stroke-dasharray=\"");
                for (i, d) in state.dash.iter().enumerate() {
                    if i > 0 {
                        out.push(' ');
                    }
                    write_num(out, *d);
                }
                out.push('"');
            }
        }

        out.push_str("/>");
        self.end_path();
    }

    fn move_text(&mut self, tx: f32, ty: f32) {
        self.line_matrix = Matrix::translate(tx, ty).then(&self.line_matrix);
        self.text_matrix = self.line_matrix;
    }

    fn font_family(&self, font: Option<&PageFont>) -> String {
        match font {
            Some(font) if self.embed_fonts && font.program.is_some() => font.css_family(),
            Some(font) => fallback_family(&font.base_font),
            None => "serif".to_string(),
        }
    }

    fn show(&mut self, pieces: &[Piece<'_>]) {
        let context = self.context;
        let text = self.state.text.clone();
        let font = context.font(&text.font);
        let single_byte = font.map_or(true, |f| !f.composite);

        // Offsets are in unscaled text space; Tz is applied by the transform
        let mut x = 0.0f32;
        let mut spans = String::new();

        for piece in pieces {
            match piece {
                Piece::Shift(adjust) => x -= adjust / 1000.0 * text.size,
                Piece::Text(bytes) => {
                    let decoded = context.decode_text(&text.font, bytes);
                    if !decoded.is_empty() {
                        spans.push_str("<svg:tspan x=\"");
                        write_num(&mut spans, x);
                        spans.push_str("\" y=\"0\">");
                        spans.push_str(&escape(decoded.as_str()));
                        spans.push_str("</svg:tspan>");
                    }

                    let codes = match font {
                        Some(font) => font.codes(bytes),
                        None => bytes.iter().map(|b| u32::from(*b)).collect(),
                    };
                    for code in codes {
                        let width = font.map_or(DEFAULT_GLYPH_WIDTH, |f| f.glyph_width(code));
                        x += width / 1000.0 * text.size + text.char_spacing;
                        if single_byte && code == 32 {
                            x += text.word_spacing;
                        }
                    }
                }
            }
        }

        if !spans.is_empty() && !matches!(text.render_mode, 3 | 7) {
            let transform = Matrix::new(1.0, 0.0, 0.0, -1.0, 0.0, 0.0)
                .then(&Matrix::new(text.horizontal_scale, 0.0, 0.0, 1.0, 0.0, text.rise))
                .then(&self.text_matrix)
                .then(&self.state.ctm);
            let family = self.font_family(font);

            let out = &mut self.body;
            out.push_str("<svg:text transform=\"");
            transform.write_svg(out);
            let _ = write!(out, "\" font-family=\"{}\" font-size=\"", family);
            write_num(out, text.size);
            out.push_str("\" fill=\"");
            self.state.fill.write_hex(out);
            out.push_str("\" style=\"white-space:pre\">");
            out.push_str(&spans);
            out.push_str("</svg:text>");

            if font.map_or(false, |f| f.program.is_some()) {
                self.used_fonts.insert(text.font.clone());
            }
        }

        self.text_matrix = Matrix::translate(x * text.horizontal_scale, 0.0).then(&self.text_matrix);
    }

    fn draw_xobject(&mut self, name: &[u8], depth: usize) -> Result<()> {
        let page = self.page;
        let Some(xobject) = page.xobject(name) else {
            log::debug!(
                "page {}: no drawable XObject named {}",
                page.number,
                String::from_utf8_lossy(name)
            );
            return Ok(());
        };

        match &xobject.kind {
            XObjectKind::Image {
                mime_type, data, ..
            } => {
                // Images fill the unit square, whose y axis points up
                let transform = Matrix::new(1.0, 0.0, 0.0, -1.0, 0.0, 1.0).then(&self.state.ctm);
                let engine = base64::engine::general_purpose::STANDARD;

                let out = &mut self.body;
                out.push_str("<svg:image x=\"0\" y=\"0\" width=\"1\" height=\"1\" preserveAspectRatio=\"none\"");
                write_transform(out, &transform);
                let _ = write!(
                    out,
                    " href=\"data:{};base64,{}\"/>",
                    mime_type,
                    engine.encode(data)
                );
            }
            XObjectKind::Form { matrix, operations } => {
                if depth >= MAX_FORM_NESTING {
                    log::warn!("page {}: form XObjects nested too deeply", page.number);
                    return Ok(());
                }

                let saved = self.state.clone();
                let saved_depth = self.stack.len();
                let [a, b, c, d, e, f] = *matrix;
                self.state.ctm = Matrix::new(a, b, c, d, e, f).then(&self.state.ctm);

                let result = self.run(operations, depth + 1);

                self.stack.truncate(saved_depth);
                self.state = saved;
                result?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FillRule {
    NonZero,
    EvenOdd,
}

fn push_command(path: &mut String, command: char, coords: &[f32]) {
    if !path.is_empty() {
        path.push(' ');
    }
    path.push(command);
    for v in coords {
        path.push(' ');
        write_num(path, *v);
    }
}

fn write_transform(out: &mut String, matrix: &Matrix) {
    if !matrix.is_identity() {
        out.push_str(" transform=\"");
        matrix.write_svg(out);
        out.push('"');
    }
}

/// Color from `sc`/`scn` operands; pattern operands yield `None`.
fn color_from(operands: &[Operand]) -> Option<Color> {
    let values: Vec<f32> = operands
        .iter()
        .map(Operand::as_f32)
        .collect::<Option<Vec<_>>>()?;
    match values.as_slice() {
        [g] => Some(Color::Gray(*g)),
        [r, g, b] => Some(Color::Rgb(*r, *g, *b)),
        [c, m, y, k] => Some(Color::Cmyk(*c, *m, *y, *k)),
        _ => None,
    }
}
