//! Content stream interpretation.
//!
//! Walks the operators of a page content stream, tracking the graphics and
//! text state, and records one [`Glyph`] per shown character code plus the
//! straight line segments of every painted path.

use std::collections::BTreeMap;

use lopdf::content::Operation;
use lopdf::Object;

use crate::model::Segment;

use super::backend::Glyph;

/// Font access needed to position and decode shown text.
pub trait GlyphFont {
    /// Base font name (e.g. "Helvetica-Bold").
    fn name(&self) -> &str;

    /// Bytes per character code (1 for simple fonts, 2 for Type0).
    fn code_len(&self) -> usize;

    /// Decode a single character code to Unicode text.
    fn decode(&self, code: &[u8]) -> String;

    /// Horizontal advance of a character code in glyph space (1/1000 em).
    fn advance(&self, code: u32) -> f32;
}

/// 2D affine matrix `[a b c d e f]` using PDF's row-vector convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    fn translation(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`: apply `self` first, then `other`.
    fn then(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Length of the transformed vertical unit vector.
    fn vertical_scale(&self) -> f32 {
        (self.c * self.c + self.d * self.d).sqrt()
    }
}

/// Graphics state saved and restored by `q`/`Q`.
#[derive(Debug, Clone)]
struct GraphicsState {
    ctm: Matrix,
    font: Option<Vec<u8>>,
    font_size: f32,
    char_spacing: f32,
    word_spacing: f32,
    h_scale: f32,
    leading: f32,
    rise: f32,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::IDENTITY,
            font: None,
            font_size: 12.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            h_scale: 1.0,
            leading: 0.0,
            rise: 0.0,
        }
    }
}

/// Result of interpreting one content stream.
#[derive(Debug, Default)]
pub struct PageMarks {
    /// Shown characters, in stream order
    pub glyphs: Vec<Glyph>,
    /// Axis-aligned line segments of painted paths
    pub segments: Vec<Segment>,
}

/// Stateful content stream interpreter for one page.
pub struct ContentInterpreter<'f, F: GlyphFont> {
    fonts: &'f BTreeMap<Vec<u8>, F>,
    origin: (f32, f32),
    height: f32,
    state: GraphicsState,
    stack: Vec<GraphicsState>,
    tm: Matrix,
    tlm: Matrix,
    path: Vec<((f32, f32), (f32, f32))>,
    current: Option<(f32, f32)>,
    subpath_start: Option<(f32, f32)>,
    marks: PageMarks,
}

/// Segments thinner than this are treated as axis-aligned.
const AXIS_TOLERANCE: f32 = 0.5;

impl<'f, F: GlyphFont> ContentInterpreter<'f, F> {
    /// Create an interpreter for a page whose media box starts at `origin`
    /// and is `height` units tall.
    pub fn new(fonts: &'f BTreeMap<Vec<u8>, F>, origin: (f32, f32), height: f32) -> Self {
        Self {
            fonts,
            origin,
            height,
            state: GraphicsState::default(),
            stack: Vec::new(),
            tm: Matrix::IDENTITY,
            tlm: Matrix::IDENTITY,
            path: Vec::new(),
            current: None,
            subpath_start: None,
            marks: PageMarks::default(),
        }
    }

    /// Interpret all operations and return the collected marks.
    pub fn run(mut self, operations: &[Operation]) -> PageMarks {
        for op in operations {
            self.step(op);
        }
        self.marks
    }

    fn step(&mut self, op: &Operation) {
        let nums: Vec<f32> = op.operands.iter().filter_map(number).collect();
        match op.operator.as_str() {
            "q" => self.stack.push(self.state.clone()),
            "Q" => {
                if let Some(saved) = self.stack.pop() {
                    self.state = saved;
                }
            }
            "cm" if nums.len() >= 6 => {
                let m = Matrix::new(nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]);
                self.state.ctm = m.then(&self.state.ctm);
            }

            "BT" => {
                self.tm = Matrix::IDENTITY;
                self.tlm = Matrix::IDENTITY;
            }
            "ET" => {}
            "Tf" => {
                if let Some(Object::Name(name)) = op.operands.first() {
                    self.state.font = Some(name.clone());
                }
                if let Some(size) = op.operands.get(1).and_then(number) {
                    self.state.font_size = size;
                }
            }
            "Tc" if !nums.is_empty() => self.state.char_spacing = nums[0],
            "Tw" if !nums.is_empty() => self.state.word_spacing = nums[0],
            "Tz" if !nums.is_empty() => self.state.h_scale = nums[0] / 100.0,
            "TL" if !nums.is_empty() => self.state.leading = nums[0],
            "Ts" if !nums.is_empty() => self.state.rise = nums[0],
            "Td" if nums.len() >= 2 => self.move_line(nums[0], nums[1]),
            "TD" if nums.len() >= 2 => {
                self.state.leading = -nums[1];
                self.move_line(nums[0], nums[1]);
            }
            "Tm" if nums.len() >= 6 => {
                self.tm = Matrix::new(nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]);
                self.tlm = self.tm;
            }
            "T*" => self.next_line(),
            "Tj" => {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    self.show(bytes);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    for item in items {
                        match item {
                            Object::String(bytes, _) => self.show(bytes),
                            other => {
                                if let Some(adjust) = number(other) {
                                    let tx = -adjust / 1000.0
                                        * self.state.font_size
                                        * self.state.h_scale;
                                    self.tm = Matrix::translation(tx, 0.0).then(&self.tm);
                                }
                            }
                        }
                    }
                }
            }
            "'" => {
                self.next_line();
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    self.show(bytes);
                }
            }
            "\"" => {
                if nums.len() >= 2 {
                    self.state.word_spacing = nums[0];
                    self.state.char_spacing = nums[1];
                }
                self.next_line();
                if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                    self.show(bytes);
                }
            }

            "m" if nums.len() >= 2 => {
                let p = self.state.ctm.apply(nums[0], nums[1]);
                self.current = Some(p);
                self.subpath_start = Some(p);
            }
            "l" if nums.len() >= 2 => {
                let p = self.state.ctm.apply(nums[0], nums[1]);
                if let Some(from) = self.current {
                    self.path.push((from, p));
                }
                self.current = Some(p);
            }
            "c" if nums.len() >= 6 => self.current = Some(self.state.ctm.apply(nums[4], nums[5])),
            "v" | "y" if nums.len() >= 4 => {
                self.current = Some(self.state.ctm.apply(nums[2], nums[3]))
            }
            "re" if nums.len() >= 4 => {
                let (x, y, w, h) = (nums[0], nums[1], nums[2], nums[3]);
                let corners = [
                    self.state.ctm.apply(x, y),
                    self.state.ctm.apply(x + w, y),
                    self.state.ctm.apply(x + w, y + h),
                    self.state.ctm.apply(x, y + h),
                ];
                for i in 0..4 {
                    self.path.push((corners[i], corners[(i + 1) % 4]));
                }
                self.current = Some(corners[0]);
                self.subpath_start = Some(corners[0]);
            }
            "h" => self.close_subpath(),
            "S" | "f" | "F" | "f*" | "B" | "B*" => self.paint(),
            "s" | "b" | "b*" => {
                self.close_subpath();
                self.paint();
            }
            "n" => self.discard_path(),
            _ => {}
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.tlm = Matrix::translation(tx, ty).then(&self.tlm);
        self.tm = self.tlm;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.state.leading);
    }

    fn show(&mut self, bytes: &[u8]) {
        let Some(font) = self.state.font.as_ref().and_then(|n| self.fonts.get(n)) else {
            return;
        };
        let code_len = font.code_len().max(1);
        let size = self.state.font_size;
        let h_scale = self.state.h_scale;

        for code in bytes.chunks(code_len) {
            let value = code.iter().fold(0u32, |acc, b| (acc << 8) | u32::from(*b));
            let mut tx = font.advance(value) / 1000.0 * size + self.state.char_spacing;
            if code_len == 1 && value == 32 {
                tx += self.state.word_spacing;
            }
            tx *= h_scale;

            let m = self.tm.then(&self.state.ctm);
            let start = m.apply(0.0, self.state.rise);
            let end = m.apply(tx, self.state.rise);
            let effective_size = size * m.vertical_scale();

            let text = font.decode(code);
            if !text.is_empty() {
                let baseline = start.1 - self.origin.1;
                self.marks.glyphs.push(Glyph {
                    text,
                    x0: start.0.min(end.0) - self.origin.0,
                    x1: start.0.max(end.0) - self.origin.0,
                    top: self.height - (baseline + effective_size * 0.8),
                    bottom: self.height - (baseline - effective_size * 0.2),
                    fontname: font.name().to_string(),
                    size: effective_size,
                });
            }

            self.tm = Matrix::translation(tx, 0.0).then(&self.tm);
        }
    }

    fn close_subpath(&mut self) {
        if let (Some(from), Some(to)) = (self.current, self.subpath_start) {
            if from != to {
                self.path.push((from, to));
            }
            self.current = Some(to);
        }
    }

    fn paint(&mut self) {
        for ((xa, ya), (xb, yb)) in self.path.drain(..) {
            let (ox, oy) = self.origin;
            let segment = Segment::new(
                xa - ox,
                self.height - (ya - oy),
                xb - ox,
                self.height - (yb - oy),
            );
            if segment.is_horizontal(AXIS_TOLERANCE) || segment.is_vertical(AXIS_TOLERANCE) {
                self.marks.segments.push(segment);
            }
        }
        self.current = None;
        self.subpath_start = None;
    }

    fn discard_path(&mut self) {
        self.path.clear();
        self.current = None;
        self.subpath_start = None;
    }
}

/// Extract a number from a content stream operand.
pub(crate) fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}
