//! Glyph grouping: clusters positioned glyphs into text lines.

use crate::model::BoundingBox;

use super::backend::Glyph;

/// A line of text assembled from glyphs.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Concatenated glyph text, in glyph order
    pub text: String,
    /// Union of the glyph boxes
    pub position: BoundingBox,
    /// Font name of the first glyph
    pub font: String,
    /// Font size of the first glyph
    pub size: f32,
}

impl TextLine {
    fn from_glyphs(glyphs: &[&Glyph]) -> Option<Self> {
        let first = glyphs.first()?;
        let position = BoundingBox::enclosing(
            glyphs
                .iter()
                .map(|g| BoundingBox::new(g.x0, g.x1, g.top, g.bottom)),
        )?;
        Some(Self {
            text: glyphs.iter().map(|g| g.text.as_str()).collect(),
            position,
            font: first.fontname.clone(),
            size: first.size,
        })
    }
}

/// Groups glyphs into lines by vertical proximity.
///
/// A glyph stays on the current line while its top differs from the previous
/// glyph's top by less than `line_factor × glyph.size`.
#[derive(Debug, Clone)]
pub struct GlyphGrouper {
    line_factor: f32,
}

impl GlyphGrouper {
    /// Create a grouper with the given same-line tolerance factor.
    pub fn new(line_factor: f32) -> Self {
        Self { line_factor }
    }

    /// Group a page's glyphs into lines, top to bottom.
    ///
    /// Lines whose text is blank after trimming are dropped.
    pub fn group(&self, glyphs: &[Glyph]) -> Vec<TextLine> {
        let mut sorted: Vec<&Glyph> = glyphs.iter().collect();
        sorted.sort_by(|a, b| a.top.total_cmp(&b.top));

        let mut lines = Vec::new();
        let mut buffer: Vec<&Glyph> = Vec::new();

        for glyph in sorted {
            let same_line = buffer
                .last()
                .is_some_and(|last| (glyph.top - last.top).abs() < self.line_factor * glyph.size);
            if !same_line {
                self.flush(&mut buffer, &mut lines);
            }
            buffer.push(glyph);
        }
        self.flush(&mut buffer, &mut lines);

        lines
    }

    fn flush(&self, buffer: &mut Vec<&Glyph>, lines: &mut Vec<TextLine>) {
        if let Some(line) = TextLine::from_glyphs(buffer) {
            if !line.text.trim().is_empty() {
                lines.push(line);
            }
        }
        buffer.clear();
    }
}

impl Default for GlyphGrouper {
    fn default() -> Self {
        Self::new(0.5)
    }
}
