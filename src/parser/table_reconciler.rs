//! Reconciles raw table grids with the page's glyphs and line segments.
//!
//! Cell geometry is recovered by text matching: a cell claims the first
//! contiguous run of unclaimed, non-whitespace glyphs (in content stream
//! order) that spells its text. Identical short strings appearing both in
//! and outside a table can still be mis-assigned when the outside
//! occurrence comes first in the stream.

use crate::error::Result;
use crate::model::{Borders, BoundingBox, CellSet, Segment, TableCell, TableContent};

use super::backend::Glyph;
use super::grouper::TextLine;
use super::table_detector::RawTable;

/// Remove table cell text from prose lines so it is not emitted twice.
///
/// Every non-empty cell string found in a line is deleted from it; lines
/// left blank are dropped. Whitespace is ignored while matching, since the
/// table detector inserts spaces at word gaps that have no space glyph.
pub fn filter_table_text(lines: Vec<TextLine>, tables: &[RawTable]) -> Vec<TextLine> {
    if tables.is_empty() {
        return lines;
    }
    lines
        .into_iter()
        .filter_map(|mut line| {
            for cell in tables.iter().flatten().flatten().flatten() {
                line.text = remove_all_ignoring_whitespace(&line.text, cell);
            }
            (!line.text.trim().is_empty()).then_some(line)
        })
        .collect()
}

/// Delete every occurrence of `needle` from `haystack`, where whitespace on
/// either side does not take part in the comparison.
fn remove_all_ignoring_whitespace(haystack: &str, needle: &str) -> String {
    let target: Vec<char> = needle.chars().filter(|c| !c.is_whitespace()).collect();
    if target.is_empty() {
        return haystack.to_string();
    }

    let mut text = haystack.to_string();
    let mut from = 0;
    loop {
        // Non-whitespace chars with their byte offsets
        let visible: Vec<(usize, char)> = text
            .char_indices()
            .filter(|(_, c)| !c.is_whitespace())
            .collect();
        if visible.len() < target.len() {
            return text;
        }
        let found = (from..=visible.len() - target.len()).find(|&start| {
            visible[start..start + target.len()]
                .iter()
                .zip(&target)
                .all(|((_, a), b)| a == b)
        });
        let Some(start) = found else {
            return text;
        };
        let (begin, _) = visible[start];
        let (last, last_char) = visible[start + target.len() - 1];
        text.replace_range(begin..last + last_char.len_utf8(), "");
        from = start;
    }
}

/// Builds positioned [`TableContent`] items from raw grids.
#[derive(Debug, Clone)]
pub struct TableReconciler<'g> {
    glyphs: Vec<&'g Glyph>,
    claimed: Vec<bool>,
    border_tolerance: f32,
}

impl<'g> TableReconciler<'g> {
    /// Create a reconciler over a page's glyphs.
    pub fn new(glyphs: &'g [Glyph], border_tolerance: f32) -> Self {
        let glyphs: Vec<&Glyph> = glyphs
            .iter()
            .filter(|g| !g.text.trim().is_empty())
            .collect();
        let claimed = vec![false; glyphs.len()];
        Self {
            glyphs,
            claimed,
            border_tolerance,
        }
    }

    /// Locate cells, compute the table box and select its borders.
    ///
    /// Returns `Ok(None)` when no cell could be located on the page.
    pub fn reconcile(
        &mut self,
        table: &RawTable,
        segments: &[Segment],
    ) -> Result<Option<TableContent>> {
        let mut cells = Vec::new();
        for (row, row_cells) in table.iter().enumerate() {
            for (col, cell) in row_cells.iter().enumerate() {
                let Some(text) = cell.as_deref().filter(|t| !t.trim().is_empty()) else {
                    continue;
                };
                match self.locate(text) {
                    Some(matched) => {
                        let position = BoundingBox::enclosing(
                            matched
                                .iter()
                                .map(|g| BoundingBox::new(g.x0, g.x1, g.top, g.bottom)),
                        )
                        .unwrap_or_default();
                        let first = matched[0];
                        cells.push(TableCell {
                            text: text.to_string(),
                            position,
                            font: first.fontname.clone(),
                            size: first.size,
                            row,
                            col,
                        });
                    }
                    None => log::debug!("Cell ({row}, {col}) {text:?} not found among glyphs"),
                }
            }
        }

        let Some(position) = BoundingBox::enclosing(cells.iter().map(|c| c.position)) else {
            log::warn!("Skipping table: none of its cells could be located");
            return Ok(None);
        };

        let borders = select_borders(segments, &position, self.border_tolerance);
        Ok(Some(TableContent::new(CellSet::new(cells)?, position, borders)))
    }

    /// Claim the first unclaimed contiguous glyph run spelling `text`.
    fn locate(&mut self, text: &str) -> Option<Vec<&'g Glyph>> {
        let target: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        if target.is_empty() {
            return None;
        }

        for start in 0..self.glyphs.len() {
            if let Some(end) = self.match_at(start, &target) {
                self.claimed[start..end].iter_mut().for_each(|c| *c = true);
                return Some(self.glyphs[start..end].to_vec());
            }
        }
        None
    }

    /// End index of a run starting at `start` that spells `target`.
    fn match_at(&self, start: usize, target: &str) -> Option<usize> {
        let mut rest = target;
        for (i, glyph) in self.glyphs.iter().enumerate().skip(start) {
            if self.claimed[i] {
                return None;
            }
            let piece: String = glyph.text.chars().filter(|c| !c.is_whitespace()).collect();
            rest = rest.strip_prefix(piece.as_str())?;
            if rest.is_empty() {
                return Some(i + 1);
            }
        }
        None
    }
}

/// Select border segments lying within the table box along their own axis.
///
/// Horizontal segments must span no further than the box's x-range and
/// vertical segments no further than its y-range, each widened by `tolerance`.
pub fn select_borders(segments: &[Segment], bbox: &BoundingBox, tolerance: f32) -> Borders {
    let mut borders = Borders::default();
    for segment in segments {
        if segment.is_horizontal(0.5) {
            if segment.x0 >= bbox.x0 - tolerance && segment.x1 <= bbox.x1 + tolerance {
                borders.horizontal.push(*segment);
            }
        } else if segment.is_vertical(0.5)
            && segment.y0 >= bbox.y0 - tolerance
            && segment.y1 <= bbox.y1 + tolerance
        {
            borders.vertical.push(*segment);
        }
    }
    borders
}
