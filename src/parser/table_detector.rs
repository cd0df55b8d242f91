//! Table detection using text position analysis (Stream mode algorithm).
//!
//! Inspired by Camelot's Stream mode, this module detects tables by analyzing
//! text alignment patterns without relying on graphical lines. The result is
//! a raw grid of optional cell strings per table; cell geometry is recovered
//! afterwards by [`super::table_reconciler`].

use std::collections::{HashMap, HashSet};

use super::backend::Glyph;

/// A run of glyphs on one row separated from its neighbours by a wide gap.
#[derive(Debug, Clone)]
pub struct TextSpan {
    /// Span text with single spaces between words
    pub text: String,
    /// Left edge
    pub x: f32,
    /// Span width
    pub width: f32,
    /// Top edge (top-down coordinates)
    pub top: f32,
    /// Font size of the first glyph
    pub font_size: f32,
}

/// A row of text spans in a table.
#[derive(Debug, Clone)]
pub struct TableRowData {
    /// Mean top of the spans in this row
    pub y: f32,
    /// Spans in this row, sorted by X
    pub spans: Vec<TextSpan>,
}

/// A detected table region with its content.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// Top of the first row
    pub top_y: f32,
    /// Top of the last row
    pub bottom_y: f32,
    /// Left X boundary
    pub left_x: f32,
    /// Right X boundary
    pub right_x: f32,
    /// Detected column boundaries (X coordinates)
    pub columns: Vec<f32>,
    /// Rows of text spans, top to bottom
    pub rows: Vec<TableRowData>,
}

/// Ordered grid of optional cell strings, one inner vector per row.
pub type RawTable = Vec<Vec<Option<String>>>;

/// Table detector configuration.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
    /// Horizontal gap that splits a row into spans (fraction of font size)
    pub span_gap_factor: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
            span_gap_factor: 1.0,
        }
    }
}

/// Bucket width for left-edge alignment.
const BUCKET_SIZE: f32 = 5.0;

/// Alignment tolerance between a span and a column edge.
const ALIGN_TOLERANCE: f32 = 5.0;

/// Detects tables in a page's glyphs.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables and return their raw cell grids, top to bottom.
    pub fn extract_tables(&self, glyphs: &[Glyph]) -> Vec<RawTable> {
        let spans = self.build_spans(glyphs);
        self.detect(&spans)
            .iter()
            .map(|table| self.to_grid(table))
            .collect()
    }

    /// Merge glyphs into spans: rows by vertical proximity, then split at wide gaps.
    pub fn build_spans(&self, glyphs: &[Glyph]) -> Vec<TextSpan> {
        let mut sorted: Vec<&Glyph> = glyphs.iter().collect();
        sorted.sort_by(|a, b| a.top.total_cmp(&b.top));

        let mut rows: Vec<Vec<&Glyph>> = Vec::new();
        for glyph in sorted {
            let tolerance = glyph.size * self.config.y_tolerance_factor;
            match rows.last_mut() {
                Some(row) if row.first().is_some_and(|g| (glyph.top - g.top).abs() <= tolerance) => {
                    row.push(glyph)
                }
                _ => rows.push(vec![glyph]),
            }
        }

        let mut spans = Vec::new();
        for mut row in rows {
            row.sort_by(|a, b| a.x0.total_cmp(&b.x0));

            let mut current: Option<TextSpan> = None;
            let mut pending_space = false;
            for glyph in row {
                if glyph.text.trim().is_empty() {
                    pending_space = true;
                    continue;
                }
                let gap_limit = glyph.size * self.config.span_gap_factor;
                match current.as_mut() {
                    Some(span) if glyph.x0 - (span.x + span.width) <= gap_limit => {
                        let gap = glyph.x0 - (span.x + span.width);
                        if pending_space || gap > glyph.size * 0.25 {
                            span.text.push(' ');
                        }
                        span.text.push_str(&glyph.text);
                        span.width = glyph.x1.max(span.x + span.width) - span.x;
                    }
                    _ => {
                        spans.extend(current.take());
                        current = Some(TextSpan {
                            text: glyph.text.clone(),
                            x: glyph.x0,
                            width: glyph.x1 - glyph.x0,
                            top: glyph.top,
                            font_size: glyph.size,
                        });
                    }
                }
                pending_space = false;
            }
            spans.extend(current);
        }
        spans
    }

    /// Detect table regions in the given spans.
    pub fn detect(&self, spans: &[TextSpan]) -> Vec<DetectedTable> {
        log::debug!("TableDetector: starting with {} spans", spans.len());

        if spans.len() < self.config.min_rows * self.config.min_columns {
            return vec![];
        }

        let rows = self.group_into_rows(spans);
        if rows.len() < self.config.min_rows {
            return vec![];
        }

        let columns = self.detect_columns(&rows);
        log::debug!(
            "TableDetector: {} rows, {} columns at {:?}",
            rows.len(),
            columns.len(),
            columns
        );
        if columns.len() < self.config.min_columns {
            return vec![];
        }

        let mut detected_tables = Vec::new();
        for (start_row, end_row) in self.find_table_regions(&rows, &columns) {
            let table_rows: Vec<TableRowData> = rows[start_row..=end_row].to_vec();

            // Re-detect columns for this specific table region
            let table_columns = self.detect_columns(&table_rows);
            if table_columns.len() < self.config.min_columns {
                continue;
            }
            if table_columns.len() > self.config.max_columns {
                log::debug!(
                    "TableDetector: skipping region - too many columns ({} > {})",
                    table_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if self.is_list_pattern(&table_rows, &table_columns) {
                log::debug!("TableDetector: skipping region - detected as list pattern");
                continue;
            }

            let all_spans = || table_rows.iter().flat_map(|r| r.spans.iter());
            let left_x = all_spans().map(|s| s.x).fold(f32::INFINITY, f32::min);
            let right_x = all_spans()
                .map(|s| s.x + s.width)
                .fold(f32::NEG_INFINITY, f32::max);

            detected_tables.push(DetectedTable {
                top_y: table_rows.first().map(|r| r.y).unwrap_or(0.0),
                bottom_y: table_rows.last().map(|r| r.y).unwrap_or(0.0),
                left_x,
                right_x,
                columns: table_columns,
                rows: table_rows,
            });
        }

        log::debug!("TableDetector: found {} tables", detected_tables.len());
        detected_tables
    }

    /// Group spans into rows by their top edge.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<TableRowData> {
        let mut sorted_spans = spans.to_vec();
        sorted_spans.sort_by(|a, b| a.top.total_cmp(&b.top).then(a.x.total_cmp(&b.x)));

        let mut rows: Vec<TableRowData> = Vec::new();
        let mut current_row_spans: Vec<TextSpan> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in sorted_spans {
            let y_tolerance = span.font_size * self.config.y_tolerance_factor;
            match current_y {
                Some(y) if (span.top - y).abs() <= y_tolerance => current_row_spans.push(span),
                _ => {
                    if !current_row_spans.is_empty() {
                        rows.push(make_row(std::mem::take(&mut current_row_spans)));
                    }
                    current_y = Some(span.top);
                    current_row_spans.push(span);
                }
            }
        }
        if !current_row_spans.is_empty() {
            rows.push(make_row(current_row_spans));
        }

        rows
    }

    /// Detect column boundaries from aligned left edges.
    fn detect_columns(&self, rows: &[TableRowData]) -> Vec<f32> {
        let multi_span_rows: Vec<&TableRowData> =
            rows.iter().filter(|r| r.spans.len() >= 2).collect();

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        let sample_size = if multi_span_rows.len() >= self.config.min_rows {
            // Count each bucket once per row
            for row in &multi_span_rows {
                let buckets: HashSet<i32> = row
                    .spans
                    .iter()
                    .map(|s| (s.x / BUCKET_SIZE).round() as i32)
                    .collect();
                for bucket in buckets {
                    *edge_counts.entry(bucket).or_insert(0) += 1;
                }
            }
            multi_span_rows.len()
        } else {
            for span in rows.iter().flat_map(|r| r.spans.iter()) {
                *edge_counts
                    .entry((span.x / BUCKET_SIZE).round() as i32)
                    .or_insert(0) += 1;
            }
            rows.len()
        };

        let min_occurrences =
            ((sample_size as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut column_edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * BUCKET_SIZE)
            .collect();
        column_edges.sort_by(f32::total_cmp);

        // Merge close edges
        let mut merged_edges: Vec<f32> = Vec::new();
        for edge in column_edges {
            match merged_edges.last() {
                Some(last) if edge - last < self.config.min_column_gap => {}
                _ => merged_edges.push(edge),
            }
        }
        merged_edges
    }

    /// Find contiguous row regions that form tables.
    fn find_table_regions(&self, rows: &[TableRowData], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions: Vec<(usize, usize)> = Vec::new();
        let mut current_start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned = row.spans.len() >= 2
                && self.calculate_alignment_score(row, columns) >= self.config.min_alignment_ratio;
            match (aligned, current_start) {
                (true, None) => current_start = Some(i),
                (false, Some(start)) => {
                    if i - start >= self.config.min_rows {
                        regions.push((start, i - 1));
                    }
                    current_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = current_start {
            if rows.len() - start >= self.config.min_rows {
                regions.push((start, rows.len() - 1));
            }
        }

        regions
    }

    /// Fraction of a row's spans that start on a column edge.
    fn calculate_alignment_score(&self, row: &TableRowData, columns: &[f32]) -> f32 {
        if row.spans.is_empty() || columns.is_empty() {
            return 0.0;
        }
        let aligned_spans = row
            .spans
            .iter()
            .filter(|span| columns.iter().any(|col| (span.x - col).abs() <= ALIGN_TOLERANCE))
            .count();
        aligned_spans as f32 / row.spans.len() as f32
    }

    /// Convert a detected table to a raw grid of cell strings.
    pub fn to_grid(&self, detected: &DetectedTable) -> RawTable {
        let columns = &detected.columns;
        detected
            .rows
            .iter()
            .map(|row_data| {
                let mut cell_contents: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
                for span in &row_data.spans {
                    let col_idx = find_column_for_span(span.x, columns, detected.right_x);
                    if let Some(cell) = cell_contents.get_mut(col_idx) {
                        cell.push(span.text.trim());
                    }
                }
                cell_contents
                    .into_iter()
                    .map(|contents| {
                        let text = contents.join(" ");
                        (!text.is_empty()).then_some(text)
                    })
                    .collect()
            })
            .collect()
    }

    /// Check if detected table rows actually represent a numbered or bulleted list.
    ///
    /// Numbered items like "1. Item" become separate spans at different X
    /// positions, which looks like a multi-column table to the detector.
    fn is_list_pattern(&self, rows: &[TableRowData], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullet_count = 0;
        let mut number_count = 0;
        for row in rows {
            let first_span = row.spans.iter().min_by(|a, b| a.x.total_cmp(&b.x));
            if let Some(span) = first_span {
                let text = span.text.trim();
                if is_bullet_marker(text) {
                    bullet_count += 1;
                } else if is_number_marker(text) {
                    number_count += 1;
                }
            }
        }

        let bullet_ratio = bullet_count as f32 / rows.len() as f32;
        let total_ratio = (bullet_count + number_count) as f32 / rows.len() as f32;

        // Bullet markers are almost never real table data; numbered markers
        // only disqualify two-column regions.
        bullet_ratio >= 0.5 || (columns.len() == 2 && total_ratio >= 0.5)
    }
}

fn make_row(spans: Vec<TextSpan>) -> TableRowData {
    let y = spans.iter().map(|s| s.top).sum::<f32>() / spans.len() as f32;
    TableRowData { y, spans }
}

/// Find which column a span belongs to based on its X position.
fn find_column_for_span(span_x: f32, columns: &[f32], right_x: f32) -> usize {
    for (i, &col_start) in columns.iter().enumerate() {
        let col_end = columns.get(i + 1).copied().unwrap_or(right_x + 100.0);
        // Allow 10pt for spans slightly before the column start
        if span_x >= col_start - 10.0 && span_x < col_end - 10.0 {
            return i;
        }
    }

    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| (span_x - **a).abs().total_cmp(&(span_x - **b).abs()))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Check if text is a bullet marker.
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "▸" | "►" | "■" | "●" | "◆" | "▶" | "➤"
    )
}

/// Check if text is a number-style list marker (1., 2), a., etc.).
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let (prefix, suffix) = cleaned.split_at(pos);
        if !prefix.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }
    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    let chars: Vec<char> = cleaned.chars().collect();
    chars.len() == 2 && chars[0].is_alphabetic() && (chars[1] == '.' || chars[1] == ')')
}
