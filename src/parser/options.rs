//! Parsing options and configuration.

use super::table_detector::TableDetectorConfig;

/// Options for extracting a document model from a PDF.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Number of leading pages to parse (`None` or `Some(0)` = all pages)
    pub page_limit: Option<usize>,

    /// Whether to run table detection
    pub detect_tables: bool,

    /// Table detector tuning
    pub table_config: TableDetectorConfig,

    /// Margin used when selecting border segments around a table
    pub border_tolerance: f32,

    /// Same-line tolerance as a fraction of glyph size
    pub line_factor: f32,

    /// Lines larger than this multiple of the mean size are titles
    pub title_factor: f32,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse only the first `pages` pages (0 = all).
    pub fn with_page_limit(mut self, pages: usize) -> Self {
        self.page_limit = Some(pages);
        self
    }

    /// Enable or disable table detection.
    pub fn with_tables(mut self, detect: bool) -> Self {
        self.detect_tables = detect;
        self
    }

    /// Skip table detection.
    pub fn text_only(mut self) -> Self {
        self.detect_tables = false;
        self
    }

    /// Set table detector tuning.
    pub fn with_table_config(mut self, config: TableDetectorConfig) -> Self {
        self.table_config = config;
        self
    }

    /// Set the border selection margin.
    pub fn with_border_tolerance(mut self, tolerance: f32) -> Self {
        self.border_tolerance = tolerance;
        self
    }

    /// Set the same-line tolerance factor.
    pub fn with_line_factor(mut self, factor: f32) -> Self {
        self.line_factor = factor;
        self
    }

    /// Set the title size factor.
    pub fn with_title_factor(mut self, factor: f32) -> Self {
        self.title_factor = factor;
        self
    }

    /// Effective page limit, treating zero as "all pages".
    pub fn effective_limit(&self) -> Option<usize> {
        self.page_limit.filter(|&n| n > 0)
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            page_limit: None,
            detect_tables: true,
            table_config: TableDetectorConfig::default(),
            border_tolerance: 5.0,
            line_factor: 0.5,
            title_factor: 1.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .with_page_limit(3)
            .text_only()
            .with_border_tolerance(2.0)
            .with_title_factor(1.5);

        assert_eq!(options.effective_limit(), Some(3));
        assert!(!options.detect_tables);
        assert_eq!(options.border_tolerance, 2.0);
        assert_eq!(options.title_factor, 1.5);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::default();
        assert_eq!(options.effective_limit(), None);
        assert!(options.detect_tables);
        assert_eq!(options.line_factor, 0.5);
    }

    #[test]
    fn test_zero_limit_means_all() {
        let options = ParseOptions::new().with_page_limit(0);
        assert_eq!(options.effective_limit(), None);
    }
}
