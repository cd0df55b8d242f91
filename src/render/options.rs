//! Rendering options and configuration.

use std::path::PathBuf;

use super::font::CjkCollection;
use crate::parser::DEFAULT_PAGE_SIZE;

/// Options for reassembling a document.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// TrueType font embedded for all text (PDF output only).
    ///
    /// When unset, documents that fit WinAnsi use Helvetica and all others
    /// use the predefined CJK font selected by `cjk_font`.
    pub font_path: Option<PathBuf>,

    /// Predefined CJK font used when no TrueType font is configured
    pub cjk_font: CjkCollection,

    /// Size multiplier for title lines
    pub title_scale: f32,

    /// Vertical offset applied to every border segment
    pub border_offset: f32,

    /// Horizontal offset added to every cell's x position
    pub cell_padding: f32,

    /// Canvas size for documents without pages
    pub default_page_size: (f32, f32),

    /// Font size used for items that carry no usable size
    pub default_font_size: f32,

    /// Border stroke width
    pub line_width: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            font_path: None,
            cjk_font: CjkCollection::default(),
            title_scale: 1.2,
            border_offset: 0.0,
            cell_padding: 0.0,
            default_page_size: DEFAULT_PAGE_SIZE,
            default_font_size: 12.0,
            line_width: 0.5,
        }
    }
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed the given TrueType font.
    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    /// Select the predefined CJK font.
    pub fn with_cjk_font(mut self, collection: CjkCollection) -> Self {
        self.cjk_font = collection;
        self
    }

    /// Set the title size multiplier.
    pub fn with_title_scale(mut self, scale: f32) -> Self {
        self.title_scale = scale.max(0.1);
        self
    }

    /// Set the border vertical offset.
    pub fn with_border_offset(mut self, offset: f32) -> Self {
        self.border_offset = offset;
        self
    }

    /// Set the cell horizontal padding.
    pub fn with_cell_padding(mut self, padding: f32) -> Self {
        self.cell_padding = padding;
        self
    }

    /// Set the canvas size used when the document has no pages.
    pub fn with_default_page_size(mut self, width: f32, height: f32) -> Self {
        self.default_page_size = (width, height);
        self
    }

    /// Set the font size for items without one.
    pub fn with_default_font_size(mut self, size: f32) -> Self {
        self.default_font_size = size;
        self
    }

    /// Font size to draw an item with.
    pub(crate) fn effective_size(&self, size: f32) -> f32 {
        if size.is_finite() && size > 0.0 {
            size
        } else {
            self.default_font_size
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = RenderOptions::default();
        assert!(opts.font_path.is_none());
        assert_eq!(opts.cjk_font, CjkCollection::SimplifiedChinese);
        assert_eq!(opts.title_scale, 1.2);
        assert_eq!(opts.default_page_size, (612.0, 792.0));
    }

    #[test]
    fn test_builder() {
        let opts = RenderOptions::new()
            .with_font("/fonts/NotoSansSC.ttf")
            .with_border_offset(-2.0)
            .with_cell_padding(3.0)
            .with_title_scale(0.0)
            .with_cjk_font(CjkCollection::Korean);
        assert_eq!(opts.font_path, Some(PathBuf::from("/fonts/NotoSansSC.ttf")));
        assert_eq!(opts.border_offset, -2.0);
        assert_eq!(opts.cell_padding, 3.0);
        assert_eq!(opts.title_scale, 0.1);
        assert_eq!(opts.cjk_font, CjkCollection::Korean);
    }

    #[test]
    fn test_effective_size() {
        let opts = RenderOptions::default();
        assert_eq!(opts.effective_size(9.0), 9.0);
        assert_eq!(opts.effective_size(0.0), 12.0);
        assert_eq!(opts.effective_size(f32::NAN), 12.0);
    }
}
