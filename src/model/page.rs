//! Page-level types.

use super::Content;
use serde::Serialize;

/// A single page in the document.
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Content items in extraction order
    pub contents: Vec<Content>,
}

impl Page {
    /// Create a new page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            contents: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size (8.5 x 11 inches).
    pub fn letter(number: u32) -> Self {
        Self::new(number, 612.0, 792.0)
    }

    /// Add a content item to the page.
    pub fn add_content(&mut self, content: impl Into<Content>) {
        self.contents.push(content.into());
    }

    /// Content items ordered top to bottom by `position.y0`.
    ///
    /// Extraction order interleaves text lines with tables, so it is not
    /// monotonic; ties keep extraction order.
    pub fn contents_top_down(&self) -> Vec<&Content> {
        let mut sorted: Vec<&Content> = self.contents.iter().collect();
        sorted.sort_by(|a, b| a.position().y0.total_cmp(&b.position().y0));
        sorted
    }

    /// Check if the page has no content items.
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn dimensions(&self) -> (f32, f32) {
        (self.width, self.height)
    }
}
