//! Document-level types.

use std::path::{Path, PathBuf};

use super::{Content, Page};
use serde::Serialize;

/// A document extracted from a PDF file.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    /// Path of the source PDF
    pub source: PathBuf,

    /// Pages in source order
    pub pages: Vec<Page>,
}

impl Document {
    /// Create a new empty document for the given source file.
    pub fn new(source: impl AsRef<Path>) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            pages: Vec::new(),
        }
    }

    /// Get the number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Add a page to the document.
    pub fn add_page(&mut self, page: Page) {
        self.pages.push(page);
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Total number of content items across all pages.
    pub fn content_count(&self) -> usize {
        self.pages.iter().map(|p| p.contents.len()).sum()
    }

    /// Iterate all content items mutably, page by page.
    pub fn contents_mut(&mut self) -> impl Iterator<Item = &mut Content> {
        self.pages.iter_mut().flat_map(|p| p.contents.iter_mut())
    }

    /// Canvas size used for reassembly: the first page's dimensions.
    pub fn canvas_size(&self) -> Option<(f32, f32)> {
        self.pages.first().map(|p| p.dimensions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, ElementType, TextContent};

    #[test]
    fn test_document_new() {
        let doc = Document::new("book.pdf");
        assert!(doc.is_empty());
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.canvas_size(), None);
        assert_eq!(doc.source, PathBuf::from("book.pdf"));
    }

    #[test]
    fn test_content_count() {
        let mut doc = Document::new("book.pdf");
        let mut page = Page::new(1, 595.0, 842.0);
        page.add_content(TextContent::new(
            ElementType::Title,
            "Intro",
            BoundingBox::default(),
            "Helvetica-Bold",
            18.0,
        ));
        doc.add_page(page);
        doc.add_page(Page::letter(2));

        assert_eq!(doc.content_count(), 1);
        assert_eq!(doc.contents_mut().count(), 1);
        assert_eq!(doc.canvas_size(), Some((595.0, 842.0)));
    }
}
