//! PDF document parser: raw page geometry to document model.

use std::path::{Path, PathBuf};

use crate::detect::detect_version_from_path;
use crate::error::{Error, Result};
use crate::model::{Content, Document, Page};

use super::backend::{LopdfBackend, PageGeometry, PdfBackend};
use super::classifier::ElementClassifier;
use super::grouper::GlyphGrouper;
use super::options::ParseOptions;
use super::table_detector::TableDetector;
use super::table_reconciler::{filter_table_text, TableReconciler};

/// PDF document parser.
pub struct PdfParser<B: PdfBackend = LopdfBackend> {
    backend: B,
    source: PathBuf,
    options: ParseOptions,
}

impl PdfParser<LopdfBackend> {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        let version = detect_version_from_path(path)?;
        log::debug!("Opening {} (PDF {})", path.display(), version);

        let backend = LopdfBackend::load_file(path)?;
        Ok(Self::with_backend(backend, path, options))
    }

    /// Parse a PDF held in memory; `source` names it in the resulting document.
    pub fn from_bytes(data: &[u8], source: impl AsRef<Path>, options: ParseOptions) -> Result<Self> {
        crate::detect::detect_version(data)?;
        let backend = LopdfBackend::load_bytes(data)?;
        Ok(Self::with_backend(backend, source, options))
    }
}

impl<B: PdfBackend> PdfParser<B> {
    /// Wrap an arbitrary backend.
    pub fn with_backend(backend: B, source: impl AsRef<Path>, options: ParseOptions) -> Self {
        Self {
            backend,
            source: source.as_ref().to_path_buf(),
            options,
        }
    }

    /// Number of pages in the source document.
    pub fn page_count(&self) -> usize {
        self.backend.page_count()
    }

    /// Extract the document model.
    ///
    /// Fails with [`Error::PageOutOfRange`] before any page is processed if
    /// the page limit exceeds the document length.
    pub fn parse(&self) -> Result<Document> {
        let numbers = self.backend.page_numbers();
        let selected = match self.options.effective_limit() {
            Some(limit) if limit > numbers.len() => {
                return Err(Error::PageOutOfRange {
                    requested: limit,
                    available: numbers.len(),
                })
            }
            Some(limit) => &numbers[..limit],
            None => &numbers[..],
        };

        let mut document = Document::new(&self.source);
        for &number in selected {
            let geometry = self.backend.page_geometry(number)?;
            document.add_page(self.build_page(geometry));
        }

        log::info!(
            "Extracted {} pages, {} content items from {}",
            document.page_count(),
            document.content_count(),
            self.source.display()
        );
        Ok(document)
    }

    /// Run grouping, table reconciliation and classification on one page.
    ///
    /// Text items come first, followed by tables.
    pub fn build_page(&self, geometry: PageGeometry) -> Page {
        let mut page = Page::new(geometry.number, geometry.width, geometry.height);

        let raw_tables = if self.options.detect_tables {
            TableDetector::with_config(self.options.table_config.clone())
                .extract_tables(&geometry.glyphs)
        } else {
            Vec::new()
        };

        let lines = GlyphGrouper::new(self.options.line_factor).group(&geometry.glyphs);
        let lines = filter_table_text(lines, &raw_tables);
        let texts = ElementClassifier::new(self.options.title_factor).classify(lines);
        let text_count = texts.len();
        page.contents.extend(texts.into_iter().map(Content::from));

        let mut reconciler = TableReconciler::new(&geometry.glyphs, self.options.border_tolerance);
        for raw in &raw_tables {
            match reconciler.reconcile(raw, &geometry.segments) {
                Ok(Some(table)) => page.add_content(table),
                Ok(None) => {}
                Err(e) => log::warn!("Page {}: dropping table: {}", geometry.number, e),
            }
        }

        log::debug!(
            "Page {}: {} text items, {} tables",
            geometry.number,
            text_count,
            page.contents.len() - text_count
        );
        page
    }
}
