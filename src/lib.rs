//! # pdftrans
//!
//! Layout-preserving PDF translation for Rust.
//!
//! This library extracts positioned text lines and tables from a PDF,
//! translates each item through a pluggable [`Translator`], and reassembles
//! the result either as a PDF drawn at the source positions or as Markdown.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdftrans::{PdfTranslator, TranslationResult, TranslationStyle, Translator};
//!
//! struct Shout;
//!
//! impl Translator for Shout {
//!     fn translate(&self, text: &str, _: &str, _: &str, _: TranslationStyle) -> TranslationResult {
//!         TranslationResult::ok(text.to_uppercase())
//!     }
//! }
//!
//! fn main() -> pdftrans::Result<()> {
//!     let report = PdfTranslator::new(Shout)
//!         .with_target_language("French")
//!         .translate_file("paper.pdf", None, "markdown")?;
//!     println!("wrote {}", report.output.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Extraction**: glyphs are grouped into lines, tables are detected and
//!   reconciled with the glyph stream, and lines are classified as titles or
//!   paragraphs ([`parser`])
//! - **Translation**: one request per content item, tables in a line-oriented
//!   cell format ([`translate`])
//! - **Reassembly**: PDF or Markdown output ([`render`])
//!
//! A failed translation never drops content: the item is rendered in the
//! source language.

pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod translate;

// Re-export commonly used types
pub use detect::{detect_version, detect_version_from_path, is_pdf};
pub use error::{Error, Result};
pub use model::{
    Borders, BoundingBox, CellSet, CellText, Content, ContentItem, ContentType, Document,
    ElementType, Page, Segment, TableCell, TableContent, TextContent, Translation,
};
pub use parser::{ParseOptions, PdfParser};
pub use render::{CjkCollection, JsonFormat, OutputFormat, RenderOptions};
pub use translate::{
    DocumentTranslator, TranslateOptions, TranslationResult, TranslationStyle,
    TranslationSummary, Translator,
};

use std::path::{Path, PathBuf};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse a PDF file into a document model.
///
/// # Example
///
/// ```no_run
/// let doc = pdftrans::parse_file("document.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    PdfParser::open(path)?.parse()
}

/// Parse a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use pdftrans::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().with_page_limit(3).text_only();
/// let doc = parse_file_with_options("document.pdf", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    PdfParser::open_with_options(path, options)?.parse()
}

/// Parse a PDF held in memory.
pub fn parse_bytes(data: &[u8], options: ParseOptions) -> Result<Document> {
    PdfParser::from_bytes(data, "<memory>", options)?.parse()
}

/// Extract a PDF and dump the document model as JSON.
pub fn to_json<P: AsRef<Path>>(path: P, options: ParseOptions, format: JsonFormat) -> Result<String> {
    let doc = parse_file_with_options(path, options)?;
    render::to_json(&doc, format)
}

/// Outcome of [`PdfTranslator::translate_file`].
#[derive(Debug, Clone)]
pub struct TranslationReport {
    /// File that was written
    pub output: PathBuf,
    /// Output format
    pub format: OutputFormat,
    /// Pages processed
    pub pages: usize,
    /// Per-item translation counts
    pub summary: TranslationSummary,
}

/// Builder running extraction, translation and reassembly for one document.
///
/// # Example
///
/// ```no_run
/// use pdftrans::{PdfTranslator, TranslationResult, TranslationStyle, Translator};
///
/// struct Echo;
/// impl Translator for Echo {
///     fn translate(&self, text: &str, _: &str, _: &str, _: TranslationStyle) -> TranslationResult {
///         TranslationResult::ok(text)
///     }
/// }
///
/// let report = PdfTranslator::new(Echo)
///     .with_page_limit(2)
///     .with_style(TranslationStyle::Academic)
///     .with_font("/usr/share/fonts/NotoSansSC-Regular.ttf")
///     .translate_file("paper.pdf", None, "pdf")?;
/// # Ok::<(), pdftrans::Error>(())
/// ```
pub struct PdfTranslator<T: Translator> {
    translator: T,
    parse_options: ParseOptions,
    translate_options: TranslateOptions,
    render_options: RenderOptions,
}

impl<T: Translator> PdfTranslator<T> {
    /// Create a pipeline around `translator`.
    pub fn new(translator: T) -> Self {
        Self {
            translator,
            parse_options: ParseOptions::default(),
            translate_options: TranslateOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Replace the parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Replace the translation options.
    pub fn with_translate_options(mut self, options: TranslateOptions) -> Self {
        self.translate_options = options;
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Only process the first `pages` pages (0 means all).
    pub fn with_page_limit(mut self, pages: usize) -> Self {
        self.parse_options = self.parse_options.with_page_limit(pages);
        self
    }

    /// Set the source language.
    pub fn with_source_language(mut self, language: impl Into<String>) -> Self {
        self.translate_options = self.translate_options.with_source_language(language);
        self
    }

    /// Set the target language.
    ///
    /// Also picks the matching predefined CJK font for PDF output.
    pub fn with_target_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        self.render_options = self
            .render_options
            .with_cjk_font(CjkCollection::for_language(&language));
        self.translate_options = self.translate_options.with_target_language(language);
        self
    }

    /// Set the translation style.
    pub fn with_style(mut self, style: TranslationStyle) -> Self {
        self.translate_options = self.translate_options.with_style(style);
        self
    }

    /// Embed a TrueType font in PDF output.
    pub fn with_font(mut self, path: impl Into<PathBuf>) -> Self {
        self.render_options = self.render_options.with_font(path);
        self
    }

    /// Extract a document.
    pub fn extract<P: AsRef<Path>>(&self, input: P) -> Result<Document> {
        parse_file_with_options(input, self.parse_options.clone())
    }

    /// Translate every item of `doc` in place.
    pub fn translate_document(&self, doc: &mut Document) -> TranslationSummary {
        DocumentTranslator::new(&self.translator, self.translate_options.clone()).translate(doc)
    }

    /// Extract, translate and write `input`.
    ///
    /// `format` is checked before the input is opened; an unknown format
    /// fails with [`Error::UnsupportedOutputFormat`]. Without `output` the
    /// result is written next to the input as `<stem>_translated.<ext>`.
    pub fn translate_file<P: AsRef<Path>>(
        &self,
        input: P,
        output: Option<&Path>,
        format: &str,
    ) -> Result<TranslationReport> {
        let format: OutputFormat = format.parse()?;
        let input = input.as_ref();
        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| render::default_output_path(input, format));

        let mut doc = self.extract(input)?;
        let summary = self.translate_document(&mut doc);
        render::write_document(&doc, &output, format, &self.render_options)?;

        Ok(TranslationReport {
            output,
            format,
            pages: doc.page_count(),
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Translator for Echo {
        fn translate(&self, text: &str, _: &str, _: &str, _: TranslationStyle) -> TranslationResult {
            TranslationResult::ok(text)
        }
    }

    #[test]
    fn test_builder() {
        let pipeline = PdfTranslator::new(Echo)
            .with_page_limit(2)
            .with_source_language("Japanese")
            .with_target_language("German")
            .with_style(TranslationStyle::Poetic)
            .with_font("font.ttf");

        assert_eq!(pipeline.parse_options.page_limit, Some(2));
        assert_eq!(pipeline.translate_options.source_language, "Japanese");
        assert_eq!(pipeline.translate_options.target_language, "German");
        assert_eq!(pipeline.render_options.cjk_font, CjkCollection::SimplifiedChinese);

        let pipeline = PdfTranslator::new(Echo).with_target_language("Japanese");
        assert_eq!(pipeline.render_options.cjk_font, CjkCollection::Japanese);
        assert_eq!(pipeline.translate_options.style, TranslationStyle::Poetic);
        assert_eq!(pipeline.render_options.font_path, Some(PathBuf::from("font.ttf")));
    }

    #[test]
    fn test_unsupported_format_before_io() {
        // The input does not exist: the format error must win.
        let err = PdfTranslator::new(Echo)
            .translate_file("/nonexistent/input.pdf", None, "docx")
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedOutputFormat(_)));
    }

    #[test]
    fn test_missing_input() {
        let err = PdfTranslator::new(Echo)
            .translate_file("/nonexistent/input.pdf", None, "md")
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_parse_bytes_not_pdf() {
        assert!(matches!(
            parse_bytes(b"<!DOCTYPE html>", ParseOptions::default()),
            Err(Error::UnknownFormat)
        ));
        assert!(parse_bytes(b"", ParseOptions::default()).is_err());
    }
}
