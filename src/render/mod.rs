//! Layout reassembly: writes a document model back out as PDF or Markdown.

mod font;
mod json;
mod markdown;
mod options;
mod pdf;

pub use font::{is_win_ansi, CjkCollection, CjkFont, EmbeddedFont, PdfFont, FONT_RESOURCE};
pub use json::{to_json, JsonFormat};
pub use markdown::{to_markdown, PAGE_SEPARATOR};
pub use options::RenderOptions;
pub use pdf::{to_pdf_bytes, write_pdf, PdfWriter};

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::model::Document;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Positioned PDF mirroring the source layout
    #[default]
    Pdf,
    /// Markdown text
    Markdown,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Markdown => "md",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(Error::UnsupportedOutputFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Pdf => f.write_str("pdf"),
            OutputFormat::Markdown => f.write_str("markdown"),
        }
    }
}

/// `<dir>/<stem>_translated.<ext>` next to `input`.
pub fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    input.with_file_name(format!("{}_translated.{}", stem, format.extension()))
}

/// Write `doc` to `path` in the given format.
pub fn write_document(
    doc: &Document,
    path: &Path,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<()> {
    match format {
        OutputFormat::Pdf => write_pdf(doc, path, options),
        OutputFormat::Markdown => {
            std::fs::write(path, to_markdown(doc))?;
            log::info!("Saved Markdown to {}", path.display());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("pdf".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!("PDF".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!("markdown".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
    }

    #[test]
    fn test_unsupported_format() {
        let err = "docx".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedOutputFormat(ref f) if f == "docx"));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/tmp/paper.pdf"), OutputFormat::Pdf),
            PathBuf::from("/tmp/paper_translated.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("notes.PDF"), OutputFormat::Markdown),
            PathBuf::from("notes_translated.md")
        );
    }

    #[test]
    fn test_write_markdown_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.md");
        let mut doc = Document::new("in.pdf");
        doc.add_page(crate::model::Page::letter(1));
        write_document(&doc, &path, OutputFormat::Markdown, &RenderOptions::default()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "---\n\n");
    }
}
