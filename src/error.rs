//! Error types for pdftrans library.

use std::io;
use thiserror::Error;

use crate::model::ContentType;

/// Result type alias for pdftrans operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during extraction, translation and reassembly.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// More pages were requested than the document has.
    #[error("Requested {requested} pages but document has only {available}")]
    PageOutOfRange {
        /// Number of pages requested
        requested: usize,
        /// Number of pages in the document
        available: usize,
    },

    /// The requested output format is not supported.
    #[error("Unsupported output format: {0}")]
    UnsupportedOutputFormat(String),

    /// A translation of the wrong shape was assigned to a content item.
    #[error("Invalid translation type: expected {expected:?}, got {found:?}")]
    TranslationShape {
        /// Content type of the item
        expected: ContentType,
        /// Shape of the rejected translation
        found: ContentType,
    },

    /// Translated table text does not follow the `text,col,row` line format.
    #[error("Malformed table text at line {line}: {reason}")]
    TableFormat {
        /// 1-based line number in the translated text (0 for whole-input errors)
        line: usize,
        /// What was wrong with the line
        reason: String,
    },

    /// Two cells share the same `(row, col)` key.
    #[error("Duplicate table cell at row {row}, col {col}")]
    DuplicateCell {
        /// Row index
        row: usize,
        /// Column index
        col: usize,
    },

    /// Error loading or embedding a font.
    #[error("Font error: {0}")]
    Font(String),

    /// Error during rendering (PDF, Markdown, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::PageOutOfRange {
            requested: 10,
            available: 5,
        };
        assert_eq!(
            err.to_string(),
            "Requested 10 pages but document has only 5"
        );

        let err = Error::UnsupportedOutputFormat("docx".to_string());
        assert_eq!(err.to_string(), "Unsupported output format: docx");
    }

    #[test]
    fn test_shape_error_display() {
        let err = Error::TranslationShape {
            expected: ContentType::Table,
            found: ContentType::Text,
        };
        assert_eq!(
            err.to_string(),
            "Invalid translation type: expected Table, got Text"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
