//! PDF extraction: glyphs and line segments to the document model.

mod backend;
mod classifier;
mod content_stream;
mod grouper;
mod options;
mod pdf_parser;
mod table_detector;
mod table_reconciler;

pub use backend::{decode_text_simple, Glyph, LopdfBackend, PageGeometry, PdfBackend, DEFAULT_PAGE_SIZE};
pub use classifier::ElementClassifier;
pub use content_stream::{ContentInterpreter, GlyphFont, PageMarks};
pub use grouper::{GlyphGrouper, TextLine};
pub use options::ParseOptions;
pub use pdf_parser::PdfParser;
pub use table_detector::{DetectedTable, RawTable, TableDetector, TableDetectorConfig, TableRowData, TextSpan};
pub use table_reconciler::{filter_table_text, select_borders, TableReconciler};
