//! Document model types shared by extraction and reassembly.
//!
//! Extraction builds a [`Document`] of [`Page`]s holding [`Content`] items;
//! translation attaches payloads to those items; reassembly reads them back.

mod content;
mod document;
mod geometry;
mod page;
mod table;

pub use content::{
    CellRef, Content, ContentItem, ContentType, ElementType, TableContent, TextContent,
    Translation,
};
pub use document::Document;
pub use geometry::{Borders, BoundingBox, Segment};
pub use page::Page;
pub use table::{CellKey, CellSet, CellText, TableCell};
