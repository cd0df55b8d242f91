//! Content items: the unit of extraction, translation and reassembly.

use serde::Serialize;

use super::{Borders, BoundingBox, CellKey, CellSet, CellText, TableCell};
use crate::error::{Error, Result};

/// Payload kind of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// A line of text
    Text,
    /// A table of cells
    Table,
    /// An image (declared for completeness, never produced by extraction)
    Image,
}

/// Semantic role of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    /// Heading-like line
    Title,
    /// Body text line
    Paragraph,
    /// Table
    Table,
    /// Image
    Image,
}

/// A borrowed view of one cell, independent of original/translated storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRef<'a> {
    /// Row index
    pub row: usize,
    /// Column index
    pub col: usize,
    /// Cell text
    pub text: &'a str,
}

impl<'a, C: CellKey> From<&'a C> for CellRef<'a> {
    fn from(cell: &'a C) -> Self {
        CellRef {
            row: cell.row(),
            col: cell.col(),
            text: cell.text(),
        }
    }
}

/// Behaviour shared by every content variant.
pub trait ContentItem {
    /// Strictly typed translation payload of this variant.
    type Translation;

    /// Attach a successful translation.
    fn set_translation(&mut self, translation: Self::Translation);

    /// Drop any translation and mark the item as not translated.
    fn reset_translation(&mut self);

    /// Whether the last translation attempt produced a usable value.
    fn status(&self) -> bool;

    /// Text to display: the translation when present and non-empty, else the original.
    fn render_text(&self) -> String;

    /// Iterate cells of the original (`translated = false`) or translated payload.
    fn iterate_cells(&self, translated: bool) -> Box<dyn Iterator<Item = CellRef<'_>> + '_>;
}

/// A single line of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextContent {
    /// Title or paragraph
    pub element_type: ElementType,
    /// Source-language text
    pub original: String,
    translation: Option<String>,
    /// Bounding box of the line
    pub position: BoundingBox,
    /// Font name of the first glyph
    pub font: String,
    /// Font size of the first glyph
    pub font_size: f32,
}

impl TextContent {
    /// Create an untranslated text item.
    pub fn new(
        element_type: ElementType,
        original: impl Into<String>,
        position: BoundingBox,
        font: impl Into<String>,
        font_size: f32,
    ) -> Self {
        Self {
            element_type,
            original: original.into(),
            translation: None,
            position,
            font: font.into(),
            font_size,
        }
    }

    /// The translated text, if any.
    pub fn translation(&self) -> Option<&str> {
        self.translation.as_deref()
    }
}

impl ContentItem for TextContent {
    type Translation = String;

    fn set_translation(&mut self, translation: String) {
        self.translation = Some(translation);
    }

    fn reset_translation(&mut self) {
        self.translation = None;
    }

    fn status(&self) -> bool {
        self.translation.is_some()
    }

    fn render_text(&self) -> String {
        match self.translation.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => self.original.clone(),
        }
    }

    fn iterate_cells(&self, _translated: bool) -> Box<dyn Iterator<Item = CellRef<'_>> + '_> {
        Box::new(std::iter::empty())
    }
}

/// A table with positioned cells and border segments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableContent {
    /// Source cells
    pub original: CellSet<TableCell>,
    translation: Option<CellSet<CellText>>,
    /// Union of all cell boxes
    pub position: BoundingBox,
    /// Border segments found around the table
    pub borders: Borders,
}

impl TableContent {
    /// Create an untranslated table item.
    pub fn new(original: CellSet<TableCell>, position: BoundingBox, borders: Borders) -> Self {
        Self {
            original,
            translation: None,
            position,
            borders,
        }
    }

    /// The translated cells, if any.
    pub fn translation(&self) -> Option<&CellSet<CellText>> {
        self.translation.as_ref()
    }

    /// Text to draw for an original cell: the translated cell with the same
    /// `(row, col)` key, or the original text when there is none.
    pub fn display_cell<'a>(&'a self, cell: &'a TableCell) -> &'a str {
        self.translation
            .as_ref()
            .and_then(|t| t.get(cell.row, cell.col))
            .map(|t| t.text.as_str())
            .unwrap_or(cell.text.as_str())
    }
}

impl ContentItem for TableContent {
    type Translation = CellSet<CellText>;

    fn set_translation(&mut self, translation: CellSet<CellText>) {
        self.translation = Some(translation);
    }

    fn reset_translation(&mut self) {
        self.translation = None;
    }

    fn status(&self) -> bool {
        self.translation.is_some()
    }

    fn render_text(&self) -> String {
        self.original
            .rows()
            .into_iter()
            .map(|(_, cells)| {
                cells
                    .into_iter()
                    .map(|c| self.display_cell(c))
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn iterate_cells(&self, translated: bool) -> Box<dyn Iterator<Item = CellRef<'_>> + '_> {
        if translated {
            match &self.translation {
                Some(t) => Box::new(t.iter().map(CellRef::from)),
                None => Box::new(std::iter::empty()),
            }
        } else {
            Box::new(self.original.iter().map(CellRef::from))
        }
    }
}

/// A translation payload whose shape is checked against the target item.
#[derive(Debug, Clone, PartialEq)]
pub enum Translation {
    /// Translated line of text
    Text(String),
    /// Translated table cells
    Table(CellSet<CellText>),
}

impl Translation {
    /// The content type this payload fits.
    pub fn shape(&self) -> ContentType {
        match self {
            Translation::Text(_) => ContentType::Text,
            Translation::Table(_) => ContentType::Table,
        }
    }
}

/// One content item on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    /// A text line
    Text(TextContent),
    /// A table
    Table(TableContent),
}

impl Content {
    /// Payload kind of the item.
    pub fn content_type(&self) -> ContentType {
        match self {
            Content::Text(_) => ContentType::Text,
            Content::Table(_) => ContentType::Table,
        }
    }

    /// Semantic role of the item.
    pub fn element_type(&self) -> ElementType {
        match self {
            Content::Text(t) => t.element_type,
            Content::Table(_) => ElementType::Table,
        }
    }

    /// Bounding box in source coordinates.
    pub fn position(&self) -> &BoundingBox {
        match self {
            Content::Text(t) => &t.position,
            Content::Table(t) => &t.position,
        }
    }

    /// Nominal font name, if the item carries one.
    pub fn font(&self) -> Option<&str> {
        match self {
            Content::Text(t) => Some(&t.font),
            Content::Table(_) => None,
        }
    }

    /// Nominal font size, if the item carries one.
    pub fn font_size(&self) -> Option<f32> {
        match self {
            Content::Text(t) => Some(t.font_size),
            Content::Table(_) => None,
        }
    }

    /// Whether the item holds a usable translation.
    pub fn status(&self) -> bool {
        match self {
            Content::Text(t) => t.status(),
            Content::Table(t) => t.status(),
        }
    }

    /// Assign a translation, rejecting payloads of the wrong shape.
    pub fn set_translation(&mut self, translation: Translation) -> Result<()> {
        match (self, translation) {
            (Content::Text(item), Translation::Text(text)) => {
                item.set_translation(text);
                Ok(())
            }
            (Content::Table(item), Translation::Table(cells)) => {
                item.set_translation(cells);
                Ok(())
            }
            (item, other) => Err(Error::TranslationShape {
                expected: item.content_type(),
                found: other.shape(),
            }),
        }
    }

    /// Drop any translation.
    pub fn reset_translation(&mut self) {
        match self {
            Content::Text(t) => t.reset_translation(),
            Content::Table(t) => t.reset_translation(),
        }
    }

    /// Display text with translation fallback.
    pub fn render_text(&self) -> String {
        match self {
            Content::Text(t) => t.render_text(),
            Content::Table(t) => t.render_text(),
        }
    }

    /// Iterate cells (empty for text items).
    pub fn iterate_cells(&self, translated: bool) -> Box<dyn Iterator<Item = CellRef<'_>> + '_> {
        match self {
            Content::Text(t) => t.iterate_cells(translated),
            Content::Table(t) => t.iterate_cells(translated),
        }
    }
}

impl From<TextContent> for Content {
    fn from(content: TextContent) -> Self {
        Content::Text(content)
    }
}

impl From<TableContent> for Content {
    fn from(content: TableContent) -> Self {
        Content::Table(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_item() -> Content {
        TextContent::new(
            ElementType::Paragraph,
            "hello",
            BoundingBox::new(10.0, 40.0, 100.0, 112.0),
            "Helvetica",
            12.0,
        )
        .into()
    }

    fn table_item() -> Content {
        let cell = |text: &str, row, col| TableCell {
            text: text.to_string(),
            position: BoundingBox::default(),
            font: "Helvetica".to_string(),
            size: 10.0,
            row,
            col,
        };
        let cells = CellSet::new(vec![cell("A", 0, 0), cell("B", 0, 1)]).unwrap();
        TableContent::new(cells, BoundingBox::default(), Borders::default()).into()
    }

    #[test]
    fn test_text_translation_roundtrip() {
        let mut item = text_item();
        assert!(!item.status());
        assert_eq!(item.render_text(), "hello");

        item.set_translation(Translation::Text("bonjour".into()))
            .unwrap();
        assert!(item.status());
        assert_eq!(item.render_text(), "bonjour");

        item.reset_translation();
        assert!(!item.status());
        assert_eq!(item.render_text(), "hello");
    }

    #[test]
    fn test_wrong_shape_rejected() {
        let mut item = text_item();
        let cells = CellSet::new(vec![CellText::new("x", 0, 0)]).unwrap();
        let err = item.set_translation(Translation::Table(cells)).unwrap_err();
        assert!(matches!(
            err,
            Error::TranslationShape {
                expected: ContentType::Text,
                found: ContentType::Table
            }
        ));
        assert!(!item.status());

        let mut table = table_item();
        let err = table
            .set_translation(Translation::Text("x".into()))
            .unwrap_err();
        assert!(matches!(err, Error::TranslationShape { .. }));
        assert!(!table.status());
    }

    #[test]
    fn test_empty_translation_falls_back() {
        let mut item = text_item();
        item.set_translation(Translation::Text(String::new()))
            .unwrap();
        assert_eq!(item.render_text(), "hello");
    }

    #[test]
    fn test_table_display_by_key() {
        let mut table = table_item();
        let translated = CellSet::new(vec![CellText::new("Bee", 0, 1)]).unwrap();
        table.set_translation(Translation::Table(translated)).unwrap();

        let Content::Table(t) = &table else {
            panic!("expected table");
        };
        let cells: Vec<_> = t.original.iter().collect();
        assert_eq!(t.display_cell(cells[0]), "A");
        assert_eq!(t.display_cell(cells[1]), "Bee");
        assert_eq!(table.render_text(), "A Bee");
        assert_eq!(table.iterate_cells(true).count(), 1);
        assert_eq!(table.iterate_cells(false).count(), 2);
    }
}
