//! Markdown reassembly.

use crate::model::{Content, ContentItem, Document, ElementType, Page, TableContent, TextContent};

/// Marker emitted after every page.
pub const PAGE_SEPARATOR: &str = "---\n\n";

/// Render a document to Markdown, using translations where present.
pub fn to_markdown(doc: &Document) -> String {
    let mut output = String::new();
    for page in &doc.pages {
        render_page(&mut output, page);
    }
    output
}

fn render_page(output: &mut String, page: &Page) {
    for content in page.contents_top_down() {
        match content {
            Content::Text(text) => render_text(output, text),
            Content::Table(table) => render_table(output, table),
        }
    }
    output.push_str(PAGE_SEPARATOR);
}

fn render_text(output: &mut String, text: &TextContent) {
    let line = text.render_text().replace('\n', " ");
    if text.element_type == ElementType::Title {
        output.push_str("# ");
    }
    output.push_str(&line);
    output.push_str("\n\n");
}

/// Pipe table with row 0 as the header, so the grid is a valid GFM table.
fn render_table(output: &mut String, table: &TableContent) {
    let col_count = table.original.column_count();
    if col_count == 0 {
        return;
    }

    for (i, (_, cells)) in table.original.rows().into_iter().enumerate() {
        let mut row = vec![""; col_count];
        for cell in cells {
            row[cell.col] = table.display_cell(cell);
        }

        output.push('|');
        for text in row {
            output.push_str(&format!(" {} |", escape_cell(text)));
        }
        output.push('\n');

        // Separator after header row
        if i == 0 {
            output.push('|');
            output.push_str(&" --- |".repeat(col_count));
            output.push('\n');
        }
    }
    output.push('\n');
}

fn escape_cell(text: &str) -> String {
    text.trim().replace('\n', " ").replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Borders, BoundingBox, CellSet, CellText, TableCell, Translation};

    fn text(element_type: ElementType, s: &str, top: f32) -> TextContent {
        TextContent::new(
            element_type,
            s,
            BoundingBox::new(72.0, 300.0, top, top + 12.0),
            "Helvetica",
            12.0,
        )
    }

    fn table(cells: &[(&str, usize, usize)], top: f32) -> TableContent {
        let cells = cells
            .iter()
            .map(|(t, row, col)| TableCell {
                text: t.to_string(),
                position: BoundingBox::new(72.0, 100.0, top, top + 10.0),
                font: "Helvetica".to_string(),
                size: 10.0,
                row: *row,
                col: *col,
            })
            .collect();
        TableContent::new(
            CellSet::new(cells).unwrap(),
            BoundingBox::new(72.0, 300.0, top, top + 40.0),
            Borders::default(),
        )
    }

    #[test]
    fn test_title_and_paragraph() {
        let mut doc = Document::new("a.pdf");
        let mut page = Page::letter(1);
        page.add_content(text(ElementType::Title, "HELLO", 100.0));
        page.add_content(text(ElementType::Paragraph, "world.", 140.0));
        doc.add_page(page);

        assert_eq!(to_markdown(&doc), "# HELLO\n\nworld.\n\n---\n\n");
    }

    #[test]
    fn test_sorted_by_position() {
        let mut doc = Document::new("a.pdf");
        let mut page = Page::letter(1);
        page.add_content(text(ElementType::Paragraph, "below", 300.0));
        page.add_content(table(&[("A", 0, 0), ("B", 0, 1)], 200.0));
        page.add_content(text(ElementType::Paragraph, "above", 100.0));
        doc.add_page(page);

        let md = to_markdown(&doc);
        let above = md.find("above").unwrap();
        let table = md.find("| A |").unwrap();
        let below = md.find("below").unwrap();
        assert!(above < table && table < below);
    }

    #[test]
    fn test_table_grid_with_missing_cell() {
        let mut doc = Document::new("a.pdf");
        let mut page = Page::letter(1);
        page.add_content(table(&[("A", 0, 0), ("B", 0, 1), ("C", 1, 0), ("x|y", 2, 1)], 100.0));
        doc.add_page(page);

        assert_eq!(
            to_markdown(&doc),
            "| A | B |\n| --- | --- |\n| C |  |\n|  | x\\|y |\n\n---\n\n"
        );
    }

    #[test]
    fn test_first_row_is_header() {
        // A leading separator row would not parse as a GFM table
        let mut doc = Document::new("a.pdf");
        let mut page = Page::letter(1);
        page.add_content(table(&[("Name", 0, 0), ("Age", 0, 1), ("Bob", 1, 0), ("25", 1, 1)], 100.0));
        doc.add_page(page);

        let md = to_markdown(&doc);
        assert!(!md.starts_with("|---"));
        assert!(md.starts_with("| Name | Age |\n| --- | --- |\n| Bob | 25 |\n"));
    }

    #[test]
    fn test_translated_cells_by_key() {
        let mut content: Content = table(&[("A", 0, 0), ("B", 0, 1)], 100.0).into();
        let translated = CellSet::new(vec![CellText::new("b", 0, 1), CellText::new("a", 0, 0)]).unwrap();
        content.set_translation(Translation::Table(translated)).unwrap();

        let mut doc = Document::new("a.pdf");
        let mut page = Page::letter(1);
        page.add_content(content);
        doc.add_page(page);

        assert!(to_markdown(&doc).starts_with("| a | b |\n"));
    }

    #[test]
    fn test_separator_per_page() {
        let mut doc = Document::new("a.pdf");
        doc.add_page(Page::letter(1));
        doc.add_page(Page::letter(2));
        assert_eq!(to_markdown(&doc), "---\n\n---\n\n");
        assert_eq!(to_markdown(&Document::new("empty.pdf")), "");
    }
}
