//! PDF reassembly: draws every content item at its source position.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use lopdf::content::{Content as PdfContent, Operation};
use lopdf::{dictionary, Document as LopdfDocument, Object, ObjectId};

use super::font::{is_win_ansi, PdfFont, FONT_RESOURCE};
use super::RenderOptions;
use crate::error::{Error, Result};
use crate::model::{Content, ContentItem, Document, ElementType, Page, TableContent, TextContent};

/// Builds an output PDF from a document model.
pub struct PdfWriter {
    options: RenderOptions,
    font: PdfFont,
    // Font still to be chosen from the document's text
    auto_font: bool,
}

impl PdfWriter {
    /// Create a writer, loading the configured fallback font if any.
    ///
    /// Without a TrueType font the choice between Helvetica and the
    /// predefined CJK font is made per document in [`PdfWriter::build`].
    pub fn new(options: RenderOptions) -> Result<Self> {
        let (font, auto_font) = match &options.font_path {
            Some(path) => (PdfFont::load(path)?, false),
            None => (PdfFont::Standard, true),
        };
        Ok(Self {
            options,
            font,
            auto_font,
        })
    }

    /// Create a writer around an already loaded font.
    pub fn with_font(options: RenderOptions, font: PdfFont) -> Self {
        Self {
            options,
            font,
            auto_font: false,
        }
    }

    /// Lay out all pages into an in-memory PDF document.
    pub fn build(mut self, doc: &Document) -> Result<LopdfDocument> {
        self.select_font(doc);
        let (width, height) = doc.canvas_size().unwrap_or(self.options.default_page_size);

        let mut streams = Vec::with_capacity(doc.page_count().max(1));
        for page in &doc.pages {
            streams.push(self.page_operations(page, height)?);
        }
        if streams.is_empty() {
            log::debug!("Document has no pages, writing one blank page");
            streams.push(Vec::new());
        }

        let mut pdf = LopdfDocument::with_version("1.5");
        let pages_id = pdf.new_object_id();
        let font_id = self.font.write(&mut pdf);
        let resources_id = pdf.add_object(dictionary! {
            "Font" => dictionary! { FONT_RESOURCE => font_id },
        });

        let mut kids = Vec::with_capacity(streams.len());
        for operations in streams {
            let content = PdfContent { operations };
            let encoded = content
                .encode()
                .map_err(|e| Error::Render(format!("content stream: {}", e)))?;
            let content_id = pdf.add_object(lopdf::Stream::new(dictionary! {}, encoded));
            let page_id = pdf.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        pdf.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = pdf.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = add_info(&mut pdf);
        pdf.trailer.set("Root", catalog_id);
        pdf.trailer.set("Info", info_id);
        pdf.compress();
        Ok(pdf)
    }

    /// Switch to the CJK font when some text cannot be drawn in WinAnsi.
    fn select_font(&mut self, doc: &Document) {
        if !self.auto_font {
            return;
        }
        self.auto_font = false;
        if !fits_win_ansi(doc) {
            let collection = self.options.cjk_font;
            log::info!("Using predefined font {}", collection.base_font());
            self.font = PdfFont::cjk(collection);
        }
    }

    fn page_operations(&mut self, page: &Page, canvas_height: f32) -> Result<Vec<Operation>> {
        let mut ops = Vec::new();
        for content in page.contents_top_down() {
            match content {
                Content::Text(text) => self.draw_text(&mut ops, text, canvas_height)?,
                Content::Table(table) => self.draw_table(&mut ops, table, canvas_height)?,
            }
        }
        Ok(ops)
    }

    fn draw_text(&mut self, ops: &mut Vec<Operation>, text: &TextContent, height: f32) -> Result<()> {
        let mut size = self.options.effective_size(text.font_size);
        if text.element_type == ElementType::Title {
            size *= self.options.title_scale;
        }
        let y = height - text.position.y1;
        self.show_text(ops, &text.render_text(), text.position.x0, y, size)
    }

    fn draw_table(&mut self, ops: &mut Vec<Operation>, table: &TableContent, height: f32) -> Result<()> {
        if !table.borders.is_empty() {
            let offset = self.options.border_offset;
            ops.push(Operation::new("q", vec![]));
            ops.push(Operation::new("w", vec![self.options.line_width.into()]));
            for seg in table.borders.segments() {
                ops.push(Operation::new(
                    "m",
                    vec![seg.x0.into(), (height - seg.y0 + offset).into()],
                ));
                ops.push(Operation::new(
                    "l",
                    vec![seg.x1.into(), (height - seg.y1 + offset).into()],
                ));
                ops.push(Operation::new("S", vec![]));
            }
            ops.push(Operation::new("Q", vec![]));
        }

        for cell in &table.original {
            let text = table.display_cell(cell);
            if text.trim().is_empty() {
                continue;
            }
            let size = self.options.effective_size(cell.size);
            let x = cell.position.x0 + self.options.cell_padding;
            let y = height - cell.position.y1;
            self.show_text(ops, text, x, y, size)?;
        }
        Ok(())
    }

    fn show_text(&mut self, ops: &mut Vec<Operation>, text: &str, x: f32, y: f32, size: f32) -> Result<()> {
        let operand = self.font.encode(text)?;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![FONT_RESOURCE.into(), size.into()]));
        ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        ops.push(Operation::new("Tj", vec![operand]));
        ops.push(Operation::new("ET", vec![]));
        Ok(())
    }
}

fn fits_win_ansi(doc: &Document) -> bool {
    doc.pages
        .iter()
        .flat_map(|page| &page.contents)
        .all(|content| match content {
            Content::Text(text) => is_win_ansi(&text.render_text()),
            Content::Table(table) => table
                .original
                .iter()
                .all(|cell| is_win_ansi(table.display_cell(cell))),
        })
}

fn add_info(pdf: &mut LopdfDocument) -> ObjectId {
    let now = chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
    pdf.add_object(dictionary! {
        "Producer" => Object::string_literal(format!("pdftrans {}", crate::VERSION)),
        "CreationDate" => Object::string_literal(now),
    })
}

/// Render `doc` to a PDF file at `path`.
pub fn write_pdf(doc: &Document, path: &Path, options: &RenderOptions) -> Result<()> {
    let mut pdf = PdfWriter::new(options.clone())?.build(doc)?;
    let mut writer = BufWriter::new(File::create(path)?);
    pdf.save_to(&mut writer)?;
    writer.flush()?;
    log::info!("Saved PDF to {}", path.display());
    Ok(())
}

/// Render `doc` to PDF bytes.
pub fn to_pdf_bytes(doc: &Document, options: &RenderOptions) -> Result<Vec<u8>> {
    let mut pdf = PdfWriter::new(options.clone())?.build(doc)?;
    let mut out = Vec::new();
    pdf.save_to(&mut out)?;
    Ok(out)
}
