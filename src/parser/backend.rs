//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for raw page geometry, isolating
//! the concrete PDF library (lopdf) from the extraction heuristics.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Encoding, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::Segment;

use super::content_stream::{number, ContentInterpreter, GlyphFont};

/// US Letter, used when a page has no usable media box.
pub const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Advance used for codes missing from a font's width table (1/1000 em).
const FALLBACK_ADVANCE: f32 = 500.0;

/// Highest CID reachable through a two-byte code.
const MAX_CID: u32 = 0xFFFF;

/// A single positioned character.
///
/// Coordinates are top-down: `top` is the distance from the top edge of the
/// page to the top of the glyph box.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    /// Decoded text (usually one character)
    pub text: String,
    /// Left edge
    pub x0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge, measured from the page top
    pub top: f32,
    /// Bottom edge, measured from the page top
    pub bottom: f32,
    /// Base font name
    pub fontname: String,
    /// Effective font size
    pub size: f32,
}

/// Raw geometry of one page.
#[derive(Debug, Clone, Default)]
pub struct PageGeometry {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width
    pub width: f32,
    /// Page height
    pub height: f32,
    /// Glyphs in content stream order
    pub glyphs: Vec<Glyph>,
    /// Horizontal and vertical line segments
    pub segments: Vec<Segment>,
}

/// Abstract interface for raw page geometry.
pub trait PdfBackend {
    /// Page numbers in document order.
    fn page_numbers(&self) -> Vec<u32>;

    /// Number of pages.
    fn page_count(&self) -> usize {
        self.page_numbers().len()
    }

    /// Glyphs, line segments and dimensions of one page.
    fn page_geometry(&self, number: u32) -> Result<PageGeometry>;
}

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
}

impl LopdfBackend {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path)?;
        Self::from_document(doc)
    }

    /// Load from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        Self::from_document(doc)
    }

    /// Wrap an already loaded document.
    pub fn from_document(doc: LopdfDocument) -> Result<Self> {
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }
        Ok(Self { doc })
    }

    /// Direct access to the underlying `lopdf::Document`.
    pub fn raw_doc(&self) -> &LopdfDocument {
        &self.doc
    }

    fn page_id(&self, number: u32) -> Result<ObjectId> {
        let pages = self.doc.get_pages();
        pages.get(&number).copied().ok_or(Error::PageOutOfRange {
            requested: number as usize,
            available: pages.len(),
        })
    }

    /// Media box `(x0, y0, width, height)`, inherited through the page tree.
    fn media_box(&self, page_id: ObjectId) -> (f32, f32, f32, f32) {
        let mut node = self.doc.get_dictionary(page_id).ok();
        // Guard against cyclic Parent chains.
        for _ in 0..32 {
            let Some(dict) = node else { break };
            if let Some(rect) = dict
                .get(b"MediaBox")
                .ok()
                .and_then(|o| self.resolve(o).as_array().ok())
                .filter(|a| a.len() >= 4)
            {
                let v: Vec<f32> = rect.iter().filter_map(|o| number(self.resolve(o))).collect();
                if v.len() >= 4 {
                    let (x0, x1) = (v[0].min(v[2]), v[0].max(v[2]));
                    let (y0, y1) = (v[1].min(v[3]), v[1].max(v[3]));
                    if x1 > x0 && y1 > y0 {
                        return (x0, y0, x1 - x0, y1 - y0);
                    }
                }
            }
            node = dict
                .get(b"Parent")
                .ok()
                .and_then(|p| p.as_reference().ok())
                .and_then(|id| self.doc.get_dictionary(id).ok());
        }
        (0.0, 0.0, DEFAULT_PAGE_SIZE.0, DEFAULT_PAGE_SIZE.1)
    }

    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;
        let contents = match page_dict.get(b"Contents") {
            Ok(contents) => contents,
            // A page without a content stream is blank.
            Err(_) => return Ok(Vec::new()),
        };

        let refs: Vec<&Object> = match self.resolve(contents) {
            Object::Array(arr) => arr.iter().collect(),
            _ => vec![contents],
        };

        let mut content = Vec::new();
        for obj in refs {
            if let Object::Stream(s) = self.resolve(obj) {
                let data = s
                    .decompressed_content()
                    .unwrap_or_else(|_| s.content.clone());
                content.extend_from_slice(&data);
                content.push(b'\n');
            }
        }
        Ok(content)
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> &'a Object {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).unwrap_or(obj),
            _ => obj,
        }
    }
}

impl PdfBackend for LopdfBackend {
    fn page_numbers(&self) -> Vec<u32> {
        self.doc.get_pages().keys().copied().collect()
    }

    fn page_geometry(&self, number: u32) -> Result<PageGeometry> {
        let page_id = self.page_id(number)?;
        let (x0, y0, width, height) = self.media_box(page_id);

        let fonts: BTreeMap<Vec<u8>, LopdfFont<'_>> = self
            .doc
            .get_page_fonts(page_id)
            .map(|fonts| {
                fonts
                    .into_iter()
                    .map(|(name, dict)| (name, LopdfFont::new(&self.doc, dict)))
                    .collect()
            })
            .unwrap_or_default();

        let data = self.page_content(page_id)?;
        let content = lopdf::content::Content::decode(&data)?;
        let marks =
            ContentInterpreter::new(&fonts, (x0, y0), height).run(&content.operations);

        log::debug!(
            "Page {}: {} glyphs, {} segments, {} fonts",
            number,
            marks.glyphs.len(),
            marks.segments.len(),
            fonts.len()
        );

        Ok(PageGeometry {
            number,
            width,
            height,
            glyphs: marks.glyphs,
            segments: marks.segments,
        })
    }
}

/// A page font resolved against its document.
struct LopdfFont<'a> {
    encoding: Option<Encoding<'a>>,
    base_font: String,
    code_len: usize,
    first_char: u32,
    widths: Vec<f32>,
    cid_widths: HashMap<u32, f32>,
    default_width: f32,
}

impl<'a> LopdfFont<'a> {
    fn new(doc: &'a LopdfDocument, dict: &'a Dictionary) -> Self {
        let resolve = |obj: &'a Object| -> &'a Object {
            match obj {
                Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
                _ => obj,
            }
        };

        let base_font = dict
            .get(b"BaseFont")
            .ok()
            .and_then(|o| resolve(o).as_name().ok())
            .map(|n| String::from_utf8_lossy(n).to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        let is_type0 = dict
            .get(b"Subtype")
            .ok()
            .and_then(|o| o.as_name().ok())
            .is_some_and(|n| n == b"Type0");

        let encoding = match dict.get_font_encoding(doc) {
            Ok(encoding) => Some(encoding),
            Err(e) => {
                log::debug!("No usable encoding for {}: {}", base_font, e);
                None
            }
        };

        let mut font = Self {
            encoding,
            base_font,
            code_len: if is_type0 { 2 } else { 1 },
            first_char: 0,
            widths: Vec::new(),
            cid_widths: HashMap::new(),
            default_width: if is_type0 { 1000.0 } else { FALLBACK_ADVANCE },
        };

        if is_type0 {
            let descendant = dict
                .get(b"DescendantFonts")
                .ok()
                .and_then(|o| resolve(o).as_array().ok())
                .and_then(|a| a.first())
                .and_then(|o| resolve(o).as_dict().ok());
            if let Some(cid_font) = descendant {
                if let Some(dw) = cid_font.get(b"DW").ok().and_then(|o| number(resolve(o))) {
                    font.default_width = dw;
                }
                if let Some(w) = cid_font.get(b"W").ok().and_then(|o| resolve(o).as_array().ok()) {
                    font.cid_widths = parse_cid_widths(w, resolve);
                }
            }
        } else {
            font.first_char = dict
                .get(b"FirstChar")
                .ok()
                .and_then(|o| number(resolve(o)))
                .map(|v| v.max(0.0) as u32)
                .unwrap_or(0);
            if let Some(widths) = dict
                .get(b"Widths")
                .ok()
                .and_then(|o| resolve(o).as_array().ok())
            {
                font.widths = widths
                    .iter()
                    .map(|o| number(resolve(o)).unwrap_or(FALLBACK_ADVANCE))
                    .collect();
            }
        }

        font
    }
}

impl GlyphFont for LopdfFont<'_> {
    fn name(&self) -> &str {
        &self.base_font
    }

    fn code_len(&self) -> usize {
        self.code_len
    }

    fn decode(&self, code: &[u8]) -> String {
        let decoded = self
            .encoding
            .as_ref()
            .and_then(|enc| LopdfDocument::decode_text(enc, code).ok())
            .unwrap_or_else(|| decode_text_simple(code));
        decoded.nfc().collect()
    }

    fn advance(&self, code: u32) -> f32 {
        if self.code_len == 2 {
            return self
                .cid_widths
                .get(&code)
                .copied()
                .unwrap_or(self.default_width);
        }
        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .filter(|w| *w > 0.0)
            .unwrap_or(self.default_width)
    }
}

/// Parse a CIDFont `/W` array: `c [w1 w2 ...]` or `c_first c_last w`.
///
/// Entries beyond [`MAX_CID`] are dropped.
fn parse_cid_widths<'a>(
    w: &'a [Object],
    resolve: impl Fn(&'a Object) -> &'a Object,
) -> HashMap<u32, f32> {
    let mut widths = HashMap::new();
    let mut i = 0;
    while i < w.len() {
        let Some(first) = number(resolve(&w[i])) else {
            break;
        };
        let first = first.max(0.0) as u32;
        match w.get(i + 1).map(&resolve) {
            Some(Object::Array(list)) => {
                for (offset, obj) in list.iter().enumerate() {
                    let Some(cid) = u32::try_from(offset)
                        .ok()
                        .and_then(|o| first.checked_add(o))
                        .filter(|cid| *cid <= MAX_CID)
                    else {
                        break;
                    };
                    if let Some(width) = number(resolve(obj)) {
                        widths.insert(cid, width);
                    }
                }
                i += 2;
            }
            Some(last) => {
                let (Some(last), Some(width)) =
                    (number(last), w.get(i + 2).and_then(|o| number(resolve(o))))
                else {
                    break;
                };
                for cid in first..=(last.max(0.0) as u32).min(MAX_CID) {
                    widths.insert(cid, width);
                }
                i += 3;
            }
            None => break,
        }
    }
    widths
}

/// Simple text decoding fallback when no encoding is available.
pub fn decode_text_simple(bytes: &[u8]) -> String {
    // Two-byte codes are treated as UTF-16BE units
    if bytes.len() == 2 {
        let unit = u16::from_be_bytes([bytes[0], bytes[1]]);
        return String::from_utf16(&[unit]).unwrap_or_default();
    }

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    // Fallback: Latin-1
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Stream};

    fn one_page_pdf(media_box: Vec<Object>) -> LopdfDocument {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 20.into()]),
                Operation::new("Td", vec![72.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal("Hi")]),
                Operation::new("ET", vec![]),
                Operation::new("re", vec![50.into(), 100.into(), 100.into(), 40.into()]),
                Operation::new("S", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().unwrap(),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => media_box,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"Hello"), "Hello");
    }

    #[test]
    fn test_decode_text_simple_latin1() {
        assert_eq!(decode_text_simple(&[0xE9]), "é");
    }

    #[test]
    fn test_decode_text_simple_two_byte() {
        assert_eq!(decode_text_simple(&[0x4E, 0x2D]), "中");
    }

    #[test]
    fn test_cid_widths() {
        let w = vec![
            Object::Integer(1),
            Object::Array(vec![Object::Integer(500), Object::Integer(600)]),
            Object::Integer(10),
            Object::Integer(12),
            Object::Integer(1000),
        ];
        let widths = parse_cid_widths(&w, |o| o);
        assert_eq!(widths.get(&1), Some(&500.0));
        assert_eq!(widths.get(&2), Some(&600.0));
        assert_eq!(widths.get(&11), Some(&1000.0));
        assert_eq!(widths.get(&13), None);
    }

    #[test]
    fn test_font_encoding_resolved_up_front() {
        let doc = LopdfDocument::with_version("1.5");
        let dict = dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        };
        let font = LopdfFont::new(&doc, &dict);
        assert!(font.encoding.is_some());
        assert_eq!(font.decode(&[0x41]), "A");
        assert_eq!(font.decode(&[0xE9]), "é");
    }

    #[test]
    fn test_cid_widths_overflowing_start() {
        let w = vec![
            Object::Integer(i64::from(u32::MAX)),
            Object::Array(vec![Object::Integer(500), Object::Integer(600)]),
            Object::Integer(3),
            Object::Array(vec![Object::Integer(700)]),
        ];
        let widths = parse_cid_widths(&w, |o| o);
        assert_eq!(widths.len(), 1);
        assert_eq!(widths.get(&3), Some(&700.0));
    }

    #[test]
    fn test_cid_widths_huge_range_capped() {
        let w = vec![
            Object::Integer(0),
            Object::Integer(i64::from(u32::MAX)),
            Object::Integer(1000),
        ];
        let widths = parse_cid_widths(&w, |o| o);
        assert_eq!(widths.len(), (MAX_CID + 1) as usize);
        assert_eq!(widths.get(&MAX_CID), Some(&1000.0));
    }

    #[test]
    fn test_page_geometry_inherits_media_box() {
        let doc = one_page_pdf(vec![0.into(), 0.into(), 595.into(), 842.into()]);
        let backend = LopdfBackend::from_document(doc).unwrap();

        assert_eq!(backend.page_numbers(), vec![1]);
        let page = backend.page_geometry(1).unwrap();
        assert_eq!((page.width, page.height), (595.0, 842.0));

        let text: String = page.glyphs.iter().map(|g| g.text.as_str()).collect();
        assert_eq!(text, "Hi");
        assert_eq!(page.glyphs[0].fontname, "Helvetica-Bold");
        assert!((page.glyphs[0].x0 - 72.0).abs() < 1e-3);
        assert!((page.glyphs[0].top - (842.0 - 716.0)).abs() < 1e-3);
        assert_eq!(page.segments.len(), 4);
    }

    #[test]
    fn test_media_box_origin_offset() {
        let doc = one_page_pdf(vec![10.into(), 20.into(), 610.into(), 820.into()]);
        let backend = LopdfBackend::from_document(doc).unwrap();
        let page = backend.page_geometry(1).unwrap();

        assert_eq!((page.width, page.height), (600.0, 800.0));
        assert!((page.glyphs[0].x0 - 62.0).abs() < 1e-3);
    }

    #[test]
    fn test_missing_page() {
        let doc = one_page_pdf(vec![0.into(), 0.into(), 595.into(), 842.into()]);
        let backend = LopdfBackend::from_document(doc).unwrap();
        assert!(matches!(
            backend.page_geometry(3),
            Err(Error::PageOutOfRange { .. })
        ));
    }
}
