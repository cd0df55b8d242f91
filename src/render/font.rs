//! Font used for every text run of a reassembled PDF.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use lopdf::{dictionary, Document as LopdfDocument, Object, ObjectId, Stream, StringFormat};
use ttf_parser::Face;

use crate::error::{Error, Result};

/// Resource name under which the font is registered on every page.
pub const FONT_RESOURCE: &str = "F1";

/// Text font of an output PDF.
///
/// Text is encoded while the pages are written; the font objects are only
/// emitted afterwards so that an embedded font can describe exactly the
/// glyphs that were used.
pub enum PdfFont {
    /// Built-in Helvetica with WinAnsi encoding
    Standard,
    /// A predefined CJK CID font resolved by the viewer, nothing embedded
    Cjk(CjkFont),
    /// An embedded TrueType font addressed by glyph id
    Embedded(EmbeddedFont),
}

impl PdfFont {
    /// Load the TrueType font at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| Error::Font(format!("{}: {}", path.display(), e)))?;
        Self::from_bytes(data)
    }

    /// Wrap TrueType font data.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        EmbeddedFont::new(data).map(PdfFont::Embedded)
    }

    /// A predefined CJK font of the given collection.
    pub fn cjk(collection: CjkCollection) -> Self {
        PdfFont::Cjk(CjkFont::new(collection))
    }

    /// Encode `text` as a string operand for `Tj`.
    pub fn encode(&mut self, text: &str) -> Result<Object> {
        Ok(match self {
            PdfFont::Standard => {
                if !is_win_ansi(text) {
                    log::warn!("Helvetica cannot draw {:?}, configure a CJK or TrueType font", text);
                }
                Object::String(encode_win_ansi(text), StringFormat::Literal)
            }
            PdfFont::Cjk(font) => Object::String(font.encode(text), StringFormat::Hexadecimal),
            PdfFont::Embedded(font) => Object::String(font.encode(text)?, StringFormat::Hexadecimal),
        })
    }

    /// Add the font objects to `doc`, returning the font dictionary id.
    pub fn write(self, doc: &mut LopdfDocument) -> ObjectId {
        match self {
            PdfFont::Standard => doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Helvetica",
                "Encoding" => "WinAnsiEncoding",
            }),
            PdfFont::Cjk(font) => font.write(doc),
            PdfFont::Embedded(font) => font.write(doc),
        }
    }
}

/// Whether every character of `text` survives WinAnsi encoding.
pub fn is_win_ansi(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_control() || matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF))
}

/// Map text to single-byte WinAnsi codes; unmappable characters become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x09 | 0x0A | 0x0D => b' ',
            cp @ 0x20..=0x7E => cp as u8,
            cp @ 0xA0..=0xFF => cp as u8,
            _ => b'?',
        })
        .collect()
}

/// Adobe character collections with a predefined font every conforming
/// viewer can substitute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CjkCollection {
    /// Adobe-GB1, `STSong-Light`
    #[default]
    SimplifiedChinese,
    /// Adobe-CNS1, `MSung-Light`
    TraditionalChinese,
    /// Adobe-Japan1, `HeiseiMin-W3`
    Japanese,
    /// Adobe-Korea1, `HYSMyeongJo-Medium`
    Korean,
}

impl CjkCollection {
    /// Pick a collection from a free-form target language name.
    ///
    /// Unrecognised languages map to Simplified Chinese, whose collection
    /// also carries kana, Greek and Cyrillic.
    pub fn for_language(language: &str) -> Self {
        let lang = language.trim().to_lowercase();
        if lang.contains("japan") || lang == "ja" || lang.contains("日本") {
            CjkCollection::Japanese
        } else if lang.contains("korea") || lang == "ko" || lang.contains("한국") {
            CjkCollection::Korean
        } else if lang.contains("traditional") || lang == "zh-tw" || lang == "zh-hant" || lang.contains("繁") {
            CjkCollection::TraditionalChinese
        } else {
            CjkCollection::SimplifiedChinese
        }
    }

    /// Base font name.
    pub fn base_font(self) -> &'static str {
        match self {
            CjkCollection::SimplifiedChinese => "STSong-Light",
            CjkCollection::TraditionalChinese => "MSung-Light",
            CjkCollection::Japanese => "HeiseiMin-W3",
            CjkCollection::Korean => "HYSMyeongJo-Medium",
        }
    }

    /// Predefined UCS-2 CMap.
    pub fn cmap(self) -> &'static str {
        match self {
            CjkCollection::SimplifiedChinese => "UniGB-UCS2-H",
            CjkCollection::TraditionalChinese => "UniCNS-UCS2-H",
            CjkCollection::Japanese => "UniJIS-UCS2-H",
            CjkCollection::Korean => "UniKS-UCS2-H",
        }
    }

    fn ordering(self) -> (&'static str, i64) {
        match self {
            CjkCollection::SimplifiedChinese => ("GB1", 2),
            CjkCollection::TraditionalChinese => ("CNS1", 0),
            CjkCollection::Japanese => ("Japan1", 2),
            CjkCollection::Korean => ("Korea1", 1),
        }
    }
}

/// A predefined CJK font addressed with two-byte UCS-2 codes.
#[derive(Debug, Clone)]
pub struct CjkFont {
    collection: CjkCollection,
    used: BTreeSet<u16>,
}

impl CjkFont {
    fn new(collection: CjkCollection) -> Self {
        Self {
            collection,
            used: BTreeSet::new(),
        }
    }

    /// Collection this font draws from.
    pub fn collection(&self) -> CjkCollection {
        self.collection
    }

    fn encode(&mut self, text: &str) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len() * 2);
        for ch in text.chars() {
            let ch = if ch.is_control() { ' ' } else { ch };
            // UCS-2 has no surrogates; astral characters degrade to '?'
            let code = u16::try_from(u32::from(ch)).unwrap_or(u16::from(b'?'));
            self.used.insert(code);
            out.extend_from_slice(&code.to_be_bytes());
        }
        out
    }

    fn write(self, doc: &mut LopdfDocument) -> ObjectId {
        let base_font = self.collection.base_font();
        let (ordering, supplement) = self.collection.ordering();

        let descriptor = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => base_font,
            "Flags" => 6,
            "FontBBox" => vec![0.into(), (-200).into(), 1000.into(), 900.into()],
            "ItalicAngle" => 0,
            "Ascent" => 880,
            "Descent" => -120,
            "CapHeight" => 700,
            "StemV" => 80,
        });

        // Proportional Latin sits at CIDs 1..=95 in every collection
        let widths: Vec<Object> = vec![1.into(), 95.into(), 500.into()];

        let cid_font = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType0",
            "BaseFont" => base_font,
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal(ordering),
                "Supplement" => supplement,
            },
            "FontDescriptor" => descriptor,
            "DW" => 1000,
            "W" => widths,
        });

        let chars: BTreeMap<u16, char> = self
            .used
            .iter()
            .filter_map(|&code| char::from_u32(u32::from(code)).map(|ch| (code, ch)))
            .collect();
        let to_unicode = doc.add_object(Stream::new(
            dictionary! {},
            to_unicode_cmap(chars.iter().map(|(&code, &ch)| (code, ch))).into_bytes(),
        ));

        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => base_font,
            "Encoding" => self.collection.cmap(),
            "DescendantFonts" => vec![Object::Reference(cid_font)],
            "ToUnicode" => to_unicode,
        })
    }
}

/// Glyph metrics recorded for a used glyph.
#[derive(Debug, Clone, Copy)]
struct UsedGlyph {
    ch: char,
    width: i64,
}

/// A TrueType font embedded as a Type0 / CIDFontType2 font with Identity-H.
pub struct EmbeddedFont {
    data: Vec<u8>,
    base_name: String,
    units_per_em: f32,
    ascent: i64,
    descent: i64,
    cap_height: i64,
    bbox: [i64; 4],
    used: BTreeMap<u16, UsedGlyph>,
}

impl EmbeddedFont {
    fn new(data: Vec<u8>) -> Result<Self> {
        if ttf_parser::fonts_in_collection(&data).is_some() {
            return Err(Error::Font(
                "font collections (.ttc) cannot be embedded, extract a single .ttf".to_string(),
            ));
        }

        let face = Face::parse(&data, 0).map_err(|e| Error::Font(e.to_string()))?;
        let units_per_em = f32::from(face.units_per_em().max(1));
        let scale = |v: i16| (f32::from(v) * 1000.0 / units_per_em).round() as i64;

        let base_name = face
            .names()
            .into_iter()
            .find(|name| name.name_id == ttf_parser::name_id::POST_SCRIPT_NAME)
            .and_then(|name| name.to_string())
            .map(|name| sanitize_name(&name))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "EmbeddedFont".to_string());

        let rect = face.global_bounding_box();
        let ascent = scale(face.ascender());
        let font = Self {
            base_name,
            units_per_em,
            ascent,
            descent: scale(face.descender()),
            cap_height: face.capital_height().map(scale).unwrap_or(ascent),
            bbox: [
                scale(rect.x_min),
                scale(rect.y_min),
                scale(rect.x_max),
                scale(rect.y_max),
            ],
            used: BTreeMap::new(),
            data,
        };
        log::debug!("Loaded font {} ({} bytes)", font.base_name, font.data.len());
        Ok(font)
    }

    /// Encode `text` as big-endian glyph ids, recording each glyph used.
    fn encode(&mut self, text: &str) -> Result<Vec<u8>> {
        let face = Face::parse(&self.data, 0).map_err(|e| Error::Font(e.to_string()))?;
        let mut out = Vec::with_capacity(text.len() * 2);

        for ch in text.chars() {
            let ch = if ch.is_control() { ' ' } else { ch };
            let gid = match face.glyph_index(ch) {
                Some(gid) => gid,
                None => {
                    log::debug!("No glyph for {:?} in {}", ch, self.base_name);
                    ttf_parser::GlyphId(0)
                }
            };
            if gid.0 != 0 && !self.used.contains_key(&gid.0) {
                let advance = f32::from(face.glyph_hor_advance(gid).unwrap_or(0));
                self.used.insert(
                    gid.0,
                    UsedGlyph {
                        ch,
                        width: (advance * 1000.0 / self.units_per_em).round() as i64,
                    },
                );
            }
            out.extend_from_slice(&gid.0.to_be_bytes());
        }
        Ok(out)
    }

    fn write(self, doc: &mut LopdfDocument) -> ObjectId {
        let font_file = doc.add_object(Stream::new(
            dictionary! { "Length1" => self.data.len() as i64 },
            self.data.clone(),
        ));

        let descriptor = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(self.base_name.clone().into_bytes()),
            "Flags" => 4,
            "FontBBox" => self.bbox.iter().map(|&v| Object::Integer(v)).collect::<Vec<_>>(),
            "ItalicAngle" => 0,
            "Ascent" => self.ascent,
            "Descent" => self.descent,
            "CapHeight" => self.cap_height,
            "StemV" => 80,
            "FontFile2" => font_file,
        });

        let widths: Vec<Object> = self
            .used
            .iter()
            .flat_map(|(&gid, glyph)| {
                [
                    Object::Integer(i64::from(gid)),
                    Object::Array(vec![Object::Integer(glyph.width)]),
                ]
            })
            .collect();

        let cid_font = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => Object::Name(self.base_name.clone().into_bytes()),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor,
            "DW" => 1000,
            "W" => widths,
            "CIDToGIDMap" => "Identity",
        });

        let to_unicode = doc.add_object(Stream::new(
            dictionary! {},
            to_unicode_cmap(self.used.iter().map(|(&gid, glyph)| (gid, glyph.ch))).into_bytes(),
        ));

        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => Object::Name(self.base_name.into_bytes()),
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![Object::Reference(cid_font)],
            "ToUnicode" => to_unicode,
        })
    }
}

fn sanitize_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// ToUnicode CMap mapping each used code back to its character.
fn to_unicode_cmap(used: impl Iterator<Item = (u16, char)>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );

    let entries: Vec<(u16, char)> = used.collect();
    // bfchar blocks hold at most 100 entries
    for chunk in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (code, ch) in chunk {
            let mut units = [0u16; 2];
            let hex: String = ch
                .encode_utf16(&mut units)
                .iter()
                .map(|u| format!("{:04X}", u))
                .collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", code, hex));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Hello"), b"Hello".to_vec());
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("你好"), b"??".to_vec());
        assert_eq!(encode_win_ansi("a\tb"), b"a b".to_vec());
    }

    #[test]
    fn test_standard_font_object() {
        let mut doc = LopdfDocument::with_version("1.5");
        let id = PdfFont::Standard.write(&mut doc);
        let dict = doc.get_dictionary(id).unwrap();
        assert_eq!(dict.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica");
    }

    #[test]
    fn test_standard_encode_literal() {
        let mut font = PdfFont::Standard;
        match font.encode("Hi").unwrap() {
            Object::String(bytes, StringFormat::Literal) => assert_eq!(bytes, b"Hi"),
            other => panic!("unexpected operand {:?}", other),
        }
    }

    #[test]
    fn test_invalid_font_data() {
        assert!(matches!(
            PdfFont::from_bytes(b"not a font".to_vec()),
            Err(Error::Font(_))
        ));
        assert!(matches!(PdfFont::load("/nonexistent/font.ttf"), Err(Error::Font(_))));
    }

    #[test]
    fn test_to_unicode_cmap() {
        let cmap = to_unicode_cmap([(3, 'A'), (40, '中')].into_iter());
        assert!(cmap.contains("2 beginbfchar"));
        assert!(cmap.contains("<0003> <0041>"));
        assert!(cmap.contains("<0028> <4E2D>"));
    }

    #[test]
    fn test_is_win_ansi() {
        assert!(is_win_ansi("Crème brûlée\n"));
        assert!(!is_win_ansi("你好"));
        assert!(!is_win_ansi("€"));
    }

    #[test]
    fn test_cjk_encode_ucs2() {
        let mut font = PdfFont::cjk(CjkCollection::SimplifiedChinese);
        match font.encode("你好 A").unwrap() {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(bytes, vec![0x4F, 0x60, 0x59, 0x7D, 0x00, 0x20, 0x00, 0x41]);
            }
            other => panic!("unexpected operand {:?}", other),
        }
        match font.encode("😀").unwrap() {
            Object::String(bytes, _) => assert_eq!(bytes, vec![0x00, b'?']),
            other => panic!("unexpected operand {:?}", other),
        }
    }

    #[test]
    fn test_cjk_font_objects() {
        let mut doc = LopdfDocument::with_version("1.5");
        let mut font = PdfFont::cjk(CjkCollection::Japanese);
        font.encode("日本").unwrap();
        let id = font.write(&mut doc);

        let dict = doc.get_dictionary(id).unwrap();
        assert_eq!(dict.get(b"BaseFont").unwrap().as_name().unwrap(), b"HeiseiMin-W3");
        assert_eq!(dict.get(b"Encoding").unwrap().as_name().unwrap(), b"UniJIS-UCS2-H");

        let cmap_id = dict.get(b"ToUnicode").unwrap().as_reference().unwrap();
        let stream = doc.get_object(cmap_id).unwrap().as_stream().unwrap();
        let cmap = String::from_utf8(stream.content.clone()).unwrap();
        assert!(cmap.contains("<65E5> <65E5>"));
    }

    #[test]
    fn test_collection_for_language() {
        assert_eq!(CjkCollection::for_language("Chinese"), CjkCollection::SimplifiedChinese);
        assert_eq!(CjkCollection::for_language(" Japanese "), CjkCollection::Japanese);
        assert_eq!(CjkCollection::for_language("Korean"), CjkCollection::Korean);
        assert_eq!(
            CjkCollection::for_language("Traditional Chinese"),
            CjkCollection::TraditionalChinese
        );
        assert_eq!(CjkCollection::for_language("Klingon"), CjkCollection::SimplifiedChinese);
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("Noto Sans SC/Regular"), "NotoSansSCRegular");
    }
}
