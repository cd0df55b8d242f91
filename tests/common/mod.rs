//! Shared helpers: PDFs generated in-test with lopdf, and mock translators.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pdftrans::{TranslationResult, TranslationStyle, Translator};

/// One `Tj` run on a generated page.
pub struct Run {
    pub text: &'static str,
    pub x: f32,
    pub baseline: f32,
    pub size: f32,
}

pub fn run(text: &'static str, x: f32, baseline: f32, size: f32) -> Run {
    Run {
        text,
        x,
        baseline,
        size,
    }
}

/// Build a Letter-size PDF with one page per entry, all text in Helvetica.
pub fn build_pdf(pages: &[Vec<Run>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for runs in pages {
        let mut operations = Vec::new();
        for r in runs {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), r.size.into()]));
            operations.push(Operation::new("Td", vec![r.x.into(), r.baseline.into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(r.text)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).unwrap();
    out
}

/// Write a generated PDF into `dir`.
pub fn write_pdf(dir: &Path, name: &str, pages: &[Vec<Run>]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_pdf(pages)).unwrap();
    path
}

/// Title "HELLO" (24pt) over paragraph "world." (12pt).
pub fn hello_world() -> Vec<Vec<Run>> {
    vec![vec![run("HELLO", 72.0, 700.0, 24.0), run("world.", 72.0, 660.0, 12.0)]]
}

/// A heading line followed by a 3x2 grid of aligned words.
pub fn report_with_table() -> Vec<Vec<Run>> {
    let mut runs = vec![run("Report", 72.0, 720.0, 12.0)];
    for (i, (a, b)) in [("Name", "Age"), ("Alice", "30"), ("Bob", "25")].iter().enumerate() {
        let baseline = 660.0 - i as f32 * 20.0;
        runs.push(run(a, 72.0, baseline, 12.0));
        runs.push(run(b, 200.0, baseline, 12.0));
    }
    vec![runs]
}

/// Lowercases everything, table wire format included.
pub struct Lowercase;

impl Translator for Lowercase {
    fn translate(&self, text: &str, _: &str, _: &str, _: TranslationStyle) -> TranslationResult {
        TranslationResult::ok(format!("Translation: {}", text.to_lowercase()))
    }
}

/// Every request fails.
pub struct Unavailable;

impl Translator for Unavailable {
    fn translate(&self, _: &str, _: &str, _: &str, _: TranslationStyle) -> TranslationResult {
        TranslationResult::failed("connection refused")
    }
}

/// Text is translated; table responses are prose instead of cell records.
pub struct ChattyTables;

impl Translator for ChattyTables {
    fn translate(&self, text: &str, _: &str, _: &str, _: TranslationStyle) -> TranslationResult {
        if text.contains(",0,") {
            TranslationResult::ok("Sure! Here is your table, nicely translated.")
        } else {
            TranslationResult::ok(text.to_uppercase())
        }
    }
}

/// Fixed Chinese renderings of the hello-world lines.
pub struct ToChinese;

impl Translator for ToChinese {
    fn translate(&self, text: &str, _: &str, _: &str, _: TranslationStyle) -> TranslationResult {
        match text {
            "HELLO" => TranslationResult::ok("你好"),
            "world." => TranslationResult::ok("世界。"),
            _ => TranslationResult::failed("unexpected input"),
        }
    }
}
