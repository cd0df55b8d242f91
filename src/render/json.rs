//! JSON dump of the document model.

use crate::error::{Error, Result};
use crate::model::Document;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a document, including any translations, to JSON.
pub fn to_json(doc: &Document, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(doc),
        JsonFormat::Compact => serde_json::to_string(doc),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BoundingBox, ElementType, Page, TextContent};

    fn sample() -> Document {
        let mut doc = Document::new("report.pdf");
        let mut page = Page::letter(1);
        page.add_content(TextContent::new(
            ElementType::Title,
            "Summary",
            BoundingBox::new(72.0, 160.0, 90.0, 110.0),
            "Helvetica-Bold",
            18.0,
        ));
        doc.add_page(page);
        doc
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&sample(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"type\": \"text\""));
        assert!(json.contains("\"element_type\": \"title\""));
        assert!(json.contains("Summary"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["pages"][0]["width"], 612.0);
    }
}
