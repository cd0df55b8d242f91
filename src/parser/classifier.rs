//! Element classification: title or paragraph.

use crate::model::{ElementType, TextContent};

use super::grouper::TextLine;

/// Labels lines as titles or paragraphs.
///
/// A line is a title if its size exceeds `title_factor × mean size`, its font
/// name contains "bold" (any case), or every alphabetic character in it is
/// uppercase. The rules are OR'd, so short all-caps fragments such as unit
/// labels come out as titles too.
#[derive(Debug, Clone)]
pub struct ElementClassifier {
    title_factor: f32,
}

impl ElementClassifier {
    /// Create a classifier with the given title size factor.
    pub fn new(title_factor: f32) -> Self {
        Self { title_factor }
    }

    /// Classify a page's lines into text content items, preserving order.
    pub fn classify(&self, lines: Vec<TextLine>) -> Vec<TextContent> {
        if lines.is_empty() {
            return Vec::new();
        }

        let mean = lines.iter().map(|l| l.size).sum::<f32>() / lines.len() as f32;
        let threshold = mean * self.title_factor;

        lines
            .into_iter()
            .map(|line| {
                let element_type = if is_title(&line, threshold) {
                    ElementType::Title
                } else {
                    ElementType::Paragraph
                };
                TextContent::new(element_type, line.text, line.position, line.font, line.size)
            })
            .collect()
    }
}

impl Default for ElementClassifier {
    fn default() -> Self {
        Self::new(1.2)
    }
}

fn is_title(line: &TextLine, threshold: f32) -> bool {
    line.size > threshold
        || line.font.to_lowercase().contains("bold")
        || line
            .text
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
}
