//! Translation style tags.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Register requested from the translation service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationStyle {
    /// Plain, accurate translation
    #[default]
    Standard,
    /// Literary prose
    Novel,
    /// News article
    News,
    /// Academic writing
    Academic,
    /// Conversational
    Casual,
    /// Verse-aware
    Poetic,
    /// Technical documentation
    Technical,
    /// Playful
    Humorous,
}

impl TranslationStyle {
    /// All recognised styles.
    pub const ALL: [TranslationStyle; 8] = [
        TranslationStyle::Standard,
        TranslationStyle::Novel,
        TranslationStyle::News,
        TranslationStyle::Academic,
        TranslationStyle::Casual,
        TranslationStyle::Poetic,
        TranslationStyle::Technical,
        TranslationStyle::Humorous,
    ];

    /// Resolve a tag, falling back to [`TranslationStyle::Standard`] for unknown tags.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|s| s.as_str() == tag)
            .unwrap_or_else(|| {
                log::warn!("Unknown translation style {:?}, using standard", tag);
                TranslationStyle::Standard
            })
    }

    /// Tag name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationStyle::Standard => "standard",
            TranslationStyle::Novel => "novel",
            TranslationStyle::News => "news",
            TranslationStyle::Academic => "academic",
            TranslationStyle::Casual => "casual",
            TranslationStyle::Poetic => "poetic",
            TranslationStyle::Technical => "technical",
            TranslationStyle::Humorous => "humorous",
        }
    }

    /// Natural-language instruction appended to the translation prompt.
    pub fn instruction(&self) -> &'static str {
        match self {
            TranslationStyle::Standard => "Please translate the text in a standard, accurate way.",
            TranslationStyle::Novel => "Please translate the text in the style of a novel, with literary, expressive language and narrative flow.",
            TranslationStyle::News => "Please translate the text in a news article style, with clear, concise, and objective language.",
            TranslationStyle::Academic => "Please translate the text in an academic style, with formal language, precise terminology, and logical structure.",
            TranslationStyle::Casual => "Please translate the text in a casual, conversational style, as if speaking to a friend.",
            TranslationStyle::Poetic => "Please translate the text in a poetic style, with attention to rhythm, imagery, and emotional resonance.",
            TranslationStyle::Technical => "Please translate the text in a technical style, with precise terminology and clear explanations.",
            TranslationStyle::Humorous => "Please translate the text with a humorous tone, incorporating wit and playfulness where appropriate.",
        }
    }
}

impl FromStr for TranslationStyle {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(s))
    }
}

impl fmt::Display for TranslationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tags() {
        for style in TranslationStyle::ALL {
            assert_eq!(TranslationStyle::from_tag(style.as_str()), style);
        }
        assert_eq!(TranslationStyle::from_tag(" Poetic "), TranslationStyle::Poetic);
    }

    #[test]
    fn test_unknown_tag_falls_back() {
        assert_eq!(TranslationStyle::from_tag("pirate"), TranslationStyle::Standard);
        let parsed: TranslationStyle = "".parse().unwrap();
        assert_eq!(parsed, TranslationStyle::Standard);
    }

    #[test]
    fn test_instruction() {
        assert!(TranslationStyle::News.instruction().contains("news article"));
        assert_eq!(TranslationStyle::Academic.to_string(), "academic");
    }
}
