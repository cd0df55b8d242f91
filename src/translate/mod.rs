//! Translation of a document model through an injected [`Translator`].

mod adapter;
mod style;
mod table_format;

pub use adapter::{externalize, internalize, strip_prefix, unwrap_code_fence};
pub use style::TranslationStyle;
pub use table_format::{parse_cells, serialize_cells};

use serde::Serialize;

use crate::model::Document;

/// Preambles translation services tend to put before the actual answer.
pub const DEFAULT_PREFIXES: &[&str] = &[
    "Here is the translation of the provided text into Chinese:",
    "Translation:",
    "翻译:",
    "翻译结果：",
    "译文：",
];

/// Outcome of one translation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    /// Translated text, or a failure description
    pub text: String,
    /// Whether `text` is a translation
    pub success: bool,
}

impl TranslationResult {
    /// A successful translation.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    /// A failed request.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            text: reason.into(),
            success: false,
        }
    }
}

/// A translation service.
///
/// Implementations never fail past this boundary: every error becomes a
/// result with `success == false`.
pub trait Translator {
    /// Translate `text` from `source` to `target` in the given style.
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
        style: TranslationStyle,
    ) -> TranslationResult;
}

impl<T: Translator + ?Sized> Translator for &T {
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
        style: TranslationStyle,
    ) -> TranslationResult {
        (**self).translate(text, source, target, style)
    }
}

impl<T: Translator + ?Sized> Translator for Box<T> {
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
        style: TranslationStyle,
    ) -> TranslationResult {
        (**self).translate(text, source, target, style)
    }
}

/// Options for translating a document.
#[derive(Debug, Clone)]
pub struct TranslateOptions {
    /// Source language name
    pub source_language: String,
    /// Target language name
    pub target_language: String,
    /// Requested register
    pub style: TranslationStyle,
    /// Response preambles to strip, tried in order
    pub prefixes: Vec<String>,
}

impl Default for TranslateOptions {
    fn default() -> Self {
        Self {
            source_language: "English".to_string(),
            target_language: "Chinese".to_string(),
            style: TranslationStyle::Standard,
            prefixes: DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl TranslateOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source language.
    pub fn with_source_language(mut self, language: impl Into<String>) -> Self {
        self.source_language = language.into();
        self
    }

    /// Set the target language.
    pub fn with_target_language(mut self, language: impl Into<String>) -> Self {
        self.target_language = language.into();
        self
    }

    /// Set the style.
    pub fn with_style(mut self, style: TranslationStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the prefix list.
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }
}

/// Per-document translation counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TranslationSummary {
    /// Items that received a translation
    pub translated: usize,
    /// Items left in the source language
    pub failed: usize,
}

impl TranslationSummary {
    /// Total items visited.
    pub fn total(&self) -> usize {
        self.translated + self.failed
    }
}

type ProgressFn<'a> = Box<dyn FnMut(usize, usize) + 'a>;

/// Sequentially translates every content item of a document.
pub struct DocumentTranslator<'a, T: Translator> {
    translator: T,
    options: TranslateOptions,
    progress: Option<ProgressFn<'a>>,
}

impl<'a, T: Translator> DocumentTranslator<'a, T> {
    /// Create a driver around `translator`.
    pub fn new(translator: T, options: TranslateOptions) -> Self {
        Self {
            translator,
            options,
            progress: None,
        }
    }

    /// Called with `(done, total)` after every item.
    pub fn on_progress(mut self, callback: impl FnMut(usize, usize) + 'a) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Translate all items in page order. Per-item failures are counted, never raised.
    pub fn translate(&mut self, document: &mut Document) -> TranslationSummary {
        let total = document.content_count();
        let mut summary = TranslationSummary::default();
        let opts = &self.options;

        for (idx, content) in document.contents_mut().enumerate() {
            let request = adapter::externalize(content);
            let result = self.translator.translate(
                &request,
                &opts.source_language,
                &opts.target_language,
                opts.style,
            );
            if !result.success {
                log::warn!("Translation failed for item {}: {}", idx, result.text);
            }

            if adapter::internalize(content, result, &opts.prefixes) {
                summary.translated += 1;
            } else {
                summary.failed += 1;
            }

            if let Some(progress) = self.progress.as_mut() {
                progress(idx + 1, total);
            }
        }

        log::info!(
            "Translated {}/{} items ({} left untranslated)",
            summary.translated,
            summary.total(),
            summary.failed
        );
        summary
    }
}
