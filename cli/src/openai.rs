//! OpenAI-compatible chat-completions translator.

use std::time::Duration;

use pdftrans::{TranslationResult, TranslationStyle, Translator};
use serde::{Deserialize, Serialize};

/// Default API endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Blocking chat-completions client; one request per content item.
pub struct OpenAiTranslator {
    http: reqwest::blocking::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiTranslator {
    /// Build a client for `base_url` using `model`.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    fn request(&self, system: &str, text: &str) -> Result<String, String> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system,
                },
                Message {
                    role: "user",
                    content: text,
                },
            ],
            temperature: 0.0,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(format!("API returned {}: {}", status, detail.trim()));
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| format!("invalid response: {}", e))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| "response contained no message".to_string())
    }
}

/// System prompt for one request.
pub fn system_prompt(source: &str, target: &str, style: TranslationStyle) -> String {
    format!(
        "You are a translation expert, proficient in various languages. Translates {} to {}. {}",
        source,
        target,
        style.instruction()
    )
}

impl Translator for OpenAiTranslator {
    fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
        style: TranslationStyle,
    ) -> TranslationResult {
        let system = system_prompt(source, target, style);
        match self.request(&system, text) {
            Ok(content) => TranslationResult::ok(content),
            Err(e) => {
                log::warn!("Translation request failed: {}", e);
                TranslationResult::failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt() {
        let prompt = system_prompt("English", "Chinese", TranslationStyle::Casual);
        assert!(prompt.starts_with("You are a translation expert"));
        assert!(prompt.contains("Translates English to Chinese."));
        assert!(prompt.ends_with("as if speaking to a friend."));
    }

    #[test]
    fn test_request_body() {
        let body = ChatRequest {
            model: "m",
            messages: vec![Message {
                role: "user",
                content: "hi",
            }],
            temperature: 0.0,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["temperature"], 0.0);
    }

    #[test]
    fn test_unreachable_endpoint_collapses_to_failure() {
        let translator = OpenAiTranslator::new("key", "http://127.0.0.1:9", "m").unwrap();
        let result = translator.translate("hello", "English", "French", TranslationStyle::Standard);
        assert!(!result.success);
    }
}
