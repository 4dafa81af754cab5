//! Gemini-based translation using the Generative AI API.

use crate::error::{Result, SubalignError};
use crate::pairs::TranslationPair;
use crate::translate::Translator;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Translator using the Google Gemini API.
pub struct GeminiTranslator {
    client: Client,
    api_key: String,
    model: String,
    source_lang: String,
    target_lang: String,
}

impl GeminiTranslator {
    /// Create a new Gemini translator for the given language pair.
    pub fn new(api_key: String, source_lang: String, target_lang: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model: "gemini-2.0-flash".to_string(),
            source_lang,
            target_lang,
        }
    }

    /// Set a different model (e.g., "gemini-1.5-pro").
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Build the translation prompt.
    fn build_prompt(&self, texts: &[&str]) -> String {
        let source = language_code_to_name(&self.source_lang);
        let target = language_code_to_name(&self.target_lang);

        if texts.len() == 1 {
            format!(
                r#"Translate the following {source} text to {target}.
Return ONLY the translated text, nothing else. Keep the sentence-ending punctuation of every sentence.

Text to translate:
{}"#,
                texts[0]
            )
        } else {
            let numbered_texts: String = texts
                .iter()
                .enumerate()
                .map(|(i, t)| format!("[{}] {}", i + 1, t))
                .collect::<Vec<_>>()
                .join("\n");

            format!(
                r#"Translate each of the following numbered {source} texts to {target}.
Return ONLY the translations in the same numbered format, one per input.

Texts to translate:
{numbered_texts}"#
            )
        }
    }

    /// Parse a numbered list-mode response back into one entry per input.
    fn parse_list_response(&self, response: &str, count: usize) -> Vec<String> {
        let mut results = Vec::with_capacity(count);

        for i in 1..=count {
            let pattern = format!("[{}]", i);
            let next_pattern = format!("[{}]", i + 1);

            if let Some(start) = response.find(&pattern) {
                let text_start = start + pattern.len();
                let text_end = if i < count {
                    response[text_start..]
                        .find(&next_pattern)
                        .map(|p| text_start + p)
                        .unwrap_or(response.len())
                } else {
                    response.len()
                };

                results.push(response[text_start..text_end].trim().to_string());
            }
        }

        // If numbered parsing failed, fall back to one translation per line.
        if results.len() != count {
            warn!(
                "List parse failed (got {} of {}), using line-based fallback",
                results.len(),
                count
            );
            results = response
                .lines()
                .filter(|l| !l.trim().is_empty())
                .take(count)
                .map(|l| l.trim().to_string())
                .collect();
        }

        while results.len() < count {
            results.push(String::new());
        }

        results
    }

    async fn generate(&self, prompt: String) -> Result<String> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let url = format!(
            "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent?key={}",
            self.model, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SubalignError::Api(format!("Translation request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubalignError::Api(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(SubalignError::Api(format!(
                "Translation API error ({}): {}",
                status, body
            )));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            SubalignError::Api(format!("Failed to parse translation response: {}", e))
        })?;

        if let Some(error) = gemini_response.error {
            return Err(SubalignError::Api(format!(
                "Gemini error: {}",
                error.message
            )));
        }

        Ok(gemini_response
            .candidates
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.content)
            .and_then(|c| c.parts)
            .and_then(|p| p.into_iter().next())
            .and_then(|p| p.text)
            .unwrap_or_default())
    }
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Deserialize, Debug)]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    error: Option<GeminiError>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Deserialize, Debug)]
struct GeminiResponseContent {
    parts: Option<Vec<GeminiResponsePart>>,
}

#[derive(Deserialize, Debug)]
struct GeminiResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GeminiError {
    message: String,
}

#[async_trait]
impl Translator for GeminiTranslator {
    async fn translate_joined(&self, text: &str) -> Result<String> {
        debug!(
            "Translating joined text ({} chars) to {}",
            text.chars().count(),
            self.target_lang
        );
        let prompt = self.build_prompt(&[text]);
        let translated = self.generate(prompt).await?;
        Ok(translated.trim().to_string())
    }

    async fn translate_list(&self, texts: &[String]) -> Result<Vec<TranslationPair>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!(
            "Translating {} fragment(s) to {}",
            texts.len(),
            self.target_lang
        );

        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let prompt = self.build_prompt(&refs);
        let response = self.generate(prompt).await?;
        let targets = self.parse_list_response(&response, texts.len());

        Ok(texts
            .iter()
            .zip(targets)
            .map(|(origin, target)| TranslationPair {
                origin: origin.clone(),
                target,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

/// Convert a language code to a human-readable name for better prompting.
fn language_code_to_name(code: &str) -> &'static str {
    let lowercase = code.to_lowercase();
    match lowercase.as_str() {
        "en" => "English",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        "it" => "Italian",
        "pt" => "Portuguese",
        "ru" => "Russian",
        "ja" => "Japanese",
        "ko" => "Korean",
        "zh" | "zh-cn" => "Chinese",
        "ar" => "Arabic",
        "hi" => "Hindi",
        "th" => "Thai",
        "vi" => "Vietnamese",
        "nl" => "Dutch",
        "pl" => "Polish",
        "tr" => "Turkish",
        "uk" => "Ukrainian",
        _ => "the target language",
    }
}
