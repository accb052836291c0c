//! Anthropic Messages API client for vision and text completion.
//!
//! Supports both:
//! - Text-only prompts (SQL synthesis)
//! - Image + text prompts (boxscore screenshot analysis)
//!
//! The vision reply contract asks the model to append a `CONFIDENCE: 0.XX`
//! line; parsing strips that line from the answer body and clamps the value.

use std::path::Path;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Model used when `ANTHROPIC_MODEL` is not set
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Token budget for a single completion
const MAX_TOKENS: u32 = 1024;

/// Transport-level ceiling; harness-level cancellation is intentionally absent
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Confidence assumed when the model omits or garbles its CONFIDENCE line
const DEFAULT_VISION_CONFIDENCE: f64 = 0.85;

const DEFAULT_VISION_SYSTEM: &str = "\
You are an expert basketball analyst analyzing game boxscores.
When answering questions about the boxscore image:
1. Look carefully at all player statistics shown
2. Provide a clear, concise answer
3. Include specific numbers from the boxscore
4. After your answer, on a new line, provide a confidence score from 0.0 to 1.0 in the format: CONFIDENCE: 0.XX

Focus on accuracy - the data in the image is the source of truth.";

#[derive(Debug, Error)]
pub enum AnthropicError {
    #[error("ANTHROPIC_API_KEY is not set")]
    MissingApiKey,
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("model returned no text content")]
    EmptyResponse,
}

/// Parsed reply from a vision analysis request.
#[derive(Debug, Clone)]
pub struct VisionReply {
    pub answer: String,
    pub confidence: f64,
    pub raw_response: String,
}

#[derive(Clone)]
pub struct AnthropicClient {
    client: Client,
    api_key: String,
    model: String,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Redact the API key; show only the last 4 chars for identification
        let key_suffix = if self.api_key.len() > 4 {
            &self.api_key[self.api_key.len() - 4..]
        } else {
            "****"
        };
        f.debug_struct("AnthropicClient")
            .field("model", &self.model)
            .field("api_key", &format!("...{}", key_suffix))
            .finish()
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: &'a str },
}

#[derive(Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    source_type: &'a str,
    media_type: &'a str,
    data: String,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type", default)]
    block_type: String,
    #[serde(default)]
    text: String,
}

impl AnthropicClient {
    pub fn new(api_key: String, model: String) -> Result<Self, AnthropicError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    /// Build a client from configuration; fails fast when no API key is set
    /// so no request is ever attempted without a credential.
    pub fn from_config(config: &Config) -> Result<Self, AnthropicError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or(AnthropicError::MissingApiKey)?;
        Self::new(api_key, config.model.clone())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Text-only completion.
    pub async fn complete(
        &self,
        system: Option<&str>,
        prompt: &str,
    ) -> Result<String, AnthropicError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![Message {
                role: "user",
                content: vec![ContentBlock::Text { text: prompt }],
            }],
        };
        self.send(&request).await
    }

    /// Analyze an image: sends the image bytes plus the question and parses
    /// the answer body and self-reported confidence from the reply.
    pub async fn analyze_image(
        &self,
        image_path: &Path,
        question: &str,
        system_prompt: Option<&str>,
    ) -> Result<VisionReply, AnthropicError> {
        let (data, media_type) = encode_image(image_path)?;
        debug!(
            "Sending {} image ({} b64 chars) to {}",
            media_type,
            data.len(),
            self.model
        );

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: Some(system_prompt.unwrap_or(DEFAULT_VISION_SYSTEM)),
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            source_type: "base64",
                            media_type,
                            data,
                        },
                    },
                    ContentBlock::Text { text: question },
                ],
            }],
        };

        let raw_response = self.send(&request).await?;
        let (answer, confidence) = parse_vision_reply(&raw_response);

        Ok(VisionReply {
            answer,
            confidence,
            raw_response,
        })
    }

    async fn send(&self, request: &MessagesRequest<'_>) -> Result<String, AnthropicError> {
        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // Error bodies are JSON with a nested message; fall back to the
            // raw body when they are not
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(|s| s.to_string()))
                .unwrap_or(body);
            return Err(AnthropicError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: MessagesResponse = response.json().await?;
        parsed
            .content
            .into_iter()
            .find(|block| block.block_type == "text" && !block.text.is_empty())
            .map(|block| block.text)
            .ok_or(AnthropicError::EmptyResponse)
    }
}

/// Read and base64-encode an image, picking the media type from its extension.
fn encode_image(image_path: &Path) -> Result<(String, &'static str), AnthropicError> {
    let bytes = std::fs::read(image_path)?;

    let media_type = match image_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/png",
    };

    Ok((BASE64.encode(bytes), media_type))
}

/// Split a vision reply into the answer body and the self-reported
/// confidence. The `CONFIDENCE:` line (any case) is consumed; a missing or
/// unparsable value falls back to the default, and parsed values are clamped
/// to [0.0, 1.0].
fn parse_vision_reply(response_text: &str) -> (String, f64) {
    let mut confidence = DEFAULT_VISION_CONFIDENCE;
    let mut answer_lines = Vec::new();

    for line in response_text.trim().lines() {
        if line.to_uppercase().starts_with("CONFIDENCE:") {
            if let Some(value) = line.splitn(2, ':').nth(1) {
                if let Ok(parsed) = value.trim().parse::<f64>() {
                    confidence = parsed.clamp(0.0, 1.0);
                }
            }
        } else {
            answer_lines.push(line);
        }
    }

    (answer_lines.join("\n").trim().to_string(), confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_reply_with_confidence() {
        let (answer, confidence) =
            parse_vision_reply("Jalen Smith led with 24 points.\nCONFIDENCE: 0.92");
        assert_eq!(answer, "Jalen Smith led with 24 points.");
        assert!((confidence - 0.92).abs() < 1e-9);
    }

    #[test]
    fn test_parse_reply_clamps_out_of_range() {
        let (_, confidence) = parse_vision_reply("Some answer\nCONFIDENCE: 1.5");
        assert_eq!(confidence, 1.0);

        let (_, confidence) = parse_vision_reply("Some answer\nCONFIDENCE: -0.3");
        assert_eq!(confidence, 0.0);
    }

    #[test]
    fn test_parse_reply_defaults_without_confidence_line() {
        let (answer, confidence) = parse_vision_reply("Duke won 78-72.");
        assert_eq!(answer, "Duke won 78-72.");
        assert_eq!(confidence, DEFAULT_VISION_CONFIDENCE);
    }

    #[test]
    fn test_parse_reply_unparsable_confidence_defaults() {
        let (answer, confidence) = parse_vision_reply("Answer line\nCONFIDENCE: very high");
        assert_eq!(answer, "Answer line");
        assert_eq!(confidence, DEFAULT_VISION_CONFIDENCE);
    }

    #[test]
    fn test_parse_reply_case_insensitive_marker() {
        let (answer, confidence) = parse_vision_reply("Answer line\nconfidence: 0.5");
        assert_eq!(answer, "Answer line");
        assert!((confidence - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_parse_reply_preserves_multiline_answer() {
        let (answer, confidence) =
            parse_vision_reply("Line one\nCONFIDENCE: 0.8\nLine two");
        assert_eq!(answer, "Line one\nLine two");
        assert!((confidence - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_encode_image_media_types() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        for (file_name, expected) in [
            ("box.png", "image/png"),
            ("box.JPG", "image/jpeg"),
            ("box.jpeg", "image/jpeg"),
            ("box.webp", "image/webp"),
            ("box.unknown", "image/png"),
        ] {
            let path = dir.path().join(file_name);
            let mut f = std::fs::File::create(&path).unwrap();
            f.write_all(b"fake image bytes").unwrap();

            let (data, media_type) = encode_image(&path).unwrap();
            assert_eq!(media_type, expected, "for {}", file_name);
            assert!(!data.is_empty());
        }
    }

    #[test]
    fn test_missing_api_key_short_circuits() {
        let config = Config::for_base_dir("/tmp");
        let err = AnthropicClient::from_config(&config).unwrap_err();
        assert!(matches!(err, AnthropicError::MissingApiKey));
    }
}
