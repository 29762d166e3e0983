/// LLM client for the placement assistant.
///
/// Speaks the OpenAI-compatible `POST {base}/chat/completions` API. Every
/// model call in the portal goes through [`LlmClient`].
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

use prompts::Persona;

const MAX_TOKENS: u32 = 350;
const TEMPERATURE: f32 = 0.7;
const MAX_RETRIES: u32 = 3;

/// Prefix of every inline error returned by [`LlmClient::ask`].
pub const ASSISTANT_ERROR_PREFIX: &str = "AI assistant error:";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API key configured (set OPENAI_API_KEY)")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Trimmed text of the first choice, if it has any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Single chat completion with a system message.
    /// Retries on 429 and 5xx with exponential backoff.
    pub async fn chat(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Assistant call attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&url)
                .bearer_auth(api_key)
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let text = response.text().await.unwrap_or_default();
                warn!("Assistant API returned {}: {}", status, text);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: text,
                });
                continue;
            }

            if !status.is_success() {
                let text = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorEnvelope>(&text)
                    .map(|e| e.error.message)
                    .unwrap_or(text);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: ChatResponse = response.json().await?;
            if let Some(usage) = &parsed.usage {
                debug!(
                    "Assistant call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }
            return parsed
                .text()
                .map(str::to_string)
                .ok_or(LlmError::EmptyContent);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Asks the assistant in a persona. Never fails: errors come back as
    /// displayable text starting with [`ASSISTANT_ERROR_PREFIX`].
    pub async fn ask(&self, prompt: &str, persona: Persona) -> String {
        match self.chat(prompt, persona.system_prompt()).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(persona = ?persona, "Assistant call failed: {e}");
                format!("{ASSISTANT_ERROR_PREFIX} {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::Server, key: Option<&str>) -> LlmClient {
        LlmClient::new(key.map(String::from), server.url(), "gpt-4o-mini").unwrap()
    }

    #[tokio::test]
    async fn test_chat_returns_trimmed_answer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(serde_json::json!({
                    "model": "gpt-4o-mini",
                    "max_tokens": 350
                })),
                Matcher::Regex("Career-AI".to_string()),
                Matcher::Regex("How do I prepare\\?".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"  Practise mock interviews.\n"}}],
                    "usage":{"prompt_tokens":12,"completion_tokens":4}}"#,
            )
            .create_async()
            .await;

        let answer = client(&server, Some("sk-test"))
            .ask("How do I prepare?", Persona::Student)
            .await;
        assert_eq!(answer, "Practise mock interviews.");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_becomes_inline_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(400)
            .with_body(r#"{"error":{"message":"bad model"}}"#)
            .create_async()
            .await;

        let c = client(&server, Some("sk-test"));
        match c.chat("hi", "sys").await {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "bad model");
            }
            other => panic!("expected API error, got {other:?}"),
        }

        let answer = c.ask("hi", Persona::Admin).await;
        assert!(answer.starts_with(ASSISTANT_ERROR_PREFIX));
        assert!(answer.contains("bad model"));
    }

    #[tokio::test]
    async fn test_empty_choice_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[{"message":{"content":"   "}}]}"#)
            .create_async()
            .await;

        let result = client(&server, Some("sk-test")).chat("hi", "sys").await;
        assert!(matches!(result, Err(LlmError::EmptyContent)));
    }

    #[tokio::test]
    async fn test_missing_key_never_calls_out() {
        let server = mockito::Server::new_async().await;
        let c = client(&server, Some("  "));
        assert!(matches!(
            c.chat("hi", "sys").await,
            Err(LlmError::MissingApiKey)
        ));
        let answer = c.ask("hi", Persona::General).await;
        assert!(answer.starts_with("AI assistant error: no API key"));
    }
}
