use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http_client::openai_client;
use super::oracle::{OracleError, OracleRequest, TextOracle};
use crate::config::OracleSettings;

/// Message in conversation
#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// API request body
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
    max_tokens: u32,
}

/// API response body
#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// API error response
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// OpenAI-compatible chat completions client
pub struct OpenAiClient {
    client: &'static Client,
    settings: OracleSettings,
}

impl OpenAiClient {
    pub fn new(settings: OracleSettings) -> Self {
        Self {
            client: openai_client(),
            settings,
        }
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }
}

/// Pull the first choice's text out of a raw response body.
///
/// A missing or null `content` is not an error: it comes back as an empty
/// string so the caller's fallback handling applies.
fn extract_completion(body: &str) -> Result<String, OracleError> {
    let response: ApiResponse =
        serde_json::from_str(body).map_err(|e| OracleError::Decode(e.to_string()))?;

    Ok(response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|text| text.trim().to_string())
        .unwrap_or_default())
}

#[async_trait]
impl TextOracle for OpenAiClient {
    async fn complete(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let body = ApiRequest {
            model: &self.settings.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &request.system,
                },
                Message {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(
            model = %self.settings.model,
            prompt_chars = request.prompt.len(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(self.settings.completions_url())
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| OracleError::Request(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(OracleError::Status {
                status: status.as_u16(),
                body: message,
            });
        }

        extract_completion(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_completion_trims() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"  DevOps\n"}}]}"#;
        assert_eq!(extract_completion(body).unwrap(), "DevOps");
    }

    #[test]
    fn test_extract_completion_null_content_is_empty() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert_eq!(extract_completion(body).unwrap(), "");

        let no_choices = r#"{"choices":[]}"#;
        assert_eq!(extract_completion(no_choices).unwrap(), "");
    }

    #[test]
    fn test_extract_completion_rejects_garbage() {
        let err = extract_completion("<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, OracleError::Decode(_)));
    }

    #[test]
    fn test_request_serializes_zero_temperature() {
        let body = ApiRequest {
            model: "gpt-4o-mini",
            messages: vec![Message {
                role: "user",
                content: "hi",
            }],
            temperature: 0.0,
            max_tokens: 50,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["temperature"], 0.0);
        assert_eq!(json["max_tokens"], 50);
        assert_eq!(json["messages"][0]["role"], "user");
    }
}
