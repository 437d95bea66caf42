//! Gemini API client.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::{ChatBackend, ChatRequest, FragmentStream, TurnRole};
use crate::config::AIConfig;
use crate::error::ClientError;
use crate::sse;

/// Gemini API client.
pub struct GeminiClient {
    client: reqwest::Client,
    config: AIConfig,
}

/// Request body shared by `generateContent` and `streamGenerateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
}

/// Response (or one streamed event) from Gemini.
#[derive(Debug, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    pub(crate) error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

/// Error payload returned by the API.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub(crate) code: u16,
    pub(crate) message: String,
    #[serde(default)]
    #[allow(dead_code)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiErrorBody,
}

impl Content {
    fn text(role: Option<&str>, text: impl Into<String>) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.into()),
            }],
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    pub(crate) fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

fn role_name(role: TurnRole) -> &'static str {
    match role {
        TurnRole::User => "user",
        TurnRole::Model => "model",
    }
}

/// Map a chat request onto the Gemini wire format.
pub(crate) fn build_request(request: &ChatRequest) -> GenerateContentRequest {
    let mut contents: Vec<Content> = request
        .history
        .iter()
        .map(|turn| Content::text(Some(role_name(turn.role)), turn.text.as_str()))
        .collect();
    contents.push(Content::text(Some("user"), request.message.as_str()));

    GenerateContentRequest {
        contents,
        system_instruction: Some(Content::text(None, request.system_instruction.as_str())),
        generation_config: Some(GenerationConfig {
            temperature: request.temperature,
        }),
    }
}

impl GeminiClient {
    /// Create a new Gemini client.
    ///
    /// The API key is checked on each request, not here, so a client
    /// without a key still answers every call with
    /// [`ClientError::MissingApiKey`].
    pub fn new(config: AIConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    async fn post(
        &self,
        url: &str,
        body: &GenerateContentRequest,
    ) -> Result<reqwest::Response, ClientError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", self.api_key()?)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        Err(api_error(status.as_u16(), &text))
    }

    fn api_key(&self) -> Result<HeaderValue, ClientError> {
        if self.config.api_key.is_empty() {
            return Err(ClientError::MissingApiKey);
        }
        let mut key =
            HeaderValue::from_str(&self.config.api_key).map_err(|_| ClientError::InvalidApiKey)?;
        key.set_sensitive(true);
        Ok(key)
    }

    fn map_transport(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout(self.config.request_timeout)
        } else {
            ClientError::Http(e)
        }
    }
}

/// Build an API error, preferring the message from a JSON error body.
fn api_error(status: u16, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|r| r.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    ClientError::Api { status, message }
}

#[async_trait]
impl ChatBackend for GeminiClient {
    async fn stream_chat(&self, request: ChatRequest) -> Result<FragmentStream, ClientError> {
        let url = format!("{}?alt=sse", self.endpoint("streamGenerateContent"));
        let body = build_request(&request);

        debug!(
            "Streaming from {} with {} prior turns",
            self.config.model,
            request.history.len()
        );
        let response = self.post(&url, &body).await?;

        let timeout = self.config.request_timeout;
        let bytes = response.bytes_stream();
        Ok(sse::fragments(futures_util::StreamExt::map(bytes, move |chunk| {
            chunk.map_err(|e| {
                if e.is_timeout() {
                    ClientError::Timeout(timeout)
                } else {
                    ClientError::Http(e)
                }
            })
        })))
    }

    async fn generate(&self, prompt: &str) -> Result<Option<String>, ClientError> {
        let body = GenerateContentRequest {
            contents: vec![Content::text(Some("user"), prompt)],
            system_instruction: None,
            generation_config: None,
        };

        debug!("Generating with {}", self.config.model);
        let response = self.post(&self.endpoint("generateContent"), &body).await?;
        let response: GenerateContentResponse = response.json().await?;

        if let Some(error) = response.error {
            return Err(ClientError::Api {
                status: error.code,
                message: error.message,
            });
        }

        let text = response.text();
        Ok((!text.is_empty()).then_some(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Turn;
    use crate::{Assistant, CONNECTION_APOLOGY, TIP_ERROR_FALLBACK};
    use vitalsync_core::{seed, ChatMessage};

    fn config() -> AIConfig {
        AIConfig::builder().api_key("test-key").build()
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_per_call() {
        let client = GeminiClient::new(AIConfig::default()).unwrap();
        assert!(matches!(
            client.generate("tip").await,
            Err(ClientError::MissingApiKey)
        ));
    }

    #[test]
    fn test_invalid_api_key() {
        let client = GeminiClient::new(AIConfig::builder().api_key("bad\nkey").build()).unwrap();
        assert!(matches!(client.api_key(), Err(ClientError::InvalidApiKey)));
        assert!(GeminiClient::new(config()).unwrap().api_key().is_ok());
    }

    #[tokio::test]
    async fn test_missing_key_degrades_to_fallbacks() {
        let assistant = Assistant::new(GeminiClient::new(AIConfig::default()).unwrap());
        let profile = seed::initial_profile();
        let docs = seed::initial_documents();

        assert_eq!(assistant.daily_tip(&profile, &docs).await, TIP_ERROR_FALLBACK);

        let history = vec![ChatMessage::user(1, "Hello")];
        let mut chunks = Vec::new();
        let reply = assistant
            .stream_reply(&history, &docs, &profile, |c| chunks.push(c.to_string()))
            .await;
        assert_eq!(reply, CONNECTION_APOLOGY);
        assert_eq!(chunks, vec![CONNECTION_APOLOGY]);
    }

    #[test]
    fn test_endpoints() {
        let client = GeminiClient::new(
            AIConfig::builder()
                .api_key("k")
                .base_url("http://localhost:9000/v1beta/")
                .build(),
        )
        .unwrap();
        assert_eq!(
            client.endpoint("generateContent"),
            "http://localhost:9000/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(GeminiClient::new(config()).unwrap().model(), "gemini-2.5-flash");
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            system_instruction: "be kind".to_string(),
            temperature: 0.7,
            history: vec![
                Turn {
                    role: TurnRole::Model,
                    text: "Hi Alex!".to_string(),
                },
                Turn {
                    role: TurnRole::User,
                    text: "hello".to_string(),
                },
            ],
            message: "How am I doing?".to_string(),
        };

        let json = serde_json::to_value(build_request(&request)).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be kind");
        assert!(json["systemInstruction"].get("role").is_none());
        assert!((json["generationConfig"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);

        let contents = json["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "model");
        assert_eq!(contents[1]["role"], "user");
        assert_eq!(contents[2]["role"], "user");
        assert_eq!(contents[2]["parts"][0]["text"], "How am I doing?");
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error":{"code":403,"message":"API key not valid","status":"PERMISSION_DENIED"}}"#;
        match api_error(403, body) {
            ClientError::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other}"),
        }

        match api_error(502, "Bad Gateway\n") {
            ClientError::Api { message, .. } => assert_eq!(message, "Bad Gateway"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_response_text() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Drink "},{"text":"water."}]},"finishReason":"STOP"}]}"#,
        )
        .unwrap();
        assert_eq!(response.text(), "Drink water.");

        let empty: GenerateContentResponse =
            serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(empty.text(), "");
    }
}
