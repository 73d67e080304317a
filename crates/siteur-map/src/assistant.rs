//! Client for the hosted generative-language API (`generateContent`).

use crate::actions::Action;
use crate::services::Inbox;
use serde::{Deserialize, Serialize};
use siteur::{ChatRequest, Reply};

#[derive(thiserror::Error, Debug)]
pub enum AssistantError {
    #[error("no API key configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("service answered {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unreadable response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub trait AssistantBackend {
    /// Start `request`; the outcome arrives later as a `ChatReply`.
    fn request(&mut self, request: ChatRequest);
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Text of the first candidate, or `None` when the service returned
/// no text at all.
pub fn parse_response(
    status: u16,
    body: &str,
) -> Result<Option<String>, AssistantError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|b| b.error.message)
            .unwrap_or_else(|_| body.chars().take(200).collect());
        return Err(AssistantError::Status { status, message });
    }
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    Ok(Some(text).filter(|t| !t.trim().is_empty()))
}

fn to_reply(result: Result<Option<String>, AssistantError>) -> Reply {
    match result {
        Ok(Some(text)) => Reply::Text(text),
        Ok(None) => Reply::Empty,
        Err(e) => {
            log::warn!("assistant request failed: {}", e);
            Reply::Failed
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl GeminiConfig {
    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

fn body(prompt: &str) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: [Content {
            parts: [Part { text: prompt }],
        }],
    }
}

/// Gemini REST client. Each request runs off the UI thread and reports
/// back through the inbox.
pub struct GeminiClient {
    config: GeminiConfig,
    inbox: Inbox,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig, inbox: Inbox) -> Self {
        if config.api_key.is_none() {
            log::warn!("no assistant API key set; chat replies will fail");
        }
        Self { config, inbox }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn generate(
    config: &GeminiConfig,
    prompt: &str,
) -> Result<Option<String>, AssistantError> {
    let key = config.api_key.as_deref().ok_or(AssistantError::MissingApiKey)?;
    let response = reqwest::blocking::Client::new()
        .post(config.url())
        .header("x-goog-api-key", key)
        .json(&body(prompt))
        .send()?;
    let status = response.status().as_u16();
    parse_response(status, &response.text()?)
}

#[cfg(target_arch = "wasm32")]
async fn generate(
    config: &GeminiConfig,
    prompt: &str,
) -> Result<Option<String>, AssistantError> {
    let key = config.api_key.as_deref().ok_or(AssistantError::MissingApiKey)?;
    let response = reqwest::Client::new()
        .post(config.url())
        .header("x-goog-api-key", key)
        .json(&body(prompt))
        .send()
        .await?;
    let status = response.status().as_u16();
    parse_response(status, &response.text().await?)
}

impl AssistantBackend for GeminiClient {
    fn request(&mut self, request: ChatRequest) {
        let config = self.config.clone();
        let inbox = self.inbox.clone();

        #[cfg(not(target_arch = "wasm32"))]
        std::thread::spawn(move || {
            let reply = to_reply(generate(&config, &request.prompt));
            inbox.send(Action::ChatReply {
                session: request.session,
                reply,
            });
        });

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            let reply = to_reply(generate(&config, &request.prompt).await);
            inbox.send(Action::ChatReply {
                session: request.session,
                reply,
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_text_is_joined_from_parts() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[
            {"text":"Toma la Línea 3 "},{"text":"hasta Plaza Universidad."}
        ]},"finishReason":"STOP"}]}"#;
        assert_eq!(
            parse_response(200, body).unwrap().as_deref(),
            Some("Toma la Línea 3 hasta Plaza Universidad.")
        );
    }

    #[test]
    fn test_missing_text_is_empty_reply() {
        for body in [
            r#"{"candidates":[]}"#,
            r#"{}"#,
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"text":""}]}}]}"#,
        ] {
            assert_eq!(parse_response(200, body).unwrap(), None, "{}", body);
        }
        assert_eq!(to_reply(Ok(None)), Reply::Empty);
    }

    #[test]
    fn test_error_status_uses_service_message() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        match parse_response(400, body) {
            Err(AssistantError::Status { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid.");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(matches!(
            parse_response(502, "Bad Gateway"),
            Err(AssistantError::Status { status: 502, .. })
        ));
        assert_eq!(to_reply(parse_response(502, "")), Reply::Failed);
    }

    #[test]
    fn test_garbage_body_is_decode_error() {
        assert!(matches!(
            parse_response(200, "<html>"),
            Err(AssistantError::Decode(_))
        ));
    }

    #[test]
    fn test_request_shape() {
        let config = GeminiConfig {
            endpoint: "https://generativelanguage.googleapis.com/v1beta/"
                .to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key: None,
        };
        assert_eq!(
            config.url(),
            "https://generativelanguage.googleapis.com/v1beta/models/\
             gemini-3-flash-preview:generateContent"
        );
        assert_eq!(
            serde_json::to_string(&body("hola")).unwrap(),
            r#"{"contents":[{"parts":[{"text":"hola"}]}]}"#
        );
    }
}
