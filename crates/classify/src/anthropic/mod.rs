//! Classification through Anthropic's Messages API.

mod api;

use async_trait::async_trait;
use exn::{OptionExt, ResultExt};
use reqwest::Client;
use shelver_extract::models::Metadata;
use std::time::Duration;
use tracing::instrument;

use self::api::{ApiMessage, MessagesRequest, MessagesResponse};
use crate::error::{ErrorKind, Result};
use crate::prompt::{SYSTEM_PROMPT, user_message};
use crate::{Category, Classify};

pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com/v1";
pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";
/// A single category name never needs more.
pub const DEFAULT_MAX_TOKENS: u32 = 10;
const API_VERSION: &str = "2023-06-01";

/// Classifier backed by a hosted Claude model.
///
/// Without an API key every call fails with
/// [`MissingCredential`](crate::error::ErrorKind::MissingCredential), so
/// [`classify()`](Classify::classify) files everything as unsorted.
pub struct AnthropicClassifier {
    client: Client,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    endpoint: String,
}
impl AnthropicClassifier {
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build().or_raise(|| ErrorKind::Client)?;
        Ok(Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Base URL the `/messages` path is appended to.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[async_trait]
impl Classify for AnthropicClassifier {
    fn name(&self) -> &str {
        "anthropic"
    }

    #[instrument(skip(self, metadata), fields(model = %self.model))]
    async fn try_classify(&self, metadata: &Metadata, filename: &str) -> Result<Category> {
        let api_key = self.api_key.as_deref().ok_or_raise(|| ErrorKind::MissingCredential)?;
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system: SYSTEM_PROMPT,
            messages: vec![ApiMessage { role: "user", content: user_message(metadata, filename) }],
        };
        let response = self
            .client
            .post(format!("{}/messages", self.endpoint.trim_end_matches('/')))
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .or_raise(|| ErrorKind::Request)?;
        let status = response.status();
        if !status.is_success() {
            exn::bail!(ErrorKind::Status(status.as_u16()));
        }
        let body = response.text().await.or_raise(|| ErrorKind::Request)?;
        let answer = serde_json::from_str::<MessagesResponse>(&body)
            .or_raise(|| ErrorKind::Response)?
            .first_text()
            .ok_or_raise(|| ErrorKind::Response)?;
        tracing::debug!(answer = %answer.trim(), "Model answered");
        answer.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use shelver_extract::models::Source;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    const ANSWER_FICTION: &str =
        r#"{"id":"msg_01","type":"message","role":"assistant","content":[{"type":"text","text":"fiction"}],"stop_reason":"end_turn"}"#;
    const ANSWER_POETRY: &str = r#"{"content":[{"type":"text","text":"Poetry."}]}"#;

    /// Reads one HTTP/1.1 request (headers plus `content-length` body).
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let read = socket.read(&mut chunk).await.unwrap();
            if read == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..read]);
            if let Some(end) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buffer[..end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .map(|value| value.trim().parse::<usize>().unwrap())
                    .unwrap_or(0);
                if buffer.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8(buffer).unwrap()
    }

    /// Answers a single request with a canned response and hands back the raw request.
    async fn fake_api(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/v1", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });
        (endpoint, handle)
    }

    fn classifier(endpoint: &str, api_key: Option<&str>) -> AnthropicClassifier {
        AnthropicClassifier::new(api_key.map(String::from), Duration::from_secs(5)).unwrap().with_endpoint(endpoint)
    }

    fn novel() -> Metadata {
        Metadata {
            title: "My Novel".to_string(),
            author: "Jane Doe".to_string(),
            source: Source::Filename,
            ..Metadata::default()
        }
    }

    #[tokio::test]
    async fn test_successful_classification() {
        let (endpoint, server) = fake_api("200 OK", ANSWER_FICTION).await;
        let category = classifier(&endpoint, Some("test-key")).try_classify(&novel(), "Jane Doe - My Novel.epub").await;
        assert_eq!(category.unwrap(), Category::Fiction);

        let request = server.await.unwrap();
        let (head, body) = request.split_once("\r\n\r\n").unwrap();
        let head = head.to_lowercase();
        assert!(head.starts_with("post /v1/messages http/1.1"));
        assert!(head.contains("x-api-key: test-key"));
        assert!(head.contains("anthropic-version: 2023-06-01"));
        let body: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 10);
        assert_eq!(body["system"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(
            body["messages"][0]["content"],
            "Title: My Novel\nAuthor: Jane Doe\nMetadata source: filename\nFile extension: .epub\nFilename: Jane Doe - My Novel.epub"
        );
    }

    #[tokio::test]
    async fn test_unexpected_answer_is_unsorted() {
        let (endpoint, _server) = fake_api("200 OK", ANSWER_POETRY).await;
        let classifier = classifier(&endpoint, Some("test-key"));
        let err = classifier.try_classify(&novel(), "poems.epub").await.unwrap_err();
        assert_eq!(*err, ErrorKind::UnexpectedAnswer("Poetry.".to_string()));
    }

    #[tokio::test]
    async fn test_error_status() {
        let (endpoint, _server) = fake_api("529 Overloaded", r#"{"type":"error"}"#).await;
        let classifier = classifier(&endpoint, Some("test-key"));
        let err = classifier.try_classify(&novel(), "book.epub").await.unwrap_err();
        assert_eq!(*err, ErrorKind::Status(529));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_undecodable_body() {
        let (endpoint, _server) = fake_api("200 OK", "<html>gateway</html>").await;
        let classifier = classifier(&endpoint, Some("test-key"));
        let err = classifier.try_classify(&novel(), "book.epub").await.unwrap_err();
        assert_eq!(*err, ErrorKind::Response);
    }

    #[tokio::test]
    async fn test_missing_credential_never_calls_out() {
        // Nothing listens here; a request would fail with Request instead.
        let classifier = classifier("http://127.0.0.1:9/v1", Some("   "));
        assert!(!classifier.has_credential());
        let err = classifier.try_classify(&novel(), "book.epub").await.unwrap_err();
        assert_eq!(*err, ErrorKind::MissingCredential);
        assert_eq!(classifier.classify(&novel(), "book.epub").await, Category::Unsorted);
    }
}
