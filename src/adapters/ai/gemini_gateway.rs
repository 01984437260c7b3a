//! Gemini Gateway - live implementation of `AiGateway` over the Generative
//! Language REST API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-2.5-flash")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let gateway = GeminiGateway::new(config)?;
//! ```
//!
//! # Streaming
//!
//! Chat replies use `:streamGenerateContent?alt=sse`. Bytes are buffered
//! until a full line is available, so events split across network reads
//! are reassembled before parsing. The session history only records a turn
//! once its reply stream has completed without error.

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::gemini_types::{Content, GenerateContentRequest, GenerateContentResponse};
use crate::config::AiConfig;
use crate::domain::foundation::TopicContext;
use crate::domain::guidance::prompts;
use crate::domain::plan::{
    ActionPlan, BackupSecurity, BackupStorage, CryptoExperience, CryptoUrgency,
};
use crate::ports::{AiGateway, ChatSession, ChunkStream, GatewayError, GatewayMode};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Configuration for the Gemini gateway.
#[derive(Debug)]
pub struct GeminiConfig {
    api_key: Secret<String>,
    /// Model used for every call.
    pub model: String,
    /// Base URL up to and including the API version segment.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Creates a configuration with the given API key and default endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        let defaults = AiConfig::default();
        let timeout = defaults.timeout();
        Self {
            api_key: Secret::new(api_key.into()),
            model: defaults.model,
            base_url: defaults.base_url,
            timeout,
        }
    }

    /// Builds a configuration from the loaded application settings.
    ///
    /// # Errors
    ///
    /// `Configuration` when no usable API key is set.
    pub fn from_ai_config(config: &AiConfig) -> Result<Self, GatewayError> {
        let key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| GatewayError::configuration("API key is not set"))?;

        Ok(Self::new(key)
            .with_model(config.model.clone())
            .with_base_url(config.base_url.clone())
            .with_timeout(config.timeout()))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        )
    }
}

/// Shared HTTP plumbing for the gateway and its chat sessions.
#[derive(Debug, Clone)]
struct GeminiClient {
    config: Arc<GeminiConfig>,
    http: Client,
}

impl GeminiClient {
    async fn post(
        &self,
        url: String,
        request: &GenerateContentRequest,
    ) -> Result<Response, GatewayError> {
        let response = self
            .http
            .post(url)
            .header(API_KEY_HEADER, self.config.api_key())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::transport(format!(
                        "Request timed out after {}s",
                        self.config.timeout.as_secs()
                    ))
                } else if e.is_connect() {
                    GatewayError::transport(format!("Connection failed: {}", e))
                } else {
                    GatewayError::transport(e.to_string())
                }
            })?;

        check_status(response).await
    }

    /// Non-streaming call returning the first candidate's text.
    async fn generate_text(&self, request: &GenerateContentRequest) -> Result<String, GatewayError> {
        let response = self.post(self.config.generate_url(), request).await?;

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::generation(format!("Failed to parse response: {}", e)))?;

        body.text()
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| GatewayError::generation("No response text"))
    }

    async fn generate_plan(&self, prompt: String) -> Result<ActionPlan, GatewayError> {
        tracing::debug!(model = %self.config.model, "Requesting structured plan");
        let request = GenerateContentRequest::prompt(prompt).with_plan_schema();
        let text = self.generate_text(&request).await?;
        parse_plan(&text)
    }
}

/// Maps provider status codes onto gateway errors.
async fn check_status(response: Response) -> Result<Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::debug!(%status, body = %body, "Provider returned an error status");
    Err(status_error(status))
}

fn status_error(status: StatusCode) -> GatewayError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            GatewayError::configuration(format!("Credential rejected ({})", status))
        }
        _ => GatewayError::transport(format!("Unexpected status {}", status)),
    }
}

/// Validates model output against the Plan Schema.
fn parse_plan(text: &str) -> Result<ActionPlan, GatewayError> {
    serde_json::from_str::<ActionPlan>(text.trim())
        .map_err(|e| GatewayError::generation(format!("Response does not match plan schema: {}", e)))
}

/// Live gateway backed by the Generative Language API.
pub struct GeminiGateway {
    client: GeminiClient,
}

impl GeminiGateway {
    /// Creates a new gateway.
    ///
    /// # Errors
    ///
    /// `Configuration` if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: GeminiClient {
                config: Arc::new(config),
                http,
            },
        })
    }

    pub fn model(&self) -> &str {
        &self.client.config.model
    }
}

#[async_trait]
impl AiGateway for GeminiGateway {
    async fn generate_crypto_plan(
        &self,
        experience: CryptoExperience,
        urgency: CryptoUrgency,
    ) -> Result<ActionPlan, GatewayError> {
        self.client
            .generate_plan(prompts::crypto_plan_prompt(experience, urgency))
            .await
    }

    async fn generate_backup_plan(
        &self,
        storage: BackupStorage,
        security: BackupSecurity,
    ) -> Result<ActionPlan, GatewayError> {
        self.client
            .generate_plan(prompts::backup_plan_prompt(storage, security))
            .await
    }

    async fn generate_ai_trust_snapshot(&self, tool: &str) -> Result<ActionPlan, GatewayError> {
        self.client.generate_plan(prompts::ai_trust_prompt(tool)).await
    }

    async fn generate_step_explanation(
        &self,
        step: &str,
        context: TopicContext,
    ) -> Result<String, GatewayError> {
        let request = GenerateContentRequest::prompt(prompts::step_explanation_prompt(step, context));
        self.client.generate_text(&request).await
    }

    fn create_chat_session(&self, context: TopicContext) -> Box<dyn ChatSession> {
        Box::new(GeminiChatSession {
            client: self.client.clone(),
            context,
            system_instruction: prompts::chat_system_instruction(context),
            history: Arc::new(Mutex::new(Vec::new())),
        })
    }

    fn mode(&self) -> GatewayMode {
        GatewayMode::Live
    }
}

/// Multi-turn session; history lives client-side and is resent every turn.
pub struct GeminiChatSession {
    client: GeminiClient,
    context: TopicContext,
    system_instruction: String,
    history: Arc<Mutex<Vec<Content>>>,
}

impl GeminiChatSession {
    async fn build_request(&self, text: &str) -> GenerateContentRequest {
        let mut contents = self.history.lock().await.clone();
        contents.push(Content::user(text));
        GenerateContentRequest {
            contents,
            system_instruction: Some(Content::instruction(self.system_instruction.clone())),
            generation_config: None,
        }
    }
}

#[async_trait]
impl ChatSession for GeminiChatSession {
    fn context(&self) -> TopicContext {
        self.context
    }

    async fn send_message_stream(&self, text: &str) -> Result<ChunkStream, GatewayError> {
        let request = self.build_request(text).await;
        let response = self
            .client
            .post(self.client.config.stream_url(), &request)
            .await?;

        let bytes = response
            .bytes_stream()
            .map(|chunk| {
                chunk
                    .map(|b| b.to_vec())
                    .map_err(|e| GatewayError::transport(format!("Stream error: {}", e)))
            })
            .boxed();

        let state = ReplyStream::new(bytes, Content::user(text), Arc::clone(&self.history));
        Ok(Box::pin(stream::unfold(state, ReplyStream::next_chunk)))
    }
}

type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, GatewayError>> + Send>>;

/// Splits a byte stream into complete SSE `data:` payloads.
#[derive(Debug, Default)]
struct SseLineBuffer {
    partial: Vec<u8>,
}

impl SseLineBuffer {
    /// Appends bytes and drains every payload whose line is now complete.
    fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.partial.extend_from_slice(bytes);
        let mut payloads = Vec::new();
        while let Some(pos) = self.partial.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.partial.drain(..=pos).collect();
            if let Some(payload) = data_payload(&String::from_utf8_lossy(&line)) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// Payload of a trailing line with no final newline.
    fn finish(&mut self) -> Option<String> {
        let rest = std::mem::take(&mut self.partial);
        data_payload(&String::from_utf8_lossy(&rest))
    }
}

fn data_payload(line: &str) -> Option<String> {
    let data = line
        .trim_end_matches(|c| c == '\r' || c == '\n')
        .strip_prefix("data:")?
        .trim();
    if data.is_empty() || data == "[DONE]" {
        None
    } else {
        Some(data.to_string())
    }
}

/// Text carried by one SSE payload; `None` for metadata-only events.
fn payload_text(payload: &str) -> Result<Option<String>, GatewayError> {
    let event: GenerateContentResponse = serde_json::from_str(payload)
        .map_err(|e| GatewayError::generation(format!("Failed to parse SSE chunk: {}", e)))?;
    Ok(event.text())
}

/// Unfold state turning provider bytes into reply chunks.
struct ReplyStream {
    bytes: ByteStream,
    lines: SseLineBuffer,
    pending: VecDeque<Result<String, GatewayError>>,
    reply: String,
    user_turn: Content,
    history: Arc<Mutex<Vec<Content>>>,
    failed: bool,
    finished: bool,
}

impl ReplyStream {
    fn new(bytes: ByteStream, user_turn: Content, history: Arc<Mutex<Vec<Content>>>) -> Self {
        Self {
            bytes,
            lines: SseLineBuffer::default(),
            pending: VecDeque::new(),
            reply: String::new(),
            user_turn,
            history,
            failed: false,
            finished: false,
        }
    }

    async fn next_chunk(mut self) -> Option<(Result<String, GatewayError>, Self)> {
        loop {
            if let Some(item) = self.pending.pop_front() {
                return Some((item, self));
            }
            if self.finished {
                return None;
            }
            match self.bytes.next().await {
                Some(Ok(bytes)) => {
                    for payload in self.lines.push(&bytes) {
                        self.accept(&payload);
                    }
                }
                Some(Err(err)) => self.fail(err),
                None => {
                    if let Some(payload) = self.lines.finish() {
                        self.accept(&payload);
                    }
                    self.finished = true;
                    self.commit().await;
                }
            }
        }
    }

    fn accept(&mut self, payload: &str) {
        if self.failed {
            return;
        }
        match payload_text(payload) {
            Ok(Some(text)) => {
                self.reply.push_str(&text);
                self.pending.push_back(Ok(text));
            }
            Ok(None) => {}
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: GatewayError) {
        tracing::warn!(error = %err, "Chat reply stream failed");
        self.failed = true;
        self.finished = true;
        self.pending.push_back(Err(err));
    }

    async fn commit(&mut self) {
        if self.failed || self.reply.is_empty() {
            return;
        }
        let mut history = self.history.lock().await;
        history.push(self.user_turn.clone());
        history.push(Content::model(std::mem::take(&mut self.reply)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sse_event(text: &str) -> String {
        format!(
            "data: {{\"candidates\":[{{\"content\":{{\"role\":\"model\",\"parts\":[{{\"text\":\"{}\"}}]}}}}]}}\r\n\r\n",
            text
        )
    }

    fn byte_stream(chunks: Vec<Result<Vec<u8>, GatewayError>>) -> ByteStream {
        stream::iter(chunks).boxed()
    }

    async fn collect_reply(
        chunks: Vec<Result<Vec<u8>, GatewayError>>,
        history: Arc<Mutex<Vec<Content>>>,
    ) -> Vec<Result<String, GatewayError>> {
        let state = ReplyStream::new(byte_stream(chunks), Content::user("hi"), history);
        stream::unfold(state, ReplyStream::next_chunk).collect().await
    }

    #[test]
    fn config_builds_endpoint_urls() {
        let config = GeminiConfig::new("key")
            .with_model("gemini-2.5-flash")
            .with_base_url("https://example.test/v1beta/");

        assert_eq!(
            config.generate_url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            config.stream_url(),
            "https://example.test/v1beta/models/gemini-2.5-flash:streamGenerateContent?alt=sse"
        );
    }

    #[test]
    fn config_from_ai_config_requires_key() {
        let err = GeminiConfig::from_ai_config(&AiConfig::default()).unwrap_err();
        assert!(matches!(err, GatewayError::Configuration(_)));

        let config = GeminiConfig::from_ai_config(&AiConfig {
            api_key: Some(" AIza-test ".to_string()),
            model: "gemini-2.5-pro".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.api_key(), "AIza-test");
        assert_eq!(config.model, "gemini-2.5-pro");
    }

    #[test]
    fn config_debug_does_not_leak_key() {
        let config = GeminiConfig::new("AIza-super-secret");
        assert!(!format!("{:?}", config).contains("AIza-super-secret"));
    }

    #[test]
    fn auth_statuses_map_to_configuration_errors() {
        assert!(matches!(status_error(StatusCode::UNAUTHORIZED), GatewayError::Configuration(_)));
        assert!(matches!(status_error(StatusCode::FORBIDDEN), GatewayError::Configuration(_)));
    }

    #[test]
    fn other_statuses_map_to_transport_errors() {
        assert!(matches!(status_error(StatusCode::TOO_MANY_REQUESTS), GatewayError::Transport(_)));
        assert!(matches!(status_error(StatusCode::INTERNAL_SERVER_ERROR), GatewayError::Transport(_)));
        assert!(matches!(status_error(StatusCode::BAD_REQUEST), GatewayError::Transport(_)));
    }

    #[test]
    fn parse_plan_accepts_schema_conforming_json() {
        let plan = parse_plan(
            r#"{"title":"Starter Plan","timeframe":"This week","steps":["a","b","c"],"notes":"Never share keys."}"#,
        )
        .unwrap();
        assert_eq!(plan.title(), "Starter Plan");
        assert_eq!(plan.steps().len(), 3);
    }

    #[test]
    fn parse_plan_rejects_missing_fields_and_prose() {
        assert!(matches!(
            parse_plan(r#"{"title":"Plan","steps":["a"]}"#),
            Err(GatewayError::Generation(_))
        ));
        assert!(matches!(
            parse_plan("Here is your plan: step one..."),
            Err(GatewayError::Generation(_))
        ));
        assert!(matches!(
            parse_plan(r#"{"title":"Plan","timeframe":"Now","steps":[],"notes":"n"}"#),
            Err(GatewayError::Generation(_))
        ));
    }

    #[test]
    fn line_buffer_reassembles_split_events() {
        let event = sse_event("Hello");
        let (head, tail) = event.split_at(17);
        let mut lines = SseLineBuffer::default();

        assert!(lines.push(head.as_bytes()).is_empty());
        let payloads = lines.push(tail.as_bytes());
        assert_eq!(payloads.len(), 1);
        assert_eq!(payload_text(&payloads[0]).unwrap().as_deref(), Some("Hello"));
    }

    #[test]
    fn line_buffer_keeps_multibyte_chars_split_across_reads() {
        let event = sse_event("café");
        let bytes = event.as_bytes();
        let split = event.find('é').unwrap() + 1;
        let mut lines = SseLineBuffer::default();

        assert!(lines.push(&bytes[..split]).is_empty());
        let payloads = lines.push(&bytes[split..]);
        assert_eq!(payload_text(&payloads[0]).unwrap().as_deref(), Some("café"));
    }

    #[test]
    fn line_buffer_flushes_trailing_line() {
        let mut lines = SseLineBuffer::default();
        assert!(lines.push(b"data: {\"candidates\":[]}").is_empty());
        assert_eq!(lines.finish().as_deref(), Some("{\"candidates\":[]}"));
        assert!(lines.finish().is_none());
    }

    #[test]
    fn data_payload_skips_comments_and_done_marker() {
        assert!(data_payload(": keep-alive\n").is_none());
        assert!(data_payload("data: [DONE]\n").is_none());
        assert!(data_payload("\r\n").is_none());
        assert_eq!(data_payload("data:{}\n").as_deref(), Some("{}"));
    }

    #[test]
    fn metadata_only_payload_has_no_text() {
        let payload = r#"{"candidates":[{"finishReason":"STOP"}],"usageMetadata":{"totalTokenCount":12}}"#;
        assert_eq!(payload_text(payload).unwrap(), None);
    }

    #[tokio::test]
    async fn reply_stream_yields_chunks_in_order_and_commits_history() {
        let history = Arc::new(Mutex::new(Vec::new()));
        let first = sse_event("Use a ");
        let second = sse_event("password manager.");
        let joined = format!("{}{}", first, second);
        let (a, b) = joined.split_at(first.len() + 5);

        let items = collect_reply(
            vec![Ok(a.as_bytes().to_vec()), Ok(b.as_bytes().to_vec())],
            Arc::clone(&history),
        )
        .await;

        let texts: Vec<String> = items.into_iter().map(Result::unwrap).collect();
        assert_eq!(texts, vec!["Use a ", "password manager."]);

        let history = history.lock().await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], Content::user("hi"));
        assert_eq!(history[1], Content::model("Use a password manager."));
    }

    #[tokio::test]
    async fn reply_stream_error_ends_stream_without_committing() {
        let history = Arc::new(Mutex::new(Vec::new()));
        let items = collect_reply(
            vec![
                Ok(sse_event("partial").into_bytes()),
                Err(GatewayError::transport("reset")),
                Ok(sse_event("never seen").into_bytes()),
            ],
            Arc::clone(&history),
        )
        .await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_deref().unwrap(), "partial");
        assert!(matches!(items[1], Err(GatewayError::Transport(_))));
        assert!(history.lock().await.is_empty());
    }

    #[tokio::test]
    async fn reply_stream_reports_malformed_event() {
        let history = Arc::new(Mutex::new(Vec::new()));
        let items = collect_reply(vec![Ok(b"data: {not json\n\n".to_vec())], Arc::clone(&history)).await;

        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(GatewayError::Generation(_))));
        assert!(history.lock().await.is_empty());
    }

    #[tokio::test]
    async fn session_request_includes_history_and_instruction() {
        let gateway = GeminiGateway::new(GeminiConfig::new("key")).unwrap();
        let session = GeminiChatSession {
            client: gateway.client.clone(),
            context: TopicContext::AiTrust,
            system_instruction: prompts::chat_system_instruction(TopicContext::AiTrust),
            history: Arc::new(Mutex::new(vec![
                Content::user("earlier"),
                Content::model("earlier reply"),
            ])),
        };

        let request = session.build_request("now").await;
        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[2], Content::user("now"));
        assert!(request.system_instruction.is_some());
        assert_eq!(session.context(), TopicContext::AiTrust);
    }
}
