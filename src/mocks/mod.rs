//! Test doubles.
//!
//! A scripted transport, a fixed-key auth provider, chat-completion fixtures
//! and an in-memory log sink, so the client and analyzer can be exercised
//! without a network or a global subscriber.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::auth::AuthProvider;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, TransportError};

/// What the transport hands back for one request.
enum Scripted {
    Respond(MockResponse),
    Fail(String),
}

/// Transport that replays queued responses and records what was sent.
///
/// Once the queue is drained every request gets a 500.
#[derive(Default)]
pub struct MockTransport {
    script: Mutex<VecDeque<Scripted>>,
    sent: Mutex<Vec<HttpRequest>>,
}

/// A canned response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// Status code.
    pub status: u16,
    /// Headers, names lowercased.
    pub headers: HashMap<String, String>,
    /// Body bytes.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// A 200 carrying `value` as JSON.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        Self::raw(200, serde_json::to_vec(value).unwrap_or_default())
            .with_header("content-type", "application/json")
    }

    /// An error status with an OpenAI-style error body.
    pub fn error(status: u16, message: &str) -> Self {
        let mut response = Self::json(&serde_json::json!({
            "error": {
                "message": message,
                "type": "invalid_request_error",
                "code": null
            }
        }));
        response.status = status;
        response
    }

    /// Any status with an arbitrary body.
    pub fn raw(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body,
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }
}

impl MockTransport {
    /// Creates a transport with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Respond(response));
    }

    /// Queues a 200 JSON response.
    pub fn queue_json<T: serde::Serialize>(&self, value: &T) {
        self.queue(MockResponse::json(value));
    }

    /// Queues an error response.
    pub fn queue_error(&self, status: u16, message: &str) {
        self.queue(MockResponse::error(status, message));
    }

    /// Queues a connection failure.
    pub fn queue_failure(&self, message: &str) {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Fail(message.to_string()));
    }

    /// Returns the most recent request.
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.sent.lock().unwrap().last().cloned()
    }

    /// Returns how many requests were sent.
    pub fn request_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.sent.lock().unwrap().push(request);

        let next = self.script.lock().unwrap().pop_front();
        let response = match next {
            Some(Scripted::Respond(response)) => response,
            Some(Scripted::Fail(message)) => return Err(TransportError::Connection { message }),
            None => MockResponse::error(500, "No mock response configured"),
        };

        Ok(HttpResponse {
            status: response.status,
            headers: response.headers,
            body: response.body,
        })
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("request_count", &self.request_count())
            .finish()
    }
}

/// Parses the JSON body of a recorded request.
pub fn json_body(request: &HttpRequest) -> Option<serde_json::Value> {
    serde_json::from_slice(&request.body).ok()
}

/// Auth provider with a fixed bearer key.
pub struct MockAuth {
    api_key: String,
}

impl MockAuth {
    /// Creates a provider sending `api_key`.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl Default for MockAuth {
    fn default() -> Self {
        Self::new("sk-mock-test-key")
    }
}

impl AuthProvider for MockAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            "Authorization".to_string(),
            format!("Bearer {}", self.api_key),
        );
    }

    fn scheme(&self) -> &str {
        "Bearer"
    }

    fn validate(&self) {}
}

impl std::fmt::Debug for MockAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAuth").finish()
    }
}

/// In-memory sink for `tracing` output.
///
/// Install [`LogCapture::subscriber`] with `tracing::subscriber::set_default`
/// (or `with_default`) and read back what was logged with
/// [`LogCapture::contents`].
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A plain-text subscriber writing every level into this sink.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(self.clone())
            .finish()
    }

    /// Everything logged so far.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Chat-completion fixtures.
pub mod fixtures {
    use crate::types::chat::{AssistantMessage, ChatResponse, Choice, FinishReason, Role, Usage};

    /// A response whose only choice carries `content`.
    pub fn chat_response(content: &str) -> ChatResponse {
        ChatResponse {
            id: "chatcmpl-mock".to_string(),
            model: "gpt-4o-2024-08-06".to_string(),
            choices: vec![Choice {
                index: 0,
                message: AssistantMessage {
                    role: Role::Assistant,
                    content: Some(content.to_string()),
                },
                finish_reason: Some(FinishReason::Stop),
            }],
            usage: Some(Usage {
                prompt_tokens: 812,
                completion_tokens: 46,
                total_tokens: 858,
            }),
        }
    }

    /// The wire JSON of [`chat_response`].
    pub fn chat_completion_json(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "created": 1_699_999_999,
            "model": "gpt-4o-2024-08-06",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 812, "completion_tokens": 46, "total_tokens": 858}
        })
    }
}
