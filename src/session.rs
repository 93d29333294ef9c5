//! Remote conversation sessions.
//!
//! A session is the handle the dispatcher talks to.  It carries the fixed
//! model and system instruction and the history the API needs to continue the
//! conversation.  That history is private to the session; the transcript the
//! user sees lives in [`Transcript`](crate::Transcript).

use std::time::Duration;

use crate::client::Gemini;
use crate::error::Result;
use crate::types::{Content, GenerateContentRequest, GenerationConfig, Model};

/// The instruction every session is created with unless overridden.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str =
    "You are a helpful and friendly assistant. Keep your responses concise and easy to understand.";

/// A conversation that can answer one message at a time.
#[async_trait::async_trait]
pub trait Conversation: Send {
    /// Sends `text` as the next user turn and returns the reply text.
    ///
    /// On error, or if the returned future is dropped before completion, the
    /// conversation must be left as it was before the call.
    async fn send_message(&mut self, text: &str) -> Result<String>;
}

/// Fixed configuration of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// The model answering every turn.
    pub model: Model,
    /// Instruction sent with every request.
    pub system_instruction: Option<String>,
    /// Credential; `None` reads the environment.
    pub api_key: Option<String>,
    /// Override for the API base URL.
    pub base_url: Option<String>,
    /// Per-request timeout of the HTTP client.
    pub timeout: Option<Duration>,
    /// Sampling parameters.
    pub generation: GenerationConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: Model::default(),
            system_instruction: Some(DEFAULT_SYSTEM_INSTRUCTION.to_string()),
            api_key: None,
            base_url: None,
            timeout: None,
            generation: GenerationConfig::default(),
        }
    }
}

/// Creates the session the application runs with.
///
/// Only builds a local handle; fails with a configuration error when no
/// credential is available.
pub fn create_session(config: &SessionConfig) -> Result<GeminiSession> {
    let client = Gemini::with_options(
        config.api_key.clone(),
        config.base_url.clone(),
        config.timeout,
    )?;
    tracing::info!(model = %config.model, "chat session created");
    Ok(GeminiSession::new(client, config))
}

/// A [`Conversation`] backed by the Gemini `generateContent` endpoint.
#[derive(Debug)]
pub struct GeminiSession {
    client: Gemini,
    model: Model,
    system_instruction: Option<String>,
    generation: GenerationConfig,
    history: Vec<Content>,
}

impl GeminiSession {
    /// Creates a session around an existing client.
    pub fn new(client: Gemini, config: &SessionConfig) -> Self {
        Self {
            client,
            model: config.model.clone(),
            system_instruction: config.system_instruction.clone(),
            generation: config.generation.clone(),
            history: Vec::new(),
        }
    }

    /// The model answering this session.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The system instruction, if any.
    pub fn system_instruction(&self) -> Option<&str> {
        self.system_instruction.as_deref()
    }

    /// Number of turns the API will see as context.
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    fn request_for(&self, text: &str) -> GenerateContentRequest {
        let mut contents = Vec::with_capacity(self.history.len() + 1);
        contents.extend(self.history.iter().cloned());
        contents.push(Content::user(text));
        GenerateContentRequest::new(contents)
            .with_system_instruction(self.system_instruction.as_deref())
            .with_generation_config(self.generation.clone())
    }
}

#[async_trait::async_trait]
impl Conversation for GeminiSession {
    async fn send_message(&mut self, text: &str) -> Result<String> {
        let request = self.request_for(text);
        let response = self.client.generate_content(&self.model, &request).await?;
        let reply = response.text()?;
        self.history.push(Content::user(text));
        self.history.push(Content::model(reply.clone()));
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const HELLO: &str = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"hello"}]},"finishReason":"STOP"}],"usageMetadata":{"promptTokenCount":3,"candidatesTokenCount":1,"totalTokenCount":4}}"#;

    /// Answers one HTTP request and returns what was received.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = stream.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
                if let Some(end) = received.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&received[..end]).to_lowercase();
                    let length = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if received.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&received).into_owned()
        });
        (format!("http://{addr}/v1beta"), handle)
    }

    fn local_config(base_url: String, model: &str) -> SessionConfig {
        SessionConfig {
            model: model.parse().unwrap(),
            base_url: Some(base_url),
            timeout: Some(Duration::from_secs(5)),
            ..config_with_key()
        }
    }

    fn config_with_key() -> SessionConfig {
        SessionConfig {
            api_key: Some("test-key".to_string()),
            ..SessionConfig::default()
        }
    }

    #[test]
    fn defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.model.to_string(), "gemini-2.5-flash");
        assert_eq!(
            config.system_instruction.as_deref(),
            Some(DEFAULT_SYSTEM_INSTRUCTION)
        );
    }

    #[test]
    fn create_session_builds_handle() {
        let session = create_session(&config_with_key()).unwrap();
        assert_eq!(session.model().to_string(), "gemini-2.5-flash");
        assert_eq!(session.history_len(), 0);
    }

    #[test]
    fn request_carries_history_and_instruction() {
        let mut session = create_session(&config_with_key()).unwrap();
        session.history.push(Content::user("hi"));
        session.history.push(Content::model("hello"));

        let request = session.request_for("how are you?");
        assert_eq!(request.contents.len(), 3);
        assert_eq!(request.contents[2].role, Some(Role::User));
        assert_eq!(
            request.contents[2].joined_text().as_deref(),
            Some("how are you?")
        );
        assert_eq!(
            request
                .system_instruction
                .as_ref()
                .and_then(Content::joined_text)
                .as_deref(),
            Some(DEFAULT_SYSTEM_INSTRUCTION)
        );
        assert!(request.generation_config.is_none());
    }

    #[tokio::test]
    async fn failed_send_leaves_history_alone() {
        // Nothing listens on the discard port, so the request fails to connect.
        let config = SessionConfig {
            base_url: Some("http://127.0.0.1:9/".to_string()),
            timeout: Some(Duration::from_secs(2)),
            ..config_with_key()
        };
        let mut session = create_session(&config).unwrap();
        let err = session.send_message("hi").await.unwrap_err();
        assert!(!err.is_configuration());
        assert_eq!(session.history_len(), 0);
    }

    #[tokio::test]
    async fn successful_send_commits_history() {
        let (base_url, server) = serve_once("200 OK", HELLO).await;
        let mut session = create_session(&local_config(base_url, "gemini-2.5-flash")).unwrap();

        let reply = session.send_message("hi").await.unwrap();
        assert_eq!(reply, "hello");
        assert_eq!(session.history_len(), 2);

        let request = server.await.unwrap();
        assert!(
            request.starts_with("POST /v1beta/models/gemini-2.5-flash:generateContent HTTP/1.1"),
            "{request}"
        );
        assert!(request.to_lowercase().contains("x-goog-api-key: test-key"));
        assert!(request.contains(r#""contents":[{"role":"user","parts":[{"text":"hi"}]}]"#));
        assert!(request.contains(r#""systemInstruction""#));
    }

    #[tokio::test]
    async fn error_status_leaves_history_alone() {
        let body = r#"{"error":{"code":503,"message":"overloaded","status":"UNAVAILABLE"}}"#;
        let (base_url, server) = serve_once("503 Service Unavailable", body).await;
        let mut session = create_session(&local_config(base_url, "gemini-2.5-flash")).unwrap();

        let err = session.send_message("hi").await.unwrap_err();
        assert!(err.is_server_error(), "{err}");
        assert_eq!(session.history_len(), 0);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn request_path_follows_model_resource() {
        for (model, path) in [
            ("models/gemini-3-pro", "/v1beta/models/gemini-3-pro:generateContent"),
            ("tunedModels/mine", "/v1beta/tunedModels/mine:generateContent"),
        ] {
            let (base_url, server) = serve_once("200 OK", HELLO).await;
            let mut session = create_session(&local_config(base_url, model)).unwrap();
            session.send_message("hi").await.unwrap();
            let request = server.await.unwrap();
            assert!(
                request.starts_with(&format!("POST {path} HTTP/1.1")),
                "{model}: {request}"
            );
        }
    }
}
