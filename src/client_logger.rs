//! Logging trait for Gemini client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows users to capture
//! the raw payloads passing through the [`Gemini`](crate::Gemini) client.  The
//! crate's own diagnostics go through `tracing`; this hook exists for callers
//! that want the full request and response bodies.

use crate::{Error, GenerateContentRequest, GenerateContentResponse, Model};

/// A trait for logging Gemini client operations.
///
/// # Example
///
/// ```rust,ignore
/// use gemini_chat::{ClientLogger, Error, GenerateContentRequest, GenerateContentResponse, Model};
/// use std::io::Write;
/// use std::sync::Mutex;
///
/// struct FileLogger {
///     file: Mutex<std::fs::File>,
/// }
///
/// impl ClientLogger for FileLogger {
///     fn log_request(&self, model: &Model, request: &GenerateContentRequest) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "{model} <- {}", serde_json::to_string(request).unwrap()).unwrap();
///     }
///
///     fn log_response(&self, response: &GenerateContentResponse) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "-> {}", serde_json::to_string(response).unwrap()).unwrap();
///     }
///
///     fn log_error(&self, error: &Error) {
///         let mut file = self.file.lock().unwrap();
///         writeln!(file, "!! {error}").unwrap();
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Log a request just before it is sent.
    fn log_request(&self, model: &Model, request: &GenerateContentRequest);

    /// Log a successfully decoded response.
    fn log_response(&self, response: &GenerateContentResponse);

    /// Log a failed request.
    ///
    /// Called once per failed `generate_content` call, after the failure has
    /// been mapped onto [`Error`].
    fn log_error(&self, error: &Error) {
        _ = error;
    }
}
