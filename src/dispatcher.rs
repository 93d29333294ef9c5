//! The send-message flow.
//!
//! [`Dispatcher`] owns the transcript, the UI state and the session.  A send
//! moves through `Idle → Sending → Settled → Idle`; while a send is in
//! flight every further send is skipped.  Failures never escape: they become
//! the [`Banner`] in [`ChatState`] and the optimistic user message is
//! reverted.

use std::time::{Duration, Instant};

use crate::error::{Error, ErrorKind, Result};
use crate::observability::{
    DISPATCH_REPLIES, DISPATCH_ROLLBACKS, DISPATCH_SENDS, DISPATCH_SKIPS, DISPATCH_TIMEOUTS,
};
use crate::session::Conversation;
use crate::transcript::{Staged, Transcript};
use crate::view::SUGGESTIONS;

/// Shown when no session could be created at startup.
pub const INIT_FAILURE_MESSAGE: &str =
    "Failed to initialize the chat service. Please check your API key.";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Why a send did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The text was empty or whitespace.
    Blank,
    /// Another send has not settled yet.
    InFlight,
    /// No session exists (startup failed).
    NoSession,
    /// A suggestion index outside the list.
    UnknownSuggestion,
}

/// Result of one call to [`Dispatcher::send`].
#[derive(Debug, Clone)]
pub enum SendOutcome {
    /// Nothing changed.
    Skipped(SkipReason),
    /// A user and a model message were appended.
    Replied,
    /// The request failed; the transcript is unchanged and the banner is set.
    Failed(Error),
}

impl SendOutcome {
    /// Returns true if the send was a no-op.
    pub fn is_skipped(&self) -> bool {
        matches!(self, SendOutcome::Skipped(_))
    }
}

/// An error shown above the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Fatal for the session, or cleared by the next send.
    pub kind: ErrorKind,
    /// Text shown to the user.
    pub message: String,
}

impl Banner {
    /// Returns true if the banner stays for the lifetime of the application.
    pub fn is_persistent(&self) -> bool {
        self.kind == ErrorKind::Configuration
    }
}

/// Transient UI state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatState {
    /// A request is in flight.
    pub is_loading: bool,
    /// The current error banner.
    pub error: Option<Banner>,
    /// Text typed but not yet submitted.
    pub draft: String,
}

/// Counters for `/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Sends that reached the session.
    pub sent: u64,
    /// Sends that produced a reply.
    pub replied: u64,
    /// Sends that failed and were rolled back.
    pub failed: u64,
    /// Sends that were no-ops.
    pub skipped: u64,
}

/// A send that has started and must be settled.
#[derive(Debug)]
#[must_use = "a pending send must be settled"]
pub struct PendingSend {
    staged: Staged,
    text: String,
    started: Instant,
}

impl PendingSend {
    /// The text being sent.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Owns the transcript and drives the session.
pub struct Dispatcher<C: Conversation> {
    session: Option<C>,
    transcript: Transcript,
    state: ChatState,
    stats: DispatchStats,
    request_timeout: Duration,
}

impl<C: Conversation> Dispatcher<C> {
    /// Creates a dispatcher for a live session.
    pub fn new(session: C) -> Self {
        Self {
            session: Some(session),
            transcript: Transcript::new(),
            state: ChatState::default(),
            stats: DispatchStats::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Creates a dispatcher from the outcome of session creation.
    ///
    /// A failed creation yields a dispatcher with a persistent banner that
    /// skips every send.
    pub fn from_session(session: Result<C>) -> Self {
        match session {
            Ok(session) => Self::new(session),
            Err(err) => {
                tracing::error!(error = %err, "could not create chat session");
                Self {
                    session: None,
                    transcript: Transcript::new(),
                    state: ChatState {
                        error: Some(Banner {
                            kind: ErrorKind::Configuration,
                            message: INIT_FAILURE_MESSAGE.to_string(),
                        }),
                        ..ChatState::default()
                    },
                    stats: DispatchStats::default(),
                    request_timeout: DEFAULT_REQUEST_TIMEOUT,
                }
            }
        }
    }

    /// Bounds every remote call.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// The transcript.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// The UI state.
    pub fn state(&self) -> &ChatState {
        &self.state
    }

    /// The session, if one exists.
    pub fn session(&self) -> Option<&C> {
        self.session.as_ref()
    }

    /// Counters since startup.
    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    /// The configured request timeout.
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Replaces the draft input.
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.state.draft = draft.into();
    }

    /// Sends the current draft.
    pub async fn submit_draft(&mut self) -> SendOutcome {
        let draft = self.state.draft.clone();
        self.send(&draft).await
    }

    /// Sends the suggestion at `index` exactly as if it had been typed.
    pub async fn send_suggestion(&mut self, index: usize) -> SendOutcome {
        let suggestion: Option<&'static str> = SUGGESTIONS.get(index).copied();
        match suggestion {
            Some(text) => self.send(text).await,
            None => self.skip(SkipReason::UnknownSuggestion),
        }
    }

    /// Sends `text` and waits for the reply.
    ///
    /// # Example
    ///
    /// ```
    /// use gemini_chat::{Conversation, Dispatcher, Result, SendOutcome};
    ///
    /// struct Shout;
    ///
    /// #[async_trait::async_trait]
    /// impl Conversation for Shout {
    ///     async fn send_message(&mut self, text: &str) -> Result<String> {
    ///         Ok(text.to_uppercase())
    ///     }
    /// }
    ///
    /// # tokio_test::block_on(async {
    /// let mut dispatcher = Dispatcher::new(Shout);
    /// assert!(matches!(dispatcher.send("hi").await, SendOutcome::Replied));
    /// assert_eq!(dispatcher.transcript().last().map(|m| m.text()), Some("HI"));
    /// # });
    /// ```
    pub async fn send(&mut self, text: &str) -> SendOutcome {
        let pending = match self.begin(text) {
            Ok(pending) => pending,
            Err(reason) => return SendOutcome::Skipped(reason),
        };
        let result = self.exchange(&pending).await;
        self.settle(pending, result)
    }

    /// First half of a send: validate, mark loading, stage the user message.
    ///
    /// Between `begin` and [`settle`](Self::settle) the view shows the typing
    /// indicator and every further send is skipped.
    pub fn begin(&mut self, text: &str) -> std::result::Result<PendingSend, SkipReason> {
        if text.trim().is_empty() {
            return Err(self.skip_reason(SkipReason::Blank));
        }
        if self.state.is_loading {
            return Err(self.skip_reason(SkipReason::InFlight));
        }
        if self.session.is_none() {
            return Err(self.skip_reason(SkipReason::NoSession));
        }
        let Some(staged) = self.transcript.stage(text) else {
            return Err(self.skip_reason(SkipReason::InFlight));
        };
        self.state.is_loading = true;
        self.state.error = None;
        self.state.draft.clear();
        self.stats.sent += 1;
        DISPATCH_SENDS.click();
        tracing::debug!(index = staged.index(), "user message staged");
        Ok(PendingSend {
            staged,
            text: text.to_string(),
            started: Instant::now(),
        })
    }

    /// Second half of a send: confirm or roll back, then clear loading.
    pub fn settle(&mut self, pending: PendingSend, result: Result<String>) -> SendOutcome {
        let elapsed_ms = pending.started.elapsed().as_millis() as u64;
        let outcome = match result {
            Ok(reply) => {
                self.transcript.confirm(pending.staged, reply);
                self.stats.replied += 1;
                DISPATCH_REPLIES.click();
                tracing::info!(elapsed_ms, "reply received");
                SendOutcome::Replied
            }
            Err(err) => {
                let _ = self.transcript.revert(pending.staged);
                let kind = err.kind();
                if kind == ErrorKind::Configuration {
                    // Fatal: every later send would fail the same way.
                    self.session = None;
                }
                self.state.error = Some(Banner {
                    kind,
                    message: format!("Failed to get a response. {err}"),
                });
                self.stats.failed += 1;
                DISPATCH_ROLLBACKS.click();
                tracing::warn!(elapsed_ms, error = %err, "send failed; user message rolled back");
                SendOutcome::Failed(err)
            }
        };
        self.state.is_loading = false;
        outcome
    }

    /// The remote half of a send: one bounded call to the session.
    ///
    /// Dropping this future before it completes leaves the session untouched;
    /// the caller then settles `pending` with an error of its choosing.
    pub async fn exchange(&mut self, pending: &PendingSend) -> Result<String> {
        let text = pending.text.as_str();
        let timeout = self.request_timeout;
        let Some(session) = self.session.as_mut() else {
            return Err(Error::configuration("no chat session"));
        };
        match tokio::time::timeout(timeout, session.send_message(text)).await {
            Ok(result) => result,
            Err(_) => {
                DISPATCH_TIMEOUTS.click();
                Err(Error::timeout(
                    "no reply from the model",
                    Some(timeout.as_secs_f64()),
                ))
            }
        }
    }

    fn skip(&mut self, reason: SkipReason) -> SendOutcome {
        SendOutcome::Skipped(self.skip_reason(reason))
    }

    fn skip_reason(&mut self, reason: SkipReason) -> SkipReason {
        self.stats.skipped += 1;
        DISPATCH_SKIPS.click();
        tracing::debug!(?reason, "send skipped");
        reason
    }
}
