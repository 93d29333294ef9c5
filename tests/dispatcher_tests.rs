//! Send-flow tests against scripted conversations.

use std::collections::VecDeque;
use std::time::Duration;

use gemini_chat::{
    Body, Conversation, Dispatcher, Error, ErrorKind, Message, Result, SUGGESTIONS, SendOutcome,
    SessionConfig, SkipReason, build_view, create_session,
};

/// Replies from a queue and records what it was asked.
#[derive(Default)]
struct Scripted {
    replies: VecDeque<Result<String>>,
    asked: Vec<String>,
}

impl Scripted {
    fn new(replies: impl IntoIterator<Item = Result<String>>) -> Self {
        Self {
            replies: replies.into_iter().collect(),
            asked: Vec::new(),
        }
    }
}

#[async_trait::async_trait]
impl Conversation for Scripted {
    async fn send_message(&mut self, text: &str) -> Result<String> {
        self.asked.push(text.to_string());
        self.replies
            .pop_front()
            .unwrap_or_else(|| Err(Error::empty_response("script exhausted")))
    }
}

/// Never answers.
struct Silent;

#[async_trait::async_trait]
impl Conversation for Silent {
    async fn send_message(&mut self, _: &str) -> Result<String> {
        std::future::pending().await
    }
}

fn ok(text: &str) -> Result<String> {
    Ok(text.to_string())
}

#[tokio::test]
async fn success_appends_user_then_model() {
    let mut dispatcher = Dispatcher::new(Scripted::new([ok("hello"), ok("fine")]));

    assert!(matches!(dispatcher.send("hi").await, SendOutcome::Replied));
    assert!(matches!(
        dispatcher.send("how are you?").await,
        SendOutcome::Replied
    ));

    assert_eq!(
        dispatcher.transcript().messages(),
        &[
            Message::user("hi"),
            Message::model("hello"),
            Message::user("how are you?"),
            Message::model("fine"),
        ]
    );
    assert!(!dispatcher.state().is_loading);
    assert!(dispatcher.state().error.is_none());
    assert_eq!(
        dispatcher.session().map(|s| s.asked.clone()),
        Some(vec!["hi".to_string(), "how are you?".to_string()])
    );
}

#[tokio::test]
async fn raw_text_is_forwarded() {
    let mut dispatcher = Dispatcher::new(Scripted::new([ok("ok")]));
    dispatcher.send("  padded  ").await;
    assert_eq!(dispatcher.transcript().messages()[0].text(), "  padded  ");
    assert_eq!(
        dispatcher.session().map(|s| s.asked.clone()),
        Some(vec!["  padded  ".to_string()])
    );
}

#[tokio::test]
async fn blank_input_is_a_noop_in_any_state() {
    let mut dispatcher = Dispatcher::new(Scripted::new([ok("hello")]));
    assert!(matches!(
        dispatcher.send(" \t ").await,
        SendOutcome::Skipped(SkipReason::Blank)
    ));

    let pending = dispatcher.begin("hi").unwrap();
    assert!(matches!(
        dispatcher.send("").await,
        SendOutcome::Skipped(SkipReason::Blank)
    ));
    let result = dispatcher.exchange(&pending).await;
    dispatcher.settle(pending, result);

    assert_eq!(dispatcher.transcript().len(), 2);
    assert_eq!(dispatcher.session().map(|s| s.asked.len()), Some(1));
}

#[tokio::test]
async fn send_while_loading_is_a_noop() {
    let mut dispatcher = Dispatcher::new(Scripted::new([ok("one"), ok("two")]));
    let pending = dispatcher.begin("first").unwrap();
    let before = dispatcher.transcript().clone();

    for text in ["second", "third"] {
        assert!(matches!(
            dispatcher.send(text).await,
            SendOutcome::Skipped(SkipReason::InFlight)
        ));
        assert_eq!(dispatcher.transcript(), &before);
        assert!(dispatcher.state().is_loading);
    }

    let result = dispatcher.exchange(&pending).await;
    assert!(matches!(
        dispatcher.settle(pending, result),
        SendOutcome::Replied
    ));
    assert_eq!(dispatcher.session().map(|s| s.asked.len()), Some(1));
    assert_eq!(dispatcher.stats().skipped, 2);
}

#[tokio::test]
async fn failure_rolls_back_and_sets_error() {
    let mut dispatcher = Dispatcher::new(Scripted::new([
        ok("hello"),
        Err(Error::service_unavailable("overloaded", None)),
    ]));
    dispatcher.send("hi").await;
    let before = dispatcher.transcript().clone();

    let outcome = dispatcher.send("again").await;
    assert!(matches!(outcome, SendOutcome::Failed(ref e) if e.is_server_error()));
    assert_eq!(dispatcher.transcript(), &before);
    assert!(!dispatcher.state().is_loading);

    let banner = dispatcher.state().error.clone().unwrap();
    assert_eq!(banner.kind, ErrorKind::Request);
    assert!(!banner.is_persistent());
    assert_eq!(
        banner.message,
        "Failed to get a response. Service unavailable: overloaded"
    );
}

#[tokio::test]
async fn retry_clears_the_error() {
    let mut dispatcher = Dispatcher::new(Scripted::new([
        Err(Error::connection("reset", None)),
        ok("there you are"),
    ]));
    dispatcher.send("hi").await;
    assert!(dispatcher.state().error.is_some());
    assert!(dispatcher.transcript().is_empty());

    dispatcher.send("hi").await;
    assert!(dispatcher.state().error.is_none());
    assert_eq!(
        dispatcher.transcript().messages(),
        &[Message::user("hi"), Message::model("there you are")]
    );
}

#[tokio::test]
async fn suggestion_scenario() {
    let mut dispatcher =
        Dispatcher::new(Scripted::new([ok("Quantum computing uses...")]));
    assert!(matches!(
        build_view(dispatcher.state(), dispatcher.transcript()).body,
        Body::Welcome { .. }
    ));

    let pending = dispatcher.begin(SUGGESTIONS[0]).unwrap();
    assert_eq!(
        dispatcher.transcript().messages(),
        &[Message::user("Explain quantum computing in simple terms")]
    );
    assert!(matches!(
        build_view(dispatcher.state(), dispatcher.transcript()).body,
        Body::Transcript { typing: true, .. }
    ));

    let result = dispatcher.exchange(&pending).await;
    dispatcher.settle(pending, result);
    assert_eq!(
        dispatcher.transcript().messages(),
        &[
            Message::user("Explain quantum computing in simple terms"),
            Message::model("Quantum computing uses..."),
        ]
    );
    assert!(!dispatcher.state().is_loading);
    assert!(dispatcher.state().error.is_none());
}

#[tokio::test]
async fn send_suggestion_matches_typed_text() {
    let mut dispatcher = Dispatcher::new(Scripted::new([ok("Yum.")]));
    assert!(matches!(
        dispatcher.send_suggestion(1).await,
        SendOutcome::Replied
    ));
    assert_eq!(
        dispatcher.session().map(|s| s.asked.clone()),
        Some(vec!["What are some healthy dinner recipes?".to_string()])
    );
}

#[tokio::test]
async fn mid_flight_failure_scenario() {
    let mut dispatcher = Dispatcher::new(Scripted::default());
    let pending = dispatcher.begin("hi").unwrap();
    assert_eq!(dispatcher.transcript().messages(), &[Message::user("hi")]);

    dispatcher.settle(pending, Err(Error::timeout("slow", None)));
    assert!(dispatcher.transcript().is_empty());
    assert!(dispatcher.state().error.is_some());
    assert!(!dispatcher.state().is_loading);
}

#[tokio::test(start_paused = true)]
async fn hung_request_times_out() {
    let mut dispatcher = Dispatcher::new(Silent).with_request_timeout(Duration::from_secs(5));
    let outcome = dispatcher.send("hello?").await;
    assert!(matches!(outcome, SendOutcome::Failed(ref e) if e.is_timeout()));
    assert!(dispatcher.transcript().is_empty());
    assert!(!dispatcher.state().is_loading);
}

#[tokio::test]
async fn no_session_skips_everything() {
    let mut dispatcher =
        Dispatcher::<Scripted>::from_session(Err(Error::configuration("API key not set")));
    let banner = dispatcher.state().error.clone().unwrap();
    assert!(banner.is_persistent());

    assert!(matches!(
        dispatcher.send("hi").await,
        SendOutcome::Skipped(SkipReason::NoSession)
    ));
    assert!(dispatcher.transcript().is_empty());
    assert!(!dispatcher.state().is_loading);
    assert_eq!(dispatcher.state().error, Some(banner));
}

#[tokio::test]
async fn loading_is_false_after_every_send() {
    let mut dispatcher = Dispatcher::new(Scripted::new([
        ok("a"),
        Err(Error::rate_limit("slow down", Some(1))),
        ok("c"),
    ]));
    for text in ["a", "", "b", "   ", "c", "d"] {
        dispatcher.send(text).await;
        assert!(!dispatcher.state().is_loading, "after {text:?}");
    }
    assert_eq!(dispatcher.transcript().len(), 4);
    let stats = dispatcher.stats();
    assert_eq!(stats.sent, 4);
    assert_eq!(stats.replied, 2);
    assert_eq!(stats.failed, 2);
    assert_eq!(stats.skipped, 2);
}

#[tokio::test]
async fn unusable_key_fails_at_startup() {
    let config = SessionConfig {
        api_key: Some("bad\u{7f}key".to_string()),
        ..SessionConfig::default()
    };
    let session = create_session(&config);
    assert!(matches!(session, Err(ref e) if e.is_configuration()));

    let mut dispatcher = Dispatcher::from_session(session);
    assert!(dispatcher.state().error.as_ref().unwrap().is_persistent());
    assert!(matches!(
        dispatcher.send("hi").await,
        SendOutcome::Skipped(SkipReason::NoSession)
    ));
}

#[tokio::test]
async fn configuration_failure_ends_the_session() {
    let mut dispatcher = Dispatcher::new(Scripted::new([
        Err(Error::configuration("credential revoked")),
        ok("never sent"),
    ]));

    let outcome = dispatcher.send("hi").await;
    assert!(matches!(outcome, SendOutcome::Failed(ref e) if e.is_configuration()));
    assert!(dispatcher.transcript().is_empty());
    let banner = dispatcher.state().error.clone().unwrap();
    assert_eq!(banner.kind, ErrorKind::Configuration);
    assert!(banner.is_persistent());
    assert!(dispatcher.session().is_none());

    assert!(matches!(
        dispatcher.send("again").await,
        SendOutcome::Skipped(SkipReason::NoSession)
    ));
    assert_eq!(dispatcher.state().error, Some(banner));
}
