use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("gemini_chat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter =
    Counter::new("gemini_chat.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("gemini_chat.client.request_duration_seconds");

pub(crate) static DISPATCH_SENDS: Counter = Counter::new("gemini_chat.dispatch.sends");
pub(crate) static DISPATCH_SKIPS: Counter = Counter::new("gemini_chat.dispatch.skips");
pub(crate) static DISPATCH_REPLIES: Counter = Counter::new("gemini_chat.dispatch.replies");
pub(crate) static DISPATCH_ROLLBACKS: Counter = Counter::new("gemini_chat.dispatch.rollbacks");
pub(crate) static DISPATCH_TIMEOUTS: Counter = Counter::new("gemini_chat.dispatch.timeouts");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&DISPATCH_SENDS);
    collector.register_counter(&DISPATCH_SKIPS);
    collector.register_counter(&DISPATCH_REPLIES);
    collector.register_counter(&DISPATCH_ROLLBACKS);
    collector.register_counter(&DISPATCH_TIMEOUTS);
}
