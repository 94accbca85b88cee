use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;
use tinybus_event_bus::{EventName, Handler};

/// One recorded invocation: the label of the handler, the event name seen
/// by wildcard handlers, and the parameter.
pub type Call = (&'static str, Option<String>, Option<Value>);

#[derive(Debug, Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<Call>>>);

impl Calls {
    pub fn handler(&self, label: &'static str) -> Handler<Value> {
        let calls = self.clone();
        Handler::new(move |params: Option<&Value>| {
            calls.0.lock().push((label, None, params.cloned()));
        })
    }

    pub fn wildcard(&self, label: &'static str) -> Handler<Value> {
        let calls = self.clone();
        Handler::wildcard(move |name: &EventName, params: Option<&Value>| {
            calls.0.lock().push((label, Some(name.to_string()), params.cloned()));
        })
    }

    pub fn take(&self) -> Vec<Call> {
        std::mem::take(&mut *self.0.lock())
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.0.lock().iter().map(|(label, _, _)| *label).collect()
    }
}
