#![forbid(unsafe_code)]

//! Structured logging integration tests.
//!
//! Run with:
//!   cargo test -p ftui-forms --features tracing --test tracing_tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use ftui_forms::{AbstractControl, FormControl, FormGroup, SetValueOptions, UpdateOptions};
use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured event with its level, message and fields.
#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
}

/// A tracing Layer that records every event.
struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

/// Visitor that extracts event fields.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

/// Run `f` under a capturing subscriber and return what it logged.
fn capture<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    events.lock().unwrap().clone()
}

fn with_message<'a>(events: &'a [CapturedEvent], message: &str) -> Vec<&'a CapturedEvent> {
    events.iter().filter(|e| e.message == message).collect()
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn update_pass_traced_per_level() {
    let a = FormControl::new(json!(1));
    let _g = FormGroup::new([("a", a.clone())]);

    let events = capture(|| a.set_value(json!(2), SetValueOptions::new()));
    let updates = with_message(&events, "control updated");

    assert_eq!(updates.len(), 2, "leaf then group: {events:?}");
    assert!(updates.iter().all(|e| e.level == tracing::Level::TRACE));
    assert_eq!(updates[0].fields.get("status").map(String::as_str), Some("VALID"));
    assert_eq!(updates[0].fields.get("emit_event").map(String::as_str), Some("true"));
}

#[test]
fn membership_changes_logged_at_debug() {
    let g = FormGroup::new([("a", FormControl::new(json!(1)))]);

    let events = capture(|| {
        g.add_control("b", FormControl::new(json!(2)));
        g.set_control("b", FormControl::new(json!(3)));
        g.remove_control("a");
    });

    for message in ["adding control", "replacing control", "removing control"] {
        let hits = with_message(&events, message);
        assert_eq!(hits.len(), 1, "{message}: {events:?}");
        assert_eq!(hits[0].level, tracing::Level::DEBUG);
    }
    assert_eq!(
        with_message(&events, "removing control")[0].fields.get("name").map(String::as_str),
        Some("a")
    );
}

#[test]
fn disable_and_enable_logged() {
    let c = FormControl::new(json!(1));
    let events = capture(|| {
        c.disable(UpdateOptions::new());
        c.enable(UpdateOptions::new());
    });
    assert_eq!(with_message(&events, "control disabled").len(), 1);
    assert_eq!(with_message(&events, "control enabled").len(), 1);
}

#[test]
fn rejected_write_warns() {
    let g = FormGroup::new([
        ("a", FormControl::new(json!(1))),
        ("b", FormControl::new(json!(2))),
    ]);

    let events = capture(|| {
        assert!(g.set_value(json!({"a": 9}), UpdateOptions::new()).is_err());
    });

    let warnings: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1, "{events:?}");
    assert_eq!(warnings[0].message, "rejected set_value");
    assert!(
        warnings[0].fields["error"].contains("'b'"),
        "error field names the missing control"
    );
    assert!(
        with_message(&events, "control updated").is_empty(),
        "nothing applied"
    );
}

#[test]
fn construction_is_traced_but_silent() {
    let events = capture(|| {
        let _ = FormControl::new(json!(1));
    });
    let updates = with_message(&events, "control updated");
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].fields.get("emit_event").map(String::as_str), Some("false"));
    assert_eq!(updates[0].fields.get("only_self").map(String::as_str), Some("true"));
}
