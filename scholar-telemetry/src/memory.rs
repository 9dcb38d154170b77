//! In-memory capture of log events.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

/// One captured event.
#[derive(Debug, Clone, Serialize)]
pub struct CapturedEvent {
    pub target: String,
    pub level: String,
    /// Every recorded field, including `message`.
    pub fields: HashMap<String, serde_json::Value>,
}

impl CapturedEvent {
    /// A field rendered as a string, if present.
    pub fn field(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(|value| match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// A layer keeping every event whose target starts with a prefix.
///
/// Clones share the same storage, so one clone can be installed in a
/// subscriber while another is used to read the events back.
#[derive(Debug, Clone)]
pub struct TurnCapture {
    prefix: String,
    events: Arc<RwLock<Vec<CapturedEvent>>>,
}

impl Default for TurnCapture {
    fn default() -> Self {
        Self::new(crate::TURN_TARGET)
    }
}

impl TurnCapture {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), events: Arc::new(RwLock::new(Vec::new())) }
    }

    /// Events captured so far, oldest first.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.read().map(|events| events.clone()).unwrap_or_default()
    }
}

impl<S: Subscriber> Layer<S> for TurnCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with(&self.prefix) {
            return;
        }
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);
        let captured = CapturedEvent {
            target: metadata.target().to_string(),
            level: metadata.level().to_string(),
            fields: visitor.0,
        };
        if let Ok(mut events) = self.events.write() {
            events.push(captured);
        }
    }
}

#[derive(Default)]
struct JsonVisitor(HashMap<String, serde_json::Value>);

impl tracing::field::Visit for JsonVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), serde_json::Value::String(format!("{value:?}")));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), serde_json::Value::String(value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), serde_json::Value::Bool(value));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), serde_json::json!(value));
    }
}
