// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{Event, Level, Subscriber, field, span};
use tracing_subscriber::{Layer, layer::Context, prelude::*};

/// A captured tracing span with its attributes.
#[derive(Debug, Clone)]
pub struct CapturedSpan {
    /// The unique ID of the span.
    pub id: span::Id,
    /// The name of the span.
    pub name: String,
    /// A map of attribute keys to their string representations.
    pub attributes: HashMap<String, String>,
}

/// A captured tracing event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    /// The formatted `message` field, empty if the event has none.
    pub message: String,
    /// The other fields, formatted as strings.
    pub fields: HashMap<String, String>,
}

/// Extracts key-value pairs from spans and events.
struct TestVisitor<'a>(&'a mut HashMap<String, String>);

impl field::Visit for TestVisitor<'_> {
    fn record_str(&mut self, field: &field::Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .insert(field.name().to_string(), format!("{value:?}"));
    }

    fn record_i64(&mut self, field: &field::Field, value: i64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &field::Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &field::Field, value: bool) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

#[derive(Debug, Default)]
struct CapturedLog {
    spans: Mutex<Vec<CapturedSpan>>,
    events: Mutex<Vec<CapturedEvent>>,
}

/// A tracing layer for capturing and inspecting spans and events in tests.
///
/// The layer is installed as the default subscriber for the current thread
/// only, so tests can run in parallel without interfering with each other.
///
/// # Example
///
/// ```rust
/// use gapic_test_utils::test_layer::TestLayer;
/// use tracing::info_span;
///
/// let (_guard, layer) = TestLayer::initialize();
/// info_span!("my_operation", foo = "bar").in_scope(|| {
///     tracing::info!(answer = 42, "doing something important");
/// });
///
/// let spans = layer.spans();
/// assert_eq!(spans.len(), 1);
/// assert_eq!(spans[0].name, "my_operation");
/// assert_eq!(spans[0].attributes.get("foo"), Some(&"bar".to_string()));
/// let events = layer.events();
/// assert_eq!(events[0].message, "doing something important");
/// assert_eq!(events[0].fields.get("answer"), Some(&"42".to_string()));
/// ```
#[derive(Clone, Debug, Default)]
pub struct TestLayer {
    log: Arc<CapturedLog>,
}

impl TestLayer {
    /// Installs a new `TestLayer` for the current thread.
    ///
    /// The layer captures spans and events until the returned guard is
    /// dropped. Use the returned `TestLayer` to inspect them.
    pub fn initialize() -> (tracing::subscriber::DefaultGuard, TestLayer) {
        let layer = TestLayer::default();
        let subscriber = tracing_subscriber::registry().with(layer.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (guard, layer)
    }

    /// Returns the spans captured so far.
    pub fn spans(&self) -> Vec<CapturedSpan> {
        self.log.spans.lock().expect("span log poisoned").clone()
    }

    /// Returns the events captured so far.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.log.events.lock().expect("event log poisoned").clone()
    }
}

impl<S> Layer<S> for TestLayer
where
    S: Subscriber,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, _ctx: Context<'_, S>) {
        let mut attributes = HashMap::new();
        attrs.record(&mut TestVisitor(&mut attributes));
        self.log
            .spans
            .lock()
            .expect("span log poisoned")
            .push(CapturedSpan {
                id: id.clone(),
                name: attrs.metadata().name().to_string(),
                attributes,
            });
    }

    fn on_record(&self, id: &span::Id, values: &span::Record<'_>, _ctx: Context<'_, S>) {
        let mut spans = self.log.spans.lock().expect("span log poisoned");
        if let Some(captured) = spans.iter_mut().find(|s| s.id == *id) {
            values.record(&mut TestVisitor(&mut captured.attributes));
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut TestVisitor(&mut fields));
        let message = fields.remove("message").unwrap_or_default();
        self.log
            .events
            .lock()
            .expect("event log poisoned")
            .push(CapturedEvent {
                level: *event.metadata().level(),
                message,
                fields,
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::info_span;

    #[test]
    fn captures_nested_spans() {
        let (_guard, layer) = TestLayer::initialize();
        info_span!("outer_span").in_scope(|| {
            info_span!("inner_span").in_scope(|| {
                tracing::info!("deep inside");
            });
        });

        let names: Vec<_> = layer.spans().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["outer_span", "inner_span"]);
        let events = layer.events();
        assert_eq!(events.len(), 1, "{events:?}");
        assert_eq!(events[0].level, Level::INFO);
        assert_eq!(events[0].message, "deep inside");
    }

    #[test]
    fn capture_ends_with_guard() {
        let layer = {
            let (_guard, layer) = TestLayer::initialize();
            info_span!("span_inside_guard").in_scope(|| {});
            layer
        };
        info_span!("span_outside_guard").in_scope(|| {});

        let names: Vec<_> = layer.spans().into_iter().map(|s| s.name).collect();
        assert_eq!(names, vec!["span_inside_guard"]);
    }

    #[test]
    fn on_record() {
        let (_guard, layer) = TestLayer::initialize();
        let span = info_span!(
            "my_span",
            initial_attr = "initial_value",
            dynamic_attr = field::Empty,
            number_attr = field::Empty,
            bool_attr = field::Empty,
        );
        span.in_scope(|| {
            span.record("dynamic_attr", "dynamic_value");
            span.record("number_attr", 42_i64);
            span.record("bool_attr", true);
        });

        let spans = layer.spans();
        assert_eq!(spans.len(), 1);
        let attribute = |key: &str| spans[0].attributes.get(key).map(String::as_str);
        assert_eq!(attribute("initial_attr"), Some("initial_value"));
        assert_eq!(attribute("dynamic_attr"), Some("dynamic_value"));
        assert_eq!(attribute("number_attr"), Some("42"));
        assert_eq!(attribute("bool_attr"), Some("true"));
    }
}
