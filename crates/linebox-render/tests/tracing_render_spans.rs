#![forbid(unsafe_code)]

//! Tracing output of the renderer.
//!
//! Verify the `render_lines` span carries its fields, truncation is reported
//! at debug level, and every committed region is traced inside the span.
//!
//! Run:
//!   cargo test -p linebox-render --features tracing --test tracing_render_spans

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use linebox_core::geometry::RenderRect;
use linebox_core::logging::RENDER_TARGET;
use linebox_render::hyperlink::internal_hyperlink;
use linebox_render::mouse::MouseState;
use linebox_render::render_lines::RenderLines;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedSpan {
    name: String,
    target: String,
    fields: HashMap<String, String>,
}

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    target: String,
    message: String,
    fields: HashMap<String, String>,
    parent_span_name: Option<String>,
}

#[derive(Default, Clone)]
struct Capture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

/// Visitor that extracts span/event fields.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            target: attrs.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.get("message").cloned().unwrap_or_default();
        let parent_span_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            target: event.metadata().target().to_string(),
            message,
            fields,
            parent_span_name,
        });
    }
}

/// Set up a capturing subscriber and run a closure under it.
fn with_captured<F: FnOnce()>(f: F) -> Capture {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);
    capture
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn render_span_has_fields() {
    let capture = with_captured(|| {
        let mut mouse = MouseState::new();
        RenderLines::default().in_rectangle(&["a", "b"], RenderRect::new(0, 0, 12, 4), &mut mouse);
    });

    let spans = capture.spans.lock().unwrap();
    let span = spans
        .iter()
        .find(|s| s.name == "render_lines")
        .expect("render_lines span");
    assert_eq!(span.target, RENDER_TARGET);
    assert_eq!(span.fields.get("lines").map(String::as_str), Some("2"));
    assert_eq!(span.fields.get("width").map(String::as_str), Some("12"));
    assert_eq!(span.fields.get("height").map(String::as_str), Some("4"));
}

#[test]
fn truncation_is_logged_at_debug() {
    let capture = with_captured(|| {
        let mut mouse = MouseState::new();
        RenderLines::default().in_rectangle(&["a", "b", "c"], RenderRect::new(0, 0, 0, 1), &mut mouse);
    });

    let events = capture.events.lock().unwrap();
    let truncated: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::DEBUG && e.message.contains("rectangle full"))
        .collect();
    assert_eq!(truncated.len(), 1, "{events:?}");
    assert_eq!(truncated[0].fields.get("final_y").map(String::as_str), Some("1"));
    assert_eq!(truncated[0].parent_span_name.as_deref(), Some("render_lines"));
}

#[test]
fn every_region_is_traced() {
    let capture = with_captured(|| {
        let mut mouse = MouseState::new();
        let line = format!("{} {}", internal_hyperlink("one", "a"), internal_hyperlink("two", "b"));
        RenderLines::default().in_rectangle(&[line], RenderRect::new(0, 0, 0, 1), &mut mouse);
    });

    let events = capture.events.lock().unwrap();
    let regions: Vec<_> = events
        .iter()
        .filter(|e| e.level == tracing::Level::TRACE && e.target == RENDER_TARGET)
        .collect();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].fields.get("action").map(String::as_str), Some("a"));
    assert_eq!(regions[1].fields.get("action").map(String::as_str), Some("b"));
    assert_eq!(regions[1].fields.get("start_x").map(String::as_str), Some("4"));
    assert_eq!(regions[1].fields.get("end_x").map(String::as_str), Some("7"));
    assert!(regions.iter().all(|e| e.parent_span_name.as_deref() == Some("render_lines")));
}

#[test]
fn complete_render_logs_no_truncation() {
    let capture = with_captured(|| {
        let mut mouse = MouseState::new();
        RenderLines::default().in_rectangle(&["a"], RenderRect::new(0, 0, 0, 3), &mut mouse);
    });

    let events = capture.events.lock().unwrap();
    assert!(events.iter().all(|e| !e.message.contains("rectangle full")));
}
