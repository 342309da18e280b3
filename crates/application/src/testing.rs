//! Test helpers: span lifecycle recording and JSON log capture

use std::{fmt, io, sync::Arc};

use parking_lot::Mutex;
use tracing::{
    Subscriber,
    field::{Field, Visit},
    span::{Attributes, Id, Record},
};
use tracing_subscriber::{
    Layer,
    fmt::MakeWriter,
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
};

/// A span lifecycle event seen by [`SpanRecorder`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanEvent {
    Opened {
        name: &'static str,
        parent: Option<&'static str>,
    },
    Field {
        span: &'static str,
        field: &'static str,
        value: String,
    },
    Closed {
        name: &'static str,
    },
}

/// Layer that records span opens, field values and closes
#[derive(Debug, Clone, Default)]
pub struct SpanRecorder {
    events: Arc<Mutex<Vec<SpanEvent>>>,
}

impl SpanRecorder {
    pub fn events(&self) -> Vec<SpanEvent> {
        self.events.lock().clone()
    }

    pub fn opened(&self, name: &str) -> usize {
        self.count(|e| matches!(e, SpanEvent::Opened { name: n, .. } if *n == name))
    }

    pub fn closed(&self, name: &str) -> usize {
        self.count(|e| matches!(e, SpanEvent::Closed { name: n } if *n == name))
    }

    /// Parent of the first span called `name`; `Some(None)` for a root
    pub fn parent_of(&self, name: &str) -> Option<Option<&'static str>> {
        self.events.lock().iter().find_map(|e| match e {
            SpanEvent::Opened { name: n, parent } if *n == name => Some(*parent),
            _ => None,
        })
    }

    /// Last recorded value of `field` on the span called `span`
    pub fn field(&self, span: &str, field: &str) -> Option<String> {
        self.events.lock().iter().rev().find_map(|e| match e {
            SpanEvent::Field {
                span: s,
                field: f,
                value,
            } if *s == span && *f == field => Some(value.clone()),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&SpanEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| pred(e)).count()
    }

    fn push_fields(&self, span: &'static str, visit: impl FnOnce(&mut FieldVisitor)) {
        let mut visitor = FieldVisitor::default();
        visit(&mut visitor);
        let mut events = self.events.lock();
        for (field, value) in visitor.0 {
            events.push(SpanEvent::Field { span, field, value });
        }
    }
}

impl<S> Layer<S> for SpanRecorder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let name = attrs.metadata().name();
        let parent = ctx
            .span(id)
            .and_then(|span| span.parent().map(|p| p.name()));
        self.events.lock().push(SpanEvent::Opened { name, parent });
        self.push_fields(name, |v| attrs.record(v));
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            self.push_fields(span.name(), |v| values.record(v));
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        if let Some(span) = ctx.span(&id) {
            self.events
                .lock()
                .push(SpanEvent::Closed { name: span.name() });
        }
    }
}

#[derive(Default)]
struct FieldVisitor(Vec<(&'static str, String)>);

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.push((field.name(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.push((field.name(), format!("{value:?}")));
    }
}

/// In-memory writer collecting JSON log lines
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Parsed log entries, one per line
    pub fn entries(&self) -> Vec<serde_json::Value> {
        let buf = self.buf.lock();
        String::from_utf8_lossy(&buf)
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    /// Entries whose message equals `message`
    pub fn entries_with_message(&self, message: &str) -> Vec<serde_json::Value> {
        self.entries()
            .into_iter()
            .filter(|e| e.get("message").and_then(serde_json::Value::as_str) == Some(message))
            .collect()
    }
}

#[derive(Debug)]
pub struct LogWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            buf: Arc::clone(&self.buf),
        }
    }
}

/// Registry with the span recorder and a flattened JSON log layer
pub fn subscriber(
    recorder: &SpanRecorder,
    logs: &LogCapture,
) -> impl Subscriber + Send + Sync + use<> {
    tracing_subscriber::registry().with(recorder.clone()).with(
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(logs.clone()),
    )
}
