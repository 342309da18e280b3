//! Message processor - The per-message pipeline
//!
//! For each inbound message, in order: open the root span, increment the
//! payload counter, write the correlated log entry, dispatch to the payload
//! handler, close the span. The handler's error is the result.

use std::{fmt, sync::Arc};

use domain::InboundMessage;
use tracing::{Instrument, Span, debug, info};

use crate::{
    correlation,
    error::ApplicationError,
    handlers::{HandlerContext, HandlerTable},
    ports::{MessengerPort, TelemetryPort},
};

/// Runs the instrumented pipeline for one inbound message at a time
///
/// Shared across concurrently processed messages; every collaborator is
/// read-only after construction.
pub struct MessageProcessor {
    telemetry: Arc<dyn TelemetryPort>,
    messenger: Arc<dyn MessengerPort>,
    handlers: Arc<HandlerTable>,
}

impl fmt::Debug for MessageProcessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageProcessor")
            .field("handlers", &self.handlers)
            .finish_non_exhaustive()
    }
}

impl MessageProcessor {
    /// Create a processor from its collaborators
    pub fn new(
        telemetry: Arc<dyn TelemetryPort>,
        messenger: Arc<dyn MessengerPort>,
        handlers: Arc<HandlerTable>,
    ) -> Self {
        Self {
            telemetry,
            messenger,
            handlers,
        }
    }

    /// Process one inbound message
    ///
    /// An unmatched payload is not an error. A handler error is returned
    /// unchanged for the transport to deal with.
    pub async fn process(&self, message: InboundMessage) -> Result<(), ApplicationError> {
        let span = correlation::message_span();
        self.run(&message, &span).instrument(span.clone()).await
    }

    async fn run(&self, message: &InboundMessage, span: &Span) -> Result<(), ApplicationError> {
        let payload = &message.payload;

        self.telemetry
            .increment_counter(span, &message.counter_name());

        match self.telemetry.trace_id(span) {
            Some(trace_id) => info!(payload = %payload, trace_id = %trace_id, "{}", message.text),
            None => info!(payload = %payload, "{}", message.text),
        }

        let Some(handler) = self.handlers.get(payload) else {
            debug!(payload = %payload, update_id = message.update_id, "No handler for payload");
            return Ok(());
        };

        let cx = HandlerContext::new(span, message, self.messenger.as_ref());
        handler.handle(&cx).await
    }
}
