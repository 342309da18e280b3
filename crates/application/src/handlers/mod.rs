//! Payload handler table
//!
//! Maps exact payload strings to responders. The table is filled once at
//! startup and shared read-only behind an `Arc` afterwards.

mod hello;

use std::{collections::HashMap, fmt, sync::Arc};

use async_trait::async_trait;
use domain::{InboundMessage, Payload, ServiceResource};
use tracing::Span;

pub use hello::HelloHandler;

use crate::{error::ApplicationError, ports::MessengerPort};

/// Everything a handler gets to work with for one message
pub struct HandlerContext<'a> {
    span: &'a Span,
    message: &'a InboundMessage,
    messenger: &'a dyn MessengerPort,
}

impl<'a> HandlerContext<'a> {
    /// Bundle the active span, the message and the reply channel
    pub fn new(span: &'a Span, message: &'a InboundMessage, messenger: &'a dyn MessengerPort) -> Self {
        Self {
            span,
            message,
            messenger,
        }
    }

    /// The message's root span; parent for any child span the handler opens
    pub const fn span(&self) -> &'a Span {
        self.span
    }

    /// The message being handled
    pub const fn message(&self) -> &'a InboundMessage {
        self.message
    }

    /// Outbound channel for replies
    pub fn messenger(&self) -> &'a dyn MessengerPort {
        self.messenger
    }
}

impl fmt::Debug for HandlerContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerContext")
            .field("span", &self.span.id())
            .field("update_id", &self.message.update_id)
            .finish_non_exhaustive()
    }
}

/// A responder for one payload
///
/// Performs exactly one outbound send and returns that send's error
/// unchanged.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle the message in `cx`
    async fn handle(&self, cx: &HandlerContext<'_>) -> Result<(), ApplicationError>;
}

/// Exact-match mapping from payload to handler
#[derive(Default)]
pub struct HandlerTable {
    handlers: HashMap<String, Arc<dyn MessageHandler>>,
}

impl HandlerTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with the built-in handlers registered
    pub fn with_builtin(resource: &ServiceResource) -> Self {
        let mut table = Self::new();
        table.register("hello", HelloHandler::new(resource));
        table
    }

    /// Register `handler` for `payload`, returning any handler it replaces
    pub fn register(
        &mut self,
        payload: impl Into<String>,
        handler: impl MessageHandler + 'static,
    ) -> Option<Arc<dyn MessageHandler>> {
        self.handlers.insert(payload.into(), Arc::new(handler))
    }

    /// Look up the handler for `payload`
    ///
    /// Matching is exact and case-sensitive.
    pub fn get(&self, payload: &Payload) -> Option<&dyn MessageHandler> {
        self.handlers.get(payload.as_str()).map(AsRef::as_ref)
    }

    /// Number of registered handlers
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Whether no handler is registered
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Registered payloads, sorted
    pub fn payloads(&self) -> Vec<&str> {
        let mut payloads: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        payloads.sort_unstable();
        payloads
    }
}

impl fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerTable")
            .field("payloads", &self.payloads())
            .finish()
    }
}
