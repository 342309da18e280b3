//! `hello` payload: greet the sender with the running version

use async_trait::async_trait;
use domain::ServiceResource;
use tracing::{Instrument, info_span};

use super::{HandlerContext, MessageHandler};
use crate::{error::ApplicationError, ports::OutgoingTextMessage};

/// Replies `Hello I'm Kbot <version>!`
#[derive(Debug, Clone)]
pub struct HelloHandler {
    greeting: String,
}

impl HelloHandler {
    /// Build the greeting for the given service version
    pub fn new(resource: &ServiceResource) -> Self {
        Self {
            greeting: format!("Hello I'm Kbot {}!", resource.version()),
        }
    }
}

#[async_trait]
impl MessageHandler for HelloHandler {
    async fn handle(&self, cx: &HandlerContext<'_>) -> Result<(), ApplicationError> {
        let span = info_span!(parent: cx.span(), "send_hello_response");
        cx.messenger()
            .send_text(OutgoingTextMessage::reply(cx.message(), &self.greeting))
            .instrument(span)
            .await
            .map(|_| ())
    }
}
