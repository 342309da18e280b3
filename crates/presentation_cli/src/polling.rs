//! Telegram long-polling background task
//!
//! Long-polls the Bot API for updates and hands each text message to the
//! message processor on its own task.

use std::{sync::Arc, time::Duration};

use application::MessageProcessor;
use infrastructure::retry::{RetryConfig, backoff_for};
use integration_telegram::{TelegramClient, Update};
use tokio::{sync::watch, task::JoinSet};
use tracing::{debug, error, info, warn};

/// How long shutdown waits for in-flight messages
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Spawn the polling task
///
/// Every received update is acknowledged by advancing the offset past it,
/// whether or not it carries a message the bot handles. Failed polls back
/// off exponentially. The task ends when `shutdown` flips to `true` or its
/// sender is dropped, after waiting for in-flight messages.
pub fn spawn_telegram_polling_task(
    client: Arc<TelegramClient>,
    processor: Arc<MessageProcessor>,
    bot_username: Option<String>,
    backoff: RetryConfig,
    mut shutdown: watch::Receiver<bool>,
) -> tokio::task::JoinHandle<()> {
    info!(
        poll_timeout_secs = client.config().poll_timeout_secs,
        bot = bot_username.as_deref().unwrap_or_default(),
        "Starting Telegram polling task"
    );

    tokio::spawn(async move {
        let mut offset: Option<i64> = None;
        let mut failures = 0u32;
        let mut in_flight = JoinSet::new();

        loop {
            while in_flight.try_join_next().is_some() {}

            let result = tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                result = client.get_updates(offset) => result,
            };

            match result {
                Ok(updates) => {
                    failures = 0;
                    if !updates.is_empty() {
                        debug!(count = updates.len(), "Received updates");
                    }
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        dispatch(&mut in_flight, &processor, bot_username.as_deref(), update);
                    }
                },
                Err(e) => {
                    let delay = backoff_for(&backoff, failures, &e);
                    let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
                    failures = failures.saturating_add(1);
                    if e.is_retryable() {
                        warn!(error = %e, failures, delay_ms, "Telegram poll failed, backing off");
                    } else {
                        error!(error = %e, failures, delay_ms, "Telegram poll failed, backing off");
                    }

                    tokio::select! {
                        biased;
                        _ = shutdown.changed() => break,
                        () = tokio::time::sleep(delay) => {},
                    }
                },
            }
        }

        drain(in_flight).await;
        info!("Telegram polling task stopped");
    })
}

/// Start processing one update on its own task
fn dispatch(
    in_flight: &mut JoinSet<()>,
    processor: &Arc<MessageProcessor>,
    bot_username: Option<&str>,
    update: Update,
) {
    let update_id = update.update_id;
    let Some(message) = update.into_inbound(bot_username) else {
        debug!(update_id, "Skipping update without a message for this bot");
        return;
    };

    let processor = Arc::clone(processor);
    in_flight.spawn(async move {
        if let Err(e) = processor.process(message).await {
            error!(update_id, error = %e, "Failed to handle message");
        }
    });
}

async fn drain(mut in_flight: JoinSet<()>) {
    if in_flight.is_empty() {
        return;
    }

    info!(count = in_flight.len(), "Waiting for in-flight messages");
    let finished = tokio::time::timeout(DRAIN_TIMEOUT, async {
        while in_flight.join_next().await.is_some() {}
    })
    .await;

    if finished.is_err() {
        warn!(
            remaining = in_flight.len(),
            "In-flight messages did not finish in time, aborting"
        );
        in_flight.abort_all();
    }
}
