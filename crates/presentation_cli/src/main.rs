//! kbot
//!
//! Telegram bot that replies to `/start hello`, with every processed
//! message traced, counted and logged through OpenTelemetry.

#![allow(clippy::print_stdout)]

mod cli;
mod polling;

use std::sync::Arc;

use anyhow::Context;
use application::{HandlerTable, MessageProcessor, MessengerPort};
use clap::Parser;
use domain::ServiceResource;
use infrastructure::{
    AppConfig, TelegramMessengerAdapter, TelemetryProvider, init_telemetry, retry,
};
use integration_telegram::TelegramClient;
use tokio::{signal, sync::watch};
use tracing::{error, info};

use crate::cli::{Cli, Commands, VERSION, log_filter_from_verbosity};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Version => {
            println!("{VERSION}");
            Ok(())
        },
        Commands::Kbot => run(cli.verbose).await,
    }
}

async fn run(verbose: u8) -> anyhow::Result<()> {
    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(filter) = log_filter_from_verbosity(verbose) {
        config.telemetry.log_filter = filter.to_string();
    }

    let resource = ServiceResource::new(VERSION).context("Invalid build version")?;
    let provider = TelemetryProvider::configure(&config.telemetry, &resource);
    let _telemetry_guard = init_telemetry(&provider, &config.telemetry)?;

    println!("kbot {VERSION} started");

    if !config.telegram.has_token() {
        error!("TELE_TOKEN is not set. Please check TELE_TOKEN");
        anyhow::bail!("TELE_TOKEN is not set");
    }

    let client = Arc::new(TelegramClient::new(config.telegram.client_config())?);
    let me = match retry(&config.retry, || client.get_me()).await {
        Ok(me) => me,
        Err(e) => {
            error!(error = %e, "Please check TELE_TOKEN");
            return Err(e).context("Telegram rejected the bot token");
        },
    };

    info!(
        version = VERSION,
        service = provider.service_name(),
        bot = me.username.as_deref().unwrap_or_default(),
        "kbot started"
    );

    let handlers = Arc::new(HandlerTable::with_builtin(&resource));
    info!(payloads = ?handlers.payloads(), "Registered payload handlers");

    let messenger: Arc<dyn MessengerPort> =
        Arc::new(TelegramMessengerAdapter::new(Arc::clone(&client)));
    let processor = Arc::new(MessageProcessor::new(provider.port(), messenger, handlers));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = polling::spawn_telegram_polling_task(
        client,
        processor,
        me.username,
        config.retry.clone(),
        shutdown_rx,
    );

    shutdown_signal().await;
    // Receiver may already be gone if the task ended early
    let _ = shutdown_tx.send(true);
    if let Err(e) = poller.await {
        error!(error = %e, "Polling task failed");
    }

    info!("kbot stopped");
    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
