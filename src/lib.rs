pub mod cli;
pub mod config;
pub mod detector;
pub mod discord;
pub mod error;
pub mod logging;
pub mod models;
pub mod parsers;
pub mod scheduler;
pub mod storage;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::cli::CliArgs;
use crate::config::Config;
use crate::discord::{DiscordNotifier, LogNotifier, Notifier};
use crate::error::Result;
use crate::parsers::HtmlProductParser;
use crate::scheduler::{CycleSettings, Scheduler};
use crate::storage::{InstanceLock, JsonFileStore};
use crate::utils::{create_client, HttpFetcher};

/// Loads the configuration and runs one cycle, or loops until Ctrl-C or SIGTERM.
pub async fn run(args: CliArgs) -> Result<()> {
    let mut config = Config::load(&args.config)?;
    config.notify_all |= args.notify_all;
    config.policy.notify_on_unavailable |= args.notify_unavailable;

    info!(
        "Monitoring {} products from {}",
        config.products.len(),
        args.config.display()
    );

    let _lock = InstanceLock::acquire(&args.state_file)?;

    let client = create_client(&config.http)?;
    let notifier: Arc<dyn Notifier> = match &config.webhook_url {
        Some(url) => Arc::new(DiscordNotifier::new(client.clone(), url.clone())),
        None => {
            warn!("No webhook_url configured, notifications will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let scheduler = Scheduler::new(
        Arc::new(JsonFileStore::new(&args.state_file)),
        Arc::new(HttpFetcher::new(client)),
        Arc::new(HtmlProductParser::new()),
        notifier,
        CycleSettings {
            policy: config.policy,
            notify_all: config.notify_all,
        },
    );

    match args.loop_interval_minutes() {
        Some(minutes) => {
            let every = Duration::from_secs(minutes * 60);
            scheduler
                .run_loop(&config.products, every, shutdown_signal())
                .await?;
        }
        None => {
            scheduler.run_once(&config.products).await?;
        }
    }

    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                return ctrl_c().await;
            }
        };
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM"),
            _ = ctrl_c() => {}
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await;
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
