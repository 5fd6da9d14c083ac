//! Product Recommendation Agent - shopping client core
//!
//! Browses a product catalog served by a recommendation backend, keeps the
//! shopper's session, records implicit feedback and submits ratings. Views
//! are pushed as ready-to-render view-models to a `Presenter`; the bundled
//! binary drives the client from console commands.

// Module declarations
pub mod application;
pub mod commands;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod test_utils;

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use crate::application::ShopClient;
use crate::commands::{ConsoleCommand, HELP, parse_command};
use crate::infrastructure::logging::log_system_info;
use crate::infrastructure::{
    ConfigManager, ConsolePresenter, HttpCatalogApi, HttpClientConfig, init_logging_with_config,
};

/// Entry point of the console binary
pub fn run() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    runtime.block_on(run_console())
}

async fn run_console() -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager
        .load_config()
        .await
        .with_context(|| format!("Failed to load configuration from {:?}", manager.config_path()))?;

    init_logging_with_config(&config.logging)?;
    log_system_info();
    info!("API base URL: {}", config.api.base_url);

    let api = Arc::new(HttpCatalogApi::new(&HttpClientConfig::from(&config.api))?);
    let client = ShopClient::new(api, Arc::new(ConsolePresenter::new()), &config);
    client.startup().await;
    info!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    break;
                };
                if !handle_line(&client, &line).await {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    info!("Session {} finished", client.session_id());
    Ok(())
}

/// Execute one console line. Returns `false` when the console should exit.
async fn handle_line(client: &ShopClient, line: &str) -> bool {
    let command = match parse_command(line) {
        Ok(command) => command,
        Err(commands::CommandError::Empty) => return true,
        Err(e) => {
            warn!("{}", e);
            return true;
        }
    };

    match command {
        ConsoleCommand::Intent(intent) => {
            // failures were already rendered
            if let Err(e) = client.dispatch(intent).await {
                warn!("{}", e);
            }
        }
        ConsoleCommand::History => match client.recent_history().await {
            Ok(rows) if rows.is_empty() => info!("No browsing history yet"),
            Ok(rows) => {
                for row in rows {
                    info!("{}  {:<12} {}", row.timestamp, row.action, row.product);
                }
            }
            Err(e) => warn!("{}", e),
        },
        ConsoleCommand::Stats => match client.catalog_stats().await {
            Ok(stats) => {
                info!(
                    "{} products, {} users, {} ratings",
                    stats.total_products, stats.total_users, stats.total_ratings
                );
                for (category, count) in &stats.categories {
                    info!("  {:<20} {}", category, count);
                }
            }
            Err(e) => error!("Error loading stats: {}", e),
        },
        ConsoleCommand::Reviews(product_id) => match client.product_reviews(product_id).await {
            Ok(reviews) if reviews.is_empty() => info!("No ratings for product {}", product_id),
            Ok(reviews) => {
                for review in reviews {
                    info!(
                        "user {} rated {:.0}/5 {}",
                        review.user_id,
                        review.rating,
                        review.review.as_deref().unwrap_or_default()
                    );
                }
            }
            Err(e) => error!("Error loading ratings: {}", e),
        },
        ConsoleCommand::Help => info!("{}", HELP),
        ConsoleCommand::Quit => return false,
    }
    true
}
