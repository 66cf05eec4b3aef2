use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use sea_orm::ConnectOptions;
use settings::Database;

use crate::prices::PriceFeed;
use crate::schedulers::{Scheduler, start_price_refresher, start_subscription_processor};

mod prices;
mod schedulers;
mod settings;

const DEFAULT_DB_TIMEOUT_SECS: u64 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;
    let mut tasks = tokio::task::JoinSet::new();
    let mut schedulers: Vec<Scheduler> = Vec::new();

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "coffer={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    if let Some(server) = settings.server {
        tracing::info!("Found server settings...");
        let db = match parse_database(&server.database, server.database_timeout_secs).await {
            Ok(db) => db,
            Err(err) => {
                tracing::error!("failed to initialize database: {err}");
                return Err(err);
            }
        };

        if let Some(scheduler_settings) = settings.schedulers {
            if let (Some(minutes), Some(url)) = (
                scheduler_settings.price_refresh_minutes,
                scheduler_settings.price_feed_url.clone(),
            ) {
                let engine = engine::Engine::builder().database(db.clone()).build().await?;
                schedulers.push(start_price_refresher(
                    engine,
                    PriceFeed::new(url),
                    Duration::from_secs(minutes * 60),
                ));
                tracing::info!("price refresher running every {minutes}m");
            }
            if let Some(hours) = scheduler_settings.subscription_run_hours {
                let engine = engine::Engine::builder().database(db.clone()).build().await?;
                schedulers.push(start_subscription_processor(
                    engine,
                    Duration::from_secs(hours * 3600),
                ));
                tracing::info!("subscription processor running every {hours}h");
            }
        }

        tasks.spawn(async move {
            let engine = match engine::Engine::builder().database(db.clone()).build().await {
                Ok(engine) => engine,
                Err(err) => {
                    tracing::error!("failed to build engine from database: {err}");
                    return;
                }
            };
            let bind = server.bind.unwrap_or_else(|| "127.0.0.1".to_string());
            let addr = format!("{}:{}", bind, server.port);
            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(listener) => listener,
                Err(err) => {
                    tracing::error!("failed to bind server listener: {err}");
                    return;
                }
            };
            if let Err(err) = server::run_with_listener(engine, db, listener).await {
                tracing::error!("server failed: {err}");
            }
        });
    }

    while tasks.join_next().await.is_some() {
        tasks.shutdown().await;
    }
    for scheduler in &schedulers {
        scheduler.stop();
    }

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
    timeout_secs: Option<u64>,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite { path } => format!("sqlite:{}?mode=rwc", path),
    };

    let timeout = Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_DB_TIMEOUT_SECS));
    let mut options = ConnectOptions::new(url);
    options.connect_timeout(timeout).acquire_timeout(timeout);

    let database = sea_orm::Database::connect(options).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
