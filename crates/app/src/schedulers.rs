//! Background collaborators with an explicit lifecycle.
//!
//! Each scheduler owns its tokio task; nothing here lives in module-level
//! state. The caller keeps the handle and stops it on shutdown.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use engine::{Engine, MoneyCents};

use crate::prices::PriceFeed;

/// Handle to a running background scheduler.
pub struct Scheduler {
    handle: tokio::task::JoinHandle<()>,
}

impl Scheduler {
    pub fn stop(&self) {
        self.handle.abort();
    }
}

/// Starts the periodic crypto price refresher.
pub fn start_price_refresher(engine: Engine, feed: PriceFeed, every: Duration) -> Scheduler {
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            if let Err(err) = refresh_prices(&engine, &feed).await {
                tracing::warn!("price refresh failed: {err}");
            }
        }
    });
    Scheduler { handle }
}

async fn refresh_prices(engine: &Engine, feed: &PriceFeed) -> Result<(), engine::EngineError> {
    let symbols = engine.active_crypto_symbols().await?;
    if symbols.is_empty() {
        return Ok(());
    }

    let mut prices: HashMap<String, MoneyCents> = HashMap::new();
    for symbol in symbols {
        match feed.quote_minor(&symbol).await {
            Ok(price_minor) => {
                prices.insert(symbol, MoneyCents::new(price_minor));
            }
            Err(err) => tracing::warn!("no quote for {symbol}: {err}"),
        }
    }

    let updated = engine.update_crypto_prices(&prices).await?;
    tracing::debug!("refreshed prices for {updated} holdings");
    Ok(())
}

/// Starts the periodic due-subscription processor for all owners.
pub fn start_subscription_processor(engine: Engine, every: Duration) -> Scheduler {
    let handle = tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let now = Utc::now();
            match engine
                .process_due_subscriptions(None, now.date_naive(), now)
                .await
            {
                Ok(report) => {
                    if report.processed > 0 || report.failed > 0 {
                        tracing::info!(
                            "subscription run: {} processed, {} failed",
                            report.processed,
                            report.failed
                        );
                    }
                }
                Err(err) => tracing::warn!("subscription run failed: {err}"),
            }
        }
    });
    Scheduler { handle }
}
