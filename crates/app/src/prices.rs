//! Crypto price feed client.
//!
//! The feed is a plain JSON endpoint (`GET {base}/price?symbol=BTC` →
//! `{"price": 64250.12}`); prices come back in major units and are converted
//! to integer cents before they reach the engine.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PriceQuote {
    price: f64,
}

#[derive(Clone)]
pub struct PriceFeed {
    client: reqwest::Client,
    base_url: String,
}

impl PriceFeed {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetches the current price of `symbol` in integer cents.
    pub async fn quote_minor(&self, symbol: &str) -> Result<i64, reqwest::Error> {
        let quote: PriceQuote = self
            .client
            .get(format!("{}/price", self.base_url))
            .query(&[("symbol", symbol)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok((quote.price * 100.0).round() as i64)
    }
}
