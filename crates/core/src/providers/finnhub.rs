use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::price::PricePoint;

use super::traits::{MarketQuote, PriceHistoryProvider, QuoteProvider};

const BASE_URL: &str = "https://finnhub.io/api/v1";

/// Assumed constant annual growth used for backward extrapolation.
const ANNUAL_GROWTH_RATE: f64 = 0.10;

/// Full width of the pseudorandom daily variation (±0.5%).
const DEFAULT_JITTER_WIDTH: f64 = 0.01;

/// Finnhub API provider for the SPY ETF.
///
/// - **Quote**: `/quote` (requires API key, free tier 60 calls/minute).
/// - **History**: Finnhub's candle history is not on the free tier, so the
///   daily series is synthesized backward from the single current quote
///   using an assumed constant annual growth rate, plus a small
///   pseudorandom daily jitter for realism. The synthesis is deterministic
///   apart from that explicitly-scoped jitter term (`with_jitter(0.0)`
///   disables it).
pub struct FinnhubProvider {
    client: Client,
    base_url: String,
    api_key: String,
    jitter_width: f64,
}

impl FinnhubProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(BASE_URL, api_key)
    }

    /// Point the provider at a different endpoint (used by tests).
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
            api_key: api_key.into(),
            jitter_width: DEFAULT_JITTER_WIDTH,
        }
    }

    /// Override the jitter width; 0.0 makes the synthesis fully
    /// deterministic.
    pub fn with_jitter(mut self, width: f64) -> Self {
        self.jitter_width = width;
        self
    }

    async fn fetch_spy_quote(&self) -> Result<QuoteResponse, CoreError> {
        let url = format!(
            "{}/quote?symbol=SPY&token={}",
            self.base_url, self.api_key
        );

        let resp: QuoteResponse = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::DataUnavailable {
                asset: Asset::Spy,
                message: CoreError::from(e).to_string(),
            })?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                endpoint: "Finnhub /quote".into(),
                message: format!("Failed to parse quote for SPY: {e}"),
            })?;

        // Finnhub reports 0 for unknown symbols rather than an error.
        if resp.current.unwrap_or(0.0) <= 0.0 {
            return Err(CoreError::DataUnavailable {
                asset: Asset::Spy,
                message: "No quote data for SPY".into(),
            });
        }

        Ok(resp)
    }
}

// ── Finnhub API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct QuoteResponse {
    /// Current price
    #[serde(rename = "c")]
    current: Option<f64>,
    /// Change percentage over 24h
    #[serde(rename = "dp")]
    change_pct: Option<f64>,
}

#[async_trait]
impl PriceHistoryProvider for FinnhubProvider {
    fn name(&self) -> &str {
        "Finnhub"
    }

    fn supported_assets(&self) -> Vec<Asset> {
        vec![Asset::Spy]
    }

    async fn fetch_daily_history(
        &self,
        _asset: Asset,
        days: u32,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let quote = self.fetch_spy_quote().await?;
        let current_price = quote.current.unwrap_or(0.0);
        debug!(days, current_price, "synthesizing SPY history from current quote");

        // Work backwards: if the current price is X and growth is 10%/year,
        // the price Y years ago was X / (1 + growth)^Y.
        let today = chrono::Utc::now().date_naive();
        let mut rng = rand::thread_rng();

        let points = super::trailing_dates(today, days)
            .into_iter()
            .enumerate()
            .map(|(i, date)| {
                let years_ago = f64::from(days - 1 - i as u32) / 365.0;
                let base = current_price / (1.0 + ANNUAL_GROWTH_RATE).powf(years_ago);
                let variation = 1.0 + (rng.gen::<f64>() - 0.5) * self.jitter_width;
                PricePoint {
                    date,
                    price: (base * variation * 100.0).round() / 100.0,
                }
            })
            .collect();

        Ok(points)
    }
}

#[async_trait]
impl QuoteProvider for FinnhubProvider {
    fn name(&self) -> &str {
        "Finnhub"
    }

    fn supported_assets(&self) -> Vec<Asset> {
        vec![Asset::Spy]
    }

    async fn fetch_quote(&self, _asset: Asset) -> Result<MarketQuote, CoreError> {
        let quote = self.fetch_spy_quote().await?;
        Ok(MarketQuote {
            price_usd: quote.current.unwrap_or(0.0),
            change_24h: quote.change_pct.unwrap_or(0.0),
        })
    }
}
