use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::price::PricePoint;

use super::traits::{MarketQuote, PriceHistoryProvider, QuoteProvider};

const BASE_URL: &str = "https://api.binance.com/api/v3";

/// Binance spot API provider for crypto prices (BTC, ETH).
///
/// - **Free**: no API key, generous rate limits.
/// - **Endpoints**: `/klines` (daily candles), `/ticker/24hr` (quote).
///
/// Prices come from the USDT pairs (BTCUSDT, ETHUSDT) and are treated as
/// USD-denominated.
pub struct BinanceProvider {
    client: Client,
    base_url: String,
}

impl BinanceProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the provider at a different endpoint (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
        }
    }

    /// Trading pair for an asset, e.g. BTC → "BTCUSDT".
    fn pair(asset: Asset) -> Option<&'static str> {
        match asset {
            Asset::Btc => Some("BTCUSDT"),
            Asset::Eth => Some("ETHUSDT"),
            _ => None,
        }
    }

    fn unsupported(asset: Asset) -> CoreError {
        CoreError::DataUnavailable {
            asset,
            message: "Binance has no trading pair for this asset".into(),
        }
    }
}

impl Default for BinanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Binance API response types ──────────────────────────────────────

/// Kline rows are heterogeneous JSON arrays:
/// `[openTime, open, high, low, close, volume, ...]` — open time is a unix
/// millisecond timestamp, prices are decimal strings.
type KlineRow = Vec<serde_json::Value>;

#[derive(Deserialize)]
struct Ticker24hResponse {
    #[serde(rename = "lastPrice")]
    last_price: String,
    #[serde(rename = "priceChangePercent")]
    price_change_percent: Option<String>,
}

#[async_trait]
impl PriceHistoryProvider for BinanceProvider {
    fn name(&self) -> &str {
        "Binance"
    }

    fn supported_assets(&self) -> Vec<Asset> {
        vec![Asset::Btc, Asset::Eth]
    }

    async fn fetch_daily_history(
        &self,
        asset: Asset,
        days: u32,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let pair = Self::pair(asset).ok_or_else(|| Self::unsupported(asset))?;
        let url = format!(
            "{}/klines?symbol={pair}&interval=1d&limit={days}",
            self.base_url
        );
        debug!(%asset, days, "fetching Binance daily candles");

        let rows: Vec<KlineRow> = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::DataUnavailable {
                asset,
                message: CoreError::from(e).to_string(),
            })?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                endpoint: "Binance /klines".into(),
                message: format!("Failed to parse candles for {pair}: {e}"),
            })?;

        // Listing too new (or venue outage): refuse to pad with guesses.
        if rows.len() < days as usize {
            return Err(CoreError::DataUnavailable {
                asset,
                message: format!(
                    "Venue returned {} of {days} requested daily candles",
                    rows.len()
                ),
            });
        }

        let mut points: Vec<PricePoint> = rows
            .iter()
            .filter_map(|candle| {
                // [0] open time (ms), [4] close price (decimal string)
                let ts = candle.first()?.as_i64()?;
                let close: f64 = candle.get(4)?.as_str()?.parse().ok()?;
                let date = chrono::DateTime::from_timestamp_millis(ts)?.date_naive();
                Some(PricePoint { date, price: close })
            })
            .collect();

        if points.len() < days as usize {
            return Err(CoreError::Api {
                endpoint: "Binance /klines".into(),
                message: format!("Malformed candle rows in response for {pair}"),
            });
        }

        points.sort_by_key(|p| p.date);
        Ok(points)
    }
}

#[async_trait]
impl QuoteProvider for BinanceProvider {
    fn name(&self) -> &str {
        "Binance"
    }

    fn supported_assets(&self) -> Vec<Asset> {
        vec![Asset::Btc, Asset::Eth]
    }

    async fn fetch_quote(&self, asset: Asset) -> Result<MarketQuote, CoreError> {
        let pair = Self::pair(asset).ok_or_else(|| Self::unsupported(asset))?;
        let url = format!("{}/ticker/24hr?symbol={pair}", self.base_url);

        let resp: Ticker24hResponse = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::DataUnavailable {
                asset,
                message: CoreError::from(e).to_string(),
            })?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                endpoint: "Binance /ticker/24hr".into(),
                message: format!("Failed to parse ticker for {pair}: {e}"),
            })?;

        let price_usd: f64 = resp.last_price.parse().map_err(|e| CoreError::Api {
            endpoint: "Binance /ticker/24hr".into(),
            message: format!("Invalid price format for {pair}: {e}"),
        })?;

        let change_24h = resp
            .price_change_percent
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.0);

        Ok(MarketQuote {
            price_usd,
            change_24h,
        })
    }
}
