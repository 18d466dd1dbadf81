use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::price::PricePoint;

/// Trait abstraction for daily price history sources.
///
/// Each upstream (Binance candles, Finnhub-seeded synthesis, the fixed-ILS
/// rule) implements this trait. If a venue stops working or changes, we
/// replace only that one implementation — the rest of the codebase is
/// untouched.
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Which assets this provider can handle.
    fn supported_assets(&self) -> Vec<Asset>;

    /// One closing price per calendar day, exactly `days` points ending
    /// today, ascending. Providers with no record for the full window fail
    /// with `DataUnavailable` rather than padding with guesses.
    async fn fetch_daily_history(
        &self,
        asset: Asset,
        days: u32,
    ) -> Result<Vec<PricePoint>, CoreError>;
}

/// A current market quote: latest USD price and 24h change in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarketQuote {
    pub price_usd: f64,
    pub change_24h: f64,
}

/// Trait abstraction for current-price quote sources (market assets only;
/// fixed-ILS assets never reach a quote provider).
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &str;

    fn supported_assets(&self) -> Vec<Asset>;

    async fn fetch_quote(&self, asset: Asset) -> Result<MarketQuote, CoreError>;
}

/// Trait abstraction for the current USD→ILS conversion rate.
///
/// A single global rate: callers apply it uniformly to every historical
/// day. The missing historical FX series is a known, documented
/// approximation of this system.
#[async_trait]
pub trait FxRateProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Current units-of-ILS-per-USD. Fails with `RateUnavailable` if the
    /// upstream source is unreachable or the expected field is absent.
    async fn usd_to_ils(&self) -> Result<f64, CoreError>;
}
