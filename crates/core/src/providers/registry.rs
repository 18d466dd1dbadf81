use crate::models::asset::Asset;
use crate::models::config::Config;

use super::binance::BinanceProvider;
use super::finnhub::FinnhubProvider;
use super::fixed_ils::FixedIlsProvider;
use super::traits::{PriceHistoryProvider, QuoteProvider};

/// Registry of price data providers, routed by `Asset`.
///
/// New providers can be added without modifying existing code — the first
/// registered provider that supports an asset wins.
pub struct ProviderRegistry {
    history: Vec<Box<dyn PriceHistoryProvider>>,
    quotes: Vec<Box<dyn QuoteProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            history: Vec::new(),
            quotes: Vec::new(),
        }
    }

    /// Create a registry with all default providers pre-configured.
    pub fn new_with_defaults(config: &Config) -> Self {
        let mut registry = Self::new();

        // Binance — BTC/ETH candles and quotes, no API key needed
        registry.register_history(Box::new(BinanceProvider::new()));
        registry.register_quotes(Box::new(BinanceProvider::new()));

        // Fixed-ILS Israeli holdings — synthesized locally, no API at all
        registry.register_history(Box::new(FixedIlsProvider::new()));

        // Finnhub — SPY, requires API key
        if let Some(key) = &config.finnhub_api_key {
            registry.register_history(Box::new(FinnhubProvider::new(key.clone())));
            registry.register_quotes(Box::new(FinnhubProvider::new(key.clone())));
        }

        registry
    }

    pub fn register_history(&mut self, provider: Box<dyn PriceHistoryProvider>) {
        self.history.push(provider);
    }

    pub fn register_quotes(&mut self, provider: Box<dyn QuoteProvider>) {
        self.quotes.push(provider);
    }

    /// Find the first history provider that supports the given asset.
    pub fn history_provider_for(&self, asset: Asset) -> Option<&dyn PriceHistoryProvider> {
        self.history
            .iter()
            .find(|p| p.supported_assets().contains(&asset))
            .map(|p| p.as_ref())
    }

    /// Find the first quote provider that supports the given asset.
    pub fn quote_provider_for(&self, asset: Asset) -> Option<&dyn QuoteProvider> {
        self.quotes
            .iter()
            .find(|p| p.supported_assets().contains(&asset))
            .map(|p| p.as_ref())
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
