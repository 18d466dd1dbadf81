use futures::future;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::price::PriceQuote;
use crate::providers::registry::ProviderRegistry;
use crate::providers::traits::{FxRateProvider, MarketQuote, QuoteProvider};

/// How long a fetched quote or FX rate stays fresh. Applies to *current*
/// pricing only — the historical reconstruction path is uncached.
const CACHE_TTL: Duration = Duration::from_secs(60);

struct CacheEntry<T> {
    value: T,
    fetched_at: Instant,
}

impl<T: Copy> CacheEntry<T> {
    fn fresh(&self) -> Option<T> {
        (self.fetched_at.elapsed() < CACHE_TTL).then_some(self.value)
    }
}

/// Current prices for a set of assets, with a short fixed-TTL cache to
/// stay inside upstream rate limits.
///
/// Fixed-ILS assets answer immediately at 1 ILS per unit; market assets
/// fetch the FX rate once per batch and fan out quote fetches in parallel.
/// The first failure fails the whole batch.
pub struct PricingService {
    registry: Arc<ProviderRegistry>,
    fx: Arc<dyn FxRateProvider>,
    quote_cache: Mutex<HashMap<Asset, CacheEntry<MarketQuote>>>,
    rate_cache: Mutex<Option<CacheEntry<f64>>>,
}

impl PricingService {
    pub fn new(registry: Arc<ProviderRegistry>, fx: Arc<dyn FxRateProvider>) -> Self {
        Self {
            registry,
            fx,
            quote_cache: Mutex::new(HashMap::new()),
            rate_cache: Mutex::new(None),
        }
    }

    /// Batch current prices for `assets` (duplicates are fine).
    pub async fn all_prices(
        &self,
        assets: &[Asset],
    ) -> Result<HashMap<Asset, PriceQuote>, CoreError> {
        let mut distinct = assets.to_vec();
        distinct.sort_unstable();
        distinct.dedup();
        debug!(assets = distinct.len(), "fetching current prices");

        let mut result = HashMap::new();

        // Fixed-price assets need no lookup at all. The USD figure is
        // nominal — these holdings are ILS-denominated and never touch
        // the FX rate.
        let market: Vec<Asset> = distinct
            .iter()
            .copied()
            .filter(|asset| {
                if asset.is_fixed_ils() {
                    result.insert(
                        *asset,
                        PriceQuote {
                            ils: 1.0,
                            usd: 1.0,
                            change_24h: 0.0,
                        },
                    );
                    false
                } else {
                    true
                }
            })
            .collect();

        if !market.is_empty() {
            let rate = self.usd_to_ils().await?;

            let quotes = future::try_join_all(market.iter().map(|&asset| async move {
                let quote = self.market_quote(asset).await?;
                Ok::<_, CoreError>((asset, quote))
            }))
            .await?;

            for (asset, quote) in quotes {
                result.insert(
                    asset,
                    PriceQuote {
                        ils: (quote.price_usd * rate).round(),
                        usd: quote.price_usd,
                        change_24h: (quote.change_24h * 100.0).round() / 100.0,
                    },
                );
            }
        }

        Ok(result)
    }

    /// Current ILS price of one asset.
    pub async fn current_price(&self, asset: Asset) -> Result<f64, CoreError> {
        let prices = self.all_prices(std::slice::from_ref(&asset)).await?;
        // all_prices always answers for every requested asset or errors
        prices
            .get(&asset)
            .map(|q| q.ils)
            .ok_or_else(|| CoreError::DataUnavailable {
                asset,
                message: "No quote provider registered".into(),
            })
    }

    /// The cached USD→ILS rate, refetched once the TTL lapses.
    pub async fn usd_to_ils(&self) -> Result<f64, CoreError> {
        {
            let cache = self.rate_cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(rate) = cache.as_ref().and_then(CacheEntry::fresh) {
                return Ok(rate);
            }
        }

        let rate = self.fx.usd_to_ils().await?;

        let mut cache = self.rate_cache.lock().unwrap_or_else(|e| e.into_inner());
        *cache = Some(CacheEntry {
            value: rate,
            fetched_at: Instant::now(),
        });
        Ok(rate)
    }

    async fn market_quote(&self, asset: Asset) -> Result<MarketQuote, CoreError> {
        {
            let cache = self.quote_cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(quote) = cache.get(&asset).and_then(CacheEntry::fresh) {
                return Ok(quote);
            }
        }

        let provider =
            self.registry
                .quote_provider_for(asset)
                .ok_or_else(|| CoreError::DataUnavailable {
                    asset,
                    message: "No quote provider registered".into(),
                })?;
        let quote = provider.fetch_quote(asset).await?;

        let mut cache = self.quote_cache.lock().unwrap_or_else(|e| e.into_inner());
        cache.insert(
            asset,
            CacheEntry {
                value: quote,
                fetched_at: Instant::now(),
            },
        );
        Ok(quote)
    }
}
