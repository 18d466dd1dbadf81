use chrono::NaiveDate;
use futures::future;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::chart::PortfolioValuePoint;
use crate::models::transaction::Transaction;
use crate::providers::registry::ProviderRegistry;
use crate::providers::traits::{FxRateProvider, PriceHistoryProvider};
use crate::providers::trailing_dates;

/// Minimum reconstructed window, even for a brand-new portfolio.
const MIN_WINDOW_DAYS: i64 = 30;

/// Maximum reconstructed window — caps API cost and chart density.
const MAX_WINDOW_DAYS: i64 = 365;

/// Replays the transaction log against per-asset daily price series to
/// reconstruct portfolio value over time, in ILS.
///
/// Collaborators are injected at construction so the engine can be tested
/// against fake providers with no network involved.
///
/// Mixed-currency accumulation uses one global USD→ILS rate applied
/// uniformly to every historical day. The missing historical FX series is
/// a known accuracy gap, kept deliberately.
pub struct ValuationService {
    registry: Arc<ProviderRegistry>,
    fx: Arc<dyn FxRateProvider>,
}

impl ValuationService {
    pub fn new(registry: Arc<ProviderRegistry>, fx: Arc<dyn FxRateProvider>) -> Self {
        Self { registry, fx }
    }

    /// Reconstruct the daily portfolio value over the clamped 30–365 day
    /// window starting at the earliest transaction.
    ///
    /// The input list may be unordered — the engine sorts internally.
    /// An empty list yields an empty series immediately: no provider
    /// calls, no error. Any provider failure aborts the whole computation
    /// (no partial results) and surfaces as `ValuationFailed` wrapping the
    /// first underlying error.
    pub async fn portfolio_history(
        &self,
        transactions: &[Transaction],
    ) -> Result<Vec<PortfolioValuePoint>, CoreError> {
        if transactions.is_empty() {
            return Ok(Vec::new());
        }

        let today = chrono::Utc::now().date_naive();
        let days = Self::window_days(transactions, today);
        info!(
            transactions = transactions.len(),
            days, "calculating historical portfolio value"
        );

        // Distinct assets, in stable order
        let mut assets: Vec<Asset> = transactions.iter().map(|t| t.asset).collect();
        assets.sort_unstable();
        assets.dedup();

        // Resolve providers before the fan-out so a missing registration
        // fails the same way any provider error does.
        let mut fetches = Vec::with_capacity(assets.len());
        for &asset in &assets {
            let provider = self.registry.history_provider_for(asset).ok_or_else(|| {
                CoreError::ValuationFailed(Box::new(CoreError::DataUnavailable {
                    asset,
                    message: "No price provider registered".into(),
                }))
            })?;
            fetches.push(async move {
                let series = provider.fetch_daily_history(asset, days).await?;
                Ok::<_, CoreError>((asset, series))
            });
        }

        // Fan-out/fan-in: per-asset histories and the FX rate have no
        // dependency on each other; the first failure aborts everything.
        let (all_series, fx_rate) = future::try_join(
            future::try_join_all(fetches),
            self.fx.usd_to_ils(),
        )
        .await
        .map_err(|e| CoreError::ValuationFailed(Box::new(e)))?;
        debug!(fx_rate, "holding FX rate constant across the window");

        let prices: HashMap<Asset, HashMap<NaiveDate, f64>> = all_series
            .into_iter()
            .map(|(asset, series)| {
                (
                    asset,
                    series.into_iter().map(|p| (p.date, p.price)).collect(),
                )
            })
            .collect();

        Ok(Self::replay(transactions, &prices, fx_rate, today, days))
    }

    /// Window length in days: from the earliest effective transaction date
    /// through today, clamped to [30, 365].
    fn window_days(transactions: &[Transaction], today: NaiveDate) -> u32 {
        let earliest = transactions
            .iter()
            .map(|t| t.effective_date(today))
            .min()
            .unwrap_or(today);
        ((today - earliest).num_days() + 1).clamp(MIN_WINDOW_DAYS, MAX_WINDOW_DAYS) as u32
    }

    /// Per-date replay over one canonical calendar axis (the last `days`
    /// days ending today). Incremental: O(days + transactions) rather than
    /// O(days × transactions).
    fn replay(
        transactions: &[Transaction],
        prices: &HashMap<Asset, HashMap<NaiveDate, f64>>,
        fx_rate: f64,
        today: NaiveDate,
        days: u32,
    ) -> Vec<PortfolioValuePoint> {
        let mut sorted: Vec<&Transaction> = transactions.iter().collect();
        sorted.sort_by_key(|t| t.effective_date(today));

        let mut holdings: HashMap<Asset, f64> = HashMap::new();
        let mut next_tx = 0;

        let axis = trailing_dates(today, days);
        let mut points = Vec::with_capacity(axis.len());

        for date in axis {
            // Fold every transaction that takes effect on or before this
            // date. Raw signed quantities are kept so a later buy can
            // offset an earlier oversell.
            while next_tx < sorted.len() && sorted[next_tx].effective_date(today) <= date {
                let tx = sorted[next_tx];
                *holdings.entry(tx.asset).or_insert(0.0) += tx.signed_quantity();
                next_tx += 1;
            }

            // Two running totals: fixed-ILS assets price as-is, market
            // assets accumulate in USD and convert once at the end.
            let mut ils_value = 0.0;
            let mut usd_value = 0.0;

            for (&asset, &quantity) in &holdings {
                // Inconsistent logs can drive a snapshot negative; such
                // holdings contribute zero, never negative value.
                if quantity <= f64::EPSILON {
                    continue;
                }
                // Exact date match only — a missing point means this asset
                // contributes nothing to this date, no interpolation.
                let Some(price) = prices.get(&asset).and_then(|series| series.get(&date))
                else {
                    continue;
                };
                if asset.is_fixed_ils() {
                    ils_value += quantity * price;
                } else {
                    usd_value += quantity * price;
                }
            }

            // Rounding happens only here, at the final per-date total.
            let total_ils = (ils_value + usd_value * fx_rate).round() as i64;
            points.push(PortfolioValuePoint {
                date,
                label: date.format("%b %-d").to_string(),
                total_ils,
            });
        }

        info!(points = points.len(), "generated portfolio history");
        points
    }
}
