use chrono::NaiveDate;
use std::collections::HashMap;

use crate::models::asset::Asset;
use crate::models::holding::{AssetHolding, PortfolioSummary};
use crate::models::price::PriceQuote;
use crate::models::transaction::Transaction;

/// Derives holdings from the transaction log.
///
/// Pure business logic — no I/O, no API calls. Easy to test.
pub struct HoldingsService;

impl HoldingsService {
    pub fn new() -> Self {
        Self
    }

    /// How much of each asset is held on `date`: the signed sum of all
    /// transactions with effective date ≤ `date` (buys add, sells
    /// subtract). Returns only assets with strictly positive quantities.
    pub fn holdings_at(
        &self,
        transactions: &[Transaction],
        date: NaiveDate,
    ) -> HashMap<Asset, f64> {
        let today = chrono::Utc::now().date_naive();
        let mut holdings: HashMap<Asset, f64> = HashMap::new();

        for tx in transactions {
            if tx.effective_date(today) > date {
                continue; // skip future transactions
            }
            *holdings.entry(tx.asset).or_insert(0.0) += tx.signed_quantity();
        }

        holdings.retain(|_, quantity| *quantity > f64::EPSILON);
        holdings
    }

    /// Per-asset display summary at current prices.
    ///
    /// Quantity and cost totals are signed over the full log; the average
    /// price is the net ILS cost divided by the net quantity. Assets with
    /// no positive quantity, or no quote in `quotes`, are skipped.
    pub fn summarize(
        &self,
        transactions: &[Transaction],
        quotes: &HashMap<Asset, PriceQuote>,
    ) -> PortfolioSummary {
        let mut totals: HashMap<Asset, (f64, f64)> = HashMap::new();
        for tx in transactions {
            let entry = totals.entry(tx.asset).or_insert((0.0, 0.0));
            entry.0 += tx.signed_quantity();
            entry.1 += tx.signed_total_ils();
        }

        let mut holdings: Vec<AssetHolding> = totals
            .into_iter()
            .filter(|(_, (quantity, _))| *quantity > f64::EPSILON)
            .filter_map(|(asset, (quantity, total_cost))| {
                let quote = quotes.get(&asset)?;
                Some(AssetHolding {
                    asset,
                    quantity,
                    avg_price: total_cost / quantity,
                    current_price: quote.ils,
                    value_ils: quantity * quote.ils,
                    change_24h: quote.change_24h,
                })
            })
            .collect();
        holdings.sort_by_key(|h| h.asset);

        let total_ils = holdings.iter().map(|h| h.value_ils).sum();
        let change_24h = if holdings.is_empty() {
            0.0
        } else {
            holdings.iter().map(|h| h.change_24h).sum::<f64>() / holdings.len() as f64
        };

        PortfolioSummary {
            total_ils,
            change_24h,
            holdings,
        }
    }
}

impl Default for HoldingsService {
    fn default() -> Self {
        Self::new()
    }
}
