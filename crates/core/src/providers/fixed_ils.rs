use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::price::PricePoint;

use super::traits::PriceHistoryProvider;

/// Price source for the Israeli holdings (Nadlan, Pension, Hishtalmut).
///
/// These assets are defined to be worth exactly 1 ILS per unit, so the
/// "history" is synthesized locally: `days` consecutive points ending
/// today, each at 1.0. No network call, no FX involvement.
pub struct FixedIlsProvider;

impl FixedIlsProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FixedIlsProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PriceHistoryProvider for FixedIlsProvider {
    fn name(&self) -> &str {
        "FixedILS"
    }

    fn supported_assets(&self) -> Vec<Asset> {
        vec![Asset::Nadlan, Asset::Pension, Asset::Hishtalmut]
    }

    async fn fetch_daily_history(
        &self,
        _asset: Asset,
        days: u32,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let today = chrono::Utc::now().date_naive();
        Ok(super::trailing_dates(today, days)
            .into_iter()
            .map(|date| PricePoint { date, price: 1.0 })
            .collect())
    }
}
