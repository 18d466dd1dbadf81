use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single price data point (date → price).
/// Series are ordered by date, monotonic non-decreasing, one point per
/// calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// Current price of one asset.
///
/// Market-priced assets carry the venue's USD price and the ILS price
/// derived through the global FX rate; fixed-ILS assets are always
/// `ils = 1.0` with a zero 24h change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Price per unit in ILS, rounded to the nearest whole unit for
    /// market-priced assets.
    pub ils: f64,

    /// Price per unit in USD, as returned by the venue.
    pub usd: f64,

    /// 24-hour change in percent, rounded to 2 decimals.
    #[serde(rename = "change24h")]
    pub change_24h: f64,
}
