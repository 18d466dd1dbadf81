pub mod registry;
pub mod traits;

// External data source implementations
pub mod binance;
pub mod exchange_rate;
pub mod finnhub;
pub mod fixed_ils;

use chrono::{Duration, NaiveDate};

/// The trailing `days` calendar days ending at `today`, ascending.
/// Every history provider synthesizes or aligns to exactly this window.
pub(crate) fn trailing_dates(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    (0..days)
        .map(|i| today - Duration::days(i64::from(days - 1 - i)))
        .collect()
}
