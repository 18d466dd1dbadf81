use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of reconstructed portfolio value, ready for chart rendering.
///
/// The core computes all the numbers — the frontend only renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuePoint {
    /// The calendar day this point covers
    pub date: NaiveDate,

    /// Humanized short label for chart axes (e.g., "Jan 5")
    pub label: String,

    /// Total portfolio value in ILS, rounded to the nearest whole unit
    #[serde(rename = "totalILS")]
    pub total_ils: i64,
}
