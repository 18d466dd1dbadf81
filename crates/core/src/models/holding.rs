use serde::{Deserialize, Serialize};

use super::asset::Asset;

/// Per-asset summary of what the user currently owns, priced for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetHolding {
    pub asset: Asset,

    /// Net quantity held (signed replay of all transactions)
    pub quantity: f64,

    /// Average ILS cost per unit: signed cost total / net quantity
    #[serde(rename = "avgPrice")]
    pub avg_price: f64,

    /// Current price per unit in ILS
    #[serde(rename = "currentPrice")]
    pub current_price: f64,

    /// quantity × current price
    #[serde(rename = "valueILS")]
    pub value_ils: f64,

    #[serde(rename = "change24h")]
    pub change_24h: f64,
}

/// Roll-up of the whole portfolio at current prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Total current value in ILS
    #[serde(rename = "totalILS")]
    pub total_ils: f64,

    /// Mean 24h change across held assets, in percent
    #[serde(rename = "change24h")]
    pub change_24h: f64,

    pub holdings: Vec<AssetHolding>,
}
