use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How an asset is valued.
/// Determines whether a price provider is consulted and in which currency
/// the resulting price is denominated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValuationClass {
    /// Price fetched from an external quote source, denominated in USD.
    MarketUsd,
    /// Price defined to be exactly 1 ILS per unit — no external lookup,
    /// never touches the FX rate.
    FixedIls,
}

/// The fixed set of instruments the tracker knows about.
///
/// Market-priced assets (BTC, ETH, SPY) are quoted in USD by external
/// venues; the Israeli holdings (Nadlan, Pension, Hishtalmut) are
/// ILS-denominated at a fixed 1 ILS per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Asset {
    #[serde(rename = "BTC")]
    Btc,
    #[serde(rename = "ETH")]
    Eth,
    #[serde(rename = "SPY")]
    Spy,
    Nadlan,
    Pension,
    Hishtalmut,
}

impl Asset {
    /// All known assets, in display order.
    pub const ALL: [Asset; 6] = [
        Asset::Btc,
        Asset::Eth,
        Asset::Spy,
        Asset::Nadlan,
        Asset::Pension,
        Asset::Hishtalmut,
    ];

    pub fn valuation_class(&self) -> ValuationClass {
        match self {
            Asset::Btc | Asset::Eth | Asset::Spy => ValuationClass::MarketUsd,
            Asset::Nadlan | Asset::Pension | Asset::Hishtalmut => ValuationClass::FixedIls,
        }
    }

    /// True for the Israeli holdings valued at a fixed 1 ILS per unit.
    pub fn is_fixed_ils(&self) -> bool {
        self.valuation_class() == ValuationClass::FixedIls
    }

    /// Ticker-style symbol, as used on the wire (e.g., "BTC", "Nadlan").
    pub fn symbol(&self) -> &'static str {
        match self {
            Asset::Btc => "BTC",
            Asset::Eth => "ETH",
            Asset::Spy => "SPY",
            Asset::Nadlan => "Nadlan",
            Asset::Pension => "Pension",
            Asset::Hishtalmut => "Hishtalmut",
        }
    }

    /// Human-readable name for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            Asset::Btc => "Bitcoin (BTC)",
            Asset::Eth => "Ethereum (ETH)",
            Asset::Spy => "S&P 500 (SPY)",
            Asset::Nadlan => "Nadlan",
            Asset::Pension => "Pension",
            Asset::Hishtalmut => "Hishtalmut",
        }
    }

    /// Longer description for tooltips/context.
    pub fn description(&self) -> &'static str {
        match self {
            Asset::Btc => "Bitcoin - Leading cryptocurrency",
            Asset::Eth => "Ethereum - Smart contract platform",
            Asset::Spy => "SPDR S&P 500 ETF Trust - Tracks S&P 500 index",
            Asset::Nadlan => "Nadlan - locked in haifa apartment",
            Asset::Pension => "Pension - Israeli pension fund",
            Asset::Hishtalmut => "Hishtalmut - Israeli keren hishtalmut fund",
        }
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Asset {
    type Err = String;

    /// Case-insensitive symbol parsing (CSV import accepts "btc", "BTC", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BTC" => Ok(Asset::Btc),
            "ETH" => Ok(Asset::Eth),
            "SPY" => Ok(Asset::Spy),
            "NADLAN" => Ok(Asset::Nadlan),
            "PENSION" => Ok(Asset::Pension),
            "HISHTALMUT" => Ok(Asset::Hishtalmut),
            other => Err(format!("Unknown asset: {other}")),
        }
    }
}
