use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::CoreError;

use super::asset::Asset;

/// Type of transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Buying / acquiring an asset
    Buy,
    /// Selling / disposing of an asset
    Sell,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Buy => write!(f, "buy"),
            TransactionType::Sell => write!(f, "sell"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buy" => Ok(TransactionType::Buy),
            "sell" => Ok(TransactionType::Sell),
            other => Err(format!("Unknown transaction type: {other}")),
        }
    }
}

/// The sentinel transaction date: the date epoch (1970-01-01), written as
/// the literal `"0"` on the wire. Resolves to "today" wherever an effective
/// date is needed, never to an ancient date.
pub fn sentinel_date() -> NaiveDate {
    NaiveDate::default()
}

/// A single buy/sell record, owned by a user.
///
/// Immutable once created; changes go through the persistence collaborator.
/// `quantity` and `total_ils` are always positive — the sign of the effect
/// on holdings comes from `tx_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Server-assigned unique identifier
    pub id: Uuid,

    /// Owning user
    #[serde(rename = "userId")]
    pub user_id: Uuid,

    /// Calendar day of the transaction (sentinel `"0"` → today)
    #[serde(with = "tx_date")]
    pub date: NaiveDate,

    pub asset: Asset,

    #[serde(rename = "type")]
    pub tx_type: TransactionType,

    /// Amount of the asset (always positive)
    pub quantity: f64,

    /// Total paid/received in ILS (always positive)
    #[serde(rename = "totalILS")]
    pub total_ils: f64,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// The date this transaction takes effect on holdings.
    /// The sentinel date resolves to `today`; any other date is literal.
    pub fn effective_date(&self, today: NaiveDate) -> NaiveDate {
        if self.date == sentinel_date() {
            today
        } else {
            self.date
        }
    }

    /// Signed effect on the held quantity: buys add, sells subtract.
    pub fn signed_quantity(&self) -> f64 {
        match self.tx_type {
            TransactionType::Buy => self.quantity,
            TransactionType::Sell => -self.quantity,
        }
    }

    /// Signed effect on the ILS cost basis.
    pub fn signed_total_ils(&self) -> f64 {
        match self.tx_type {
            TransactionType::Buy => self.total_ils,
            TransactionType::Sell => -self.total_ils,
        }
    }
}

/// Input for creating a transaction through the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionInput {
    #[serde(with = "tx_date")]
    pub date: NaiveDate,
    pub asset: Asset,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub quantity: f64,
    #[serde(rename = "totalILS")]
    pub total_ils: f64,
}

impl CreateTransactionInput {
    /// Validate the required-field constraints before sending.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.quantity <= 0.0 || !self.quantity.is_finite() {
            return Err(CoreError::Validation(
                "Transaction quantity must be positive".into(),
            ));
        }
        if self.total_ils <= 0.0 || !self.total_ils.is_finite() {
            return Err(CoreError::Validation(
                "Transaction total ILS must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Partial update: any subset of the mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTransactionInput {
    #[serde(with = "tx_date_opt", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(rename = "totalILS", default, skip_serializing_if = "Option::is_none")]
    pub total_ils: Option<f64>,
}

/// Serde helpers for the transaction date wire format: `YYYY-MM-DD`, with
/// the literal `"0"` standing for the sentinel (epoch) date.
mod tx_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(s: &str) -> Option<NaiveDate> {
        if s == "0" {
            return Some(super::sentinel_date());
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
    }

    pub fn serialize<S: Serializer>(date: &NaiveDate, ser: S) -> Result<S::Ok, S::Error> {
        if *date == super::sentinel_date() {
            ser.serialize_str("0")
        } else {
            ser.serialize_str(&date.format("%Y-%m-%d").to_string())
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDate, D::Error> {
        let s = String::deserialize(de)?;
        parse(&s).ok_or_else(|| {
            serde::de::Error::custom(format!("Invalid transaction date: {s}"))
        })
    }
}

mod tx_date_opt {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, ser: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => super::tx_date::serialize(d, ser),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<NaiveDate>, D::Error> {
        let s = Option::<String>::deserialize(de)?;
        match s {
            None => Ok(None),
            Some(s) => super::tx_date::parse(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("Invalid transaction date: {s}"))),
        }
    }
}

pub(crate) use tx_date::parse as parse_tx_date;
