use thiserror::Error;

use crate::models::asset::Asset;

/// Unified error type for the entire portfolio-tracker-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Price data ──────────────────────────────────────────────────
    #[error("No price history for {asset} over the requested window: {message}")]
    DataUnavailable { asset: Asset, message: String },

    #[error("USD→ILS rate unavailable: {0}")]
    RateUnavailable(String),

    /// Wraps the first underlying failure during the valuation fan-out.
    /// Terminal for the whole request — there is no partial result.
    #[error("Portfolio valuation failed")]
    ValuationFailed(#[source] Box<CoreError>),

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({endpoint}): {message}")]
    Api {
        endpoint: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Business logic ──────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs to prevent
        // API key leakage. reqwest errors often contain full URLs with secrets.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
