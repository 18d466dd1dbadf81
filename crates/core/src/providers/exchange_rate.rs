use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;

use super::traits::FxRateProvider;

const BASE_URL: &str = "https://open.er-api.com/v6";

/// open.er-api.com provider for the USD→ILS conversion rate.
///
/// - **Free**: no API key required.
/// - **Endpoint**: `/latest/USD`, reading the `rates.ILS` field.
pub struct OpenErApiProvider {
    client: Client,
    base_url: String,
}

impl OpenErApiProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the provider at a different endpoint (used by tests).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
        }
    }
}

impl Default for OpenErApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── open.er-api.com response types ──────────────────────────────────

#[derive(Deserialize)]
struct LatestRatesResponse {
    rates: Option<HashMap<String, f64>>,
}

#[async_trait]
impl FxRateProvider for OpenErApiProvider {
    fn name(&self) -> &str {
        "open.er-api.com"
    }

    async fn usd_to_ils(&self) -> Result<f64, CoreError> {
        let url = format!("{}/latest/USD", self.base_url);

        let resp: LatestRatesResponse = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::RateUnavailable(CoreError::from(e).to_string()))?
            .json()
            .await
            .map_err(|e| {
                CoreError::RateUnavailable(format!("Failed to parse rate response: {e}"))
            })?;

        let rate = resp
            .rates
            .as_ref()
            .and_then(|rates| rates.get("ILS"))
            .copied()
            .ok_or_else(|| CoreError::RateUnavailable("ILS rate not found".into()))?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(CoreError::RateUnavailable(format!(
                "Invalid ILS rate: {rate}"
            )));
        }

        debug!(rate, "fetched USD→ILS rate");
        Ok(rate)
    }
}
