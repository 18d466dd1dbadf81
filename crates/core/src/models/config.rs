/// Runtime configuration for the tracker's external collaborators.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the transaction persistence API.
    pub api_base_url: String,

    /// Finnhub API key. Without it, no SPY quote/history provider is
    /// registered and SPY valuations fail with `DataUnavailable`.
    pub finnhub_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.example.com".to_string(),
            finnhub_api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to
    /// defaults: `PORTFOLIO_API_BASE_URL`, `FINNHUB_API_KEY`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: std::env::var("PORTFOLIO_API_BASE_URL")
                .unwrap_or(defaults.api_base_url),
            finnhub_api_key: std::env::var("FINNHUB_API_KEY").ok(),
        }
    }
}
