pub mod api;
pub mod errors;
pub mod import;
pub mod models;
pub mod providers;
pub mod services;

use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use api::client::ApiClient;
use api::identity::IdentityProvider;
use errors::CoreError;
use models::{
    asset::Asset,
    chart::PortfolioValuePoint,
    config::Config,
    holding::{AssetHolding, PortfolioSummary},
    transaction::{CreateTransactionInput, Transaction, UpdateTransactionInput},
};
use providers::exchange_rate::OpenErApiProvider;
use providers::registry::ProviderRegistry;
use providers::traits::FxRateProvider;
use services::{
    holdings_service::HoldingsService, pricing_service::PricingService,
    valuation_service::ValuationService,
};

/// Main entry point for the Portfolio Tracker core library.
///
/// Built from explicitly injected collaborators — the persistence client,
/// the price provider registry, and the FX rate source — so every layer
/// can be exercised against fakes. There is no ambient global state.
#[must_use]
pub struct PortfolioTracker {
    api: ApiClient,
    holdings_service: HoldingsService,
    pricing_service: PricingService,
    valuation_service: ValuationService,
}

impl PortfolioTracker {
    /// Wire up the default collaborators from configuration.
    pub fn new(config: Config, identity: Arc<dyn IdentityProvider>) -> Self {
        let registry = Arc::new(ProviderRegistry::new_with_defaults(&config));
        let fx: Arc<dyn FxRateProvider> = Arc::new(OpenErApiProvider::new());
        let client = ApiClient::new(&config, identity);
        Self::with_collaborators(client, registry, fx)
    }

    /// Construct from explicit collaborators (tests inject fakes here).
    pub fn with_collaborators(
        api: ApiClient,
        registry: Arc<ProviderRegistry>,
        fx: Arc<dyn FxRateProvider>,
    ) -> Self {
        Self {
            api,
            holdings_service: HoldingsService::new(),
            pricing_service: PricingService::new(Arc::clone(&registry), Arc::clone(&fx)),
            valuation_service: ValuationService::new(registry, fx),
        }
    }

    // ── Transactions ────────────────────────────────────────────────

    /// All of the user's transactions, as stored by the persistence
    /// service.
    pub async fn transactions(&self) -> Result<Vec<Transaction>, CoreError> {
        self.api.list_transactions().await
    }

    /// Record a buy/sell transaction.
    pub async fn add_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> Result<Transaction, CoreError> {
        self.api.create_transaction(&input).await
    }

    /// Apply a partial update to an existing transaction.
    pub async fn update_transaction(
        &self,
        id: Uuid,
        patch: UpdateTransactionInput,
    ) -> Result<Transaction, CoreError> {
        self.api.update_transaction(id, &patch).await
    }

    /// Delete a transaction by its id.
    pub async fn remove_transaction(&self, id: Uuid) -> Result<(), CoreError> {
        self.api.delete_transaction(id).await
    }

    // ── Holdings & value ────────────────────────────────────────────

    /// Net quantity of each asset held on `date`.
    pub async fn holdings_at(&self, date: NaiveDate) -> Result<HashMap<Asset, f64>, CoreError> {
        let transactions = self.api.list_transactions().await?;
        Ok(self.holdings_service.holdings_at(&transactions, date))
    }

    /// Per-asset holdings priced at current quotes.
    pub async fn holdings(&self) -> Result<Vec<AssetHolding>, CoreError> {
        Ok(self.summary().await?.holdings)
    }

    /// Current total value and 24h change, with the per-asset breakdown.
    pub async fn summary(&self) -> Result<PortfolioSummary, CoreError> {
        let transactions = self.api.list_transactions().await?;
        let assets: Vec<Asset> = transactions.iter().map(|t| t.asset).collect();
        let quotes = self.pricing_service.all_prices(&assets).await?;
        Ok(self.holdings_service.summarize(&transactions, &quotes))
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Reconstructed daily portfolio value over the 30–365 day window.
    pub async fn portfolio_history(&self) -> Result<Vec<PortfolioValuePoint>, CoreError> {
        let transactions = self.api.list_transactions().await?;
        self.valuation_service.portfolio_history(&transactions).await
    }

    // ── Import ──────────────────────────────────────────────────────

    /// Import transactions from CSV text. Malformed rows are filtered out
    /// silently during parsing; rows the server rejects are skipped with a
    /// warning. Returns the transactions actually created.
    pub async fn import_csv(&self, csv: &str) -> Result<Vec<Transaction>, CoreError> {
        let mut imported = Vec::new();
        for input in import::parse_transactions_csv(csv) {
            match self.api.create_transaction(&input).await {
                Ok(tx) => imported.push(tx),
                Err(e) => warn!(error = %e, "skipping CSV row rejected by the server"),
            }
        }
        Ok(imported)
    }
}
