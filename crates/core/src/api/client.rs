use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::config::Config;
use crate::models::transaction::{CreateTransactionInput, Transaction, UpdateTransactionInput};

use super::identity::IdentityProvider;

/// HTTP client for the transaction persistence service.
///
/// CRUD over a `/transactions` resource scoped to the authenticated user;
/// the bearer credential comes from the injected identity collaborator.
pub struct ApiClient {
    client: Client,
    base_url: String,
    identity: Arc<dyn IdentityProvider>,
}

/// Error envelope the persistence service returns on non-2xx responses.
#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::with_base_url(config.api_base_url.clone(), identity)
    }

    pub fn with_base_url(base_url: impl Into<String>, identity: Arc<dyn IdentityProvider>) -> Self {
        let builder = Client::builder().timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into(),
            identity,
        }
    }

    /// List the user's transactions, newest first (server ordering).
    pub async fn list_transactions(&self) -> Result<Vec<Transaction>, CoreError> {
        let resp = self.request(Method::GET, "/transactions").send().await?;
        Self::read_json(resp, "/transactions").await
    }

    /// Create a transaction; the server assigns the id and timestamps.
    pub async fn create_transaction(
        &self,
        input: &CreateTransactionInput,
    ) -> Result<Transaction, CoreError> {
        input.validate()?;
        let resp = self
            .request(Method::POST, "/transactions")
            .json(input)
            .send()
            .await?;
        Self::read_json(resp, "/transactions").await
    }

    /// Partially update a transaction: any subset of the mutable fields.
    pub async fn update_transaction(
        &self,
        id: Uuid,
        patch: &UpdateTransactionInput,
    ) -> Result<Transaction, CoreError> {
        let endpoint = format!("/transactions/{id}");
        let resp = self
            .request(Method::PUT, &endpoint)
            .json(patch)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(CoreError::TransactionNotFound(id.to_string()));
        }
        Self::read_json(resp, &endpoint).await
    }

    /// Delete a transaction by id.
    pub async fn delete_transaction(&self, id: Uuid) -> Result<(), CoreError> {
        let endpoint = format!("/transactions/{id}");
        let resp = self.request(Method::DELETE, &endpoint).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(CoreError::TransactionNotFound(id.to_string()));
        }
        Self::check_status(resp, &endpoint).await?;
        Ok(())
    }

    // ── Internal ────────────────────────────────────────────────────

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        debug!(%method, endpoint, "persistence request");
        let mut builder = self
            .client
            .request(method, format!("{}{endpoint}", self.base_url));
        if let Some(token) = self.identity.id_token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
        endpoint: &str,
    ) -> Result<T, CoreError> {
        let resp = Self::check_status(resp, endpoint).await?;
        resp.json().await.map_err(|e| CoreError::Api {
            endpoint: endpoint.to_string(),
            message: format!("Failed to parse response: {e}"),
        })
    }

    /// Turn a non-2xx response into an `Api` error carrying the server's
    /// `{"error": …}` message when one is present.
    async fn check_status(
        resp: reqwest::Response,
        endpoint: &str,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(|e| e.error)
            .unwrap_or_else(|| format!("HTTP {status}"));
        Err(CoreError::Api {
            endpoint: endpoint.to_string(),
            message,
        })
    }
}
