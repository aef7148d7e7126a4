//! HTTP adapter for the bid ledger document store.
//!
//! The store is a hosted document database with a REST surface:
//! single-document reads and writes plus an atomic batch commit
//! endpoint. Paths are slash-separated document identifiers.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::domain::{BidLedgerStore, LedgerError, LedgerWrite};

/// Configuration for the ledger store client
#[derive(Debug, Clone)]
pub struct LedgerStoreConfig {
    pub timeout: Duration,
}

impl Default for LedgerStoreConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
        }
    }
}

/// Bid ledger store over the hosted document database.
pub struct HttpLedgerStore {
    http_client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
enum WirePayload<'a> {
    Put { path: &'a str, value: &'a Value },
    Delete { path: &'a str },
}

impl HttpLedgerStore {
    /// Create a new ledger store client with custom configuration
    pub fn new(
        base_url: &str,
        api_key: Option<SecretString>,
        config: LedgerStoreConfig,
    ) -> Result<Self, LedgerError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LedgerError::Connection(e.to_string()))?;
        info!(base_url = %base_url, "Created ledger store client");
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Create a new ledger store client with default configuration
    pub fn with_defaults(base_url: &str, api_key: Option<SecretString>) -> Result<Self, LedgerError> {
        Self::new(base_url, api_key, LedgerStoreConfig::default())
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        let mut builder = self.http_client.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }
        builder
    }

    fn document_url(&self, path: &str) -> String {
        format!("{}/documents/{path}", self.base_url)
    }
}

#[async_trait]
impl BidLedgerStore for HttpLedgerStore {
    #[instrument(skip(self))]
    async fn get(&self, path: &str) -> Result<Option<Value>, LedgerError> {
        let response = self
            .request(reqwest::Method::GET, self.document_url(path))
            .send()
            .await
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(LedgerError::Query(format!(
                "GET {path} returned {}",
                response.status()
            )));
        }
        let value = response
            .json()
            .await
            .map_err(|e| LedgerError::Serialization(e.to_string()))?;
        Ok(Some(value))
    }

    #[instrument(skip(self))]
    async fn list(&self, collection: &str) -> Result<Vec<Value>, LedgerError> {
        let url = format!("{}/collections/{collection}", self.base_url);
        let response = self
            .request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if !response.status().is_success() {
            return Err(LedgerError::Query(format!(
                "LIST {collection} returned {}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| LedgerError::Serialization(e.to_string()))
    }

    #[instrument(skip(self))]
    async fn delete(&self, path: &str) -> Result<(), LedgerError> {
        let response = self
            .request(reqwest::Method::DELETE, self.document_url(path))
            .send()
            .await
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        // Deleting an absent document is a no-op.
        if response.status() == StatusCode::NOT_FOUND || response.status().is_success() {
            return Ok(());
        }
        Err(LedgerError::Query(format!(
            "DELETE {path} returned {}",
            response.status()
        )))
    }

    #[instrument(skip(self, writes), fields(writes = writes.len()))]
    async fn commit(&self, writes: &[LedgerWrite]) -> Result<(), LedgerError> {
        let payload: Vec<WirePayload<'_>> = writes
            .iter()
            .map(|w| match w {
                LedgerWrite::Put { path, value } => WirePayload::Put { path, value },
                LedgerWrite::Delete { path } => WirePayload::Delete { path },
            })
            .collect();

        let response = self
            .request(reqwest::Method::POST, format!("{}/commit", self.base_url))
            .json(&serde_json::json!({ "writes": payload }))
            .send()
            .await
            .map_err(|e| LedgerError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::Commit(format!("{status}: {body}")));
        }
        debug!("Batch committed");
        Ok(())
    }
}
