//! Marketplace backend API client.
//!
//! The backend keeps off-chain catalog data (products, profiles) and
//! authenticates wallets with a sign-this-nonce challenge. Any 401
//! invalidates the stored session before the error is surfaced, so the
//! next request starts from a signed-out state.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::domain::{
    ApiError, NewProductRecord, ProductRecord, ProfileRecord, SessionStore, WalletProvider,
};

/// Configuration for the backend client
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
        }
    }
}

/// In-process session store holding the bearer token in memory.
#[derive(Default)]
pub struct MemorySessionStore {
    token: std::sync::RwLock<Option<SecretString>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<SecretString> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn store_token(&self, token: SecretString) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token);
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }
}

/// Client for the marketplace backend REST API.
pub struct BackendClient {
    http_client: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

#[derive(Debug, Deserialize)]
struct NonceResponse {
    nonce: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

impl BackendClient {
    /// Create a new backend client with custom configuration
    pub fn new(
        base_url: &str,
        session: Arc<dyn SessionStore>,
        config: BackendConfig,
    ) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ApiError::Http(e.to_string()))?;
        info!(base_url = %base_url, "Created backend client");
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Create a new backend client with default configuration
    pub fn with_defaults(base_url: &str, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        Self::new(base_url, session, BackendConfig::default())
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.session.token() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    async fn send_json<T: for<'de> Deserialize<'de>>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.session.clear();
            return Err(ApiError::Unauthorized);
        }
        if !response.status().is_success() {
            let code = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { code, message });
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Sign in with the active wallet via the nonce challenge.
    ///
    /// On success the bearer token is stored in the session and used by
    /// every subsequent authenticated request.
    #[instrument(skip(self, wallet))]
    pub async fn sign_in(&self, wallet: &dyn WalletProvider) -> Result<(), ApiError> {
        let address = format!("{:#x}", wallet.address());

        let nonce: NonceResponse = self
            .send_json(
                self.http_client
                    .get(format!("{}/auth/nonce", self.base_url))
                    .query(&[("address", address.as_str())]),
            )
            .await?;

        let signature = wallet
            .sign_message(nonce.nonce.as_bytes())
            .await
            .map_err(|e| ApiError::Http(e.to_string()))?;

        let token: TokenResponse = self
            .send_json(
                self.http_client
                    .post(format!("{}/auth/verify", self.base_url))
                    .json(&json!({ "address": address, "signature": signature })),
            )
            .await?;

        self.session.store_token(SecretString::from(token.token));
        info!(address = %address, "Signed in");
        Ok(())
    }

    /// Fetch a product by its backend id.
    #[instrument(skip(self))]
    pub async fn product(&self, id: &str) -> Result<ProductRecord, ApiError> {
        self.send_json(
            self.authed(
                self.http_client
                    .get(format!("{}/products/{id}", self.base_url)),
            ),
        )
        .await
    }

    /// Register a freshly minted token as a product.
    #[instrument(skip(self, record))]
    pub async fn create_product(
        &self,
        record: &NewProductRecord,
    ) -> Result<ProductRecord, ApiError> {
        self.send_json(
            self.authed(
                self.http_client
                    .post(format!("{}/products", self.base_url))
                    .json(record),
            ),
        )
        .await
    }

    /// Fetch the profile for a wallet address.
    #[instrument(skip(self))]
    pub async fn profile(&self, address: &str) -> Result<ProfileRecord, ApiError> {
        self.send_json(
            self.authed(
                self.http_client
                    .get(format!("{}/profiles/{address}", self.base_url)),
            ),
        )
        .await
    }
}
