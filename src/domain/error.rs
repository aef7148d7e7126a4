//! Application error types with proper error chaining.

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ChainError {
    #[error("Connection failed: {0}")]
    Transport(String),
    #[error("Timeout waiting for confirmation: {0}")]
    Timeout(String),
    #[error("RPC call failed ({code}): {message}")]
    Rpc { code: i64, message: String },
    #[error("Transaction reverted{}", reason.as_ref().map(|r| format!(": {r}")).unwrap_or_default())]
    Reverted { reason: Option<String> },
    #[error("Gas estimation failed: {0}")]
    GasEstimation(String),
    #[error("Signing failed{}: {message}", code.map(|c| format!(" ({c})")).unwrap_or_default())]
    Signer { code: Option<i64>, message: String },
    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug, Clone)]
pub enum LedgerError {
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Commit failed: {0}")]
    Commit(String),
    #[error("Query failed: {0}")]
    Query(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

#[derive(Error, Debug, Clone)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Unexpected status {code}: {message}")]
    Status { code: u16, message: String },
    #[error("Response decoding failed: {0}")]
    Decode(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },
    #[error("Validation failed: {0}")]
    Multiple(String),
}

impl From<&str> for ValidationError {
    fn from(s: &str) -> Self {
        ValidationError::Multiple(s.to_string())
    }
}

#[derive(Error, Debug, Clone)]
pub enum MarketError {
    #[error(transparent)]
    Chain(#[from] ChainError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Not token owner: token {token_id} is owned by {owner}")]
    NotTokenOwner { token_id: String, owner: String },
    #[error("Invalid amount '{value}': {message}")]
    InvalidAmount { value: String, message: String },
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for MarketError {
    fn from(err: serde_json::Error) -> Self {
        MarketError::Serialization(err.to_string())
    }
}

impl From<validator::ValidationErrors> for MarketError {
    fn from(err: validator::ValidationErrors) -> Self {
        MarketError::Validation(ValidationError::Multiple(err.to_string()))
    }
}
