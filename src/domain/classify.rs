//! Maps raw failures to user-presentable categories.
//!
//! Classification is pure and total: any [`MarketError`] maps to exactly
//! one [`ErrorCategory`]. Rules are checked in a fixed order so that a
//! signer rejection inside a network failure message still classifies as
//! a rejection. Services classify exactly once, at their public boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{ChainError, MarketError};

/// User-presentable failure category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    UserRejected,
    InsufficientFunds,
    NetworkError,
    MetadataFrozen,
    NotTokenOwner,
    ContractError,
    UnknownError,
}

impl ErrorCategory {
    /// Stable wire name of the category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserRejected => "USER_REJECTED",
            Self::InsufficientFunds => "INSUFFICIENT_FUNDS",
            Self::NetworkError => "NETWORK_ERROR",
            Self::MetadataFrozen => "METADATA_FROZEN",
            Self::NotTokenOwner => "NOT_TOKEN_OWNER",
            Self::ContractError => "CONTRACT_ERROR",
            Self::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Human-readable message shown to the user for this category.
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UserRejected => "Transaction was cancelled",
            Self::InsufficientFunds => "Insufficient funds to complete the transaction",
            Self::NetworkError => "Network error, please check your connection and try again",
            Self::MetadataFrozen => "This token's metadata is frozen and cannot be changed",
            Self::NotTokenOwner => "Only the token owner can perform this action",
            Self::ContractError => "The contract rejected the transaction",
            Self::UnknownError => "Something went wrong, please try again",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure returned by every public service operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifiedError {
    pub category: ErrorCategory,
    /// User-presentable message; a revert reason is appended when known.
    pub message: String,
    /// Underlying error display, kept for logs and diagnostics.
    pub detail: String,
}

impl ClassifiedError {
    #[must_use]
    pub fn new(category: ErrorCategory, source: &MarketError) -> Self {
        Self {
            category,
            message: category.user_message().to_string(),
            detail: source.to_string(),
        }
    }

    #[must_use]
    pub fn with_reason(mut self, reason: &str) -> Self {
        self.message = format!("{}: {reason}", self.category.user_message());
        self
    }
}

impl fmt::Display for ClassifiedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

impl std::error::Error for ClassifiedError {}

const REJECTION_PHRASES: &[&str] = &["user rejected", "user denied", "rejected the request"];

const NETWORK_PHRASES: &[&str] = &[
    "network",
    "timeout",
    "timed out",
    "connection",
    "disconnected",
    "unreachable",
];

/// EIP-1193 code for a user-rejected request.
const USER_REJECTED_CODE: i64 = 4001;

/// Classifies a raw failure into a user-presentable category.
///
/// Rule order is significant and fixed:
/// 1. signer rejection (code 4001 or a rejection phrase)
/// 2. insufficient funds
/// 3. transport and timeout failures
/// 4. `Metadata frozen` revert
/// 5. ownership failures
/// 6. any other revert or estimation failure with a known reason
/// 7. everything else
#[must_use]
pub fn classify(error: &MarketError) -> ClassifiedError {
    if is_user_rejection(error) {
        return ClassifiedError::new(ErrorCategory::UserRejected, error);
    }
    if is_insufficient_funds(error) {
        return ClassifiedError::new(ErrorCategory::InsufficientFunds, error);
    }
    if is_network_failure(error) {
        return ClassifiedError::new(ErrorCategory::NetworkError, error);
    }
    if let Some(reason) = revert_reason(error) {
        let lowered = reason.to_lowercase();
        if lowered.contains("metadata frozen") {
            return ClassifiedError::new(ErrorCategory::MetadataFrozen, error);
        }
        if lowered.contains("not token owner") || lowered.contains("not the owner") {
            return ClassifiedError::new(ErrorCategory::NotTokenOwner, error);
        }
        return ClassifiedError::new(ErrorCategory::ContractError, error).with_reason(&reason);
    }
    if matches!(error, MarketError::NotTokenOwner { .. }) {
        return ClassifiedError::new(ErrorCategory::NotTokenOwner, error);
    }
    if matches!(
        error,
        MarketError::Chain(ChainError::Reverted { .. } | ChainError::GasEstimation(_))
    ) {
        return ClassifiedError::new(ErrorCategory::ContractError, error);
    }
    ClassifiedError::new(ErrorCategory::UnknownError, error)
}

fn is_user_rejection(error: &MarketError) -> bool {
    if let MarketError::Chain(ChainError::Signer { code, message }) = error {
        if *code == Some(USER_REJECTED_CODE) {
            return true;
        }
        let lowered = message.to_lowercase();
        if REJECTION_PHRASES.iter().any(|p| lowered.contains(p)) {
            return true;
        }
    }
    let lowered = error.to_string().to_lowercase();
    REJECTION_PHRASES.iter().any(|p| lowered.contains(p))
}

fn is_insufficient_funds(error: &MarketError) -> bool {
    error.to_string().to_lowercase().contains("insufficient funds")
}

fn is_network_failure(error: &MarketError) -> bool {
    match error {
        MarketError::Chain(ChainError::Transport(_) | ChainError::Timeout(_)) => true,
        MarketError::Ledger(super::error::LedgerError::Connection(_)) => true,
        MarketError::Api(super::error::ApiError::Http(_)) => true,
        _ => {
            let lowered = error.to_string().to_lowercase();
            NETWORK_PHRASES.iter().any(|p| lowered.contains(p))
        }
    }
}

fn revert_reason(error: &MarketError) -> Option<String> {
    match error {
        MarketError::Chain(ChainError::Reverted {
            reason: Some(reason),
        }) => Some(reason.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{ApiError, LedgerError};

    fn chain(err: ChainError) -> MarketError {
        MarketError::Chain(err)
    }

    #[test]
    fn test_signer_code_4001_is_user_rejected() {
        let err = chain(ChainError::Signer {
            code: Some(4001),
            message: "User rejected the request".to_string(),
        });
        let classified = classify(&err);
        assert_eq!(classified.category, ErrorCategory::UserRejected);
        assert_eq!(classified.message, "Transaction was cancelled");
    }

    #[test]
    fn test_rejection_phrase_without_code_is_user_rejected() {
        let err = chain(ChainError::Signer {
            code: None,
            message: "MetaMask: user denied transaction signature".to_string(),
        });
        assert_eq!(classify(&err).category, ErrorCategory::UserRejected);
    }

    #[test]
    fn test_rejection_wins_over_network_phrasing() {
        // A rejection bubbled up through a provider that mentions the
        // connection must still classify as a rejection.
        let err = chain(ChainError::Signer {
            code: Some(4001),
            message: "user rejected request over network transport".to_string(),
        });
        assert_eq!(classify(&err).category, ErrorCategory::UserRejected);
    }

    #[test]
    fn test_insufficient_funds() {
        let err = chain(ChainError::Rpc {
            code: -32000,
            message: "insufficient funds for gas * price + value".to_string(),
        });
        assert_eq!(classify(&err).category, ErrorCategory::InsufficientFunds);
    }

    #[test]
    fn test_insufficient_funds_wins_over_network_phrasing() {
        let err = chain(ChainError::Rpc {
            code: -32000,
            message: "insufficient funds reported by network node".to_string(),
        });
        assert_eq!(classify(&err).category, ErrorCategory::InsufficientFunds);
    }

    #[test]
    fn test_transport_and_timeout_are_network_errors() {
        let err = chain(ChainError::Transport("connection refused".to_string()));
        assert_eq!(classify(&err).category, ErrorCategory::NetworkError);

        let err = chain(ChainError::Timeout("no receipt after 60s".to_string()));
        assert_eq!(classify(&err).category, ErrorCategory::NetworkError);

        let err = MarketError::Ledger(LedgerError::Connection("dns failure".to_string()));
        assert_eq!(classify(&err).category, ErrorCategory::NetworkError);

        let err = MarketError::Api(ApiError::Http("socket closed".to_string()));
        assert_eq!(classify(&err).category, ErrorCategory::NetworkError);
    }

    #[test]
    fn test_metadata_frozen_revert() {
        let err = chain(ChainError::Reverted {
            reason: Some("Metadata frozen".to_string()),
        });
        let classified = classify(&err);
        assert_eq!(classified.category, ErrorCategory::MetadataFrozen);
    }

    #[test]
    fn test_not_token_owner_revert() {
        let err = chain(ChainError::Reverted {
            reason: Some("Not token owner".to_string()),
        });
        assert_eq!(classify(&err).category, ErrorCategory::NotTokenOwner);
    }

    #[test]
    fn test_not_token_owner_precheck() {
        let err = MarketError::NotTokenOwner {
            token_id: "9".to_string(),
            owner: "0xaa".to_string(),
        };
        assert_eq!(classify(&err).category, ErrorCategory::NotTokenOwner);
    }

    #[test]
    fn test_revert_with_reason_is_contract_error_with_reason_appended() {
        let err = chain(ChainError::Reverted {
            reason: Some("Bid below reserve".to_string()),
        });
        let classified = classify(&err);
        assert_eq!(classified.category, ErrorCategory::ContractError);
        assert!(classified.message.contains("Bid below reserve"));
    }

    #[test]
    fn test_revert_without_reason_is_contract_error() {
        let err = chain(ChainError::Reverted { reason: None });
        let classified = classify(&err);
        assert_eq!(classified.category, ErrorCategory::ContractError);
        assert_eq!(classified.message, "The contract rejected the transaction");
    }

    #[test]
    fn test_gas_estimation_failure_is_contract_error() {
        let err = chain(ChainError::GasEstimation(
            "execution always fails".to_string(),
        ));
        assert_eq!(classify(&err).category, ErrorCategory::ContractError);
    }

    #[test]
    fn test_everything_else_is_unknown() {
        let err = MarketError::Internal("poisoned lock".to_string());
        let classified = classify(&err);
        assert_eq!(classified.category, ErrorCategory::UnknownError);
        assert_eq!(classified.message, "Something went wrong, please try again");
    }

    #[test]
    fn test_detail_preserves_source_display() {
        let err = chain(ChainError::Rpc {
            code: -32005,
            message: "rate limited".to_string(),
        });
        let classified = classify(&err);
        assert!(classified.detail.contains("-32005"));
        assert!(classified.detail.contains("rate limited"));
    }

    #[test]
    fn test_category_wire_names() {
        assert_eq!(ErrorCategory::UserRejected.as_str(), "USER_REJECTED");
        assert_eq!(
            ErrorCategory::InsufficientFunds.as_str(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(ErrorCategory::NetworkError.as_str(), "NETWORK_ERROR");
        assert_eq!(ErrorCategory::MetadataFrozen.as_str(), "METADATA_FROZEN");
        assert_eq!(ErrorCategory::NotTokenOwner.as_str(), "NOT_TOKEN_OWNER");
        assert_eq!(ErrorCategory::ContractError.as_str(), "CONTRACT_ERROR");
        assert_eq!(ErrorCategory::UnknownError.as_str(), "UNKNOWN_ERROR");
    }

    #[test]
    fn test_serde_wire_format() {
        let json = serde_json::to_string(&ErrorCategory::UserRejected).unwrap();
        assert_eq!(json, "\"USER_REJECTED\"");
        let back: ErrorCategory = serde_json::from_str("\"NETWORK_ERROR\"").unwrap();
        assert_eq!(back, ErrorCategory::NetworkError);
    }
}
