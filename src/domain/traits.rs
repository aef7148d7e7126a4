//! Domain traits defining contracts for external systems.

use async_trait::async_trait;

use alloy::primitives::{Address, Bytes, B256};
use secrecy::SecretString;
use serde_json::Value;

use super::error::{ChainError, LedgerError};
use super::types::{CallRequest, TxReceipt, UnsignedTx};

/// Chain client trait for raw node access.
///
/// Implementations speak JSON-RPC to an EVM node. Everything above this
/// trait works in typed calldata and receipts; hex encoding stays below.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Check node connectivity.
    async fn health_check(&self) -> Result<(), ChainError>;

    /// Chain id the node reports.
    async fn chain_id(&self) -> Result<u64, ChainError>;

    /// Execute a read-only call and return the raw return data.
    async fn call(&self, request: &CallRequest) -> Result<Bytes, ChainError>;

    /// Estimate gas for a call.
    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64, ChainError>;

    /// Current gas price in wei.
    async fn gas_price(&self) -> Result<u128, ChainError>;

    /// Pending-inclusive transaction count for an account.
    async fn transaction_count(&self, address: Address) -> Result<u64, ChainError>;

    /// Broadcast a signed raw transaction and return its hash.
    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, ChainError>;

    /// Fetch the receipt for a transaction if it has been mined.
    async fn transaction_receipt(&self, hash: B256) -> Result<Option<TxReceipt>, ChainError>;

    /// Poll until the transaction is mined or the configured wait expires.
    async fn wait_for_receipt(&self, hash: B256) -> Result<TxReceipt, ChainError>;
}

/// Wallet provider trait for signing.
///
/// The wallet is the only component that touches key material. Failures
/// surface as [`ChainError::Signer`]; a user declining carries the
/// EIP-1193 rejection code 4001.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Account address of the active wallet.
    fn address(&self) -> Address;

    /// Chain id the wallet signs for.
    fn chain_id(&self) -> u64;

    /// Sign a prepared transaction, returning raw bytes ready to broadcast.
    async fn sign_transaction(&self, tx: &UnsignedTx) -> Result<Bytes, ChainError>;

    /// Sign an arbitrary message, returning a hex signature string.
    async fn sign_message(&self, message: &[u8]) -> Result<String, ChainError>;
}

/// Single write in an atomic ledger batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerWrite {
    Put { path: String, value: Value },
    Delete { path: String },
}

/// Bid ledger store trait for the off-chain document store.
///
/// Paths are slash-separated document identifiers. [`commit`] applies
/// the whole batch or none of it.
///
/// [`commit`]: BidLedgerStore::commit
#[async_trait]
pub trait BidLedgerStore: Send + Sync {
    /// Fetch a document, `None` if absent.
    async fn get(&self, path: &str) -> Result<Option<Value>, LedgerError>;

    /// List every document in a collection.
    async fn list(&self, collection: &str) -> Result<Vec<Value>, LedgerError>;

    /// Delete a single document. Deleting an absent document succeeds.
    async fn delete(&self, path: &str) -> Result<(), LedgerError>;

    /// Apply a batch of writes atomically.
    async fn commit(&self, writes: &[LedgerWrite]) -> Result<(), LedgerError>;
}

/// Session store trait for the backend bearer token.
///
/// Infallible by contract: implementations are in-memory or device-local
/// storage, and a missing token is a normal state, not an error.
pub trait SessionStore: Send + Sync {
    /// Current bearer token, if signed in.
    fn token(&self) -> Option<SecretString>;

    /// Replace the stored token after a successful sign-in.
    fn store_token(&self, token: SecretString);

    /// Drop the stored token. Called on sign-out and on any 401.
    fn clear(&self);
}
