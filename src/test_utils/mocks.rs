//! Mock implementations for testing.
//!
//! These mocks provide in-memory implementations of domain traits
//! that can be configured to simulate various scenarios including
//! success, failure, and edge cases.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use alloy::primitives::{address, Address, Bytes, B256, U256};

use crate::domain::{
    CallRequest, ChainClient, ChainError, LedgerError, LedgerWrite, TxLog, TxReceipt, UnsignedTx,
    WalletProvider,
};

/// Configuration for mock behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// If true, operations will fail.
    pub should_fail: bool,
    /// Custom error message for failures.
    pub error_message: Option<String>,
}

impl MockConfig {
    /// Creates a config that always succeeds.
    #[must_use]
    pub fn success() -> Self {
        Self::default()
    }

    /// Creates a config that always fails.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            should_fail: true,
            error_message: Some(message.into()),
        }
    }
}

/// Mock chain client for testing.
///
/// Read-only calls answer from a selector-keyed response table, and
/// submitted transactions are decoded back from the JSON envelope the
/// mock wallet produces, so tests can assert on exactly what was sent.
///
/// # Example
///
/// ```
/// use nft_market_core::test_utils::{mocks::MockConfig, MockChainClient};
///
/// // Create a mock that succeeds
/// let mock = MockChainClient::new();
///
/// // Create a mock that fails
/// let failing_mock = MockChainClient::with_config(MockConfig::failure("RPC error"));
/// ```
pub struct MockChainClient {
    call_responses: Mutex<Vec<([u8; 4], Bytes)>>,
    submitted: Mutex<Vec<UnsignedTx>>,
    next_receipt_status: AtomicBool,
    next_receipt_logs: Mutex<Vec<TxLog>>,
    gas_estimate: AtomicU64,
    config: MockConfig,
    call_count: AtomicU64,
    is_healthy: AtomicBool,
}

impl MockChainClient {
    /// Creates a new mock with default (success) configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MockConfig::success())
    }

    /// Creates a new mock with the given configuration.
    #[must_use]
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            call_responses: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            next_receipt_status: AtomicBool::new(true),
            next_receipt_logs: Mutex::new(Vec::new()),
            gas_estimate: AtomicU64::new(100_000),
            config,
            call_count: AtomicU64::new(0),
            is_healthy: AtomicBool::new(true),
        }
    }

    /// Creates a mock that always fails.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_config(MockConfig::failure(message))
    }

    /// Gets the number of times any method was called.
    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Sets the health status.
    pub fn set_healthy(&self, healthy: bool) {
        self.is_healthy.store(healthy, Ordering::Relaxed);
    }

    /// Registers the return data for calls whose calldata starts with
    /// `selector`. Later registrations for the same selector win.
    pub fn set_call_response(&self, selector: [u8; 4], data: impl Into<Bytes>) {
        let mut responses = self.call_responses.lock().unwrap();
        responses.retain(|(s, _)| *s != selector);
        responses.push((selector, data.into()));
    }

    /// Sets the gas estimate returned for every estimation.
    pub fn set_gas_estimate(&self, estimate: u64) {
        self.gas_estimate.store(estimate, Ordering::Relaxed);
    }

    /// Makes the next mined receipt report the given status flag.
    pub fn set_next_receipt_status(&self, status: bool) {
        self.next_receipt_status.store(status, Ordering::Relaxed);
    }

    /// Attaches logs to every receipt produced from now on.
    pub fn set_receipt_logs(&self, logs: Vec<TxLog>) {
        *self.next_receipt_logs.lock().unwrap() = logs;
    }

    /// Number of raw transactions broadcast through this mock.
    pub fn submitted_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }

    /// The most recently broadcast transaction, decoded.
    pub fn last_submitted_tx(&self) -> Option<UnsignedTx> {
        self.submitted.lock().unwrap().last().cloned()
    }

    fn increment_call_count(&self) {
        self.call_count.fetch_add(1, Ordering::Relaxed);
    }

    fn check_should_fail(&self) -> Result<(), ChainError> {
        if self.config.should_fail {
            let msg = self
                .config
                .error_message
                .clone()
                .unwrap_or_else(|| "Mock chain error".to_string());
            return Err(ChainError::Transport(msg));
        }
        Ok(())
    }

    fn receipt_for(&self, hash: B256) -> TxReceipt {
        TxReceipt {
            transaction_hash: hash,
            status: self.next_receipt_status.load(Ordering::Relaxed),
            block_number: Some(1),
            logs: self.next_receipt_logs.lock().unwrap().clone(),
        }
    }
}

impl Default for MockChainClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn health_check(&self) -> Result<(), ChainError> {
        self.increment_call_count();

        if !self.is_healthy.load(Ordering::Relaxed) {
            return Err(ChainError::Transport("Mock node unhealthy".to_string()));
        }

        self.check_should_fail()
    }

    async fn chain_id(&self) -> Result<u64, ChainError> {
        self.increment_call_count();
        self.check_should_fail()?;
        Ok(31337)
    }

    async fn call(&self, request: &CallRequest) -> Result<Bytes, ChainError> {
        self.increment_call_count();
        self.check_should_fail()?;

        let responses = self.call_responses.lock().unwrap();
        let found = responses
            .iter()
            .find(|(selector, _)| request.data.starts_with(selector))
            .map(|(_, data)| data.clone());
        // An unregistered selector answers one zero word, which decodes
        // as zero, false, or the zero address for single-word returns.
        Ok(found.unwrap_or_else(|| Bytes::from(vec![0u8; 32])))
    }

    async fn estimate_gas(&self, _request: &CallRequest) -> Result<u64, ChainError> {
        self.increment_call_count();
        self.check_should_fail()?;
        Ok(self.gas_estimate.load(Ordering::Relaxed))
    }

    async fn gas_price(&self) -> Result<u128, ChainError> {
        self.increment_call_count();
        self.check_should_fail()?;
        Ok(1_000_000_000)
    }

    async fn transaction_count(&self, _address: Address) -> Result<u64, ChainError> {
        self.increment_call_count();
        self.check_should_fail()?;
        Ok(self.submitted.lock().unwrap().len() as u64)
    }

    async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, ChainError> {
        self.increment_call_count();
        self.check_should_fail()?;

        let tx: UnsignedTx = serde_json::from_slice(raw)
            .map_err(|e| ChainError::InvalidResponse(format!("mock envelope: {e}")))?;

        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(tx);
        Ok(B256::from(U256::from(submitted.len() as u64)))
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<TxReceipt>, ChainError> {
        self.increment_call_count();
        self.check_should_fail()?;
        Ok(Some(self.receipt_for(hash)))
    }

    async fn wait_for_receipt(&self, hash: B256) -> Result<TxReceipt, ChainError> {
        self.increment_call_count();
        self.check_should_fail()?;
        Ok(self.receipt_for(hash))
    }
}

/// Mock wallet for testing.
///
/// "Signs" a transaction by serializing it to JSON so
/// [`MockChainClient`] can decode and record exactly what was
/// submitted. No key material is involved.
pub struct MockWalletProvider {
    address: Address,
    chain_id: u64,
    reject_signing: AtomicBool,
}

impl MockWalletProvider {
    /// First Anvil dev account address.
    pub const DEV_ADDRESS: Address = address!("f39fd6e51aad88f6f4ce6ab8827279cfffb92266");

    /// Creates a wallet for the default dev account on chain 31337.
    #[must_use]
    pub fn new() -> Self {
        Self {
            address: Self::DEV_ADDRESS,
            chain_id: 31337,
            reject_signing: AtomicBool::new(false),
        }
    }

    /// Creates a wallet for a specific address.
    #[must_use]
    pub fn with_address(address: Address) -> Self {
        Self {
            address,
            chain_id: 31337,
            reject_signing: AtomicBool::new(false),
        }
    }

    /// Makes every signing attempt fail with the EIP-1193 rejection code.
    pub fn reject_signing(&self) {
        self.reject_signing.store(true, Ordering::Relaxed);
    }

    fn check_rejection(&self) -> Result<(), ChainError> {
        if self.reject_signing.load(Ordering::Relaxed) {
            return Err(ChainError::Signer {
                code: Some(4001),
                message: "User rejected the request".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockWalletProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WalletProvider for MockWalletProvider {
    fn address(&self) -> Address {
        self.address
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn sign_transaction(&self, tx: &UnsignedTx) -> Result<Bytes, ChainError> {
        self.check_rejection()?;
        let encoded = serde_json::to_vec(tx)
            .map_err(|e| ChainError::InvalidResponse(format!("mock envelope: {e}")))?;
        Ok(Bytes::from(encoded))
    }

    async fn sign_message(&self, message: &[u8]) -> Result<String, ChainError> {
        self.check_rejection()?;
        Ok(alloy::hex::encode_prefixed(message))
    }
}

/// Mock bid ledger store for testing.
///
/// Documents live in an insertion-ordered vector so listings come back
/// in write order. Commits are all-or-nothing like the real store.
pub struct MockBidLedgerStore {
    documents: Mutex<Vec<(String, serde_json::Value)>>,
    fail_next_commit: Mutex<Option<String>>,
}

impl MockBidLedgerStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            fail_next_commit: Mutex::new(None),
        }
    }

    /// Makes the next commit fail with the given message, leaving the
    /// store untouched.
    pub fn fail_next_commit(&self, message: impl Into<String>) {
        *self.fail_next_commit.lock().unwrap() = Some(message.into());
    }

    /// Reads a stored document directly, bypassing the trait.
    pub fn document(&self, path: &str) -> Option<serde_json::Value> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, value)| value.clone())
    }

    /// Number of stored documents across all collections.
    pub fn len(&self) -> usize {
        self.documents.lock().unwrap().len()
    }

    /// True if no documents are stored.
    pub fn is_empty(&self) -> bool {
        self.documents.lock().unwrap().is_empty()
    }

    fn put(documents: &mut Vec<(String, serde_json::Value)>, path: &str, value: serde_json::Value) {
        match documents.iter_mut().find(|(p, _)| p == path) {
            Some((_, existing)) => *existing = value,
            None => documents.push((path.to_string(), value)),
        }
    }

    fn remove(documents: &mut Vec<(String, serde_json::Value)>, path: &str) {
        documents.retain(|(p, _)| p != path);
    }
}

impl Default for MockBidLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl crate::domain::BidLedgerStore for MockBidLedgerStore {
    async fn get(&self, path: &str) -> Result<Option<serde_json::Value>, LedgerError> {
        Ok(self.document(path))
    }

    async fn list(&self, collection: &str) -> Result<Vec<serde_json::Value>, LedgerError> {
        let prefix = format!("{}/", collection.trim_end_matches('/'));
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .filter(|(path, _)| {
                path.strip_prefix(&prefix)
                    .is_some_and(|rest| !rest.contains('/'))
            })
            .map(|(_, value)| value.clone())
            .collect())
    }

    async fn delete(&self, path: &str) -> Result<(), LedgerError> {
        Self::remove(&mut self.documents.lock().unwrap(), path);
        Ok(())
    }

    async fn commit(&self, writes: &[LedgerWrite]) -> Result<(), LedgerError> {
        if let Some(message) = self.fail_next_commit.lock().unwrap().take() {
            return Err(LedgerError::Commit(message));
        }

        let mut documents = self.documents.lock().unwrap();
        for write in writes {
            match write {
                LedgerWrite::Put { path, value } => Self::put(&mut documents, path, value.clone()),
                LedgerWrite::Delete { path } => Self::remove(&mut documents, path),
            }
        }
        Ok(())
    }
}
