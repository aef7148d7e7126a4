//! Contract gateway: the single path for contract reads and writes.
//!
//! Services bind a deployed contract address and get typed-free
//! building blocks: read-only calls, gas estimation, and the full
//! prepare-sign-broadcast-await pipeline. The gateway owns nonce and
//! gas price acquisition so no service duplicates transaction plumbing.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info, instrument};

use alloy::primitives::{Address, Bytes, U256};

use crate::domain::{
    CallRequest, ChainClient, ChainError, TransactionOutcome, TxReceipt, WalletProvider,
    UnsignedTx,
};

/// Configuration for transaction submission
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Percentage added on top of the node's gas estimate when a caller
    /// requests padding (20 means a 1.2x limit).
    pub gas_margin_percent: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            gas_margin_percent: 20,
        }
    }
}

/// Gateway over a chain client and the active wallet.
pub struct ContractGateway {
    chain: Arc<dyn ChainClient>,
    wallet: Arc<dyn WalletProvider>,
    config: GatewayConfig,
}

impl ContractGateway {
    #[must_use]
    pub fn new(
        chain: Arc<dyn ChainClient>,
        wallet: Arc<dyn WalletProvider>,
        config: GatewayConfig,
    ) -> Self {
        Self {
            chain,
            wallet,
            config,
        }
    }

    #[must_use]
    pub fn with_defaults(chain: Arc<dyn ChainClient>, wallet: Arc<dyn WalletProvider>) -> Self {
        Self::new(chain, wallet, GatewayConfig::default())
    }

    /// Address of the wallet every transaction is sent from.
    #[must_use]
    pub fn sender(&self) -> Address {
        self.wallet.address()
    }

    /// Applies the configured margin to a gas estimate.
    #[must_use]
    pub fn padded_gas_limit(&self, estimate: u64) -> u64 {
        estimate.saturating_mul(100 + self.config.gas_margin_percent) / 100
    }

    /// Binds a deployed contract address for calls and submissions.
    #[must_use]
    pub fn bind(&self, address: Address) -> BoundContract<'_> {
        BoundContract {
            gateway: self,
            address,
        }
    }
}

/// A contract address bound to the gateway.
pub struct BoundContract<'a> {
    gateway: &'a ContractGateway,
    address: Address,
}

impl BoundContract<'_> {
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// Execute a read-only call and return the raw return data.
    #[instrument(skip(self, data), fields(contract = %self.address))]
    pub async fn call(&self, data: Bytes) -> Result<Bytes, ChainError> {
        let request = CallRequest::new(self.address, data).with_from(self.gateway.sender());
        self.gateway.chain.call(&request).await
    }

    /// Estimate gas for a state-changing call.
    #[instrument(skip(self, data), fields(contract = %self.address))]
    pub async fn estimate_gas(&self, data: Bytes, value: U256) -> Result<u64, ChainError> {
        let request = CallRequest::new(self.address, data)
            .with_from(self.gateway.sender())
            .with_value(value);
        self.gateway.chain.estimate_gas(&request).await
    }

    /// Submit a transaction and wait until it is mined.
    ///
    /// With `gas_limit` None the node's estimate is used as-is; callers
    /// that expect state drift between estimation and inclusion pass a
    /// pre-padded limit instead. A mined-but-failed receipt surfaces as
    /// [`ChainError::Reverted`].
    pub async fn submit(
        &self,
        data: Bytes,
        value: U256,
        gas_limit: Option<u64>,
    ) -> Result<TransactionOutcome, ChainError> {
        let receipt = self.submit_for_receipt(data, value, gas_limit).await?;
        Ok(TransactionOutcome::confirmed(receipt.transaction_hash))
    }

    /// Submit a transaction and return the full mined receipt.
    #[instrument(skip(self, data), fields(contract = %self.address))]
    pub async fn submit_for_receipt(
        &self,
        data: Bytes,
        value: U256,
        gas_limit: Option<u64>,
    ) -> Result<TxReceipt, ChainError> {
        let gateway = self.gateway;
        let sender = gateway.sender();

        let gas_limit = match gas_limit {
            Some(limit) => limit,
            None => self.estimate_gas(data.clone(), value).await?,
        };
        let nonce = gateway.chain.transaction_count(sender).await?;
        let gas_price = gateway.chain.gas_price().await?;

        let tx = UnsignedTx {
            chain_id: gateway.wallet.chain_id(),
            nonce,
            gas_price,
            gas_limit,
            to: self.address,
            value,
            data,
        };
        debug!(nonce, gas_limit, gas_price, "Prepared transaction");

        let raw = gateway.wallet.sign_transaction(&tx).await?;
        let hash = gateway.chain.send_raw_transaction(&raw).await?;
        counter!("market_tx_submitted_total").increment(1);
        info!(hash = %hash, "Transaction submitted");

        let receipt = gateway.chain.wait_for_receipt(hash).await?;
        if !receipt.status {
            counter!("market_tx_reverted_total").increment(1);
            return Err(ChainError::Reverted { reason: None });
        }
        counter!("market_tx_confirmed_total").increment(1);
        Ok(receipt)
    }
}
