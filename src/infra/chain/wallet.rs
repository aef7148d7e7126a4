//! Local in-process wallet for development and tests.
//!
//! Production clients embed a user-controlled wallet behind the same
//! trait; this signer keeps a single secp256k1 key in memory and never
//! prompts, so it cannot produce a user rejection.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

use alloy::consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{hex, Address, Bytes, TxKind};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use crate::domain::{ChainError, UnsignedTx, WalletProvider};

/// Wallet provider backed by a locally held private key.
pub struct LocalWallet {
    signer: PrivateKeySigner,
    chain_id: u64,
}

impl LocalWallet {
    /// Create a wallet from a hex-encoded private key.
    pub fn from_hex_key(secret: &SecretString, chain_id: u64) -> Result<Self, ChainError> {
        let signer: PrivateKeySigner = secret
            .expose_secret()
            .trim()
            .trim_start_matches("0x")
            .parse()
            .map_err(|_| ChainError::Signer {
                code: None,
                message: "Invalid private key".to_string(),
            })?;
        info!(address = %signer.address(), chain_id, "Created local wallet");
        Ok(Self { signer, chain_id })
    }

    fn build_legacy(&self, tx: &UnsignedTx) -> TxLegacy {
        TxLegacy {
            chain_id: Some(tx.chain_id),
            nonce: tx.nonce,
            gas_price: tx.gas_price,
            gas_limit: tx.gas_limit,
            to: TxKind::Call(tx.to),
            value: tx.value,
            input: tx.data.clone(),
        }
    }
}

#[async_trait]
impl WalletProvider for LocalWallet {
    fn address(&self) -> Address {
        self.signer.address()
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn sign_transaction(&self, tx: &UnsignedTx) -> Result<Bytes, ChainError> {
        let mut legacy = self.build_legacy(tx);
        let signature =
            self.signer
                .sign_transaction_sync(&mut legacy)
                .map_err(|e| ChainError::Signer {
                    code: None,
                    message: e.to_string(),
                })?;
        let envelope = TxEnvelope::Legacy(legacy.into_signed(signature));
        let mut raw = Vec::new();
        envelope.encode_2718(&mut raw);
        Ok(Bytes::from(raw))
    }

    async fn sign_message(&self, message: &[u8]) -> Result<String, ChainError> {
        let signature = self
            .signer
            .sign_message_sync(message)
            .map_err(|e| ChainError::Signer {
                code: None,
                message: e.to_string(),
            })?;
        Ok(hex::encode_prefixed(signature.as_bytes()))
    }
}
