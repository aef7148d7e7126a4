//! NFT Market Core
//!
//! Transaction orchestration core for an NFT marketplace client:
//! minting, fixed-price listings, auctions, and off-chain bid tracking
//! against EVM contracts.
//!
//! # Architecture Overview
//!
//! This crate is organized into three main layers:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              Application Layer               │
//! │   Services: mint, listing, auction, refunds  │
//! ├─────────────────────────────────────────────┤
//! │                 Domain Layer                 │
//! │  Traits, types, errors, classifier, policy   │
//! ├─────────────────────────────────────────────┤
//! │             Infrastructure Layer             │
//! │  RPC chain client, wallet, ledger, backend   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Key Features
//!
//! - **Trait-based abstraction**: chain, wallet, and ledger access are abstracted behind traits
//! - **Dependency injection**: services receive their dependencies through constructors
//! - **Testability**: mock implementations enable fast, isolated unit tests
//! - **Error classification**: every chain failure maps to one stable user-facing category
//! - **Validation**: input validation using the `validator` crate
//! - **Logging**: structured logging with `tracing`
//! - **Security**: secret management with `secrecy` crate
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use nft_market_core::app::{AppState, ContractAddresses};
//! use nft_market_core::infra::{Config, HttpLedgerStore, LocalWallet, RpcChainClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!
//!     // Create infrastructure clients
//!     let chain = Arc::new(RpcChainClient::with_defaults(&config.chain_rpc_url)?);
//!     let wallet = Arc::new(LocalWallet::from_hex_key(
//!         &config.wallet_private_key,
//!         config.chain_id,
//!     )?);
//!     let ledger = Arc::new(HttpLedgerStore::with_defaults(
//!         &config.ledger_store_url,
//!         config.ledger_store_api_key.clone(),
//!     )?);
//!
//!     // Wire the full service graph
//!     let state = AppState::new(chain, wallet, ledger, config.contract_addresses());
//!
//!     let auction = state.auctions.get_auction("7").await?;
//!     println!("highest bid: {}", auction.highest_bid);
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod domain;
pub mod infra;

// Test utilities are available in tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
