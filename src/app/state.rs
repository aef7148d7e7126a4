//! Application state management.
//!
//! Wires the services over shared trait objects so an embedding
//! application, or a test, assembles the whole client in one call.

use std::sync::Arc;

use alloy::primitives::Address;

use crate::domain::{BidLedgerStore, ChainClient, WalletProvider};
use crate::infra::chain::{ContractGateway, GatewayConfig};

use super::auction::AuctionService;
use super::ledger::BidLedgerCoordinator;
use super::listing::ListingService;
use super::mint::MintingService;
use super::refunds::RefundScanner;

/// Deployed contract addresses the client talks to.
#[derive(Debug, Clone, Copy)]
pub struct ContractAddresses {
    pub nft: Address,
    pub marketplace: Address,
    pub auction_house: Address,
}

/// Shared application state holding every service.
///
/// All contained types are wrapped in `Arc` and implement `Send + Sync`,
/// making `AppState` safe to share across async tasks.
#[derive(Clone)]
pub struct AppState {
    /// Gateway shared by every service.
    pub gateway: Arc<ContractGateway>,

    /// Minting and metadata maintenance.
    pub minting: Arc<MintingService>,

    /// Fixed-price listings and purchases.
    pub listings: Arc<ListingService>,

    /// Auctions, bids, and resolution.
    pub auctions: Arc<AuctionService>,

    /// Off-chain bid tracking.
    pub ledger: Arc<BidLedgerCoordinator>,

    /// Refund discovery and withdrawal.
    pub refunds: Arc<RefundScanner>,
}

impl AppState {
    /// Creates the full service graph with default gateway settings.
    #[must_use]
    pub fn new(
        chain: Arc<dyn ChainClient>,
        wallet: Arc<dyn WalletProvider>,
        ledger_store: Arc<dyn BidLedgerStore>,
        addresses: ContractAddresses,
    ) -> Self {
        Self::with_gateway_config(
            chain,
            wallet,
            ledger_store,
            addresses,
            GatewayConfig::default(),
        )
    }

    /// Creates the full service graph with custom gateway settings.
    #[must_use]
    pub fn with_gateway_config(
        chain: Arc<dyn ChainClient>,
        wallet: Arc<dyn WalletProvider>,
        ledger_store: Arc<dyn BidLedgerStore>,
        addresses: ContractAddresses,
        gateway_config: GatewayConfig,
    ) -> Self {
        let gateway = Arc::new(ContractGateway::new(chain, wallet, gateway_config));
        let ledger = Arc::new(BidLedgerCoordinator::new(ledger_store));

        let minting = Arc::new(MintingService::new(Arc::clone(&gateway), addresses.nft));
        let listings = Arc::new(ListingService::new(
            Arc::clone(&gateway),
            addresses.marketplace,
        ));
        let auctions = Arc::new(
            AuctionService::new(Arc::clone(&gateway), addresses.auction_house)
                .with_ledger(Arc::clone(&ledger)),
        );
        let refunds = Arc::new(RefundScanner::new(
            Arc::clone(&gateway),
            Arc::clone(&auctions),
            Arc::clone(&ledger),
        ));

        Self {
            gateway,
            minting,
            listings,
            auctions,
            ledger,
            refunds,
        }
    }
}
