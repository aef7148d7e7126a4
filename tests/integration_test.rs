//! Integration tests for the full service graph over mock infrastructure.

use std::sync::Arc;

use alloy::primitives::{address, Address, U256};
use alloy::sol_types::{SolCall, SolEvent};

use nft_market_core::app::{AppState, ContractAddresses};
use nft_market_core::domain::{
    ErrorCategory, ListForSaleRequest, MintRequest, PlaceBidRequest, TxLog,
};
use nft_market_core::infra::chain::abi::{AuctionHouse, MarketNft, Marketplace};
use nft_market_core::test_utils::{MockBidLedgerStore, MockChainClient, MockWalletProvider};

const NFT: Address = address!("00000000000000000000000000000000000000a1");
const MARKETPLACE: Address = address!("00000000000000000000000000000000000000a2");
const AUCTION_HOUSE: Address = address!("00000000000000000000000000000000000000a3");

const ONE_ETH: u128 = 1_000_000_000_000_000_000;

struct Harness {
    state: AppState,
    chain: Arc<MockChainClient>,
    wallet: Arc<MockWalletProvider>,
    store: Arc<MockBidLedgerStore>,
}

fn harness() -> Harness {
    let chain = Arc::new(MockChainClient::new());
    let wallet = Arc::new(MockWalletProvider::new());
    let store = Arc::new(MockBidLedgerStore::new());
    let state = AppState::new(
        Arc::clone(&chain) as _,
        Arc::clone(&wallet) as _,
        Arc::clone(&store) as _,
        ContractAddresses {
            nft: NFT,
            marketplace: MARKETPLACE,
            auction_house: AUCTION_HOUSE,
        },
    );
    Harness {
        state,
        chain,
        wallet,
        store,
    }
}

fn mint_transfer_log(token_id: u64) -> TxLog {
    TxLog {
        address: NFT,
        topics: vec![
            MarketNft::Transfer::SIGNATURE_HASH,
            alloy::primitives::B256::ZERO,
            MockWalletProvider::DEV_ADDRESS.into_word(),
            alloy::primitives::B256::from(U256::from(token_id)),
        ],
        data: alloy::primitives::Bytes::new(),
    }
}

fn auction_snapshot_response(highest_bidder: Address, highest_bid: U256, settled: bool) -> Vec<u8> {
    AuctionHouse::auctionsCall::abi_encode_returns(&(
        address!("00000000000000000000000000000000000000bb"),
        NFT,
        U256::from(5u64),
        U256::from(1_900_000_000u64),
        U256::from(250u64),
        U256::from(ONE_ETH),
        highest_bidder,
        highest_bid,
        settled,
    ))
}

#[tokio::test]
async fn test_mint_extracts_token_id_and_pads_gas() {
    let h = harness();
    h.chain.set_receipt_logs(vec![mint_transfer_log(42)]);

    let outcome = h
        .state
        .minting
        .mint(&MintRequest {
            metadata_uri: "https://meta.example/42.json".to_string(),
        })
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(outcome.extracted_value.as_deref(), Some("42"));

    // Default estimate of 100k padded by the default 20% margin.
    let submitted = h.chain.last_submitted_tx().unwrap();
    assert_eq!(submitted.gas_limit, 120_000);
    assert_eq!(submitted.to, NFT);
}

#[tokio::test]
async fn test_mint_without_transfer_event_still_succeeds() {
    let h = harness();

    let outcome = h
        .state
        .minting
        .mint(&MintRequest {
            metadata_uri: "https://meta.example/1.json".to_string(),
        })
        .await
        .unwrap();

    assert!(outcome.success);
    assert!(outcome.extracted_value.is_none());
}

#[tokio::test]
async fn test_mint_rejects_invalid_uri_before_submission() {
    let h = harness();

    let result = h
        .state
        .minting
        .mint(&MintRequest {
            metadata_uri: "not a url".to_string(),
        })
        .await;

    assert!(result.is_err());
    assert_eq!(h.chain.submitted_count(), 0);
}

#[tokio::test]
async fn test_metadata_update_requires_ownership() {
    let h = harness();
    // ownerOf answers someone other than the active wallet.
    h.chain.set_call_response(
        MarketNft::ownerOfCall::SELECTOR,
        MarketNft::ownerOfCall::abi_encode_returns(&(address!(
            "00000000000000000000000000000000000000cc"
        ),)),
    );

    let err = h
        .state
        .minting
        .update_metadata_uri("9", "https://meta.example/9.json")
        .await
        .unwrap_err();

    assert_eq!(err.category, ErrorCategory::NotTokenOwner);
    assert_eq!(h.chain.submitted_count(), 0);
}

#[tokio::test]
async fn test_metadata_update_by_owner_submits() {
    let h = harness();
    h.chain.set_call_response(
        MarketNft::ownerOfCall::SELECTOR,
        MarketNft::ownerOfCall::abi_encode_returns(&(MockWalletProvider::DEV_ADDRESS,)),
    );

    let outcome = h
        .state
        .minting
        .update_metadata_uri("9", "https://meta.example/9.json")
        .await
        .unwrap();

    assert!(outcome.success);
    assert_eq!(h.chain.submitted_count(), 1);
}

#[tokio::test]
async fn test_listing_fee_is_decimal_eth() {
    let h = harness();
    h.chain.set_call_response(
        Marketplace::getListingFeeCall::SELECTOR,
        Marketplace::getListingFeeCall::abi_encode_returns(&(U256::from(ONE_ETH / 40),)),
    );

    let fee = h.state.listings.listing_fee().await.unwrap();
    assert_eq!(fee, "0.025");
}

#[tokio::test]
async fn test_list_for_sale_attaches_fee_as_value() {
    let h = harness();
    let fee = U256::from(ONE_ETH / 40);
    h.chain.set_call_response(
        Marketplace::getListingFeeCall::SELECTOR,
        Marketplace::getListingFeeCall::abi_encode_returns(&(fee,)),
    );

    h.state
        .listings
        .list_for_sale(&ListForSaleRequest {
            nft_address: NFT,
            token_id: "7".to_string(),
            price: "1.5".to_string(),
        })
        .await
        .unwrap();

    let submitted = h.chain.last_submitted_tx().unwrap();
    assert_eq!(submitted.to, MARKETPLACE);
    assert_eq!(submitted.value, fee);
}

#[tokio::test]
async fn test_purchase_forwards_price_as_value() {
    let h = harness();

    h.state.listings.purchase(NFT, "3", "2").await.unwrap();

    let submitted = h.chain.last_submitted_tx().unwrap();
    assert_eq!(submitted.to, MARKETPLACE);
    assert_eq!(submitted.value, U256::from(2u128 * ONE_ETH));
}

#[tokio::test]
async fn test_get_auction_decodes_snapshot() {
    let h = harness();
    let leader = address!("00000000000000000000000000000000000000cc");
    h.chain.set_call_response(
        AuctionHouse::auctionsCall::SELECTOR,
        auction_snapshot_response(leader, U256::from(2u128 * ONE_ETH), false),
    );

    let snapshot = h.state.auctions.get_auction("7").await.unwrap();
    assert_eq!(snapshot.auction_id, "7");
    assert_eq!(snapshot.token_id, "5");
    assert_eq!(snapshot.min_increment_bps, 250);
    assert_eq!(snapshot.reserve_price, "1");
    assert_eq!(snapshot.highest_bidder, leader);
    assert_eq!(snapshot.highest_bid, "2");
    assert!(!snapshot.settled);
}

#[tokio::test]
async fn test_create_auction_approves_token_first() {
    let h = harness();
    // Default call responses leave the token unapproved.

    h.state
        .auctions
        .create_auction(&nft_market_core::domain::CreateAuctionRequest {
            nft_address: NFT,
            token_id: "5".to_string(),
            reserve_price: "1".to_string(),
            duration_secs: 3600,
            min_increment_percent: 2.5,
        })
        .await
        .unwrap();

    assert_eq!(h.chain.submitted_count(), 2);
    // The approval went to the NFT contract; the creation came last.
    let created = h.chain.last_submitted_tx().unwrap();
    assert_eq!(created.to, AUCTION_HOUSE);
}

#[tokio::test]
async fn test_create_auction_skips_redundant_approval() {
    let h = harness();
    h.chain.set_call_response(
        MarketNft::getApprovedCall::SELECTOR,
        MarketNft::getApprovedCall::abi_encode_returns(&(AUCTION_HOUSE,)),
    );

    h.state
        .auctions
        .create_auction(&nft_market_core::domain::CreateAuctionRequest {
            nft_address: NFT,
            token_id: "5".to_string(),
            reserve_price: "1".to_string(),
            duration_secs: 3600,
            min_increment_percent: 2.5,
        })
        .await
        .unwrap();

    assert_eq!(h.chain.submitted_count(), 1);
}

#[tokio::test]
async fn test_bid_escrows_value_and_records_ledger_entry() {
    let h = harness();

    h.state
        .auctions
        .bid(&PlaceBidRequest {
            auction_id: "7".to_string(),
            bid_amount: "1.1".to_string(),
        })
        .await
        .unwrap();

    let submitted = h.chain.last_submitted_tx().unwrap();
    assert_eq!(submitted.to, AUCTION_HOUSE);
    assert_eq!(submitted.value, U256::from(ONE_ETH + ONE_ETH / 10));

    let key = format!("{:#x}", MockWalletProvider::DEV_ADDRESS);
    assert!(h
        .store
        .document(&format!("accounts/{key}/bids/7"))
        .is_some());
}

#[tokio::test]
async fn test_bid_survives_ledger_outage() {
    let h = harness();
    h.store.fail_next_commit("store offline");

    let outcome = h
        .state
        .auctions
        .bid(&PlaceBidRequest {
            auction_id: "7".to_string(),
            bid_amount: "1.1".to_string(),
        })
        .await
        .unwrap();

    // The chain holds the escrow; losing the hint must not fail the bid.
    assert!(outcome.success);
    assert_eq!(h.chain.submitted_count(), 1);
}

#[tokio::test]
async fn test_refund_scan_keeps_only_outbid_auctions() {
    let h = harness();
    let account = MockWalletProvider::DEV_ADDRESS;
    h.state.ledger.record_bid(account, "7").await.unwrap();

    // Another bidder leads, so the account may hold an escrowed refund.
    let leader = address!("00000000000000000000000000000000000000cc");
    h.chain.set_call_response(
        AuctionHouse::auctionsCall::SELECTOR,
        auction_snapshot_response(leader, U256::from(2u128 * ONE_ETH), false),
    );

    let withdrawable = h.state.refunds.scan_withdrawable().await.unwrap();
    assert_eq!(withdrawable, vec!["7".to_string()]);
}

#[tokio::test]
async fn test_refund_scan_skips_auctions_led_by_account() {
    let h = harness();
    let account = MockWalletProvider::DEV_ADDRESS;
    h.state.ledger.record_bid(account, "7").await.unwrap();

    h.chain.set_call_response(
        AuctionHouse::auctionsCall::SELECTOR,
        auction_snapshot_response(account, U256::from(2u128 * ONE_ETH), false),
    );

    let withdrawable = h.state.refunds.scan_withdrawable().await.unwrap();
    assert!(withdrawable.is_empty());
}

#[tokio::test]
async fn test_withdraw_clears_ledger_entry() {
    let h = harness();
    let account = MockWalletProvider::DEV_ADDRESS;
    h.state.ledger.record_bid(account, "7").await.unwrap();

    let outcome = h.state.refunds.withdraw("7").await.unwrap();
    assert!(outcome.success);
    assert_eq!(h.chain.submitted_count(), 1);

    let key = format!("{account:#x}");
    assert!(h.store.document(&format!("accounts/{key}/bids/7")).is_none());
}

#[tokio::test]
async fn test_withdraw_succeeds_even_if_ledger_clear_fails() {
    let h = harness();
    let account = MockWalletProvider::DEV_ADDRESS;
    h.state.ledger.record_bid(account, "7").await.unwrap();
    h.store.fail_next_commit("store offline");

    let outcome = h.state.refunds.withdraw("7").await.unwrap();
    assert!(outcome.success);

    // The stale entry stays behind for the next scan to resolve.
    let key = format!("{account:#x}");
    assert!(h.store.document(&format!("accounts/{key}/bids/7")).is_some());
}

#[tokio::test]
async fn test_signer_rejection_is_classified() {
    let h = harness();
    h.wallet.reject_signing();

    let err = h
        .state
        .minting
        .mint(&MintRequest {
            metadata_uri: "https://meta.example/1.json".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.category, ErrorCategory::UserRejected);
    assert_eq!(err.message, "Transaction was cancelled");
}

#[tokio::test]
async fn test_failed_receipt_is_classified_as_contract_error() {
    let h = harness();
    h.chain.set_next_receipt_status(false);

    let err = h
        .state
        .auctions
        .settle("7")
        .await
        .unwrap_err();

    assert_eq!(err.category, ErrorCategory::ContractError);
}

#[tokio::test]
async fn test_node_outage_is_classified_as_network_error() {
    let chain = Arc::new(MockChainClient::failing("connection refused"));
    let state = AppState::new(
        chain as _,
        Arc::new(MockWalletProvider::new()) as _,
        Arc::new(MockBidLedgerStore::new()) as _,
        ContractAddresses {
            nft: NFT,
            marketplace: MARKETPLACE,
            auction_house: AUCTION_HOUSE,
        },
    );

    let err = state.auctions.get_auction("7").await.unwrap_err();
    assert_eq!(err.category, ErrorCategory::NetworkError);
}
