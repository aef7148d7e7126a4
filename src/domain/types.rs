use alloy::primitives::{Address, Bytes, B256, U256};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Decimal auction identifier as emitted by the auction contract.
pub type AuctionId = String;

/// Decimal token identifier as emitted by the NFT contract.
pub type TokenId = String;

/// On-chain state of a single auction, read from the auction contract.
///
/// Monetary fields are decimal ETH strings; conversion from base units
/// happens at the service boundary and nowhere else. `highest_bidder`
/// equal to the zero address means no bid has been placed yet. Once
/// `settled` is true the record never changes again for this id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuctionSnapshot {
    pub auction_id: AuctionId,
    pub seller: Address,
    pub nft_contract: Address,
    pub token_id: TokenId,
    /// Unix seconds.
    pub end_time: u64,
    /// Minimum bid increment in basis points (250 = 2.5%).
    pub min_increment_bps: u32,
    /// Decimal ETH string.
    pub reserve_price: String,
    pub highest_bidder: Address,
    /// Decimal ETH string; "0" before the first bid.
    pub highest_bid: String,
    pub settled: bool,
}

impl AuctionSnapshot {
    /// True if no bid has been placed yet.
    #[must_use]
    pub fn has_no_bids(&self) -> bool {
        self.highest_bidder == Address::ZERO
    }
}

/// Result of a confirmed state-changing on-chain operation.
///
/// Created after the transaction is mined and its receipt inspected;
/// returned to the caller and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionOutcome {
    pub success: bool,
    pub transaction_hash: String,
    /// Operation-specific extraction, e.g. the newly minted token id.
    pub extracted_value: Option<String>,
}

impl TransactionOutcome {
    /// Outcome of a mined transaction with a success receipt status.
    #[must_use]
    pub fn confirmed(transaction_hash: B256) -> Self {
        Self {
            success: true,
            transaction_hash: format!("{transaction_hash:#x}"),
            extracted_value: None,
        }
    }

    #[must_use]
    pub fn with_extracted_value(mut self, value: Option<String>) -> Self {
        self.extracted_value = value;
        self
    }
}

/// One off-chain record per (account, auction) the account has bid on.
///
/// A discovery hint only; withdrawability is always decided by a live
/// chain read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BidLedgerEntry {
    pub auction_id: AuctionId,
    pub refunded: bool,
    pub created_at: DateTime<Utc>,
}

impl BidLedgerEntry {
    #[must_use]
    pub fn new(auction_id: impl Into<AuctionId>) -> Self {
        Self {
            auction_id: auction_id.into(),
            refunded: false,
            created_at: Utc::now(),
        }
    }
}

/// Read-only or gas-estimation call payload for the chain node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CallRequest {
    pub from: Option<Address>,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

impl CallRequest {
    #[must_use]
    pub fn new(to: Address, data: Bytes) -> Self {
        Self {
            from: None,
            to,
            value: U256::ZERO,
            data,
        }
    }

    #[must_use]
    pub fn with_from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// Transaction prepared by the gateway and handed to the wallet for signing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UnsignedTx {
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    pub to: Address,
    pub value: U256,
    pub data: Bytes,
}

/// Single log emitted by a mined transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// Mined transaction receipt as surfaced by the chain client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxReceipt {
    pub transaction_hash: B256,
    /// Receipt status flag: true means the call did not revert.
    pub status: bool,
    pub block_number: Option<u64>,
    pub logs: Vec<TxLog>,
}

/// Parameters for minting a new token.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MintRequest {
    #[validate(url)]
    pub metadata_uri: String,
}

/// Parameters for listing a token for fixed-price sale.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ListForSaleRequest {
    pub nft_address: Address,
    pub token_id: TokenId,
    /// Decimal ETH string.
    #[validate(length(min = 1))]
    pub price: String,
}

/// Parameters for creating an auction.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAuctionRequest {
    pub nft_address: Address,
    pub token_id: TokenId,
    /// Decimal ETH string.
    #[validate(length(min = 1))]
    pub reserve_price: String,
    /// One minute to one year.
    #[validate(range(min = 60, max = 31_536_000))]
    pub duration_secs: u64,
    /// Percentage, e.g. 2.5; converted to basis points at submission.
    #[validate(range(min = 0.0, max = 100.0))]
    pub min_increment_percent: f64,
}

/// Parameters for placing a bid.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlaceBidRequest {
    pub auction_id: AuctionId,
    /// Decimal ETH string. The contract enforces reserve and increment;
    /// no client-side minimum is applied here.
    #[validate(length(min = 1))]
    pub bid_amount: String,
}

/// Off-chain product record kept by the marketplace backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductRecord {
    pub id: String,
    pub token_id: Option<TokenId>,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub creator: String,
}

/// Payload for registering a freshly minted token with the backend.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewProductRecord {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub description: Option<String>,
    pub token_id: TokenId,
    #[validate(url)]
    pub metadata_uri: String,
}

/// Off-chain profile record kept by the marketplace backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileRecord {
    pub address: String,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
}
