//! Domain layer containing core business types, traits, and error definitions.

pub mod classify;
pub mod error;
pub mod policy;
pub mod traits;
pub mod types;
pub mod units;

pub use classify::{classify, ClassifiedError, ErrorCategory};
pub use error::{
    ApiError, ChainError, ConfigError, LedgerError, MarketError, ValidationError,
};
pub use traits::{BidLedgerStore, ChainClient, LedgerWrite, SessionStore, WalletProvider};
pub use types::{
    AuctionId, AuctionSnapshot, BidLedgerEntry, CallRequest, CreateAuctionRequest,
    ListForSaleRequest, MintRequest, NewProductRecord, PlaceBidRequest, ProductRecord,
    ProfileRecord, TokenId, TransactionOutcome, TxLog, TxReceipt, UnsignedTx,
};
pub use units::{format_eth, parse_decimal_id, parse_eth, percent_to_bps};
