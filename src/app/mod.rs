//! Application layer containing the marketplace services and shared state.

pub mod auction;
pub mod ledger;
pub mod listing;
pub mod mint;
pub mod refunds;
pub mod state;

pub use auction::AuctionService;
pub use ledger::BidLedgerCoordinator;
pub use listing::ListingService;
pub use mint::MintingService;
pub use refunds::RefundScanner;
pub use state::{AppState, ContractAddresses};
