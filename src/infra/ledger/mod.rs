//! Off-chain bid ledger storage adapters.

pub mod http;

pub use http::{HttpLedgerStore, LedgerStoreConfig};
