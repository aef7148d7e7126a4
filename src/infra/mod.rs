//! Infrastructure layer implementations.

pub mod backend;
pub mod chain;
pub mod config;
pub mod ledger;
pub mod observability;

pub use backend::{BackendClient, BackendConfig, MemorySessionStore};
pub use chain::{
    BoundContract, ContractGateway, GatewayConfig, LocalWallet, RpcChainClient, RpcClientConfig,
};
pub use config::Config;
pub use ledger::{HttpLedgerStore, LedgerStoreConfig};
