//! EVM chain access: RPC transport, ABI bindings, signing, and the
//! contract gateway.

pub mod abi;
pub mod gateway;
pub mod rpc;
pub mod wallet;

pub use gateway::{BoundContract, ContractGateway, GatewayConfig};
pub use rpc::{RpcChainClient, RpcClientConfig};
pub use wallet::LocalWallet;
