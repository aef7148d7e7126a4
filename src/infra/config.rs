//! Environment-driven configuration.

use alloy::primitives::Address;
use secrecy::SecretString;

use crate::app::ContractAddresses;
use crate::domain::ConfigError;

/// Runtime configuration loaded from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub chain_rpc_url: String,
    pub chain_id: u64,
    pub wallet_private_key: SecretString,
    pub nft_contract: Address,
    pub marketplace_contract: Address,
    pub auction_house_contract: Address,
    pub ledger_store_url: String,
    pub ledger_store_api_key: Option<SecretString>,
    pub backend_api_url: String,
    pub gas_margin_percent: u64,
}

impl Config {
    /// Load configuration from the environment, reading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            chain_rpc_url: require("CHAIN_RPC_URL")?,
            chain_id: parse_u64("CHAIN_ID", &require("CHAIN_ID")?)?,
            wallet_private_key: SecretString::from(require("WALLET_PRIVATE_KEY")?),
            nft_contract: parse_address("NFT_CONTRACT_ADDRESS", &require("NFT_CONTRACT_ADDRESS")?)?,
            marketplace_contract: parse_address(
                "MARKETPLACE_CONTRACT_ADDRESS",
                &require("MARKETPLACE_CONTRACT_ADDRESS")?,
            )?,
            auction_house_contract: parse_address(
                "AUCTION_HOUSE_CONTRACT_ADDRESS",
                &require("AUCTION_HOUSE_CONTRACT_ADDRESS")?,
            )?,
            ledger_store_url: require("LEDGER_STORE_URL")?,
            ledger_store_api_key: std::env::var("LEDGER_STORE_API_KEY")
                .ok()
                .map(SecretString::from),
            backend_api_url: require("BACKEND_API_URL")?,
            gas_margin_percent: match std::env::var("GAS_MARGIN_PERCENT") {
                Ok(value) => parse_u64("GAS_MARGIN_PERCENT", &value)?,
                Err(_) => 20,
            },
        })
    }

    /// Deployed contract addresses grouped for service wiring.
    #[must_use]
    pub fn contract_addresses(&self) -> ContractAddresses {
        ContractAddresses {
            nft: self.nft_contract,
            marketplace: self.marketplace_contract,
            auction_house: self.auction_house_contract,
        }
    }
}

fn require(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{value}' is not a valid integer"),
    })
}

fn parse_address(key: &str, value: &str) -> Result<Address, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("'{value}' is not a valid address"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u64() {
        assert_eq!(parse_u64("CHAIN_ID", "31337").unwrap(), 31337);
        assert!(matches!(
            parse_u64("CHAIN_ID", "mainnet"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_parse_address() {
        let addr = parse_address(
            "NFT_CONTRACT_ADDRESS",
            "0x00000000000000000000000000000000000000aa",
        )
        .unwrap();
        assert_eq!(format!("{addr:#x}"), "0x00000000000000000000000000000000000000aa");

        assert!(matches!(
            parse_address("NFT_CONTRACT_ADDRESS", "0x123"),
            Err(ConfigError::InvalidValue { key, .. }) if key == "NFT_CONTRACT_ADDRESS"
        ));
    }
}
