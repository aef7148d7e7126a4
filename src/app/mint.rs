//! NFT minting service.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use validator::Validate;

use alloy::primitives::{Address, B256, U256};
use alloy::sol_types::{SolCall, SolEvent};

use crate::domain::{
    classify, parse_decimal_id, ClassifiedError, MarketError, MintRequest, TransactionOutcome,
    TxReceipt,
};
use crate::infra::chain::abi::{decode_return, MarketNft};
use crate::infra::chain::ContractGateway;

/// Service for minting tokens and maintaining their metadata.
///
/// Mint-path submissions pad the node's gas estimate because contract
/// state routinely moves between estimation and inclusion; an unpadded
/// limit makes sporadic out-of-gas failures a support burden.
pub struct MintingService {
    gateway: Arc<ContractGateway>,
    nft_contract: Address,
}

impl MintingService {
    #[must_use]
    pub fn new(gateway: Arc<ContractGateway>, nft_contract: Address) -> Self {
        Self {
            gateway,
            nft_contract,
        }
    }

    /// Mints a new token carrying the given metadata URI.
    ///
    /// On success the outcome carries the new token id, extracted from
    /// the mint's `Transfer` event. A receipt without that event still
    /// reports success with no id; the token exists either way.
    #[instrument(skip(self, request))]
    pub async fn mint(
        &self,
        request: &MintRequest,
    ) -> Result<TransactionOutcome, ClassifiedError> {
        self.mint_inner(request).await.map_err(|e| {
            warn!(error = %e, "Mint failed");
            classify(&e)
        })
    }

    async fn mint_inner(&self, request: &MintRequest) -> Result<TransactionOutcome, MarketError> {
        request.validate()?;

        let data = MarketNft::mintTokenCall {
            tokenURI: request.metadata_uri.clone(),
        }
        .abi_encode();

        let contract = self.gateway.bind(self.nft_contract);
        let estimate = contract
            .estimate_gas(data.clone().into(), U256::ZERO)
            .await?;
        let gas_limit = self.gateway.padded_gas_limit(estimate);

        let receipt = contract
            .submit_for_receipt(data.into(), U256::ZERO, Some(gas_limit))
            .await?;

        let token_id = extract_minted_token_id(&receipt, self.nft_contract);
        if token_id.is_none() {
            warn!(hash = %receipt.transaction_hash, "Mint confirmed without a Transfer event");
        } else {
            info!(token_id = ?token_id, "Token minted");
        }

        Ok(TransactionOutcome::confirmed(receipt.transaction_hash)
            .with_extracted_value(token_id))
    }

    /// Replaces a token's metadata URI.
    ///
    /// The owner check runs before submission so a non-owner gets a
    /// fast, fee-free failure instead of a revert.
    #[instrument(skip(self, new_uri))]
    pub async fn update_metadata_uri(
        &self,
        token_id: &str,
        new_uri: &str,
    ) -> Result<TransactionOutcome, ClassifiedError> {
        self.update_metadata_uri_inner(token_id, new_uri)
            .await
            .map_err(|e| {
                warn!(error = %e, token_id, "Metadata update failed");
                classify(&e)
            })
    }

    async fn update_metadata_uri_inner(
        &self,
        token_id: &str,
        new_uri: &str,
    ) -> Result<TransactionOutcome, MarketError> {
        MintRequest {
            metadata_uri: new_uri.to_string(),
        }
        .validate()?;
        let id = parse_decimal_id(token_id)?;

        let contract = self.gateway.bind(self.nft_contract);

        let owner_data = contract
            .call(MarketNft::ownerOfCall { tokenId: id }.abi_encode().into())
            .await?;
        let owner = decode_return::<MarketNft::ownerOfCall>(&owner_data)?._0;
        if owner != self.gateway.sender() {
            return Err(MarketError::NotTokenOwner {
                token_id: token_id.to_string(),
                owner: format!("{owner:#x}"),
            });
        }

        let data = MarketNft::setTokenURICall {
            tokenId: id,
            tokenURI: new_uri.to_string(),
        }
        .abi_encode();

        let estimate = contract
            .estimate_gas(data.clone().into(), U256::ZERO)
            .await?;
        let gas_limit = self.gateway.padded_gas_limit(estimate);

        let outcome = contract
            .submit(data.into(), U256::ZERO, Some(gas_limit))
            .await?;
        info!(token_id, "Metadata URI updated");
        Ok(outcome)
    }
}

/// Pulls the minted token id out of the receipt's `Transfer` event.
///
/// The mint is the transfer from the zero address emitted by the NFT
/// contract itself; other contracts' transfers in the same receipt are
/// ignored.
fn extract_minted_token_id(receipt: &TxReceipt, nft_contract: Address) -> Option<String> {
    receipt.logs.iter().find_map(|log| {
        if log.address != nft_contract {
            return None;
        }
        match log.topics.as_slice() {
            [signature, from, _to, token_id]
                if *signature == MarketNft::Transfer::SIGNATURE_HASH
                    && *from == B256::ZERO =>
            {
                Some(U256::from_be_slice(token_id.as_slice()).to_string())
            }
            _ => None,
        }
    })
}
