//! Fixed-price marketplace listing service.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use validator::Validate;

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;

use crate::domain::{
    classify, format_eth, parse_decimal_id, parse_eth, ClassifiedError, ListForSaleRequest,
    MarketError, TransactionOutcome,
};
use crate::infra::chain::abi::{decode_return, Marketplace};
use crate::infra::chain::ContractGateway;

/// Service for fixed-price listings and purchases.
pub struct ListingService {
    gateway: Arc<ContractGateway>,
    marketplace_contract: Address,
}

impl ListingService {
    #[must_use]
    pub fn new(gateway: Arc<ContractGateway>, marketplace_contract: Address) -> Self {
        Self {
            gateway,
            marketplace_contract,
        }
    }

    /// Current listing fee as a decimal ETH string.
    #[instrument(skip(self))]
    pub async fn listing_fee(&self) -> Result<String, ClassifiedError> {
        self.listing_fee_wei()
            .await
            .map(format_eth)
            .map_err(|e| classify(&e))
    }

    async fn listing_fee_wei(&self) -> Result<U256, MarketError> {
        let contract = self.gateway.bind(self.marketplace_contract);
        let data = contract
            .call(Marketplace::getListingFeeCall {}.abi_encode().into())
            .await?;
        Ok(decode_return::<Marketplace::getListingFeeCall>(&data)?._0)
    }

    /// Lists a token for fixed-price sale.
    ///
    /// The listing fee is read immediately before submission and
    /// attached as the transaction value, so a fee change between app
    /// start and listing cannot underpay the contract.
    #[instrument(skip(self, request), fields(token_id = %request.token_id))]
    pub async fn list_for_sale(
        &self,
        request: &ListForSaleRequest,
    ) -> Result<TransactionOutcome, ClassifiedError> {
        self.list_for_sale_inner(request).await.map_err(|e| {
            warn!(error = %e, "Listing failed");
            classify(&e)
        })
    }

    async fn list_for_sale_inner(
        &self,
        request: &ListForSaleRequest,
    ) -> Result<TransactionOutcome, MarketError> {
        request.validate()?;
        let price = parse_eth(&request.price)?;
        let token_id = parse_decimal_id(&request.token_id)?;
        let fee = self.listing_fee_wei().await?;

        let data = Marketplace::createMarketItemCall {
            nftContract: request.nft_address,
            tokenId: token_id,
            price,
        }
        .abi_encode();

        let outcome = self
            .gateway
            .bind(self.marketplace_contract)
            .submit(data.into(), fee, None)
            .await?;
        info!(token_id = %request.token_id, price = %request.price, "Token listed");
        Ok(outcome)
    }

    /// Purchases a listed item at its asking price.
    #[instrument(skip(self))]
    pub async fn purchase(
        &self,
        nft_address: Address,
        item_id: &str,
        price: &str,
    ) -> Result<TransactionOutcome, ClassifiedError> {
        self.purchase_inner(nft_address, item_id, price)
            .await
            .map_err(|e| {
                warn!(error = %e, item_id, "Purchase failed");
                classify(&e)
            })
    }

    async fn purchase_inner(
        &self,
        nft_address: Address,
        item_id: &str,
        price: &str,
    ) -> Result<TransactionOutcome, MarketError> {
        let id = parse_decimal_id(item_id)?;
        let value = parse_eth(price)?;

        let data = Marketplace::createMarketSaleCall {
            nftContract: nft_address,
            itemId: id,
        }
        .abi_encode();

        let outcome = self
            .gateway
            .bind(self.marketplace_contract)
            .submit(data.into(), value, None)
            .await?;
        info!(item_id, "Item purchased");
        Ok(outcome)
    }
}
