//! Auction orchestration service.

use std::sync::Arc;

use tracing::{info, instrument, warn};
use validator::Validate;

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;

use crate::domain::{
    classify, format_eth, parse_decimal_id, parse_eth, percent_to_bps, AuctionSnapshot,
    ChainError, ClassifiedError, CreateAuctionRequest, MarketError, PlaceBidRequest,
    TransactionOutcome,
};
use crate::infra::chain::abi::{decode_return, AuctionHouse, MarketNft};
use crate::infra::chain::ContractGateway;

use super::ledger::BidLedgerCoordinator;

/// Service for creating, bidding on, and resolving auctions.
pub struct AuctionService {
    gateway: Arc<ContractGateway>,
    auction_house: Address,
    ledger: Option<Arc<BidLedgerCoordinator>>,
}

impl AuctionService {
    #[must_use]
    pub fn new(gateway: Arc<ContractGateway>, auction_house: Address) -> Self {
        Self {
            gateway,
            auction_house,
            ledger: None,
        }
    }

    /// Attach the bid ledger so confirmed bids are tracked for refunds.
    #[must_use]
    pub fn with_ledger(mut self, ledger: Arc<BidLedgerCoordinator>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Reads the current on-chain state of an auction.
    #[instrument(skip(self))]
    pub async fn get_auction(&self, auction_id: &str) -> Result<AuctionSnapshot, ClassifiedError> {
        self.get_auction_inner(auction_id)
            .await
            .map_err(|e| classify(&e))
    }

    async fn get_auction_inner(&self, auction_id: &str) -> Result<AuctionSnapshot, MarketError> {
        let id = parse_decimal_id(auction_id)?;
        let data = self
            .gateway
            .bind(self.auction_house)
            .call(AuctionHouse::auctionsCall { auctionId: id }.abi_encode().into())
            .await?;
        let ret = decode_return::<AuctionHouse::auctionsCall>(&data)?;

        Ok(AuctionSnapshot {
            auction_id: auction_id.trim().to_string(),
            seller: ret.seller,
            nft_contract: ret.nftContract,
            token_id: ret.tokenId.to_string(),
            end_time: narrow::<u64>(ret.endTime, "endTime")?,
            min_increment_bps: narrow::<u32>(ret.minIncrementBps, "minIncrementBps")?,
            reserve_price: format_eth(ret.reservePrice),
            highest_bidder: ret.highestBidder,
            highest_bid: format_eth(ret.highestBid),
            settled: ret.settled,
        })
    }

    /// Creates an auction, approving the auction house first if needed.
    ///
    /// The approval transaction must be mined before `createAuction` is
    /// submitted; the contract pulls the token during creation and an
    /// unapproved pull reverts.
    #[instrument(skip(self, request), fields(token_id = %request.token_id))]
    pub async fn create_auction(
        &self,
        request: &CreateAuctionRequest,
    ) -> Result<TransactionOutcome, ClassifiedError> {
        self.create_auction_inner(request).await.map_err(|e| {
            warn!(error = %e, "Auction creation failed");
            classify(&e)
        })
    }

    async fn create_auction_inner(
        &self,
        request: &CreateAuctionRequest,
    ) -> Result<TransactionOutcome, MarketError> {
        request.validate()?;
        let token_id = parse_decimal_id(&request.token_id)?;
        let reserve = parse_eth(&request.reserve_price)?;
        let increment_bps = percent_to_bps(request.min_increment_percent);

        self.ensure_approval(request.nft_address, token_id).await?;

        let data = AuctionHouse::createAuctionCall {
            nftContract: request.nft_address,
            tokenId: token_id,
            reservePrice: reserve,
            duration: U256::from(request.duration_secs),
            minIncrementBps: U256::from(increment_bps),
        }
        .abi_encode();

        let outcome = self
            .gateway
            .bind(self.auction_house)
            .submit(data.into(), U256::ZERO, None)
            .await?;
        info!(token_id = %request.token_id, "Auction created");
        Ok(outcome)
    }

    async fn ensure_approval(&self, nft: Address, token_id: U256) -> Result<(), MarketError> {
        let contract = self.gateway.bind(nft);

        let approved_data = contract
            .call(
                MarketNft::getApprovedCall { tokenId: token_id }
                    .abi_encode()
                    .into(),
            )
            .await?;
        let approved = decode_return::<MarketNft::getApprovedCall>(&approved_data)?._0;
        if approved == self.auction_house {
            return Ok(());
        }

        let operator_data = contract
            .call(
                MarketNft::isApprovedForAllCall {
                    owner: self.gateway.sender(),
                    operator: self.auction_house,
                }
                .abi_encode()
                .into(),
            )
            .await?;
        if decode_return::<MarketNft::isApprovedForAllCall>(&operator_data)?._0 {
            return Ok(());
        }

        info!(token_id = %token_id, "Approving auction house for token");
        let data = MarketNft::approveCall {
            to: self.auction_house,
            tokenId: token_id,
        }
        .abi_encode();
        contract.submit(data.into(), U256::ZERO, None).await?;
        Ok(())
    }

    /// Places a bid, escrowing the amount with the auction contract.
    ///
    /// After the bid confirms, the ledger entry is recorded for refund
    /// discovery. A ledger write failure does not fail the bid; the
    /// chain already holds the escrow.
    #[instrument(skip(self, request), fields(auction_id = %request.auction_id))]
    pub async fn bid(
        &self,
        request: &PlaceBidRequest,
    ) -> Result<TransactionOutcome, ClassifiedError> {
        self.bid_inner(request).await.map_err(|e| {
            warn!(error = %e, "Bid failed");
            classify(&e)
        })
    }

    async fn bid_inner(
        &self,
        request: &PlaceBidRequest,
    ) -> Result<TransactionOutcome, MarketError> {
        request.validate()?;
        let id = parse_decimal_id(&request.auction_id)?;
        let value = parse_eth(&request.bid_amount)?;

        let data = AuctionHouse::bidCall { auctionId: id }.abi_encode();
        let outcome = self
            .gateway
            .bind(self.auction_house)
            .submit(data.into(), value, None)
            .await?;
        info!(amount = %request.bid_amount, "Bid placed");

        if let Some(ledger) = &self.ledger {
            if let Err(e) = ledger
                .record_bid(self.gateway.sender(), &request.auction_id)
                .await
            {
                warn!(error = %e, auction_id = %request.auction_id, "Failed to record bid in ledger");
            }
        }
        Ok(outcome)
    }

    /// Settles an ended auction, transferring token and proceeds.
    #[instrument(skip(self))]
    pub async fn settle(&self, auction_id: &str) -> Result<TransactionOutcome, ClassifiedError> {
        self.simple_submit(auction_id, |id| {
            AuctionHouse::settleCall { auctionId: id }.abi_encode()
        })
        .await
        .map_err(|e| {
            warn!(error = %e, auction_id, "Settle failed");
            classify(&e)
        })
    }

    /// Cancels an auction that has no bids, returning the token.
    #[instrument(skip(self))]
    pub async fn cancel(&self, auction_id: &str) -> Result<TransactionOutcome, ClassifiedError> {
        self.simple_submit(auction_id, |id| {
            AuctionHouse::cancelCall { auctionId: id }.abi_encode()
        })
        .await
        .map_err(|e| {
            warn!(error = %e, auction_id, "Cancel failed");
            classify(&e)
        })
    }

    /// Withdraws the caller's outbid escrow for an auction.
    #[instrument(skip(self))]
    pub async fn withdraw_refund(
        &self,
        auction_id: &str,
    ) -> Result<TransactionOutcome, ClassifiedError> {
        self.simple_submit(auction_id, |id| {
            AuctionHouse::withdrawRefundCall { auctionId: id }.abi_encode()
        })
        .await
        .map_err(|e| {
            warn!(error = %e, auction_id, "Refund withdrawal failed");
            classify(&e)
        })
    }

    async fn simple_submit(
        &self,
        auction_id: &str,
        encode: impl FnOnce(U256) -> Vec<u8>,
    ) -> Result<TransactionOutcome, MarketError> {
        let id = parse_decimal_id(auction_id)?;
        let outcome = self
            .gateway
            .bind(self.auction_house)
            .submit(encode(id).into(), U256::ZERO, None)
            .await?;
        Ok(outcome)
    }
}

fn narrow<T: TryFrom<U256>>(value: U256, field: &str) -> Result<T, MarketError> {
    T::try_from(value).map_err(|_| {
        MarketError::Chain(ChainError::InvalidResponse(format!(
            "{field} out of range: {value}"
        )))
    })
}
