//! Refund reconciliation over the bid ledger.
//!
//! The ledger only remembers which auctions an account has bid on; the
//! live chain decides whether anything is actually withdrawable. A
//! snapshot that cannot be read is skipped and retried on the next
//! scan rather than failing the whole pass.

use std::sync::Arc;

use tracing::{info, instrument, warn};

use crate::domain::{classify, AuctionId, ClassifiedError, TransactionOutcome};
use crate::infra::chain::ContractGateway;

use super::auction::AuctionService;
use super::ledger::BidLedgerCoordinator;

/// Scanner that reconciles tracked bids against live auction state.
pub struct RefundScanner {
    gateway: Arc<ContractGateway>,
    auctions: Arc<AuctionService>,
    ledger: Arc<BidLedgerCoordinator>,
}

impl RefundScanner {
    #[must_use]
    pub fn new(
        gateway: Arc<ContractGateway>,
        auctions: Arc<AuctionService>,
        ledger: Arc<BidLedgerCoordinator>,
    ) -> Self {
        Self {
            gateway,
            auctions,
            ledger,
        }
    }

    /// Auction ids where the account may have a refund waiting.
    ///
    /// Checks every tracked auction against its current snapshot and
    /// keeps those where the account is a non-leading participant.
    #[instrument(skip(self))]
    pub async fn scan_withdrawable(&self) -> Result<Vec<AuctionId>, ClassifiedError> {
        let account = self.gateway.sender();
        let tracked = self
            .ledger
            .tracked_auction_ids(account)
            .await
            .map_err(|e| classify(&e))?;

        let mut withdrawable = Vec::new();
        for auction_id in tracked {
            match self.auctions.get_auction(&auction_id).await {
                Ok(snapshot) => {
                    if crate::domain::policy::may_hold_refund(&snapshot, account) {
                        withdrawable.push(auction_id);
                    }
                }
                Err(e) => {
                    warn!(auction_id, error = %e, "Skipping unreadable auction");
                }
            }
        }
        info!(count = withdrawable.len(), "Refund scan complete");
        Ok(withdrawable)
    }

    /// Withdraws the refund for one auction and clears its ledger entry.
    ///
    /// The ledger clear runs only after the withdrawal confirms. A
    /// failed clear leaves a stale entry behind, which the next scan
    /// resolves against the chain again.
    #[instrument(skip(self))]
    pub async fn withdraw(
        &self,
        auction_id: &str,
    ) -> Result<TransactionOutcome, ClassifiedError> {
        let outcome = self.auctions.withdraw_refund(auction_id).await?;

        let account = self.gateway.sender();
        if let Err(e) = self.ledger.clear_bid(account, auction_id).await {
            warn!(auction_id, error = %e, "Refund withdrawn but ledger clear failed");
        }
        Ok(outcome)
    }
}
