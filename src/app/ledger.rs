//! Off-chain bid ledger coordination.
//!
//! Every confirmed bid is mirrored into two documents: the entry
//! itself and a reverse-index pointer. Both are written in one atomic
//! batch and deleted in one atomic batch, so the pair can never
//! diverge. The ledger is a discovery hint; the chain stays
//! authoritative for refund balances.

use std::sync::Arc;

use tracing::{debug, instrument};

use alloy::primitives::Address;

use crate::domain::{
    AuctionId, BidLedgerEntry, BidLedgerStore, LedgerError, LedgerWrite, MarketError,
};

/// Coordinator over the bid ledger document store.
pub struct BidLedgerCoordinator {
    store: Arc<dyn BidLedgerStore>,
}

impl BidLedgerCoordinator {
    #[must_use]
    pub fn new(store: Arc<dyn BidLedgerStore>) -> Self {
        Self { store }
    }

    /// Canonical document key for an account: lowercase 0x-prefixed hex.
    #[must_use]
    pub fn account_key(account: Address) -> String {
        format!("{account:#x}")
    }

    fn bid_path(account: Address, auction_id: &str) -> String {
        format!("accounts/{}/bids/{auction_id}", Self::account_key(account))
    }

    fn index_path(account: Address, auction_id: &str) -> String {
        format!("accounts/{}/index/{auction_id}", Self::account_key(account))
    }

    /// Records a confirmed bid for an account.
    ///
    /// Re-bidding on the same auction overwrites the existing pair,
    /// keeping one entry per (account, auction).
    #[instrument(skip(self), fields(account = %Self::account_key(account)))]
    pub async fn record_bid(
        &self,
        account: Address,
        auction_id: &str,
    ) -> Result<(), MarketError> {
        let entry = BidLedgerEntry::new(auction_id);
        let entry_value = serde_json::to_value(&entry)?;
        let index_value = serde_json::json!({ "auction_id": auction_id });

        let writes = [
            LedgerWrite::Put {
                path: Self::bid_path(account, auction_id),
                value: entry_value,
            },
            LedgerWrite::Put {
                path: Self::index_path(account, auction_id),
                value: index_value,
            },
        ];
        self.store.commit(&writes).await?;
        debug!(auction_id, "Bid recorded");
        Ok(())
    }

    /// Auction ids the account has bid on, oldest first.
    #[instrument(skip(self), fields(account = %Self::account_key(account)))]
    pub async fn tracked_auction_ids(
        &self,
        account: Address,
    ) -> Result<Vec<AuctionId>, MarketError> {
        let collection = format!("accounts/{}/bids", Self::account_key(account));
        let documents = self.store.list(&collection).await?;

        let mut entries = documents
            .into_iter()
            .map(|doc| {
                serde_json::from_value::<BidLedgerEntry>(doc)
                    .map_err(|e| LedgerError::Serialization(e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Ok(entries.into_iter().map(|e| e.auction_id).collect())
    }

    /// Removes the tracked bid after its refund is withdrawn.
    #[instrument(skip(self), fields(account = %Self::account_key(account)))]
    pub async fn clear_bid(&self, account: Address, auction_id: &str) -> Result<(), MarketError> {
        let writes = [
            LedgerWrite::Delete {
                path: Self::bid_path(account, auction_id),
            },
            LedgerWrite::Delete {
                path: Self::index_path(account, auction_id),
            },
        ];
        self.store.commit(&writes).await?;
        debug!(auction_id, "Bid cleared");
        Ok(())
    }
}
