//! Advisory predicates over an auction snapshot.
//!
//! Pure functions of a snapshot, a viewer, and a clock reading. The
//! contract remains authoritative; these predicates only drive what the
//! client offers to the user, so a stale snapshot can make an offered
//! action fail on chain and that is handled like any other revert.

use alloy::primitives::Address;

use super::types::AuctionSnapshot;

/// Actions the client may offer to a viewer of an auction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuctionActions {
    pub can_bid: bool,
    pub can_settle: bool,
    pub can_cancel: bool,
    pub can_withdraw_refund: bool,
}

/// Bidding is open while the auction is live and unsettled.
#[must_use]
pub fn can_bid(snapshot: &AuctionSnapshot, now_unix: u64) -> bool {
    !snapshot.settled && snapshot.end_time > now_unix
}

/// Anyone may settle once the end time has passed and nobody has yet.
#[must_use]
pub fn can_settle(snapshot: &AuctionSnapshot, now_unix: u64) -> bool {
    !snapshot.settled && snapshot.end_time <= now_unix
}

/// The seller may cancel while there is no highest bidder.
///
/// Mirrors the contract exactly: no time bound, so a reserve-not-met
/// auction stays cancellable after its end time.
#[must_use]
pub fn can_cancel(snapshot: &AuctionSnapshot, viewer: Address) -> bool {
    !snapshot.settled && snapshot.seller == viewer && snapshot.has_no_bids()
}

/// An outbid participant may have a refund waiting.
///
/// Advisory only: the snapshot cannot see the refund balance, so this
/// returns true whenever the viewer is a non-leading participant and the
/// live chain read decides for real.
#[must_use]
pub fn may_hold_refund(snapshot: &AuctionSnapshot, viewer: Address) -> bool {
    !snapshot.has_no_bids() && snapshot.highest_bidder != viewer
}

/// Evaluates every predicate at once for a viewer.
#[must_use]
pub fn evaluate(snapshot: &AuctionSnapshot, viewer: Address, now_unix: u64) -> AuctionActions {
    AuctionActions {
        can_bid: can_bid(snapshot, now_unix),
        can_settle: can_settle(snapshot, now_unix),
        can_cancel: can_cancel(snapshot, viewer),
        can_withdraw_refund: may_hold_refund(snapshot, viewer),
    }
}
