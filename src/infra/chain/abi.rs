//! Contract ABI bindings and revert decoding.
//!
//! The `sol!` interfaces mirror the deployed marketplace contracts.
//! Calldata encoding and return decoding happen here; nothing above
//! this module touches selectors or ABI words.

use alloy::primitives::hex;
use alloy::sol;
use alloy::sol_types::{Revert, SolCall, SolError};

use crate::domain::ChainError;

sol! {
    /// ERC-721 NFT contract with owner-gated metadata updates.
    #[derive(Debug)]
    interface MarketNft {
        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);

        function mintToken(string tokenURI) external returns (uint256);
        function setTokenURI(uint256 tokenId, string tokenURI) external;
        function ownerOf(uint256 tokenId) external view returns (address);
        function approve(address to, uint256 tokenId) external;
        function getApproved(uint256 tokenId) external view returns (address);
        function isApprovedForAll(address owner, address operator) external view returns (bool);
    }

    /// Fixed-price marketplace contract.
    #[derive(Debug)]
    interface Marketplace {
        function getListingFee() external view returns (uint256);
        function createMarketItem(address nftContract, uint256 tokenId, uint256 price) external payable;
        function createMarketSale(address nftContract, uint256 itemId) external payable;
    }

    /// English auction contract with pull-based refunds.
    #[derive(Debug)]
    interface AuctionHouse {
        function auctions(uint256 auctionId) external view returns (
            address seller,
            address nftContract,
            uint256 tokenId,
            uint256 endTime,
            uint256 minIncrementBps,
            uint256 reservePrice,
            address highestBidder,
            uint256 highestBid,
            bool settled
        );
        function createAuction(
            address nftContract,
            uint256 tokenId,
            uint256 reservePrice,
            uint256 duration,
            uint256 minIncrementBps
        ) external;
        function bid(uint256 auctionId) external payable;
        function settle(uint256 auctionId) external;
        function cancel(uint256 auctionId) external;
        function withdrawRefund(uint256 auctionId) external;
    }
}

/// Decodes a call's return data, mapping ABI mismatches to a chain error.
pub fn decode_return<C: SolCall>(data: &[u8]) -> Result<C::Return, ChainError> {
    C::abi_decode_returns(data, true).map_err(|e| ChainError::InvalidResponse(e.to_string()))
}

/// Decodes a standard `Error(string)` revert payload into its reason.
///
/// Returns `None` for empty payloads, custom errors, and anything else
/// that is not the canonical string revert.
#[must_use]
pub fn decode_revert_reason(payload: &str) -> Option<String> {
    let bytes = hex::decode(payload.trim_start_matches("0x")).ok()?;
    Revert::abi_decode(&bytes, true).ok().map(|r| r.reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256, U256};
    use alloy::sol_types::{SolCall, SolEvent};

    #[test]
    fn test_transfer_event_signature() {
        // keccak256("Transfer(address,address,uint256)")
        assert_eq!(
            MarketNft::Transfer::SIGNATURE_HASH,
            b256!("ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef")
        );
    }

    #[test]
    fn test_mint_call_round_trip() {
        let call = MarketNft::mintTokenCall {
            tokenURI: "https://meta.example/1.json".to_string(),
        };
        let encoded = call.abi_encode();
        assert_eq!(&encoded[..4], MarketNft::mintTokenCall::SELECTOR);
        let decoded = MarketNft::mintTokenCall::abi_decode(&encoded, true).unwrap();
        assert_eq!(decoded.tokenURI, "https://meta.example/1.json");
    }

    #[test]
    fn test_auctions_return_decoding() {
        let ret = AuctionHouse::auctionsReturn {
            seller: address!("00000000000000000000000000000000000000aa"),
            nftContract: address!("00000000000000000000000000000000000000bb"),
            tokenId: U256::from(5u64),
            endTime: U256::from(1_900_000_000u64),
            minIncrementBps: U256::from(250u64),
            reservePrice: U256::from(1_000_000_000_000_000_000u128),
            highestBidder: address!("00000000000000000000000000000000000000cc"),
            highestBid: U256::from(2_000_000_000_000_000_000u128),
            settled: false,
        };
        let encoded = AuctionHouse::auctionsCall::abi_encode_returns(&(
            ret.seller,
            ret.nftContract,
            ret.tokenId,
            ret.endTime,
            ret.minIncrementBps,
            ret.reservePrice,
            ret.highestBidder,
            ret.highestBid,
            ret.settled,
        ));
        let decoded = AuctionHouse::auctionsCall::abi_decode_returns(&encoded, true).unwrap();
        assert_eq!(decoded.seller, ret.seller);
        assert_eq!(decoded.tokenId, U256::from(5u64));
        assert!(!decoded.settled);
    }

    #[test]
    fn test_decode_revert_reason() {
        let payload = concat!(
            "0x08c379a0",
            "0000000000000000000000000000000000000000000000000000000000000020",
            "000000000000000000000000000000000000000000000000000000000000000f",
            "4d657461646174612066726f7a656e0000000000000000000000000000000000",
        );
        assert_eq!(
            decode_revert_reason(payload).as_deref(),
            Some("Metadata frozen")
        );
    }

    #[test]
    fn test_decode_revert_reason_rejects_garbage() {
        assert!(decode_revert_reason("0x").is_none());
        assert!(decode_revert_reason("not hex").is_none());
        // A custom error selector is not an Error(string) revert.
        assert!(decode_revert_reason("0xdeadbeef").is_none());
    }
}
