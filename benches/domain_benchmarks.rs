use criterion::{black_box, criterion_group, criterion_main, Criterion};
use validator::Validate;

use alloy::primitives::{address, Address, U256};
use nft_market_core::domain::{
    classify, format_eth, parse_eth, policy, AuctionSnapshot, ChainError, CreateAuctionRequest,
    MarketError,
};

fn bench_validation(c: &mut Criterion) {
    let request = CreateAuctionRequest {
        nft_address: Address::ZERO,
        token_id: "42".to_string(),
        reserve_price: "1.5".to_string(),
        duration_secs: 86_400,
        min_increment_percent: 2.5,
    };

    c.bench_function("validate_create_auction_request", |b| {
        b.iter(|| {
            let _ = black_box(&request).validate();
        })
    });
}

fn bench_classification(c: &mut Criterion) {
    let errors = [
        MarketError::Chain(ChainError::Signer {
            code: Some(4001),
            message: "User rejected the request".to_string(),
        }),
        MarketError::Chain(ChainError::Rpc {
            code: -32000,
            message: "insufficient funds for gas * price + value".to_string(),
        }),
        MarketError::Chain(ChainError::Reverted {
            reason: Some("Bid below reserve".to_string()),
        }),
        MarketError::Internal("poisoned lock".to_string()),
    ];

    c.bench_function("classify_error", |b| {
        b.iter(|| {
            for error in black_box(&errors) {
                let _ = classify(error);
            }
        })
    });
}

fn bench_policy_evaluation(c: &mut Criterion) {
    let snapshot = AuctionSnapshot {
        auction_id: "7".to_string(),
        seller: address!("00000000000000000000000000000000000000aa"),
        nft_contract: address!("00000000000000000000000000000000000000bb"),
        token_id: "5".to_string(),
        end_time: 1_900_000_000,
        min_increment_bps: 250,
        reserve_price: "1.5".to_string(),
        highest_bidder: address!("00000000000000000000000000000000000000cc"),
        highest_bid: "2".to_string(),
        settled: false,
    };
    let viewer = address!("00000000000000000000000000000000000000dd");

    c.bench_function("evaluate_auction_actions", |b| {
        b.iter(|| {
            let _ = policy::evaluate(black_box(&snapshot), viewer, 1_850_000_000);
        })
    });
}

fn bench_eth_conversions(c: &mut Criterion) {
    let wei = U256::from(1_234_500_000_000_000_000u128);

    c.bench_function("parse_eth", |b| {
        b.iter(|| {
            let _ = parse_eth(black_box("1.2345"));
        })
    });

    c.bench_function("format_eth", |b| {
        b.iter(|| {
            let _ = format_eth(black_box(wei));
        })
    });
}

criterion_group!(
    benches,
    bench_validation,
    bench_classification,
    bench_policy_evaluation,
    bench_eth_conversions
);
criterion_main!(benches);
