//! End-to-end integration tests for the fairdrop auction toolkit.
//!
//! These tests exercise the full auction lifecycle against a mock program
//! that applies transition calls to in-memory mappings:
//! 1. Auction creation from a sale token record
//! 2. Bids at the decaying price
//! 3. Closing and clearing
//! 4. Claims and creator withdrawals
//! 5. Read-side listing through the registry

#![cfg(test)]

use fairdrop_client::{
    claim_call, close_auction_call, place_bid, withdraw_payments_call, withdraw_unsold_call,
    withdrawable_revenue, withdrawable_unsold, BidBuilder, ClientError, CreateAuctionBuilder,
    SnapshotReader, TransitionCall,
};
use fairdrop_pricing::{current_price, demand_percent, price_curve, DecaySchedule};
use fairdrop_registry::{names, AuctionRegistry, InMemoryMappings, ListFilter, MappingReader};
use fairdrop_types::plaintext::{
    parse_auction_config, parse_auction_state, parse_bid_record, parse_stats, parse_token_record,
    parse_u128, parse_u32, parse_u64, u128_literal, u64_literal,
};
use fairdrop_types::{
    AuctionConfig, AuctionState, AuctionStatus, BlockHeight, Field, Stats, NULL_FIELD,
};

use rand::Rng;

// =========================
// MOCK PROGRAM
// =========================

/// Applies transition calls to mappings the way the deployed program would.
struct MockProgram {
    mappings: InMemoryMappings,
    nonce: u64,
}

impl MockProgram {
    fn new() -> Self {
        let mut mappings = InMemoryMappings::new();
        mappings.insert(
            names::STATS,
            names::STATS_KEY,
            Stats::default().to_plaintext(),
        );
        Self { mappings, nonce: 0 }
    }

    fn read(&self, mapping: &str, key: &str) -> Option<String> {
        self.mappings.get_mapping_value(mapping, key).unwrap()
    }

    fn amount(&self, mapping: &str, key: &str) -> u128 {
        self.read(mapping, key)
            .map_or(0, |raw| parse_u128(&raw).unwrap())
    }

    fn stats(&self) -> Stats {
        parse_stats(&self.read(names::STATS, names::STATS_KEY).unwrap()).unwrap()
    }

    fn config(&self, auction_id: &str) -> AuctionConfig {
        parse_auction_config(&self.read(names::AUCTION_CONFIGS, auction_id).unwrap()).unwrap()
    }

    fn state(&self, auction_id: &str) -> AuctionState {
        parse_auction_state(&self.read(names::AUCTION_STATES, auction_id).unwrap()).unwrap()
    }

    fn registry(&self) -> AuctionRegistry<&InMemoryMappings> {
        AuctionRegistry::new(&self.mappings)
    }

    fn create_auction(&mut self, call: &TransitionCall) -> Field {
        assert_eq!(call.function, "create_auction");
        let inputs = &call.inputs;
        let sale = parse_token_record(&inputs[0]).unwrap();

        let mut stats = self.stats();
        let auction_id = format!("{}field", 1000 + stats.total_auctions);
        let config = AuctionConfig {
            auction_id: auction_id.clone(),
            creator: sale.owner.clone(),
            sale_token_id: sale.token_id,
            payment_token_id: inputs[1].clone(),
            supply: sale.amount,
            start_price: parse_u128(&inputs[2]).unwrap(),
            floor_price: parse_u128(&inputs[3]).unwrap(),
            start_block: parse_u32(&inputs[4]).unwrap(),
            end_block: parse_u32(&inputs[5]).unwrap(),
            price_decay_blocks: parse_u32(&inputs[6]).unwrap(),
            price_decay_amount: parse_u128(&inputs[7]).unwrap(),
            max_bid_amount: parse_u128(&inputs[8]).unwrap(),
            min_bid_amount: parse_u128(&inputs[9]).unwrap(),
        };

        let creator = sale.owner;
        let previous = self
            .read(names::CREATOR_LATEST_AUCTION, &creator)
            .unwrap_or_else(|| NULL_FIELD.to_string());
        let count = self
            .read(names::CREATOR_AUCTION_COUNT, &creator)
            .map_or(0, |raw| parse_u64(&raw).unwrap());

        self.mappings
            .insert(names::AUCTION_CONFIGS, &auction_id, config.to_plaintext())
            .insert(
                names::AUCTION_STATES,
                &auction_id,
                AuctionState::default().to_plaintext(),
            )
            .insert(
                names::AUCTION_INDEX,
                u64_literal(stats.total_auctions),
                &auction_id,
            )
            .insert(names::ESCROW_SALES, &auction_id, u128_literal(config.supply))
            .insert(names::AUCTION_PREV_BY_CREATOR, &auction_id, previous)
            .insert(names::CREATOR_LATEST_AUCTION, &creator, &auction_id)
            .insert(names::CREATOR_AUCTION_COUNT, &creator, u64_literal(count + 1));

        stats.total_auctions += 1;
        self.mappings
            .insert(names::STATS, names::STATS_KEY, stats.to_plaintext());

        auction_id
    }

    /// Returns the bidder's private bid record.
    fn place_bid(&mut self, call: &TransitionCall, block: BlockHeight) -> String {
        assert_eq!(call.function, "place_bid");
        let payment = parse_token_record(&call.inputs[0]).unwrap();
        let auction_id = &call.inputs[1];
        let quantity = parse_u128(&call.inputs[2]).unwrap();

        let config = self.config(auction_id);
        let mut state = self.state(auction_id);
        assert!(!state.supply_met && block >= config.start_block && block < config.end_block);

        let price = current_price(&config, block).unwrap();
        let cost = quantity * price;
        assert!(cost <= payment.amount, "payment record does not cover the bid");

        state.total_committed += quantity;
        state.total_payments += cost;
        if state.total_committed >= config.supply {
            state.supply_met = true;
            state.ended_at_block = block;
        }
        let escrowed = self.amount(names::ESCROW_PAYMENTS, auction_id) + cost;
        self.mappings
            .insert(names::AUCTION_STATES, auction_id, state.to_plaintext())
            .insert(names::ESCROW_PAYMENTS, auction_id, u128_literal(escrowed));

        let mut stats = self.stats();
        stats.total_bids += 1;
        self.mappings
            .insert(names::STATS, names::STATS_KEY, stats.to_plaintext());

        self.nonce += 1;
        format!(
            "{{\n  owner: {}.private,\n  auction_id: {}.private,\n  quantity: {}u128.private,\n  payment_amount: {}u128.private,\n  _nonce: {}group.public\n}}",
            payment.owner, auction_id, quantity, cost, self.nonce
        )
    }

    /// Close and clear in one step: the clearing price is the price at the
    /// block the auction ended.
    fn close_auction(&mut self, call: &TransitionCall) {
        assert_eq!(call.function, "close_auction");
        let auction_id = &call.inputs[0];
        let config = self.config(auction_id);
        let mut state = self.state(auction_id);
        assert!(!state.cleared);

        if !state.supply_met {
            state.ended_at_block = config.end_block;
        }
        state.clearing_price = current_price(&config, state.ended_at_block).unwrap();
        state.creator_revenue = state.total_committed * state.clearing_price;
        state.cleared = true;
        self.mappings
            .insert(names::AUCTION_STATES, auction_id, state.to_plaintext());
    }

    /// Returns `(sale_tokens, refund)` paid out to the bidder.
    fn claim(&mut self, call: &TransitionCall) -> (u128, u128) {
        assert_eq!(call.function, "claim");
        let bid = parse_bid_record(&call.inputs[0]).unwrap();
        let state = self.state(&bid.auction_id);
        assert_eq!(parse_u128(&call.inputs[1]).unwrap(), state.clearing_price);

        let refund = bid.payment_amount - bid.quantity * state.clearing_price;
        let sales = self.amount(names::ESCROW_SALES, &bid.auction_id) - bid.quantity;
        let payments = self.amount(names::ESCROW_PAYMENTS, &bid.auction_id) - refund;
        self.mappings
            .insert(names::ESCROW_SALES, &bid.auction_id, u128_literal(sales))
            .insert(names::ESCROW_PAYMENTS, &bid.auction_id, u128_literal(payments));
        (bid.quantity, refund)
    }

    fn withdraw(&mut self, call: &TransitionCall) {
        let auction_id = &call.inputs[0];
        let amount = parse_u128(&call.inputs[1]).unwrap();
        let (escrow, withdrawn) = match call.function.as_str() {
            "withdraw_payments" => (names::ESCROW_PAYMENTS, names::CREATOR_WITHDRAWN),
            "withdraw_unsold" => (names::ESCROW_SALES, names::UNSOLD_WITHDRAWN),
            other => panic!("unexpected transition {other}"),
        };

        let remaining = self.amount(escrow, auction_id) - amount;
        let total = self.amount(withdrawn, auction_id) + amount;
        self.mappings
            .insert(escrow, auction_id, u128_literal(remaining))
            .insert(withdrawn, auction_id, u128_literal(total));
    }
}

fn token_record(owner: &str, token_id: &str, amount: u128) -> String {
    format!(
        "{{\n  owner: {owner}.private,\n  token_id: {token_id}.private,\n  amount: {amount}u128.private,\n  _nonce: 1group.public\n}}"
    )
}

/// 1000 sale tokens from 1000 down to 100, 90 every 100 blocks over
/// blocks 10..1010.
fn standard_auction(creator: &str, supply: u128) -> CreateAuctionBuilder {
    CreateAuctionBuilder::new(token_record(creator, "1field", supply))
        .payment_token("4field")
        .prices(1000, 100)
        .window(10, 1010)
        .decay(100, 90)
        .bid_bounds(1, 0)
}

// =========================
// LIFECYCLE
// =========================

/// Test the complete auction flow: an auction that runs to its end block
/// without selling out clears at the floor price.
#[test]
fn test_full_auction_flow() {
    let mut program = MockProgram::new();

    // ========================================
    // Phase 1: Create auction
    // ========================================

    let create = standard_auction("aleo1alice", 1000).build().unwrap();
    let auction_id = program.create_auction(&create);
    let config = program.config(&auction_id);
    assert_eq!(config.supply, 1000);
    assert_eq!(config.creator, "aleo1alice");

    println!("Auction {} created", auction_id);

    // ========================================
    // Phase 2: Bidding
    // ========================================

    let state = program.state(&auction_id);
    assert_eq!(
        program.registry().auction(&auction_id).unwrap().status(5),
        AuctionStatus::Upcoming
    );

    let bid_a = BidBuilder::new(&config)
        .state(&state)
        .payment_record(token_record("aleo1bidder_a", "4field", 1_000_000))
        .quantity(300)
        .build(10)
        .unwrap();
    assert_eq!(bid_a.price, 1000);
    let record_a = program.place_bid(&bid_a.call, 10);

    let state = program.state(&auction_id);
    let bid_b = BidBuilder::new(&config)
        .state(&state)
        .payment_record(token_record("aleo1bidder_b", "4field", 200_000))
        .quantity(200)
        .build(215)
        .unwrap();
    assert_eq!(bid_b.price, 820);
    assert_eq!(bid_b.total_cost, 164_000);
    let record_b = program.place_bid(&bid_b.call, 215);

    let entry = program.registry().auction(&auction_id).unwrap();
    let state = entry.state.clone().unwrap();
    assert_eq!(state.total_committed, 500);
    assert_eq!(state.total_payments, 464_000);
    assert_eq!(demand_percent(&state, &config), 50);
    assert_eq!(entry.status(900), AuctionStatus::Active);
    assert_eq!(entry.status(950), AuctionStatus::Ending);
    assert_eq!(entry.status(1010), AuctionStatus::Ended);

    println!("Bids placed: {} committed", state.total_committed);

    // ========================================
    // Phase 3: Close and clear
    // ========================================

    assert!(matches!(
        close_auction_call(&config, &state, 500),
        Err(ClientError::CannotClose(AuctionStatus::Active))
    ));
    let close = close_auction_call(&config, &state, 1010).unwrap();
    program.close_auction(&close);

    let state = program.state(&auction_id);
    assert_eq!(state.final_price(), Some(100));
    assert_eq!(state.creator_revenue, 50_000);
    assert_eq!(
        program.registry().auction(&auction_id).unwrap().status(1010),
        AuctionStatus::Cleared
    );

    // ========================================
    // Phase 4: Claims
    // ========================================

    let claim_a = claim_call(&record_a, &config, &state).unwrap();
    assert_eq!(claim_a.settlement.cost_at_clearing, 30_000);
    assert_eq!(claim_a.settlement.refund, 270_000);
    assert_eq!(program.claim(&claim_a.call), (300, 270_000));

    let claim_b = claim_call(&record_b, &config, &state).unwrap();
    assert_eq!(claim_b.settlement.refund, 144_000);
    assert_eq!(program.claim(&claim_b.call), (200, 144_000));

    // ========================================
    // Phase 5: Creator withdrawals
    // ========================================

    let escrow = program.registry().escrow(&auction_id).unwrap();
    assert_eq!(escrow.payments, 50_000);
    assert_eq!(escrow.sales, 500);
    assert_eq!(withdrawable_revenue(&state, &escrow), 50_000);
    assert_eq!(withdrawable_unsold(&config, &state, &escrow), 500);

    program.withdraw(&withdraw_payments_call(&config, &state, &escrow, 20_000).unwrap());
    let escrow = program.registry().escrow(&auction_id).unwrap();
    assert_eq!(withdrawable_revenue(&state, &escrow), 30_000);
    assert!(matches!(
        withdraw_payments_call(&config, &state, &escrow, 30_001),
        Err(ClientError::WithdrawalExceeds { available: 30_000, .. })
    ));

    program.withdraw(&withdraw_payments_call(&config, &state, &escrow, 30_000).unwrap());
    program.withdraw(&withdraw_unsold_call(&config, &state, &escrow, 500).unwrap());

    let escrow = program.registry().escrow(&auction_id).unwrap();
    assert_eq!(escrow.payments, 0);
    assert_eq!(escrow.sales, 0);
    assert_eq!(escrow.creator_withdrawn, 50_000);
    assert_eq!(escrow.unsold_withdrawn, 500);

    println!("Auction {} settled", auction_id);
}

/// A sold-out auction ends at the block supply was met and clears at the
/// price of that block.
#[test]
fn test_supply_met_auction() {
    let mut program = MockProgram::new();
    let auction_id = program.create_auction(&standard_auction("aleo1alice", 500).build().unwrap());
    let config = program.config(&auction_id);

    let bid_a = place_bid(
        &config,
        None,
        &token_record("aleo1bidder_a", "4field", 300_000),
        300,
        10,
    )
    .unwrap();
    let record_a = program.place_bid(&bid_a.call, 10);

    let bid_b = place_bid(
        &config,
        None,
        &token_record("aleo1bidder_b", "4field", 200_000),
        200,
        115,
    )
    .unwrap();
    assert_eq!(bid_b.price, 910);
    program.place_bid(&bid_b.call, 115);

    let state = program.state(&auction_id);
    assert!(state.supply_met);
    assert_eq!(state.ended_at_block, 115);
    assert_eq!(
        program.registry().auction(&auction_id).unwrap().status(120),
        AuctionStatus::SupplyMet
    );

    // Late bids are refused even though the window is open.
    let late = BidBuilder::new(&config)
        .state(&state)
        .payment_record(token_record("aleo1late", "4field", 1_000_000))
        .quantity(10)
        .build(130);
    assert_eq!(late, Err(ClientError::NotAcceptingBids(AuctionStatus::SupplyMet)));

    program.close_auction(&close_auction_call(&config, &state, 120).unwrap());
    let state = program.state(&auction_id);
    assert_eq!(state.clearing_price, 910);
    assert_eq!(demand_percent(&state, &config), 100);

    let claim = claim_call(&record_a, &config, &state).unwrap();
    assert_eq!(claim.settlement.refund, 27_000);

    let escrow = program.registry().escrow(&auction_id).unwrap();
    assert_eq!(withdrawable_unsold(&config, &state, &escrow), 0);
    assert_eq!(withdrawable_revenue(&state, &escrow), 455_000);
}

/// Every claim's cost plus refund equals what the bid locked, and the
/// creator's revenue plus all refunds equals total payments.
#[test]
fn test_payments_conserved() {
    let mut rng = rand::thread_rng();
    let mut program = MockProgram::new();
    let auction_id = program.create_auction(&standard_auction("aleo1alice", 10_000).build().unwrap());
    let config = program.config(&auction_id);

    let mut records = Vec::new();
    let mut block = config.start_block;
    for i in 0..20 {
        block += rng.gen_range(0..45);
        let quantity = rng.gen_range(1..=400);
        let bidder = format!("aleo1bidder{i}");
        let bid = place_bid(
            &config,
            None,
            &token_record(&bidder, "4field", u128::MAX),
            quantity,
            block,
        )
        .unwrap();
        records.push(program.place_bid(&bid.call, block));
    }

    let state = program.state(&auction_id);
    program.close_auction(&close_auction_call(&config, &state, config.end_block).unwrap());
    let state = program.state(&auction_id);

    let mut refunds = 0;
    for record in &records {
        let bid = parse_bid_record(record).unwrap();
        let claim = claim_call(record, &config, &state).unwrap();
        assert_eq!(
            claim.settlement.cost_at_clearing + claim.settlement.refund,
            bid.payment_amount
        );
        refunds += claim.settlement.refund;
    }
    assert_eq!(state.creator_revenue + refunds, state.total_payments);
}

// =========================
// READ SIDE
// =========================

#[test]
fn test_listing_and_creator_index() {
    let mut program = MockProgram::new();
    let first = program.create_auction(&standard_auction("aleo1alice", 1000).build().unwrap());
    let second = program.create_auction(&standard_auction("aleo1bob", 2000).build().unwrap());
    let third = program.create_auction(&standard_auction("aleo1alice", 3000).build().unwrap());

    let registry = program.registry();
    let ids = |entries: Vec<fairdrop_registry::AuctionEntry>| -> Vec<Field> {
        entries.into_iter().map(|e| e.config.auction_id).collect()
    };

    let all = registry.list_auctions(&ListFilter::default()).unwrap();
    assert_eq!(ids(all), vec![third.clone(), second.clone(), first.clone()]);

    let limited = registry
        .list_auctions(&ListFilter {
            limit: Some(2),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(ids(limited), vec![third.clone(), second.clone()]);

    let alice = registry
        .list_auctions(&ListFilter {
            creator: Some("aleo1alice".into()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(ids(alice), vec![third.clone(), first.clone()]);

    assert_eq!(
        registry.creator_auction_ids("aleo1alice").unwrap(),
        vec![third.clone(), first.clone()]
    );
    assert_eq!(registry.creator_auction_ids("aleo1bob").unwrap(), vec![second]);
    assert!(registry.creator_auction_ids("aleo1carol").unwrap().is_empty());

    let active = registry.active_auctions(500).unwrap();
    assert_eq!(active.len(), 3);
    assert!(active.iter().all(|s| s.current_price == Some(640)));
    assert!(registry.active_auctions(1010).unwrap().is_empty());
}

#[test]
fn test_creator_index_follows_new_auctions() {
    let mut program = MockProgram::new();
    let first = program.create_auction(&standard_auction("aleo1alice", 1000).build().unwrap());

    let before = AuctionRegistry::new(SnapshotReader::from(program.mappings.clone()));
    assert_eq!(before.creator_auction_count("aleo1alice").unwrap(), 1);
    assert_eq!(before.creator_auction_ids("aleo1alice").unwrap(), vec![first.clone()]);

    let second = program.create_auction(&standard_auction("aleo1alice", 1000).build().unwrap());
    let after = program.registry();
    assert_eq!(after.creator_auction_count("aleo1alice").unwrap(), 2);
    assert_eq!(
        after.creator_auction_ids("aleo1alice").unwrap(),
        vec![second.clone(), first.clone()]
    );
    assert_eq!(
        program.read(names::AUCTION_PREV_BY_CREATOR, &second),
        Some(first.clone())
    );
    assert_eq!(
        program.read(names::AUCTION_PREV_BY_CREATOR, &first).as_deref(),
        Some(NULL_FIELD)
    );
}

#[test]
fn test_snapshot_matches_live_mappings() {
    let mut program = MockProgram::new();
    let auction_id = program.create_auction(&standard_auction("aleo1alice", 1000).build().unwrap());
    let config = program.config(&auction_id);
    let bid = place_bid(
        &config,
        None,
        &token_record("aleo1bidder", "4field", 1_000_000),
        250,
        400,
    )
    .unwrap();
    program.place_bid(&bid.call, 400);

    let json = serde_json::to_string(&program.mappings).unwrap();
    let snapshot = AuctionRegistry::new(SnapshotReader::from_json(&json).unwrap());
    let live = program.registry();

    assert_eq!(snapshot.auction(&auction_id).unwrap(), live.auction(&auction_id).unwrap());
    assert_eq!(snapshot.stats().unwrap(), live.stats().unwrap());
    assert_eq!(snapshot.stats().unwrap().unwrap().total_bids, 1);

    let summary = snapshot.auction(&auction_id).unwrap().summary(400);
    assert_eq!(summary.demand_percent, 25);
    assert_eq!(summary.current_price, Some(730));
}

// =========================
// PRICING
// =========================

/// Curve samples agree with the point price and never rise, for random
/// well-formed schedules.
#[test]
fn test_curve_consistent_with_price() {
    let mut rng = rand::thread_rng();
    for _ in 0..50 {
        let floor = rng.gen_range(1..1_000u128);
        let start_block = rng.gen_range(1..10_000u32);
        let config = standard_auction("aleo1alice", 1000)
            .prices(floor + rng.gen_range(1..1_000_000), floor)
            .window(start_block, start_block + rng.gen_range(1..5_000))
            .decay(rng.gen_range(1..500), rng.gen_range(1..10_000))
            .preview_config()
            .unwrap();

        let schedule = DecaySchedule::new(&config).unwrap();
        let points: Vec<_> = price_curve(&config).unwrap().collect();
        assert_eq!(points.first().unwrap().price, config.start_price);
        assert_eq!(points.last().unwrap().block, config.end_block);
        assert_eq!(points.last().unwrap().price, config.floor_price);

        for pair in points.windows(2) {
            assert!(pair[0].block < pair[1].block);
            assert!(pair[0].price >= pair[1].price);
        }
        for point in &points {
            assert_eq!(schedule.price_at(point.block), point.price);
            assert_eq!(current_price(&config, point.block).unwrap(), point.price);
        }
    }
}
