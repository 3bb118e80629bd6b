//! Property tests: random operation sequences against the engine.
//!
//! After every step, recorded collateral must match custody, and recorded
//! debt must match stablecoin supply. A failed step must leave no trace.

mod common;

use primitive_types::U256;
use proptest::prelude::*;

use common::*;
use dsc::prelude::{wad, Address, Stablecoin};

#[derive(Debug, Clone)]
enum Op {
    Deposit { actor: usize, token: usize, amount: u64 },
    Mint { actor: usize, amount: u64 },
    Burn { actor: usize, amount: u64 },
    Redeem { actor: usize, token: usize, amount: u64 },
    DepositAndMint { actor: usize, token: usize, collateral: u64, mint: u64 },
    RedeemForDsc { actor: usize, token: usize, collateral: u64, burn: u64 },
    Liquidate { actor: usize, target: usize, token: usize, debt: u64 },
    SetPrice { token: usize, price: i128 },
}

const ACTORS: usize = 3;

fn op_strategy() -> impl Strategy<Value = Op> {
    let actor = 0..ACTORS;
    let token = 0..2usize;
    prop_oneof![
        (actor.clone(), token.clone(), 0..20u64)
            .prop_map(|(actor, token, amount)| Op::Deposit { actor, token, amount }),
        (actor.clone(), 0..15_000u64).prop_map(|(actor, amount)| Op::Mint { actor, amount }),
        (actor.clone(), 0..10_000u64).prop_map(|(actor, amount)| Op::Burn { actor, amount }),
        (actor.clone(), token.clone(), 0..20u64)
            .prop_map(|(actor, token, amount)| Op::Redeem { actor, token, amount }),
        (actor.clone(), token.clone(), 0..20u64, 0..15_000u64).prop_map(
            |(actor, token, collateral, mint)| Op::DepositAndMint { actor, token, collateral, mint }
        ),
        (actor.clone(), token.clone(), 0..20u64, 0..10_000u64).prop_map(
            |(actor, token, collateral, burn)| Op::RedeemForDsc { actor, token, collateral, burn }
        ),
        (actor.clone(), actor, token.clone(), 0..10_000u64).prop_map(
            |(actor, target, token, debt)| Op::Liquidate { actor, target, token, debt }
        ),
        (token, 100..4_000i128).prop_map(|(token, price)| Op::SetPrice { token, price }),
    ]
}

fn actors() -> Vec<Address> {
    ["alice", "bob", "carol"].iter().map(|name| user(name)).collect()
}

fn tokens() -> [Address; 2] {
    [weth(), wbtc()]
}

/// Every balance an operation could move
fn world(h: &Harness, actors: &[Address]) -> Vec<U256> {
    let mut values = Vec::new();
    for actor in actors {
        for token in tokens() {
            values.push(h.engine.collateral_balance_of(actor, &token));
            values.push(h.wallet(actor, &token));
        }
        values.push(h.engine.debt_of(actor));
        values.push(h.dsc.balance_of(actor));
    }
    for token in tokens() {
        values.push(h.custody(&token));
    }
    values.push(h.dsc.total_supply());
    values.push(U256::from(h.engine.events().len()));
    values
}

/// Run `op`, returning its result and the account whose health it must preserve
fn apply(h: &Harness, actors: &[Address], op: &Op) -> (dsc::error::Result<()>, Option<Address>) {
    let engine = &h.engine;
    let tokens = tokens();
    match *op {
        Op::Deposit { actor, token, amount } => (
            engine.deposit_collateral(&actors[actor], &tokens[token], wad(amount)),
            None,
        ),
        Op::Mint { actor, amount } => (engine.mint_dsc(&actors[actor], wad(amount)), Some(actors[actor])),
        Op::Burn { actor, amount } => (engine.burn_dsc(&actors[actor], wad(amount)), Some(actors[actor])),
        Op::Redeem { actor, token, amount } => (
            engine.redeem_collateral(&actors[actor], &tokens[token], wad(amount)),
            Some(actors[actor]),
        ),
        Op::DepositAndMint { actor, token, collateral, mint } => (
            engine.deposit_collateral_and_mint_dsc(&actors[actor], &tokens[token], wad(collateral), wad(mint)),
            Some(actors[actor]),
        ),
        Op::RedeemForDsc { actor, token, collateral, burn } => (
            engine.redeem_collateral_for_dsc(&actors[actor], &tokens[token], wad(collateral), wad(burn)),
            Some(actors[actor]),
        ),
        Op::Liquidate { actor, target, token, debt } => (
            engine
                .liquidate(&actors[actor], &tokens[token], &actors[target], wad(debt))
                .map(|_| ()),
            Some(actors[actor]),
        ),
        Op::SetPrice { token, price } => {
            let feed = if token == 0 { eth_usd_feed() } else { btc_usd_feed() };
            h.set_price(&feed, usd(price));
            (Ok(()), None)
        }
    }
}

fn check_conservation(h: &Harness, actors: &[Address]) -> Result<(), TestCaseError> {
    for token in tokens() {
        let recorded = actors
            .iter()
            .fold(U256::zero(), |sum, actor| sum + h.engine.collateral_balance_of(actor, &token));
        prop_assert_eq!(recorded, h.custody(&token), "custody drifted for {}", token);
    }

    let debt = actors.iter().fold(U256::zero(), |sum, actor| sum + h.engine.debt_of(actor));
    prop_assert_eq!(debt, h.dsc.total_supply());
    prop_assert!(h.dsc.verify_supply_invariant());
    prop_assert!(h.engine.protocol_solvency().is_ok());
    prop_assert!(!h.engine.is_busy());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_operation_sequences_preserve_invariants(
        ops in prop::collection::vec(op_strategy(), 1..40)
    ) {
        let h = Harness::new();
        let actors = actors();
        for actor in &actors {
            h.fund(actor, &weth(), wad(100));
            h.fund(actor, &wbtc(), wad(100));
        }

        for op in &ops {
            let before = world(&h, &actors);
            let (result, checked) = apply(&h, &actors, op);

            match result {
                Ok(()) => {
                    if let Some(account) = checked {
                        let health_factor = h.engine.health_factor(&account).unwrap();
                        prop_assert!(
                            health_factor.raw() >= wad(1),
                            "{:?} left {} at health factor {}", op, account, health_factor
                        );
                    }
                }
                Err(err) => {
                    prop_assert_eq!(world(&h, &actors), before, "failed {:?} ({}) changed state", op, err);
                }
            }

            check_conservation(&h, &actors)?;
        }
    }

    #[test]
    fn prop_usd_round_trip_never_gains(amount in 1..1_000_000u64, price in 1..100_000i128) {
        let h = Harness::new();
        h.set_price(&eth_usd_feed(), usd(price));

        let amount = U256::from(amount) * U256::exp10(12);
        let value = h.engine.usd_value(&weth(), amount).unwrap();
        let back = h.engine.token_amount_from_usd(&weth(), value).unwrap();
        prop_assert!(back <= amount);
    }
}
