#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Invariants tested:
//! - every voter's withdrawal pays exactly deposit + reward, once
//! - the creator's single withdrawal pays exactly the unallocated remainder
//! - after everyone settles up, custody is fully drained (no value is
//!   minted or leaked by the escrow)

use proptest::prelude::*;

use crate::common::{self, balance, close, setup, vote, DEPOSIT, POOL, REWARD};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_escrow_conserves_value(
        seeds in proptest::collection::vec(0u8..=255u8, 0..=10),
    ) {
        let ctx = setup();
        let id = common::create_survey(&ctx, 2);

        let voters: Vec<_> = seeds.iter().map(|s| vote(&ctx, id, s % 2)).collect();
        let n = voters.len() as i128;
        prop_assert_eq!(ctx.client.custodied_balance(), POOL + n * DEPOSIT);

        // voters may withdraw before or after close; split them
        for voter in voters.iter().take(voters.len() / 2) {
            let paid = ctx.client.withdraw_participant_funds(voter, &id);
            prop_assert_eq!(paid, DEPOSIT + REWARD);
        }

        close(&ctx, id);

        for voter in voters.iter().skip(voters.len() / 2) {
            let paid = ctx.client.withdraw_participant_funds(voter, &id);
            prop_assert_eq!(paid, DEPOSIT + REWARD);
        }

        let creator_before = balance(&ctx, &ctx.creator);
        let remainder = ctx.client.withdraw_reward_pool(&ctx.creator, &id);
        prop_assert_eq!(remainder, POOL - n * REWARD);
        prop_assert_eq!(balance(&ctx, &ctx.creator), creator_before + remainder);

        for voter in &voters {
            prop_assert_eq!(balance(&ctx, voter), DEPOSIT + REWARD);
        }
        prop_assert_eq!(ctx.client.custodied_balance(), 0);
    }

    #[test]
    fn prop_withdrawal_is_exactly_once(n_voters in 1usize..=6usize) {
        let ctx = setup();
        let id = common::create_survey(&ctx, 2);

        let voters: Vec<_> = (0..n_voters).map(|i| vote(&ctx, id, (i % 2) as u8)).collect();

        for voter in &voters {
            ctx.client.withdraw_participant_funds(voter, &id);
            prop_assert!(ctx.client.has_withdrawn(&id, voter));
            prop_assert!(ctx.client.try_withdraw_participant_funds(voter, &id).is_err());
            prop_assert_eq!(balance(&ctx, voter), DEPOSIT + REWARD);
        }
    }
}
