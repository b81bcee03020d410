#![allow(clippy::unwrap_used, clippy::expect_used, clippy::arithmetic_side_effects)]
//! Invariants tested:
//! - once every option settles, the decrypted counts equal the plaintext
//!   histogram of the submitted choices, and their sum equals
//!   `total_responses` (tally conservation)
//! - percentages are the exact floored basis-point shares and never sum to
//!   more than 10 000
//! - a second response from the same participant never succeeds

use proptest::prelude::*;

use crate::common::{
    self, close, encrypted_choice, fund, settle_all, setup, valid_proof, vote, DEPOSIT,
};
use survey::{SurveyError, BPS_SCALE};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_tally_conservation(
        option_count in 2usize..=5usize,
        seeds in proptest::collection::vec(0u8..=255u8, 1..=10),
    ) {
        let ctx = setup();
        let id = common::create_survey(&ctx, option_count);

        let mut histogram = vec![0u64; option_count];
        for seed in &seeds {
            let choice = seed % (option_count as u8);
            vote(&ctx, id, choice);
            histogram[choice as usize] += 1;
        }

        close(&ctx, id);
        let counts = settle_all(&ctx, id);

        prop_assert_eq!(&counts, &histogram);
        let survey = ctx.client.get_survey(&id);
        prop_assert_eq!(counts.iter().sum::<u64>(), survey.total_responses);
    }

    #[test]
    fn prop_percentages_are_floored_shares(
        seeds in proptest::collection::vec(0u8..=255u8, 1..=12),
    ) {
        let ctx = setup();
        let id = common::create_survey(&ctx, 3);

        for seed in &seeds {
            vote(&ctx, id, seed % 3);
        }
        close(&ctx, id);
        let counts = settle_all(&ctx, id);

        let total = seeds.len() as u64;
        let shares = ctx.client.get_percentages(&id);
        let mut sum = 0u64;
        for (i, count) in counts.iter().enumerate() {
            let expected = (count * BPS_SCALE / total) as u32;
            prop_assert_eq!(shares.get_unchecked(i as u32), expected);
            sum += expected as u64;
        }
        prop_assert!(sum <= BPS_SCALE);
    }

    #[test]
    fn prop_no_double_voting(choice in 0u8..3u8, retry_choice in 0u8..3u8) {
        let ctx = setup();
        let id = common::create_survey(&ctx, 3);

        let participant = vote(&ctx, id, choice);
        fund(&ctx, &participant, DEPOSIT);

        let retry = ctx.client.try_submit_response(
            &participant,
            &id,
            &encrypted_choice(&ctx.env, retry_choice),
            &valid_proof(&ctx.env),
            &DEPOSIT,
        );
        prop_assert_eq!(retry, Err(Ok(SurveyError::AlreadyVoted)));
        prop_assert_eq!(ctx.client.get_survey(&id).total_responses, 1);
    }
}
