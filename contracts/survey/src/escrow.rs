//! Economic account arithmetic and token custody moves.
//!
//! The contract's token balance is the only shared mutable resource; every
//! change to it goes through `collect` or `pay_out`, and callers mark their
//! one-shot flags before invoking `pay_out`.

use soroban_sdk::{token, Address, Env};

use crate::Survey;

/// Pull `amount` from `from` into the contract's custody.
pub fn collect(env: &Env, token_addr: &Address, from: &Address, amount: i128) {
    token::Client::new(env, token_addr).transfer(from, &env.current_contract_address(), &amount);
}

/// Pay `amount` out of custody to `to`.
pub fn pay_out(env: &Env, token_addr: &Address, to: &Address, amount: i128) {
    token::Client::new(env, token_addr).transfer(&env.current_contract_address(), to, &amount);
}

/// The ledger's custodied balance.
pub fn custodied(env: &Env, token_addr: &Address) -> i128 {
    token::Client::new(env, token_addr).balance(&env.current_contract_address())
}

/// Reward value already promised to responders.
pub fn allocated_rewards(survey: &Survey) -> i128 {
    (survey.total_responses as i128) * survey.reward_per_response
}

/// What is left for the creator to reclaim, floored at zero.
pub fn remaining_pool(survey: &Survey) -> i128 {
    let remaining = survey.reward_pool - allocated_rewards(survey);
    if remaining > 0 {
        remaining
    } else {
        0
    }
}

/// A voter's full entitlement: refundable deposit plus flat reward.
pub fn participant_payout(survey: &Survey) -> i128 {
    survey.deposit_required + survey.reward_per_response
}
