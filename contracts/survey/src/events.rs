#![allow(deprecated)]

use soroban_sdk::{symbol_short, Address, BytesN, Env, String, Vec};

use crate::Survey;

// ── Event payloads ──────────────────────────────────────────────────────────

/// Fired once per survey at creation, with every immutable parameter.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SurveyCreatedEvent {
    pub survey_id: u64,
    pub creator: Address,
    pub question: String,
    pub options: Vec<String>,
    pub end_time: u64,
    pub reward_pool: i128,
    pub deposit_required: i128,
    pub reward_per_response: i128,
    pub timestamp: u64,
}

/// Fired when a response is recorded. Carries no choice information.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResponseRecordedEvent {
    pub survey_id: u64,
    pub participant: Address,
    pub deposit: i128,
    pub timestamp: u64,
}

/// Fired exactly once per survey, by the first reveal call for any option.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResultsReleasedEvent {
    pub survey_id: u64,
    pub timestamp: u64,
}

/// Fired per reveal call with the transport handle an external actor needs
/// to drive the decryption oracle.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecryptionRequestedEvent {
    pub survey_id: u64,
    pub option_index: u32,
    pub handle: BytesN<32>,
    pub requester: Address,
    pub timestamp: u64,
}

/// Fired when a decrypted per-option count is written back.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VoteDecryptedEvent {
    pub survey_id: u64,
    pub option_index: u32,
    pub count: u64,
    pub timestamp: u64,
}

/// Fired when a participant claims their deposit plus reward.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParticipantWithdrawalEvent {
    pub survey_id: u64,
    pub participant: Address,
    pub deposit: i128,
    pub reward: i128,
    pub total: i128,
    pub timestamp: u64,
}

/// Fired when the creator claims the unallocated remainder of the pool.
#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPoolWithdrawnEvent {
    pub survey_id: u64,
    pub creator: Address,
    pub amount: i128,
    pub timestamp: u64,
}

// ── Publishers ──────────────────────────────────────────────────────────────

pub fn publish_survey_created(env: &Env, survey: &Survey) {
    env.events().publish(
        (symbol_short!("CREATED"), survey.creator.clone()),
        SurveyCreatedEvent {
            survey_id: survey.id,
            creator: survey.creator.clone(),
            question: survey.question.clone(),
            options: survey.options.clone(),
            end_time: survey.end_time,
            reward_pool: survey.reward_pool,
            deposit_required: survey.deposit_required,
            reward_per_response: survey.reward_per_response,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_response_recorded(env: &Env, survey_id: u64, participant: Address, deposit: i128) {
    env.events().publish(
        (symbol_short!("RESPONSE"), participant.clone()),
        ResponseRecordedEvent {
            survey_id,
            participant,
            deposit,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_results_released(env: &Env, survey_id: u64) {
    env.events().publish(
        (symbol_short!("RELEASED"),),
        ResultsReleasedEvent {
            survey_id,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_decryption_requested(
    env: &Env,
    survey_id: u64,
    option_index: u32,
    handle: BytesN<32>,
    requester: Address,
) {
    env.events().publish(
        (symbol_short!("REVEAL"), requester.clone()),
        DecryptionRequestedEvent {
            survey_id,
            option_index,
            handle,
            requester,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_vote_decrypted(env: &Env, survey_id: u64, option_index: u32, count: u64) {
    env.events().publish(
        (symbol_short!("DECRYPTED"),),
        VoteDecryptedEvent {
            survey_id,
            option_index,
            count,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_participant_withdrawal(
    env: &Env,
    survey_id: u64,
    participant: Address,
    deposit: i128,
    reward: i128,
) {
    env.events().publish(
        (symbol_short!("PART_WD"), participant.clone()),
        ParticipantWithdrawalEvent {
            survey_id,
            participant,
            deposit,
            reward,
            total: deposit + reward,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_reward_pool_withdrawn(env: &Env, survey_id: u64, creator: Address, amount: i128) {
    env.events().publish(
        (symbol_short!("POOL_WD"), creator.clone()),
        RewardPoolWithdrawnEvent {
            survey_id,
            creator,
            amount,
            timestamp: env.ledger().timestamp(),
        },
    );
}
