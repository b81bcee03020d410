#![no_std]

pub mod errors;
pub mod escrow;
pub mod events;
pub mod tally;


use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, BytesN, Env, String, Symbol, Vec,
};

pub use errors::SurveyError;

// ── Storage keys ────────────────────────────────────────────────────────────

const CONFIG: Symbol = symbol_short!("CONFIG");
const SURVEY_CTR: Symbol = symbol_short!("SRV_CTR");

// ── Limits ──────────────────────────────────────────────────────────────────

pub const MIN_OPTIONS: u32 = 2;
pub const MAX_OPTIONS: u32 = 10;
pub const MIN_DURATION_SECS: u64 = 3600;
/// Fallback stake when a survey is created with `deposit_required == 0`,
/// in stroops (1 token at 7 decimals).
pub const DEFAULT_DEPOSIT: i128 = 10_000_000;
/// Percentages are reported in basis points (two-decimal precision).
pub const BPS_SCALE: u64 = 10_000;

// ── Types ───────────────────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Survey(u64),
    /// Ciphertext counter handle per (survey, option).
    EncTally(u64, u32),
    /// Settled plaintext count per (survey, option).
    DecTally(u64, u32),
    /// Explicit per-option settled flag; distinguishes "decrypted as zero"
    /// from "not yet decrypted".
    Settled(u64, u32),
    HasVoted(u64, Address),
    HasWithdrawn(u64, Address),
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SurveyConfig {
    /// Ciphertext capability provider contract.
    pub gateway: Address,
    /// SAC token used for deposits and rewards.
    pub token: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Survey {
    pub id: u64,
    pub creator: Address,
    pub question: String,
    pub options: Vec<String>,
    pub end_time: u64,
    /// Decreases only via the single creator withdrawal.
    pub reward_pool: i128,
    pub deposit_required: i128,
    pub reward_per_response: i128,
    pub total_responses: u64,
    pub is_active: bool,
    pub results_released: bool,
    /// How many options have a settled decrypted count. The survey is fully
    /// decrypted once this reaches `options.len()`.
    pub settled_options: u32,
}

/// Snapshot of a survey's economic account returned by `get_financial_summary`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FinancialSummary {
    pub reward_pool: i128,
    pub deposit_required: i128,
    pub reward_per_response: i128,
    pub total_responses: u64,
    pub allocated_rewards: i128,
    pub remaining_pool: i128,
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn load_config(env: &Env) -> Result<SurveyConfig, SurveyError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(SurveyError::NotInitialized)
}

fn load_survey(env: &Env, survey_id: u64) -> Result<Survey, SurveyError> {
    env.storage()
        .persistent()
        .get(&DataKey::Survey(survey_id))
        .ok_or(SurveyError::SurveyNotFound)
}

fn store_survey(env: &Env, survey: &Survey) {
    env.storage()
        .persistent()
        .set(&DataKey::Survey(survey.id), survey);
}

fn next_survey_id(env: &Env) -> u64 {
    let current: u64 = env.storage().instance().get(&SURVEY_CTR).unwrap_or(0);
    let next = current.saturating_add(1);
    env.storage().instance().set(&SURVEY_CTR, &next);
    next
}

fn is_open_now(env: &Env, survey: &Survey) -> bool {
    survey.is_active && env.ledger().timestamp() < survey.end_time
}

fn require_valid_option(survey: &Survey, option_index: u32) -> Result<(), SurveyError> {
    if option_index >= survey.options.len() {
        return Err(SurveyError::InvalidOption);
    }
    Ok(())
}

fn fully_settled(survey: &Survey) -> bool {
    survey.settled_options == survey.options.len()
}

// ── Contract ────────────────────────────────────────────────────────────────

#[contract]
pub struct SurveyContract;

#[contractimpl]
impl SurveyContract {
    // ── Configuration ───────────────────────────────────────────────────────

    /// Bootstrap the ledger with the capability gateway and the custody token.
    pub fn initialize(env: Env, gateway: Address, token: Address) -> Result<(), SurveyError> {
        if env.storage().instance().has(&CONFIG) {
            return Err(SurveyError::AlreadyInitialized);
        }
        env.storage()
            .instance()
            .set(&CONFIG, &SurveyConfig { gateway, token });
        Ok(())
    }

    pub fn get_config(env: Env) -> Result<SurveyConfig, SurveyError> {
        load_config(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        env.storage().instance().has(&CONFIG)
    }

    // ── Creation ────────────────────────────────────────────────────────────

    /// Open a new survey. The creator funds the entire reward pool up front;
    /// it is pulled into custody before any state is written.
    #[allow(clippy::too_many_arguments)]
    pub fn create_survey(
        env: Env,
        creator: Address,
        question: String,
        options: Vec<String>,
        duration_secs: u64,
        deposit_required: i128,
        reward_per_response: i128,
        reward_pool: i128,
    ) -> Result<u64, SurveyError> {
        let cfg = load_config(&env)?;
        creator.require_auth();

        let n = options.len();
        if n < MIN_OPTIONS || n > MAX_OPTIONS {
            return Err(SurveyError::InvalidOptionCount);
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if options.get_unchecked(i) == options.get_unchecked(j) {
                    return Err(SurveyError::DuplicateOption);
                }
            }
        }
        if duration_secs < MIN_DURATION_SECS {
            return Err(SurveyError::DurationTooShort);
        }
        if reward_pool <= 0 {
            return Err(SurveyError::InvalidRewardPool);
        }
        if reward_per_response <= 0 || reward_per_response > reward_pool {
            return Err(SurveyError::InvalidReward);
        }
        if deposit_required < 0 {
            return Err(SurveyError::InvalidDeposit);
        }
        let deposit_required = if deposit_required == 0 {
            DEFAULT_DEPOSIT
        } else {
            deposit_required
        };

        escrow::collect(&env, &cfg.token, &creator, reward_pool);

        let id = next_survey_id(&env);
        let now = env.ledger().timestamp();

        // One zero-valued ciphertext counter per option, with the ledger
        // granted continued operate-rights on each.
        let gateway = fhe_gateway::FheGatewayClient::new(&env, &cfg.gateway);
        let this = env.current_contract_address();
        for i in 0..n {
            let counter = gateway.encrypt_constant(&0u64);
            gateway.grant_access(&counter, &this);
            env.storage()
                .persistent()
                .set(&DataKey::EncTally(id, i), &counter);
        }

        let survey = Survey {
            id,
            creator,
            question,
            options,
            end_time: now.saturating_add(duration_secs),
            reward_pool,
            deposit_required,
            reward_per_response,
            total_responses: 0,
            is_active: true,
            results_released: false,
            settled_options: 0,
        };
        store_survey(&env, &survey);
        events::publish_survey_created(&env, &survey);

        Ok(id)
    }

    // ── Responses ───────────────────────────────────────────────────────────

    /// Record one encrypted response. The offered `deposit` must cover the
    /// survey's requirement; exactly the requirement is pulled into custody.
    pub fn submit_response(
        env: Env,
        participant: Address,
        survey_id: u64,
        encrypted_choice: BytesN<32>,
        validity_proof: BytesN<64>,
        deposit: i128,
    ) -> Result<(), SurveyError> {
        let cfg = load_config(&env)?;
        participant.require_auth();

        let mut survey = load_survey(&env, survey_id)?;
        if !is_open_now(&env, &survey) {
            return Err(SurveyError::SurveyClosed);
        }
        if env
            .storage()
            .persistent()
            .has(&DataKey::HasVoted(survey_id, participant.clone()))
        {
            return Err(SurveyError::AlreadyVoted);
        }
        if deposit < survey.deposit_required {
            return Err(SurveyError::InsufficientDeposit);
        }

        escrow::collect(&env, &cfg.token, &participant, survey.deposit_required);

        tally::record_response(
            &env,
            &cfg.gateway,
            survey_id,
            survey.options.len(),
            &encrypted_choice,
            &validity_proof,
        )?;

        env.storage()
            .persistent()
            .set(&DataKey::HasVoted(survey_id, participant.clone()), &true);
        survey.total_responses += 1;
        store_survey(&env, &survey);

        events::publish_response_recorded(&env, survey_id, participant, survey.deposit_required);
        Ok(())
    }

    // ── Reveal & settlement ─────────────────────────────────────────────────

    /// Mark results as released (first call only) and emit the transport
    /// handle for one option's counter so the decryption oracle can be
    /// driven off-band. Callable by anyone once the survey has ended, and
    /// repeatable per option to re-emit the handle.
    pub fn release_and_request_decrypt(
        env: Env,
        caller: Address,
        survey_id: u64,
        option_index: u32,
    ) -> Result<BytesN<32>, SurveyError> {
        let cfg = load_config(&env)?;
        caller.require_auth();

        let mut survey = load_survey(&env, survey_id)?;
        require_valid_option(&survey, option_index)?;
        if env.ledger().timestamp() < survey.end_time {
            return Err(SurveyError::SurveyStillOpen);
        }

        if !survey.results_released {
            survey.results_released = true;
            survey.is_active = false;
            store_survey(&env, &survey);
            events::publish_results_released(&env, survey_id);
        }

        let counter: BytesN<32> = env
            .storage()
            .persistent()
            .get(&DataKey::EncTally(survey_id, option_index))
            .ok_or(SurveyError::InvalidOption)?;

        let gateway = fhe_gateway::FheGatewayClient::new(&env, &cfg.gateway);
        let handle = gateway.to_transport_handle(&counter);
        gateway.grant_access(&counter, &env.current_contract_address());
        gateway.grant_access(&counter, &caller);

        events::publish_decryption_requested(&env, survey_id, option_index, handle.clone(), caller);
        Ok(handle)
    }

    /// Write an externally decrypted count back into the ledger and mark the
    /// option settled. The value is taken on trust from the caller; see the
    /// DESIGN notes on oracle attestation.
    pub fn store_decrypted_vote(
        env: Env,
        caller: Address,
        survey_id: u64,
        option_index: u32,
        count: u64,
    ) -> Result<(), SurveyError> {
        caller.require_auth();

        let mut survey = load_survey(&env, survey_id)?;
        require_valid_option(&survey, option_index)?;
        if !survey.results_released {
            return Err(SurveyError::ResultsNotReleased);
        }

        env.storage()
            .persistent()
            .set(&DataKey::DecTally(survey_id, option_index), &count);

        let settled_key = DataKey::Settled(survey_id, option_index);
        if !env.storage().persistent().has(&settled_key) {
            env.storage().persistent().set(&settled_key, &true);
            survey.settled_options += 1;
            store_survey(&env, &survey);
        }

        events::publish_vote_decrypted(&env, survey_id, option_index, count);
        Ok(())
    }

    // ── Withdrawals ─────────────────────────────────────────────────────────

    /// Pay a voter their deposit plus the flat reward, exactly once.
    /// Callable any time after voting; the withdrawn flag is committed
    /// before the outbound transfer.
    pub fn withdraw_participant_funds(
        env: Env,
        participant: Address,
        survey_id: u64,
    ) -> Result<i128, SurveyError> {
        let cfg = load_config(&env)?;
        participant.require_auth();

        let survey = load_survey(&env, survey_id)?;
        if !env
            .storage()
            .persistent()
            .has(&DataKey::HasVoted(survey_id, participant.clone()))
        {
            return Err(SurveyError::HasNotVoted);
        }
        if env
            .storage()
            .persistent()
            .has(&DataKey::HasWithdrawn(survey_id, participant.clone()))
        {
            return Err(SurveyError::AlreadyWithdrawn);
        }

        let amount = escrow::participant_payout(&survey);
        if escrow::custodied(&env, &cfg.token) < amount {
            return Err(SurveyError::InsufficientCustody);
        }

        env.storage().persistent().set(
            &DataKey::HasWithdrawn(survey_id, participant.clone()),
            &true,
        );
        escrow::pay_out(&env, &cfg.token, &participant, amount);

        events::publish_participant_withdrawal(
            &env,
            survey_id,
            participant,
            survey.deposit_required,
            survey.reward_per_response,
        );
        Ok(amount)
    }

    /// Return the unallocated remainder of the reward pool to the creator,
    /// exactly once, only after the survey has ended. The pool is zeroed
    /// before the transfer.
    pub fn withdraw_reward_pool(
        env: Env,
        caller: Address,
        survey_id: u64,
    ) -> Result<i128, SurveyError> {
        let cfg = load_config(&env)?;
        caller.require_auth();

        let mut survey = load_survey(&env, survey_id)?;
        if caller != survey.creator {
            return Err(SurveyError::NotCreator);
        }
        if env.ledger().timestamp() < survey.end_time {
            return Err(SurveyError::SurveyStillOpen);
        }
        if survey.reward_pool == 0 {
            return Err(SurveyError::RewardPoolDrained);
        }

        let remaining = escrow::remaining_pool(&survey);
        if escrow::custodied(&env, &cfg.token) < remaining {
            return Err(SurveyError::InsufficientCustody);
        }

        survey.reward_pool = 0;
        store_survey(&env, &survey);
        if remaining > 0 {
            escrow::pay_out(&env, &cfg.token, &caller, remaining);
        }

        events::publish_reward_pool_withdrawn(&env, survey_id, caller, remaining);
        Ok(remaining)
    }

    // ── Read-only queries ───────────────────────────────────────────────────

    pub fn get_survey(env: Env, survey_id: u64) -> Result<Survey, SurveyError> {
        load_survey(&env, survey_id)
    }

    pub fn get_options(env: Env, survey_id: u64) -> Result<Vec<String>, SurveyError> {
        Ok(load_survey(&env, survey_id)?.options)
    }

    /// The current ciphertext counter handle for one option.
    pub fn get_encrypted_tally(
        env: Env,
        survey_id: u64,
        option_index: u32,
    ) -> Result<BytesN<32>, SurveyError> {
        let survey = load_survey(&env, survey_id)?;
        require_valid_option(&survey, option_index)?;
        env.storage()
            .persistent()
            .get(&DataKey::EncTally(survey_id, option_index))
            .ok_or(SurveyError::InvalidOption)
    }

    /// A settled plaintext count. Fails before release, and fails for an
    /// option that has not been settled yet rather than returning an
    /// ambiguous zero.
    pub fn get_decrypted_vote(
        env: Env,
        survey_id: u64,
        option_index: u32,
    ) -> Result<u64, SurveyError> {
        let survey = load_survey(&env, survey_id)?;
        require_valid_option(&survey, option_index)?;
        if !survey.results_released {
            return Err(SurveyError::ResultsNotReleased);
        }
        if !env
            .storage()
            .persistent()
            .has(&DataKey::Settled(survey_id, option_index))
        {
            return Err(SurveyError::OptionNotSettled);
        }
        Ok(env
            .storage()
            .persistent()
            .get(&DataKey::DecTally(survey_id, option_index))
            .unwrap_or(0))
    }

    pub fn is_option_settled(
        env: Env,
        survey_id: u64,
        option_index: u32,
    ) -> Result<bool, SurveyError> {
        let survey = load_survey(&env, survey_id)?;
        require_valid_option(&survey, option_index)?;
        Ok(env
            .storage()
            .persistent()
            .has(&DataKey::Settled(survey_id, option_index)))
    }

    /// All plaintext counts, available once every option has settled.
    pub fn get_all_decrypted(env: Env, survey_id: u64) -> Result<Vec<u64>, SurveyError> {
        let survey = load_survey(&env, survey_id)?;
        if !survey.results_released {
            return Err(SurveyError::ResultsNotReleased);
        }
        if !fully_settled(&survey) {
            return Err(SurveyError::OptionNotSettled);
        }
        let mut counts: Vec<u64> = Vec::new(&env);
        for i in 0..survey.options.len() {
            counts.push_back(
                env.storage()
                    .persistent()
                    .get(&DataKey::DecTally(survey_id, i))
                    .unwrap_or(0),
            );
        }
        Ok(counts)
    }

    /// Per-option share in basis points. All zeros for an empty survey;
    /// otherwise requires full settlement.
    pub fn get_percentages(env: Env, survey_id: u64) -> Result<Vec<u32>, SurveyError> {
        let survey = load_survey(&env, survey_id)?;
        if !survey.results_released {
            return Err(SurveyError::ResultsNotReleased);
        }
        if survey.total_responses == 0 {
            let mut zeros: Vec<u32> = Vec::new(&env);
            for _ in 0..survey.options.len() {
                zeros.push_back(0);
            }
            return Ok(zeros);
        }
        if !fully_settled(&survey) {
            return Err(SurveyError::OptionNotSettled);
        }
        let mut shares: Vec<u32> = Vec::new(&env);
        for i in 0..survey.options.len() {
            let count: u64 = env
                .storage()
                .persistent()
                .get(&DataKey::DecTally(survey_id, i))
                .unwrap_or(0);
            let share = count.saturating_mul(BPS_SCALE) / survey.total_responses;
            shares.push_back(u32::try_from(share).unwrap_or(u32::MAX));
        }
        Ok(shares)
    }

    pub fn has_voted(env: Env, survey_id: u64, participant: Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::HasVoted(survey_id, participant))
    }

    pub fn has_withdrawn(env: Env, survey_id: u64, participant: Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::HasWithdrawn(survey_id, participant))
    }

    pub fn get_financial_summary(
        env: Env,
        survey_id: u64,
    ) -> Result<FinancialSummary, SurveyError> {
        let survey = load_survey(&env, survey_id)?;
        Ok(FinancialSummary {
            reward_pool: survey.reward_pool,
            deposit_required: survey.deposit_required,
            reward_per_response: survey.reward_per_response,
            total_responses: survey.total_responses,
            allocated_rewards: escrow::allocated_rewards(&survey),
            remaining_pool: escrow::remaining_pool(&survey),
        })
    }

    pub fn is_open(env: Env, survey_id: u64) -> Result<bool, SurveyError> {
        let survey = load_survey(&env, survey_id)?;
        Ok(is_open_now(&env, &survey))
    }

    pub fn survey_count(env: Env) -> u64 {
        env.storage().instance().get(&SURVEY_CTR).unwrap_or(0)
    }

    pub fn custodied_balance(env: Env) -> Result<i128, SurveyError> {
        let cfg = load_config(&env)?;
        Ok(escrow::custodied(&env, &cfg.token))
    }
}
