//! Encrypted tally engine.
//!
//! Each response triggers a fixed sweep over every option index: compare the
//! encrypted choice to the index, select an encrypted 1 or 0, and fold it
//! into that option's running counter. The sweep shape is identical for
//! every response regardless of the choice, so the selected option never
//! influences control flow.

use fhe_gateway::FheGatewayClient;
use soroban_sdk::{Address, BytesN, Env};

use crate::{errors::SurveyError, DataKey};

/// Fold one encrypted response into the per-option counters of `survey_id`.
///
/// The gateway validates the attached proof; a rejected ciphertext fails the
/// whole call with no state change.
pub fn record_response(
    env: &Env,
    gateway: &Address,
    survey_id: u64,
    option_count: u32,
    encrypted_choice: &BytesN<32>,
    validity_proof: &BytesN<64>,
) -> Result<(), SurveyError> {
    let client = FheGatewayClient::new(env, gateway);

    let choice = match client.try_ingest_external(encrypted_choice, validity_proof) {
        Ok(Ok(handle)) => handle,
        _ => return Err(SurveyError::InvalidCiphertext),
    };

    let this = env.current_contract_address();
    let one = client.encrypt_constant(&1u64);
    let zero = client.encrypt_constant(&0u64);

    for i in 0..option_count {
        let key = DataKey::EncTally(survey_id, i);
        let counter: BytesN<32> = env
            .storage()
            .persistent()
            .get(&key)
            .ok_or(SurveyError::InvalidOption)?;

        let matches = client.hom_eq(&choice, &(i as u64));
        let increment = client.hom_select(&matches, &one, &zero);
        let updated = client.hom_add(&counter, &increment);

        // The gateway must let this contract keep operating on the new
        // counter for future responses and the eventual reveal.
        client.grant_access(&updated, &this);
        env.storage().persistent().set(&key, &updated);
    }

    Ok(())
}
