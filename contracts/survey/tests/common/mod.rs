#![allow(dead_code)]

use soroban_sdk::testutils::{Address as _, Ledger as _};
use soroban_sdk::token::{Client as TokenClient, StellarAssetClient};
use soroban_sdk::{Address, BytesN, Env, String, Vec};
use survey::{SurveyContract, SurveyContractClient, MIN_DURATION_SECS};

pub const DEPOSIT: i128 = 50_000_000;
pub const REWARD: i128 = 10_000_000;
pub const POOL: i128 = 200_000_000;

pub struct TestContext {
    pub env: Env,
    pub client: SurveyContractClient<'static>,
    pub gateway: fhe_gateway::FheGatewayClient<'static>,
    pub token: Address,
    pub creator: Address,
}

/// Deploy the gateway, a SAC token, and the survey ledger, and fund a creator.
pub fn setup() -> TestContext {
    let env = Env::default();
    env.mock_all_auths();

    let gateway_id = env.register(fhe_gateway::FheGateway, ());
    let gateway = fhe_gateway::FheGatewayClient::new(&env, &gateway_id);

    let asset_admin = Address::generate(&env);
    let token = env.register_stellar_asset_contract_v2(asset_admin).address();

    let contract_id = env.register(SurveyContract, ());
    let client = SurveyContractClient::new(&env, &contract_id);
    client.initialize(&gateway_id, &token);

    let creator = Address::generate(&env);
    StellarAssetClient::new(&env, &token)
        .mock_all_auths()
        .mint(&creator, &(POOL * 10));

    TestContext {
        env,
        client,
        gateway,
        token,
        creator,
    }
}

pub fn fund(ctx: &TestContext, who: &Address, amount: i128) {
    StellarAssetClient::new(&ctx.env, &ctx.token)
        .mock_all_auths()
        .mint(who, &amount);
}

pub fn balance(ctx: &TestContext, who: &Address) -> i128 {
    TokenClient::new(&ctx.env, &ctx.token).balance(who)
}

pub fn options_n(env: &Env, n: usize) -> Vec<String> {
    let labels = [
        "red", "green", "blue", "yellow", "purple", "orange", "cyan", "magenta", "black", "white",
    ];
    let mut out: Vec<String> = Vec::new(env);
    for label in labels.iter().take(n) {
        out.push_back(String::from_str(env, label));
    }
    out
}

/// External ciphertext carrying the choice in byte 0 (gateway mock rules).
pub fn encrypted_choice(env: &Env, choice: u8) -> BytesN<32> {
    let mut raw = [0u8; 32];
    raw[0] = choice;
    BytesN::from_array(env, &raw)
}

pub fn valid_proof(env: &Env) -> BytesN<64> {
    let mut raw = [0u8; 64];
    raw[0] = 1;
    BytesN::from_array(env, &raw)
}

pub fn create_survey(ctx: &TestContext, option_count: usize) -> u64 {
    ctx.client.create_survey(
        &ctx.creator,
        &String::from_str(&ctx.env, "Favourite colour?"),
        &options_n(&ctx.env, option_count),
        &MIN_DURATION_SECS,
        &DEPOSIT,
        &REWARD,
        &POOL,
    )
}

pub fn vote(ctx: &TestContext, survey_id: u64, choice: u8) -> Address {
    let participant = Address::generate(&ctx.env);
    fund(ctx, &participant, DEPOSIT);
    ctx.client.submit_response(
        &participant,
        &survey_id,
        &encrypted_choice(&ctx.env, choice),
        &valid_proof(&ctx.env),
        &DEPOSIT,
    );
    participant
}

/// Advance the ledger clock past the survey's end time.
pub fn close(ctx: &TestContext, survey_id: u64) {
    let end = ctx.client.get_survey(&survey_id).end_time;
    ctx.env.ledger().set_timestamp(end);
}

/// Drive the full off-band settlement loop for one option: reveal, resolve
/// the transport handle through the oracle, store the plaintext back.
pub fn settle_option(ctx: &TestContext, survey_id: u64, option_index: u32) -> u64 {
    let caller = Address::generate(&ctx.env);
    let handle = ctx
        .client
        .release_and_request_decrypt(&caller, &survey_id, &option_index);
    let count = ctx.gateway.oracle_decrypt(&caller, &handle);
    ctx.client
        .store_decrypted_vote(&caller, &survey_id, &option_index, &count);
    count
}

pub fn settle_all(ctx: &TestContext, survey_id: u64) -> std::vec::Vec<u64> {
    let n = ctx.client.get_survey(&survey_id).options.len();
    (0..n).map(|i| settle_option(ctx, survey_id, i)).collect()
}
