#![no_std]

//! Ciphertext capability gateway.
//!
//! The survey ledger never sees a plaintext choice or tally; it manipulates
//! opaque 32-byte ciphertext handles through this contract. This is a
//! reference gateway: handles are minted as hashes and backed by plaintext
//! values in the gateway's own storage, so the full homomorphic workflow can
//! be exercised end to end on a local host. A production deployment replaces
//! this crate with a real FHE coprocessor behind the same interface.
//!
//! Mock acceptance rules (mirrored by test helpers):
//! - an external ciphertext carries its value in byte 0;
//! - a validity proof is accepted iff its byte 0 equals 1.


use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, Address, Bytes, BytesN,
    Env, Symbol,
};

const HANDLE_CTR: Symbol = symbol_short!("HNDL_CTR");

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Plaintext value backing a ciphertext handle.
    Plain(BytesN<32>),
    /// Access grant for a (handle, principal) pair.
    Grant(BytesN<32>, Address),
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum GatewayError {
    UnknownHandle = 1,
    InvalidProof = 2,
    AccessDenied = 3,
}

// ── Helpers ────────────────────────────────────────────────────────────────────

/// Mint a fresh handle backed by `value`. Handles are sha256 over a
/// monotonically increasing counter, so every operation yields a distinct
/// ciphertext identity.
fn mint_handle(env: &Env, value: u64) -> BytesN<32> {
    let ctr: u64 = env.storage().instance().get(&HANDLE_CTR).unwrap_or(0);
    let next = ctr.saturating_add(1);
    env.storage().instance().set(&HANDLE_CTR, &next);

    let seed = Bytes::from_slice(env, &next.to_be_bytes());
    let handle: BytesN<32> = env.crypto().sha256(&seed).to_bytes();
    env.storage()
        .persistent()
        .set(&DataKey::Plain(handle.clone()), &value);
    handle
}

fn plaintext(env: &Env, handle: &BytesN<32>) -> Result<u64, GatewayError> {
    env.storage()
        .persistent()
        .get(&DataKey::Plain(handle.clone()))
        .ok_or(GatewayError::UnknownHandle)
}

// ── Contract ───────────────────────────────────────────────────────────────────

#[contract]
pub struct FheGateway;

#[contractimpl]
impl FheGateway {
    /// Mint a ciphertext handle for a known constant (e.g. a zero counter).
    pub fn encrypt_constant(env: Env, value: u64) -> BytesN<32> {
        mint_handle(&env, value)
    }

    /// Convert an externally produced ciphertext into an internal handle.
    ///
    /// The validity proof attests the ciphertext is well-formed without
    /// revealing its value; a malformed proof rejects the whole call.
    pub fn ingest_external(
        env: Env,
        ciphertext: BytesN<32>,
        proof: BytesN<64>,
    ) -> Result<BytesN<32>, GatewayError> {
        if proof.to_array()[0] != 1 {
            return Err(GatewayError::InvalidProof);
        }
        let value = ciphertext.to_array()[0] as u64;
        Ok(mint_handle(&env, value))
    }

    /// Homomorphic addition. Returns a fresh handle; inputs are untouched.
    pub fn hom_add(env: Env, a: BytesN<32>, b: BytesN<32>) -> Result<BytesN<32>, GatewayError> {
        let pa = plaintext(&env, &a)?;
        let pb = plaintext(&env, &b)?;
        Ok(mint_handle(&env, pa.saturating_add(pb)))
    }

    /// Homomorphic equality against a public constant. The result is an
    /// encrypted boolean: 1 if equal, 0 otherwise.
    pub fn hom_eq(env: Env, a: BytesN<32>, constant: u64) -> Result<BytesN<32>, GatewayError> {
        let pa = plaintext(&env, &a)?;
        Ok(mint_handle(&env, if pa == constant { 1 } else { 0 }))
    }

    /// Homomorphic conditional select: `cond != 0 ? a : b`.
    pub fn hom_select(
        env: Env,
        cond: BytesN<32>,
        a: BytesN<32>,
        b: BytesN<32>,
    ) -> Result<BytesN<32>, GatewayError> {
        let pc = plaintext(&env, &cond)?;
        let pa = plaintext(&env, &a)?;
        let pb = plaintext(&env, &b)?;
        Ok(mint_handle(&env, if pc != 0 { pa } else { pb }))
    }

    /// Produce the opaque transport reference used to request out-of-band
    /// decryption. In this reference gateway the transport handle is the
    /// ciphertext handle itself.
    pub fn to_transport_handle(env: Env, ciphertext: BytesN<32>) -> Result<BytesN<32>, GatewayError> {
        plaintext(&env, &ciphertext)?;
        Ok(ciphertext)
    }

    /// Grant `principal` the right to request decryption of `ciphertext`.
    pub fn grant_access(
        env: Env,
        ciphertext: BytesN<32>,
        principal: Address,
    ) -> Result<(), GatewayError> {
        plaintext(&env, &ciphertext)?;
        env.storage()
            .persistent()
            .set(&DataKey::Grant(ciphertext, principal), &true);
        Ok(())
    }

    pub fn has_access(env: Env, ciphertext: BytesN<32>, principal: Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Grant(ciphertext, principal))
    }

    /// The decryption oracle. In production this resolution happens off-band
    /// against the coprocessor; here it is a call gated on the requester's
    /// auth and a prior access grant.
    pub fn oracle_decrypt(
        env: Env,
        requester: Address,
        handle: BytesN<32>,
    ) -> Result<u64, GatewayError> {
        requester.require_auth();
        if !env
            .storage()
            .persistent()
            .has(&DataKey::Grant(handle.clone(), requester))
        {
            return Err(GatewayError::AccessDenied);
        }
        plaintext(&env, &handle)
    }
}
