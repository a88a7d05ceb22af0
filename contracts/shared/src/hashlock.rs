use soroban_sdk::{Bytes, BytesN, Env};

use crate::types::Error;

/// keccak256 of the raw 32-byte secret, the same commitment the EVM side
/// computes, so one secret unlocks both escrows.
pub fn commit(env: &Env, secret: &BytesN<32>) -> BytesN<32> {
    let secret_bytes = Bytes::from_array(env, &secret.to_array());
    env.crypto().keccak256(&secret_bytes).into()
}

pub fn validate(env: &Env, secret: &BytesN<32>, expected: &BytesN<32>) -> bool {
    commit(env, secret) == *expected
}

pub fn only_valid_secret(env: &Env, secret: &BytesN<32>, hashlock: &BytesN<32>) -> Result<(), Error> {
    if !validate(env, secret, hashlock) {
        return Err(Error::InvalidSecret);
    }
    Ok(())
}
