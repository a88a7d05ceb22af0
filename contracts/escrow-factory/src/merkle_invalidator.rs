//! Per-order fill watermark for partially fillable orders.
//!
//! Each key remembers the largest tranche accepted so far; a new tranche is
//! only accepted when it claims a strictly larger amount. Writes happen
//! solely through [`accept`], inside the factory's own invocation.

use shared::Error;
use soroban_sdk::{contracttype, Bytes, BytesN, Env, Symbol};

const DAY_IN_LEDGERS: u32 = 17_280;
pub const PERSISTENT_BUMP_AMOUNT: u32 = 90 * DAY_IN_LEDGERS;
pub const PERSISTENT_LIFETIME_THRESHOLD: u32 = PERSISTENT_BUMP_AMOUNT - 7 * DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MerkleLeaf {
    pub leaf_hash: BytesN<32>,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MerkleLeafInvalidated {
    pub key: BytesN<32>,
    pub leaf_hash: BytesN<32>,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    LastValidated(BytesN<32>),
}

/// keccak256(order_hash ‖ hashlock)
pub fn tranche_key(env: &Env, order_hash: &BytesN<32>, hashlock: &BytesN<32>) -> BytesN<32> {
    let mut bytes = Bytes::from_array(env, &order_hash.to_array());
    bytes.extend_from_array(&hashlock.to_array());
    env.crypto().keccak256(&bytes).into()
}

pub fn leaf_hash(env: &Env, hashlock: &BytesN<32>) -> BytesN<32> {
    env.crypto()
        .keccak256(&Bytes::from_array(env, &hashlock.to_array()))
        .into()
}

pub fn zero_leaf(env: &Env) -> MerkleLeaf {
    MerkleLeaf {
        leaf_hash: BytesN::from_array(env, &[0; 32]),
        amount: 0,
    }
}

pub fn last_validated(env: &Env, key: &BytesN<32>) -> MerkleLeaf {
    env.storage()
        .persistent()
        .get(&DataKey::LastValidated(key.clone()))
        .unwrap_or_else(|| zero_leaf(env))
}

pub fn is_valid(env: &Env, key: &BytesN<32>, candidate: &MerkleLeaf) -> bool {
    candidate.amount > last_validated(env, key).amount
}

/// Overwrites the watermark unconditionally. Use [`accept`].
pub(crate) fn invalidate(env: &Env, key: &BytesN<32>, leaf: &MerkleLeaf) {
    let storage_key = DataKey::LastValidated(key.clone());
    env.storage().persistent().set(&storage_key, leaf);
    env.storage().persistent().extend_ttl(
        &storage_key,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );

    env.events().publish(
        (Symbol::new(env, "merkle_leaf_invalidated"), key.clone()),
        MerkleLeafInvalidated {
            key: key.clone(),
            leaf_hash: leaf.leaf_hash.clone(),
            amount: leaf.amount,
        },
    );
}

/// Check-and-accept in one step.
pub(crate) fn accept(env: &Env, key: &BytesN<32>, leaf: &MerkleLeaf) -> Result<(), Error> {
    if !is_valid(env, key, leaf) {
        return Err(Error::InvalidMerkleProof);
    }
    invalidate(env, key, leaf);
    Ok(())
}
