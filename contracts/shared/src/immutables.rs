use soroban_sdk::{contracttype, Address, BytesN};

use crate::timelock::Timelocks;
use crate::types::Error;

/// Frozen parameter set of one swap instance.
///
/// Every privileged escrow call re-supplies a copy which is compared by
/// value with the snapshot recorded at construction.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Immutables {
    pub order_hash: BytesN<32>,     // order this escrow settles
    pub hashlock: BytesN<32>,       // keccak256 of the secret
    pub maker: Address,             // depositor, refunded on cancel
    pub taker: Address,             // beneficiary on withdraw
    pub token: Address,
    pub amount: i128,
    pub timelocks: Timelocks,
    pub src_factory: Address,
    pub dst_factory: Address,
}

pub mod immutables {
    use super::*;

    pub fn validate_amounts(immutables: &Immutables) -> Result<(), Error> {
        if immutables.amount <= 0 {
            return Err(Error::InvalidAmount);
        }
        Ok(())
    }

    /// Field-by-field comparison of a supplied copy against the snapshot.
    pub fn ensure_matches(stored: &Immutables, supplied: &Immutables) -> Result<(), Error> {
        if stored != supplied {
            return Err(Error::InvalidImmutables);
        }
        Ok(())
    }
}
