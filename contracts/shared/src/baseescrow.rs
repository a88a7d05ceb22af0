use soroban_sdk::{contracttype, log, panic_with_error, token, Address, BytesN, Env};

use crate::events::{self, CancelKind, Cancelled, Deposited, Rescued, WithdrawKind, Withdrawn};
use crate::hashlock;
use crate::immutables::{immutables, Immutables};
use crate::timelock::{timelocks, Stage};
use crate::types::Error;

/// Owner may sweep stray balances one year after deployment.
pub const RESCUE_DELAY: u64 = 365 * 24 * 60 * 60;

pub(crate) const DAY_IN_LEDGERS: u32 = 17_280;
pub const INSTANCE_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub const INSTANCE_LIFETIME_THRESHOLD: u32 = INSTANCE_BUMP_AMOUNT - DAY_IN_LEDGERS;

// Storage keys
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Immutables,
    Owner,
    Withdrawn,
    Cancelled,
    Locked,
}

/// Entry points every escrow variant exposes.
pub trait BaseEscrowTrait {
    fn get_immutables(env: Env) -> Result<Immutables, Error>;
    fn owner(env: Env) -> Result<Address, Error>;
    fn is_withdrawn(env: Env) -> bool;
    fn is_cancelled(env: Env) -> bool;
    fn withdraw(env: Env, caller: Address, secret: BytesN<32>, immutables: Immutables) -> Result<(), Error>;
    fn cancel(env: Env, caller: Address, immutables: Immutables) -> Result<(), Error>;
    fn rescue(env: Env, caller: Address, token: Address, amount: i128) -> Result<(), Error>;
}

/// Per-instance lock held for the duration of a state-mutating call.
///
/// Released on drop, so every exit path (including `?`) unlocks.
pub struct ReentrancyGuard {
    env: Env,
}

impl ReentrancyGuard {
    pub fn acquire(env: &Env) -> Result<Self, Error> {
        let storage = env.storage().instance();
        if storage.get::<DataKey, bool>(&DataKey::Locked).unwrap_or(false) {
            return Err(Error::ReentrantCall);
        }
        storage.set(&DataKey::Locked, &true);
        Ok(Self { env: env.clone() })
    }
}

impl Drop for ReentrancyGuard {
    fn drop(&mut self) {
        self.env.storage().instance().remove(&DataKey::Locked);
    }
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Constructor body shared by both variants. Aborts the deployment on any
/// error, so a half-initialized or unfunded instance never persists.
pub fn initialize(env: &Env, immutables: Immutables, owner: Address) {
    if let Err(error) = try_initialize(env, immutables, owner) {
        panic_with_error!(env, error);
    }
}

fn try_initialize(env: &Env, mut immutables: Immutables, owner: Address) -> Result<(), Error> {
    immutables.timelocks = immutables
        .timelocks
        .with_deployed_at(env.ledger().timestamp());
    immutables::validate_amounts(&immutables)?;
    timelocks::validate(&immutables.timelocks)?;

    let storage = env.storage().instance();
    storage.set(&DataKey::Immutables, &immutables);
    storage.set(&DataKey::Owner, &owner);
    storage.set(&DataKey::Withdrawn, &false);
    storage.set(&DataKey::Cancelled, &false);
    extend_instance_ttl(env);

    pull_funds(env, &immutables.token, &immutables.maker, immutables.amount)?;

    log!(env, "escrow funded: amount={}", immutables.amount);
    events::deposited(
        env,
        &immutables.hashlock,
        Deposited {
            maker: immutables.maker.clone(),
            token: immutables.token.clone(),
            amount: immutables.amount,
        },
    );
    Ok(())
}

// Views

pub fn stored_immutables(env: &Env) -> Result<Immutables, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Immutables)
        .ok_or(Error::InvalidImmutables)
}

pub fn owner(env: &Env) -> Result<Address, Error> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(Error::Unauthorized)
}

pub fn is_withdrawn(env: &Env) -> bool {
    env.storage().instance().get(&DataKey::Withdrawn).unwrap_or(false)
}

pub fn is_cancelled(env: &Env) -> bool {
    env.storage().instance().get(&DataKey::Cancelled).unwrap_or(false)
}

// Modifier helpers

/// Takes the lock, then checks the supplied immutables and the terminal
/// flags. Callers keep the returned guard alive for the whole operation.
pub fn enter(env: &Env, supplied: &Immutables) -> Result<ReentrancyGuard, Error> {
    let guard = ReentrancyGuard::acquire(env)?;
    extend_instance_ttl(env);
    only_valid_immutables(env, supplied)?;
    only_active(env)?;
    Ok(guard)
}

pub fn only_valid_immutables(env: &Env, supplied: &Immutables) -> Result<(), Error> {
    immutables::ensure_matches(&stored_immutables(env)?, supplied)
}

pub fn only_active(env: &Env) -> Result<(), Error> {
    if is_withdrawn(env) {
        return Err(Error::AlreadyWithdrawn);
    }
    if is_cancelled(env) {
        return Err(Error::AlreadyCancelled);
    }
    Ok(())
}

pub fn only_caller(caller: &Address, expected: &Address) -> Result<(), Error> {
    caller.require_auth();
    if caller != expected {
        return Err(Error::Unauthorized);
    }
    Ok(())
}

pub fn only_after(env: &Env, start: u64) -> Result<(), Error> {
    if env.ledger().timestamp() < start {
        return Err(Error::TooEarly);
    }
    Ok(())
}

/// Current time must lie in `[open, close)` of the schedule.
pub fn only_within(env: &Env, immutables: &Immutables, open: Stage, close: Stage) -> Result<(), Error> {
    only_from(env, immutables, open)?;
    if !timelocks::is_before_stage(&immutables.timelocks, close, env.ledger().timestamp())? {
        return Err(Error::TooLate);
    }
    Ok(())
}

pub fn only_from(env: &Env, immutables: &Immutables, open: Stage) -> Result<(), Error> {
    if !timelocks::is_stage_active(&immutables.timelocks, open, env.ledger().timestamp())? {
        return Err(Error::TooEarly);
    }
    Ok(())
}

// State transitions

/// Releases the deposit to the taker once the secret checks out.
pub fn withdraw_to_taker(
    env: &Env,
    kind: WithdrawKind,
    caller: &Address,
    secret: &BytesN<32>,
    immutables: &Immutables,
) -> Result<(), Error> {
    hashlock::only_valid_secret(env, secret, &immutables.hashlock)?;

    env.storage().instance().set(&DataKey::Withdrawn, &true);
    uni_transfer(env, &immutables.token, &immutables.taker, immutables.amount)?;

    events::withdrawn(
        env,
        kind,
        &immutables.hashlock,
        Withdrawn {
            caller: caller.clone(),
            recipient: immutables.taker.clone(),
            token: immutables.token.clone(),
            amount: immutables.amount,
            secret: secret.clone(),
        },
    );
    Ok(())
}

/// Returns the deposit to the maker.
pub fn cancel_to_maker(
    env: &Env,
    kind: CancelKind,
    caller: &Address,
    immutables: &Immutables,
) -> Result<(), Error> {
    env.storage().instance().set(&DataKey::Cancelled, &true);
    uni_transfer(env, &immutables.token, &immutables.maker, immutables.amount)?;

    events::cancelled(
        env,
        kind,
        &immutables.hashlock,
        Cancelled {
            caller: caller.clone(),
            recipient: immutables.maker.clone(),
            token: immutables.token.clone(),
            amount: immutables.amount,
        },
    );
    Ok(())
}

/// Owner-only sweep of any token balance, open once `RESCUE_DELAY` has
/// elapsed since deployment. Ignores the terminal flags.
pub fn rescue(env: &Env, caller: &Address, token: &Address, amount: i128) -> Result<(), Error> {
    let _guard = ReentrancyGuard::acquire(env)?;
    let owner = owner(env)?;
    only_caller(caller, &owner)?;

    let immutables = stored_immutables(env)?;
    only_after(env, timelocks::rescue_time(&immutables.timelocks, RESCUE_DELAY)?)?;
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    uni_transfer(env, token, &owner, amount)?;
    events::rescued(
        env,
        Rescued {
            owner,
            token: token.clone(),
            amount,
        },
    );
    Ok(())
}

// Token transfers

/// Moves `amount` of `token` from this instance to `to`.
pub fn uni_transfer(env: &Env, token: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    if amount <= 0 {
        return Ok(());
    }
    let token_client = token::Client::new(env, token);
    match token_client.try_transfer(&env.current_contract_address(), to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}

/// Pulls `amount` of `token` from `from` into this instance.
pub fn pull_funds(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), Error> {
    let token_client = token::Client::new(env, token);
    match token_client.try_transfer(from, &env.current_contract_address(), &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}
