#![cfg(test)]

use super::*;
use shared::{hashlock, Error, Immutables, Timelocks, RESCUE_DELAY};
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{contract, contracterror, contractimpl, symbol_short, token, Address, BytesN, Env};

const T0: u64 = 1_700_000_000;

// Helper functions for testing
fn create_test_secret(env: &Env) -> (BytesN<32>, BytesN<32>) {
    let secret = BytesN::from_array(env, &[0x42; 32]);
    let hashlock = hashlock::commit(env, &secret);
    (secret, hashlock)
}

fn create_test_immutables(env: &Env, token: &Address, hashlock: BytesN<32>) -> Immutables {
    Immutables {
        order_hash: BytesN::from_array(env, &[0x01; 32]),
        hashlock,
        maker: Address::generate(env),
        taker: Address::generate(env),
        token: token.clone(),
        amount: 1000,
        timelocks: Timelocks::new(
            0,      // deployed_at
            300,    // dst_withdrawal
            600,    // dst_public_withdrawal
            3_600,  // dst_cancellation
            1_800,  // src_withdrawal
            3_600,  // src_public_withdrawal
            86_400, // src_cancellation
            90_000, // src_public_cancellation
        ),
        src_factory: Address::generate(env),
        dst_factory: Address::generate(env),
    }
}

fn set_time(env: &Env, timestamp: u64) {
    env.ledger().with_mut(|ledger| {
        ledger.timestamp = timestamp;
    });
}

struct Setup<'a> {
    env: Env,
    client: SrcEscrowClient<'a>,
    token: token::Client<'a>,
    owner: Address,
    secret: BytesN<32>,
    immutables: Immutables,
}

fn setup<'a>() -> Setup<'a> {
    let env = Env::default();
    env.mock_all_auths_allowing_non_root_auth();
    set_time(&env, T0);

    let token_address = env
        .register_stellar_asset_contract_v2(Address::generate(&env))
        .address();
    let (secret, hashlock) = create_test_secret(&env);
    let immutables = create_test_immutables(&env, &token_address, hashlock);
    token::StellarAssetClient::new(&env, &token_address).mint(&immutables.maker, &1000);

    let owner = Address::generate(&env);
    let contract_id = env.register(SrcEscrow, (immutables, owner.clone()));
    let client = SrcEscrowClient::new(&env, &contract_id);
    let immutables = client.get_immutables();
    let token = token::Client::new(&env, &token_address);

    Setup {
        env,
        client,
        token,
        owner,
        secret,
        immutables,
    }
}

// ===== CONSTRUCTION =====

#[test]
fn test_src_construction_pulls_deposit() {
    let s = setup();

    assert_eq!(s.token.balance(&s.client.address), 1000);
    assert_eq!(s.token.balance(&s.immutables.maker), 0);
    assert_eq!(s.immutables.timelocks.deployed_at, T0);
    assert_eq!(s.client.owner(), s.owner);
    assert!(!s.client.is_withdrawn());
    assert!(!s.client.is_cancelled());
}

// ===== PRIVATE WITHDRAWAL =====

#[test]
fn test_src_withdraw_then_already_withdrawn() {
    let s = setup();
    let claimant = s.immutables.maker.clone();
    set_time(&s.env, T0 + 1_900);

    s.client.withdraw(&claimant, &s.secret, &s.immutables);

    assert_eq!(s.token.balance(&s.immutables.taker), 1000);
    assert_eq!(s.token.balance(&s.client.address), 0);
    assert!(s.client.is_withdrawn());
    assert!(!s.client.is_cancelled());

    assert_eq!(
        s.client.try_withdraw(&claimant, &s.secret, &s.immutables),
        Err(Ok(Error::AlreadyWithdrawn))
    );
    set_time(&s.env, T0 + 86_400);
    assert_eq!(
        s.client.try_cancel(&claimant, &s.immutables),
        Err(Ok(Error::AlreadyWithdrawn))
    );
}

#[test]
fn test_src_withdraw_window_bounds() {
    let s = setup();
    let claimant = s.immutables.maker.clone();

    set_time(&s.env, T0 + 1_799);
    assert_eq!(
        s.client.try_withdraw(&claimant, &s.secret, &s.immutables),
        Err(Ok(Error::TooEarly))
    );

    set_time(&s.env, T0 + 86_400);
    assert_eq!(
        s.client.try_withdraw(&claimant, &s.secret, &s.immutables),
        Err(Ok(Error::TooLate))
    );

    // window is checked before the secret
    let wrong = BytesN::from_array(&s.env, &[0x01; 32]);
    assert_eq!(
        s.client.try_withdraw(&claimant, &wrong, &s.immutables),
        Err(Ok(Error::TooLate))
    );
}

#[test]
fn test_src_withdraw_invalid_secret() {
    let s = setup();
    set_time(&s.env, T0 + 1_900);
    let wrong = BytesN::from_array(&s.env, &[0x01; 32]);

    assert_eq!(
        s.client.try_withdraw(&s.immutables.maker, &wrong, &s.immutables),
        Err(Ok(Error::InvalidSecret))
    );
    assert!(!s.client.is_withdrawn());
    assert_eq!(s.token.balance(&s.client.address), 1000);
}

#[test]
fn test_src_withdraw_checks_maker_slot() {
    let s = setup();
    set_time(&s.env, T0 + 1_900);

    assert_eq!(
        s.client.try_withdraw(&s.immutables.taker, &s.secret, &s.immutables),
        Err(Ok(Error::Unauthorized))
    );
    assert_eq!(
        s.client.try_withdraw(&Address::generate(&s.env), &s.secret, &s.immutables),
        Err(Ok(Error::Unauthorized))
    );
}

#[test]
fn test_src_withdraw_invalid_immutables() {
    let s = setup();
    set_time(&s.env, T0 + 1_900);

    let mut tampered = s.immutables.clone();
    tampered.amount = 2000;
    assert_eq!(
        s.client.try_withdraw(&s.immutables.maker, &s.secret, &tampered),
        Err(Ok(Error::InvalidImmutables))
    );

    let mut tampered = s.immutables.clone();
    tampered.timelocks.deployed_at = T0 - 100_000;
    assert_eq!(
        s.client.try_withdraw(&s.immutables.maker, &s.secret, &tampered),
        Err(Ok(Error::InvalidImmutables))
    );
}

// ===== PUBLIC WITHDRAWAL =====

#[test]
fn test_src_public_withdraw_by_anyone() {
    let s = setup();
    let relayer = Address::generate(&s.env);

    set_time(&s.env, T0 + 3_599);
    assert_eq!(
        s.client.try_withdraw_public(&relayer, &s.secret, &s.immutables),
        Err(Ok(Error::TooEarly))
    );

    set_time(&s.env, T0 + 3_600);
    s.client.withdraw_public(&relayer, &s.secret, &s.immutables);

    assert_eq!(s.token.balance(&s.immutables.taker), 1000);
    assert!(s.client.is_withdrawn());
}

#[test]
fn test_src_public_withdraw_closes_at_cancellation() {
    let s = setup();
    let relayer = Address::generate(&s.env);
    set_time(&s.env, T0 + 86_400);

    assert_eq!(
        s.client.try_withdraw_public(&relayer, &s.secret, &s.immutables),
        Err(Ok(Error::TooLate))
    );
}

// ===== CANCELLATION =====

#[test]
fn test_src_cancel_private_then_already_cancelled() {
    let s = setup();
    let maker = s.immutables.maker.clone();

    set_time(&s.env, T0 + 86_399);
    assert_eq!(
        s.client.try_cancel_private(&maker, &s.immutables),
        Err(Ok(Error::TooEarly))
    );

    set_time(&s.env, T0 + 86_400);
    s.client.cancel_private(&maker, &s.immutables);

    assert_eq!(s.token.balance(&maker), 1000);
    assert!(s.client.is_cancelled());
    assert!(!s.client.is_withdrawn());

    assert_eq!(
        s.client.try_withdraw(&maker, &s.secret, &s.immutables),
        Err(Ok(Error::AlreadyCancelled))
    );
    assert_eq!(
        s.client.try_cancel_public(&maker, &s.immutables),
        Err(Ok(Error::AlreadyCancelled))
    );
}

#[test]
fn test_src_cancel_requires_maker() {
    let s = setup();
    set_time(&s.env, T0 + 86_400);

    assert_eq!(
        s.client.try_cancel(&s.immutables.taker, &s.immutables),
        Err(Ok(Error::Unauthorized))
    );

    s.client.cancel(&s.immutables.maker, &s.immutables);
    assert_eq!(s.token.balance(&s.immutables.maker), 1000);
}

#[test]
fn test_src_cancel_public_window() {
    let s = setup();
    let relayer = Address::generate(&s.env);

    set_time(&s.env, T0 + 89_999);
    assert_eq!(
        s.client.try_cancel_public(&relayer, &s.immutables),
        Err(Ok(Error::TooEarly))
    );

    set_time(&s.env, T0 + 90_000);
    s.client.cancel_public(&relayer, &s.immutables);

    assert_eq!(s.token.balance(&s.immutables.maker), 1000);
    assert!(s.client.is_cancelled());
}

// ===== RESCUE =====

#[test]
fn test_src_rescue_after_delay() {
    let s = setup();
    let stray_admin = Address::generate(&s.env);
    let stray = s.env.register_stellar_asset_contract_v2(stray_admin).address();
    token::StellarAssetClient::new(&s.env, &stray).mint(&s.client.address, &55);

    set_time(&s.env, T0 + RESCUE_DELAY - 1);
    assert_eq!(
        s.client.try_rescue(&s.owner, &stray, &55),
        Err(Ok(Error::TooEarly))
    );

    set_time(&s.env, T0 + RESCUE_DELAY);
    assert_eq!(
        s.client.try_rescue(&s.immutables.taker, &stray, &55),
        Err(Ok(Error::Unauthorized))
    );
    s.client.rescue(&s.owner, &stray, &55);

    assert_eq!(token::Client::new(&s.env, &stray).balance(&s.owner), 55);
}

#[test]
fn test_src_rescue_ignores_terminal_state() {
    let s = setup();
    set_time(&s.env, T0 + 1_900);
    s.client.withdraw(&s.immutables.maker, &s.secret, &s.immutables);

    token::StellarAssetClient::new(&s.env, &s.token.address).mint(&s.client.address, &7);
    set_time(&s.env, T0 + RESCUE_DELAY);
    s.client.rescue(&s.owner, &s.token.address, &7);

    assert_eq!(s.token.balance(&s.owner), 7);
}

// ===== TOKEN FAILURES =====

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MockTokenError {
    Frozen = 77,
}

/// Token whose transfers can be switched off.
#[contract]
pub struct FreezableToken;

#[contractimpl]
impl FreezableToken {
    pub fn freeze(env: Env) {
        env.storage().instance().set(&symbol_short!("frozen"), &true);
    }

    pub fn transfer(env: Env, _from: Address, _to: Address, _amount: i128) -> Result<(), MockTokenError> {
        if env.storage().instance().get(&symbol_short!("frozen")).unwrap_or(false) {
            return Err(MockTokenError::Frozen);
        }
        Ok(())
    }
}

#[test]
fn test_src_failed_payout_rolls_back() {
    let env = Env::default();
    env.mock_all_auths_allowing_non_root_auth();
    set_time(&env, T0);

    let token_id = env.register(FreezableToken, ());
    let (secret, hashlock) = create_test_secret(&env);
    let immutables = create_test_immutables(&env, &token_id, hashlock);
    let contract_id = env.register(SrcEscrow, (immutables, Address::generate(&env)));
    let client = SrcEscrowClient::new(&env, &contract_id);
    let immutables = client.get_immutables();

    FreezableTokenClient::new(&env, &token_id).freeze();
    set_time(&env, T0 + 1_900);

    assert_eq!(
        client.try_withdraw(&immutables.maker, &secret, &immutables),
        Err(Ok(Error::TransferFailed))
    );
    assert!(!client.is_withdrawn());
}

#[test]
#[should_panic(expected = "Error(Contract, #9)")]
fn test_src_construction_aborts_on_failed_pull() {
    let env = Env::default();
    env.mock_all_auths_allowing_non_root_auth();
    set_time(&env, T0);

    let token_id = env.register(FreezableToken, ());
    FreezableTokenClient::new(&env, &token_id).freeze();
    let (_, hashlock) = create_test_secret(&env);
    let immutables = create_test_immutables(&env, &token_id, hashlock);

    env.register(SrcEscrow, (immutables, Address::generate(&env)));
}
