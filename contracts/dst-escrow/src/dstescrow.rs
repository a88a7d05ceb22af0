use shared::baseescrow;
use shared::{
    enter, only_caller, only_from, only_within, BaseEscrowTrait, CancelKind, Error, Immutables, Stage,
    WithdrawKind,
};
use soroban_sdk::{contract, contractimpl, Address, BytesN, Env};

#[contract]
pub struct DstEscrow;

#[contractimpl]
impl DstEscrow {
    /// Records the immutables and pulls `amount` from the maker.
    pub fn __constructor(env: Env, immutables: Immutables, owner: Address) {
        baseescrow::initialize(&env, immutables, owner);
    }

    /// PUBLIC WITHDRAWAL: anyone holding the secret, DstPublicWithdrawal → DstCancellation
    pub fn withdraw_public(
        env: Env,
        caller: Address,
        secret: BytesN<32>,
        immutables: Immutables,
    ) -> Result<(), Error> {
        let _guard = enter(&env, &immutables)?;
        caller.require_auth();
        only_within(&env, &immutables, Stage::DstPublicWithdrawal, Stage::DstCancellation)?;

        baseescrow::withdraw_to_taker(&env, WithdrawKind::Public, &caller, &secret, &immutables)
    }

    pub fn cancel_private(env: Env, caller: Address, immutables: Immutables) -> Result<(), Error> {
        dst_cancel(&env, CancelKind::Private, &caller, &immutables)
    }
}

#[contractimpl]
impl BaseEscrowTrait for DstEscrow {
    fn get_immutables(env: Env) -> Result<Immutables, Error> {
        baseescrow::stored_immutables(&env)
    }

    fn owner(env: Env) -> Result<Address, Error> {
        baseescrow::owner(&env)
    }

    fn is_withdrawn(env: Env) -> bool {
        baseescrow::is_withdrawn(&env)
    }

    fn is_cancelled(env: Env) -> bool {
        baseescrow::is_cancelled(&env)
    }

    // PRIVATE WITHDRAWAL: only taker, DstWithdrawal → DstCancellation
    fn withdraw(env: Env, caller: Address, secret: BytesN<32>, immutables: Immutables) -> Result<(), Error> {
        let _guard = enter(&env, &immutables)?;
        only_caller(&caller, &immutables.taker)?;
        only_within(&env, &immutables, Stage::DstWithdrawal, Stage::DstCancellation)?;

        baseescrow::withdraw_to_taker(&env, WithdrawKind::Private, &caller, &secret, &immutables)
    }

    fn cancel(env: Env, caller: Address, immutables: Immutables) -> Result<(), Error> {
        dst_cancel(&env, CancelKind::Default, &caller, &immutables)
    }

    fn rescue(env: Env, caller: Address, token: Address, amount: i128) -> Result<(), Error> {
        baseescrow::rescue(&env, &caller, &token, amount)
    }
}

// No public cancellation on this side: only the maker, from DstCancellation on.
fn dst_cancel(env: &Env, kind: CancelKind, caller: &Address, immutables: &Immutables) -> Result<(), Error> {
    let _guard = enter(env, immutables)?;
    only_caller(caller, &immutables.maker)?;
    only_from(env, immutables, Stage::DstCancellation)?;

    baseescrow::cancel_to_maker(env, kind, caller, immutables)
}
