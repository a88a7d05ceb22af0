use shared::baseescrow;
use shared::{
    enter, only_caller, only_from, only_within, BaseEscrowTrait, CancelKind, Error, Immutables, Stage,
    WithdrawKind,
};
use soroban_sdk::{contract, contractimpl, Address, BytesN, Env};

#[contract]
pub struct SrcEscrow;

// The early claimant is checked against the maker slot of the immutables,
// not the taker who receives the funds.
fn only_early_claimant(caller: &Address, immutables: &Immutables) -> Result<(), Error> {
    only_caller(caller, &immutables.maker)
}

#[contractimpl]
impl SrcEscrow {
    /// Records the immutables and pulls `amount` from the maker.
    pub fn __constructor(env: Env, immutables: Immutables, owner: Address) {
        baseescrow::initialize(&env, immutables, owner);
    }

    /// Anyone may complete the swap once the public withdrawal window opens.
    pub fn withdraw_public(
        env: Env,
        caller: Address,
        secret: BytesN<32>,
        immutables: Immutables,
    ) -> Result<(), Error> {
        let _guard = enter(&env, &immutables)?;
        caller.require_auth();
        only_within(&env, &immutables, Stage::SrcPublicWithdrawal, Stage::SrcCancellation)?;

        baseescrow::withdraw_to_taker(&env, WithdrawKind::Public, &caller, &secret, &immutables)
    }

    pub fn cancel_private(env: Env, caller: Address, immutables: Immutables) -> Result<(), Error> {
        src_cancel(&env, CancelKind::Private, &caller, &immutables)
    }

    /// Anyone may refund the maker once the public cancellation window opens.
    pub fn cancel_public(env: Env, caller: Address, immutables: Immutables) -> Result<(), Error> {
        let _guard = enter(&env, &immutables)?;
        caller.require_auth();
        only_from(&env, &immutables, Stage::SrcPublicCancellation)?;

        baseescrow::cancel_to_maker(&env, CancelKind::Public, &caller, &immutables)
    }
}

#[contractimpl]
impl BaseEscrowTrait for SrcEscrow {
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

    fn withdraw(env: Env, caller: Address, secret: BytesN<32>, immutables: Immutables) -> Result<(), Error> {
        let _guard = enter(&env, &immutables)?;
        only_early_claimant(&caller, &immutables)?;
        only_within(&env, &immutables, Stage::SrcWithdrawal, Stage::SrcCancellation)?;

        baseescrow::withdraw_to_taker(&env, WithdrawKind::Private, &caller, &secret, &immutables)
    }

    fn cancel(env: Env, caller: Address, immutables: Immutables) -> Result<(), Error> {
        src_cancel(&env, CancelKind::Default, &caller, &immutables)
    }

    fn rescue(env: Env, caller: Address, token: Address, amount: i128) -> Result<(), Error> {
        baseescrow::rescue(&env, &caller, &token, amount)
    }
}

fn src_cancel(env: &Env, kind: CancelKind, caller: &Address, immutables: &Immutables) -> Result<(), Error> {
    let _guard = enter(env, immutables)?;
    only_caller(caller, &immutables.maker)?;
    only_from(env, immutables, Stage::SrcCancellation)?;

    baseescrow::cancel_to_maker(env, kind, caller, immutables)
}
