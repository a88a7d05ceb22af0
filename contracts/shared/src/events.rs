use soroban_sdk::{contracttype, Address, BytesN, Env, Symbol};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deposited {
    pub maker: Address,
    pub token: Address,
    pub amount: i128,
}

/// Carries the revealed secret; relayers replay it on the counterpart chain.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawn {
    pub caller: Address,
    pub recipient: Address,
    pub token: Address,
    pub amount: i128,
    pub secret: BytesN<32>,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cancelled {
    pub caller: Address,
    pub recipient: Address,
    pub token: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rescued {
    pub owner: Address,
    pub token: Address,
    pub amount: i128,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WithdrawKind {
    Private,
    Public,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CancelKind {
    Default,
    Private,
    Public,
}

impl WithdrawKind {
    fn topic(self, env: &Env) -> Symbol {
        match self {
            WithdrawKind::Private => Symbol::new(env, "withdrawn"),
            WithdrawKind::Public => Symbol::new(env, "public_withdrawn"),
        }
    }
}

impl CancelKind {
    fn topic(self, env: &Env) -> Symbol {
        match self {
            CancelKind::Default => Symbol::new(env, "cancelled"),
            CancelKind::Private => Symbol::new(env, "private_cancelled"),
            CancelKind::Public => Symbol::new(env, "public_cancelled"),
        }
    }
}

// Escrow events are keyed by hashlock so watchers can follow a single swap.

pub fn deposited(env: &Env, hashlock: &BytesN<32>, event: Deposited) {
    env.events()
        .publish((Symbol::new(env, "deposited"), hashlock.clone()), event);
}

pub fn withdrawn(env: &Env, kind: WithdrawKind, hashlock: &BytesN<32>, event: Withdrawn) {
    env.events().publish((kind.topic(env), hashlock.clone()), event);
}

pub fn cancelled(env: &Env, kind: CancelKind, hashlock: &BytesN<32>, event: Cancelled) {
    env.events().publish((kind.topic(env), hashlock.clone()), event);
}

pub fn rescued(env: &Env, event: Rescued) {
    env.events()
        .publish((Symbol::new(env, "rescued"), event.token.clone()), event);
}
