use shared::{Immutables, Timelocks};
use soroban_sdk::{contracttype, Address, BytesN};

/// Limit order as signed by the maker.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Order {
    pub salt: BytesN<32>,
    pub maker: Address,
    pub receiver: Address,
    pub maker_asset: Address,
    pub taker_asset: Address,
    pub making_amount: i128,
    pub taking_amount: i128,
}

/// Escrow parameters attached to an order.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtraDataArgs {
    pub hashlock_info: BytesN<32>, // hashlock of the secret guarding this fill
    pub dst_chain_id: u32,
    pub dst_token: Address,
    pub parts_amount: u32,         // tranches the maker allows; < 2 means single fill only
    pub timelocks: Timelocks,      // offsets only, deployed_at is stamped on creation
}

/// What the resolver needs to build the destination escrow.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DstImmutablesComplement {
    pub maker: Address,
    pub amount: i128,
    pub token: Address,
    pub chain_id: u32,
}

#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EscrowKind {
    Source,
    Destination,
}

// Events

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SrcEscrowCreated {
    pub escrow: Address,
    pub immutables: Immutables,
    pub dst_complement: DstImmutablesComplement,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DstEscrowCreated {
    pub escrow: Address,
    pub hashlock: BytesN<32>,
    pub taker: Address,
}
