#![no_std]

// Shared library for cross-chain atomic swap contracts
// Contains the error taxonomy, hashlock and timelock logic, immutables,
// events and the escrow state machine used by both chain-side variants

pub mod baseescrow;
pub mod events;
pub mod hashlock;
pub mod immutables;
pub mod timelock;
pub mod types;

// Re-export commonly used types for easier imports
pub use baseescrow::{
    enter, extend_instance_ttl, only_caller, only_from, only_within, uni_transfer, BaseEscrowTrait,
    ReentrancyGuard, RESCUE_DELAY,
};
pub use events::{CancelKind, WithdrawKind};
pub use immutables::Immutables;
pub use timelock::{timelocks, Stage, Timelocks};
pub use types::{Error, TimeLockError};
