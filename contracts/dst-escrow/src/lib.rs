#![no_std]

// Destination Chain Escrow Contract
// Holds the resolver's deposit on the destination side of a cross-chain atomic swap

mod dstescrow;

// Re-export the contract
pub use dstescrow::{DstEscrow, DstEscrowClient};
