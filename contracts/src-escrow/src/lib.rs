#![no_std]

// Source Chain Escrow Contract
// Holds the maker's deposit on the source side of a cross-chain atomic swap

mod srcescrow;

// Re-export the contract
pub use srcescrow::{SrcEscrow, SrcEscrowClient};

#[cfg(test)]
mod test;
