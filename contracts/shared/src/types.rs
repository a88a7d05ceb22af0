use soroban_sdk::contracterror;

/// Errors surfaced by escrow instances and the factory.
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    Unauthorized = 1,
    AlreadyWithdrawn = 2,
    AlreadyCancelled = 3,
    InvalidImmutables = 4,
    InvalidSecret = 5,
    TooEarly = 6,
    TooLate = 7,
    InvalidMerkleProof = 8,
    TransferFailed = 9,
    DeploymentFailed = 10,
    InvalidCreationTime = 11,
    InvalidTimelocks = 12,
    InvalidAmount = 13,
    InvalidPartialFill = 14,
    InvalidOrderHash = 15,
    ReentrantCall = 16,
    TimelockOverflow = 17,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum TimeLockError {
    RescueStartOverflow = 1,
    TimelockValueOverflow = 2,
    InvalidSourceChainTimelockOrdering = 3,
    InvalidDestinationChainTimelockOrdering = 4,
}

impl From<TimeLockError> for Error {
    fn from(error: TimeLockError) -> Self {
        match error {
            TimeLockError::RescueStartOverflow | TimeLockError::TimelockValueOverflow => {
                Error::TimelockOverflow
            }
            TimeLockError::InvalidSourceChainTimelockOrdering
            | TimeLockError::InvalidDestinationChainTimelockOrdering => Error::InvalidTimelocks,
        }
    }
}
