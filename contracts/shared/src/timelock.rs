use soroban_sdk::contracttype;

use crate::types::TimeLockError;

/// Named phases of an escrow schedule.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    DstWithdrawal,
    DstPublicWithdrawal,
    DstCancellation,
    SrcWithdrawal,
    SrcPublicWithdrawal,
    SrcCancellation,
    SrcPublicCancellation,
}

/// Deployment timestamp plus one offset (seconds) per stage.
///
/// `deployed_at` is left at zero by whoever builds the schedule and is
/// stamped with the ledger time when the escrow is created.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Timelocks {
    pub deployed_at: u64,
    pub dst_withdrawal: u32,
    pub dst_public_withdrawal: u32,
    pub dst_cancellation: u32,
    pub src_withdrawal: u32,
    pub src_public_withdrawal: u32,
    pub src_cancellation: u32,
    pub src_public_cancellation: u32,
}

impl Timelocks {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        deployed_at: u64,
        dst_withdrawal: u32,
        dst_public_withdrawal: u32,
        dst_cancellation: u32,
        src_withdrawal: u32,
        src_public_withdrawal: u32,
        src_cancellation: u32,
        src_public_cancellation: u32,
    ) -> Self {
        Self {
            deployed_at,
            dst_withdrawal,
            dst_public_withdrawal,
            dst_cancellation,
            src_withdrawal,
            src_public_withdrawal,
            src_cancellation,
            src_public_cancellation,
        }
    }

    /// Same schedule anchored at `deployed_at`.
    pub fn with_deployed_at(&self, deployed_at: u64) -> Self {
        Self {
            deployed_at,
            ..self.clone()
        }
    }

    /// Raw offset of a stage relative to `deployed_at`.
    pub fn offset(&self, stage: Stage) -> u32 {
        match stage {
            Stage::DstWithdrawal => self.dst_withdrawal,
            Stage::DstPublicWithdrawal => self.dst_public_withdrawal,
            Stage::DstCancellation => self.dst_cancellation,
            Stage::SrcWithdrawal => self.src_withdrawal,
            Stage::SrcPublicWithdrawal => self.src_public_withdrawal,
            Stage::SrcCancellation => self.src_cancellation,
            Stage::SrcPublicCancellation => self.src_public_cancellation,
        }
    }
}

/// Pure schedule arithmetic. Current time is always supplied by the caller.
pub mod timelocks {
    use super::*;

    /// Absolute ledger time at which `stage` opens.
    pub fn stage_time(timelocks: &Timelocks, stage: Stage) -> Result<u64, TimeLockError> {
        timelocks
            .deployed_at
            .checked_add(timelocks.offset(stage) as u64)
            .ok_or(TimeLockError::TimelockValueOverflow)
    }

    pub fn is_stage_active(timelocks: &Timelocks, stage: Stage, now: u64) -> Result<bool, TimeLockError> {
        Ok(now >= stage_time(timelocks, stage)?)
    }

    pub fn is_before_stage(timelocks: &Timelocks, stage: Stage, now: u64) -> Result<bool, TimeLockError> {
        Ok(now < stage_time(timelocks, stage)?)
    }

    pub fn rescue_time(timelocks: &Timelocks, rescue_delay: u64) -> Result<u64, TimeLockError> {
        timelocks
            .deployed_at
            .checked_add(rescue_delay)
            .ok_or(TimeLockError::RescueStartOverflow)
    }

    /// Private windows open before public ones and every withdrawal window
    /// closes when the matching cancellation window opens.
    pub fn validate(timelocks: &Timelocks) -> Result<(), TimeLockError> {
        if timelocks.src_withdrawal >= timelocks.src_public_withdrawal
            || timelocks.src_public_withdrawal >= timelocks.src_cancellation
            || timelocks.src_cancellation >= timelocks.src_public_cancellation
        {
            return Err(TimeLockError::InvalidSourceChainTimelockOrdering);
        }

        if timelocks.dst_withdrawal >= timelocks.dst_public_withdrawal
            || timelocks.dst_public_withdrawal >= timelocks.dst_cancellation
        {
            return Err(TimeLockError::InvalidDestinationChainTimelockOrdering);
        }

        Ok(())
    }
}
