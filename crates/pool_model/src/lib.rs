//! Tidepool Model - Pure two-asset liquidity pool state machine
//!
//! This crate contains the core pool arithmetic and state transitions:
//! reserves of two fungible assets, proportional ownership shares, ratio
//! pricing, and proportional withdrawal. Integer-only arithmetic with floor
//! rounding so that rounding always favors the pool.
//!
//! No dependencies, `no_std` + `alloc`, all transitions total: every
//! fallible path returns an error before any state is written.

#![no_std]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod engine;
pub mod math;
pub mod state;

pub use engine::PoolEngine;
pub use state::{AccountId, Balances, BalanceBook, Pool, ShareLedger};

/// Share scale factor (1e6)
///
/// Shares are denominated in millionths of one deposited unit of asset A so
/// that ratio computations retain fractional resolution under integer-only
/// arithmetic. Fixed at deployment; never changes.
pub const PRECISION: u128 = 1_000_000;

/// Error types for pool operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// Non-positive amount supplied to a provision
    InvalidAmount,
    /// Caller lacks free balance to cover the deposit
    InsufficientBalance,
    /// Caller lacks shares to burn (includes a zero burn)
    InsufficientShares,
    /// Ratio query against a zero-liquidity pool
    EmptyPool,
    /// Deposit would distort the pool ratio beyond floor rounding
    RatioMismatch,
    /// Rounding collapsed a nonzero deposit to zero shares
    ZeroShare,
    /// Arithmetic overflow
    Overflow,
    /// Internal post-condition check failed; nothing was committed
    InvariantViolation,
}

impl core::fmt::Display for PoolError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            PoolError::InvalidAmount => "amounts must be positive",
            PoolError::InsufficientBalance => "insufficient free balance",
            PoolError::InsufficientShares => "insufficient shares to burn",
            PoolError::EmptyPool => "pool holds no liquidity",
            PoolError::RatioMismatch => "deposit does not match the pool ratio",
            PoolError::ZeroShare => "deposit too small to mint a share",
            PoolError::Overflow => "arithmetic overflow",
            PoolError::InvariantViolation => "internal invariant violated",
        };
        f.write_str(msg)
    }
}
