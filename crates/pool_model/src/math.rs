//! Integer ratio math with floor rounding
//!
//! Reserves are stored as `u64`, shares as `u128`. Every product is computed
//! at `u128` width with explicit overflow detection; division truncates
//! toward zero so a provider can never extract more than their proportional
//! slice.

use crate::{PoolError, PRECISION};

/// Scale a raw asset amount into share units.
///
/// `u64::MAX * PRECISION` fits comfortably in a `u128`, so the widened
/// multiply cannot wrap.
#[inline]
pub fn scale(x: u64) -> u128 {
    (x as u128) * PRECISION
}

/// Collapse share units back to a raw amount, discarding the fraction.
#[inline]
pub fn unscale(x: u128) -> u128 {
    x / PRECISION
}

/// floor(a * b / d) with checked intermediate product.
///
/// Callers must rule out a zero divisor first (empty pool, zero share
/// supply); hitting one here is a logic defect, not a caller error.
#[inline]
pub fn mul_div_floor(a: u128, b: u128, d: u128) -> Result<u128, PoolError> {
    if d == 0 {
        return Err(PoolError::InvariantViolation);
    }
    let product = a.checked_mul(b).ok_or(PoolError::Overflow)?;
    Ok(product / d)
}
