//! Provision, withdrawal, and equivalence over the pool state
//!
//! All state-changing operations validate first, compute the complete next
//! state with checked arithmetic, and only then commit. A failed
//! precondition leaves the engine untouched, so every transition is
//! all-or-nothing.

use crate::math;
use crate::state::{AccountId, BalanceBook, Balances, Pool, ShareLedger};
use crate::PoolError;

/// The pool aggregate: reserves, share ledger, and the free-balance book
/// the engines settle against.
///
/// One long-lived instance per pool; callers identify themselves with an
/// explicit [`AccountId`] on every per-account operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolEngine {
    pool: Pool,
    shares: ShareLedger,
    balances: BalanceBook,
}

impl PoolEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild an engine from previously captured parts.
    pub fn from_parts(pool: Pool, shares: ShareLedger, balances: BalanceBook) -> Self {
        Self { pool, shares, balances }
    }

    /// Borrow the parts, for persistence layers.
    pub fn parts(&self) -> (&Pool, &ShareLedger, &BalanceBook) {
        (&self.pool, &self.shares, &self.balances)
    }

    // ========================================================================
    // Demo funding
    // ========================================================================

    /// Mint free balances to an account, unconditionally.
    ///
    /// Demo/test funding only; it touches the balance book, never the pool,
    /// and plays no part in the pool invariants.
    pub fn faucet(
        &mut self,
        account: AccountId,
        amount_a: u64,
        amount_b: u64,
    ) -> Result<(), PoolError> {
        let funded = self
            .balances
            .balances_of(&account)
            .credited(amount_a, amount_b)?;
        self.balances.set(account, funded);
        Ok(())
    }

    // ========================================================================
    // Equivalence (pure reads)
    // ========================================================================

    /// Amount of asset B matching `amount_a` at the current pool ratio:
    /// `floor(amount_a * balance_b / balance_a)`.
    pub fn equivalent_b(&self, amount_a: u64) -> Result<u64, PoolError> {
        if self.pool.balance_a == 0 {
            return Err(PoolError::EmptyPool);
        }
        let amount = math::mul_div_floor(
            amount_a as u128,
            self.pool.balance_b as u128,
            self.pool.balance_a as u128,
        )?;
        // amount <= balance_b whenever amount_a <= balance_a; larger inputs
        // can exceed u64 and must surface as overflow, not silent wrap.
        u64::try_from(amount).map_err(|_| PoolError::Overflow)
    }

    /// Amount of asset A matching `amount_b` at the current pool ratio.
    pub fn equivalent_a(&self, amount_b: u64) -> Result<u64, PoolError> {
        if self.pool.balance_b == 0 {
            return Err(PoolError::EmptyPool);
        }
        let amount = math::mul_div_floor(
            amount_b as u128,
            self.pool.balance_a as u128,
            self.pool.balance_b as u128,
        )?;
        u64::try_from(amount).map_err(|_| PoolError::Overflow)
    }

    // ========================================================================
    // Provision
    // ========================================================================

    /// Deposit both assets and mint shares; returns the shares issued.
    ///
    /// The first provision fixes the pool's reference ratio and anchors the
    /// share unit at `scale(amount_a)`. Subsequent deposits must match the
    /// current ratio under floor rounding: either side may be the one the
    /// caller sized from an equivalence estimate.
    pub fn provide(
        &mut self,
        account: AccountId,
        amount_a: u64,
        amount_b: u64,
    ) -> Result<u128, PoolError> {
        if amount_a == 0 || amount_b == 0 {
            return Err(PoolError::InvalidAmount);
        }

        let free = self.balances.balances_of(&account);
        let remaining = free.debited(amount_a, amount_b)?;

        let minted = if self.pool.is_empty() {
            math::scale(amount_a)
        } else {
            if amount_b != self.equivalent_b(amount_a)?
                && amount_a != self.equivalent_a(amount_b)?
            {
                return Err(PoolError::RatioMismatch);
            }
            math::mul_div_floor(
                self.pool.total_shares,
                amount_a as u128,
                self.pool.balance_a as u128,
            )?
        };
        if minted == 0 {
            return Err(PoolError::ZeroShare);
        }

        let next = Pool {
            balance_a: self
                .pool
                .balance_a
                .checked_add(amount_a)
                .ok_or(PoolError::Overflow)?,
            balance_b: self
                .pool
                .balance_b
                .checked_add(amount_b)
                .ok_or(PoolError::Overflow)?,
            total_shares: self
                .pool
                .total_shares
                .checked_add(minted)
                .ok_or(PoolError::Overflow)?,
        };
        let holding = self
            .shares
            .share_of(&account)
            .checked_add(minted)
            .ok_or(PoolError::Overflow)?;

        // A funded pool must never pair shares with an empty reserve.
        if next.balance_a == 0 || next.balance_b == 0 {
            return Err(PoolError::InvariantViolation);
        }

        // Commit
        self.balances.set(account, remaining);
        self.pool = next;
        self.shares.set(account, holding);
        Ok(minted)
    }

    // ========================================================================
    // Withdrawal
    // ========================================================================

    /// Burn shares for a proportional slice of both reserves; returns the
    /// amounts released to the account's free balances.
    pub fn withdraw(
        &mut self,
        account: AccountId,
        shares_to_burn: u128,
    ) -> Result<(u64, u64), PoolError> {
        let held = self.shares.share_of(&account);
        if shares_to_burn == 0 || shares_to_burn > held {
            return Err(PoolError::InsufficientShares);
        }

        // held > 0 implies total_shares > 0
        let return_a = math::mul_div_floor(
            self.pool.balance_a as u128,
            shares_to_burn,
            self.pool.total_shares,
        )? as u64;
        let return_b = math::mul_div_floor(
            self.pool.balance_b as u128,
            shares_to_burn,
            self.pool.total_shares,
        )? as u64;

        // Floor guarantees return_x <= balance_x, so plain subtraction holds.
        let next = Pool {
            balance_a: self.pool.balance_a - return_a,
            balance_b: self.pool.balance_b - return_b,
            total_shares: self.pool.total_shares - shares_to_burn,
        };

        // Draining the final share must leave no dust behind.
        if next.total_shares == 0 && (next.balance_a != 0 || next.balance_b != 0) {
            return Err(PoolError::InvariantViolation);
        }

        let credited = self
            .balances
            .balances_of(&account)
            .credited(return_a, return_b)?;

        // Commit
        self.pool = next;
        self.shares.set(account, held - shares_to_burn);
        self.balances.set(account, credited);
        Ok((return_a, return_b))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// `(balance_a, balance_b, total_shares)` of the pool.
    pub fn pool_details(&self) -> (u64, u64, u128) {
        (
            self.pool.balance_a,
            self.pool.balance_b,
            self.pool.total_shares,
        )
    }

    /// `(free_a, free_b, shares)` for one account.
    pub fn holdings_of(&self, account: &AccountId) -> (u64, u64, u128) {
        let Balances { asset_a, asset_b } = self.balances.balances_of(account);
        (asset_a, asset_b, self.shares.share_of(account))
    }

    pub fn share_of(&self, account: &AccountId) -> u128 {
        self.shares.share_of(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PRECISION;

    const OWNER: AccountId = [1u8; 32];
    const OTHER: AccountId = [2u8; 32];

    /// Funded engine with the tutorial pool: provide(owner, 100, 10).
    fn seeded_engine() -> PoolEngine {
        let mut engine = PoolEngine::new();
        engine.faucet(OWNER, 1000, 1000).unwrap();
        engine.faucet(OTHER, 1000, 1000).unwrap();
        engine.provide(OWNER, 100, 10).unwrap();
        engine
    }

    #[test]
    fn test_faucet_credits_free_balances() {
        let mut engine = PoolEngine::new();
        engine.faucet(OWNER, 1000, 1000).unwrap();
        assert_eq!(engine.holdings_of(&OWNER), (1000, 1000, 0));
    }

    #[test]
    fn test_first_provision_anchors_share_unit() {
        // Scenario A
        let engine = seeded_engine();
        assert_eq!(engine.pool_details(), (100, 10, 100 * PRECISION));
        assert_eq!(engine.holdings_of(&OWNER), (900, 990, 100 * PRECISION));
    }

    #[test]
    fn test_equivalence_estimates() {
        // Scenario B
        let engine = seeded_engine();
        assert_eq!(engine.equivalent_a(5), Ok(50));
        assert_eq!(engine.equivalent_b(50), Ok(5));
    }

    #[test]
    fn test_equivalence_on_empty_pool() {
        let engine = PoolEngine::new();
        assert_eq!(engine.equivalent_a(5), Err(PoolError::EmptyPool));
        assert_eq!(engine.equivalent_b(5), Err(PoolError::EmptyPool));
    }

    #[test]
    fn test_second_provision_mints_proportionally() {
        // Scenario C
        let mut engine = seeded_engine();
        let amount_b = engine.equivalent_b(50).unwrap();
        assert_eq!(amount_b, 5);

        let minted = engine.provide(OTHER, 50, amount_b).unwrap();
        assert_eq!(minted, 50 * PRECISION);
        assert_eq!(engine.pool_details(), (150, 15, 150 * PRECISION));
        assert_eq!(engine.holdings_of(&OTHER), (950, 995, 50 * PRECISION));
    }

    #[test]
    fn test_withdraw_returns_proportional_slice() {
        // Scenario D
        let mut engine = seeded_engine();
        engine.provide(OTHER, 50, 5).unwrap();

        let (return_a, return_b) = engine.withdraw(OTHER, 50 * PRECISION).unwrap();
        assert_eq!((return_a, return_b), (50, 5));
        assert_eq!(engine.pool_details(), (100, 10, 100 * PRECISION));
        assert_eq!(engine.share_of(&OTHER), 0);
        assert_eq!(engine.holdings_of(&OTHER), (1000, 1000, 0));
    }

    #[test]
    fn test_provide_rejects_zero_amount() {
        // Scenario E
        let mut engine = seeded_engine();
        let before = engine.clone();

        assert_eq!(engine.provide(OWNER, 0, 10), Err(PoolError::InvalidAmount));
        assert_eq!(engine.provide(OWNER, 10, 0), Err(PoolError::InvalidAmount));
        assert_eq!(engine, before);
    }

    #[test]
    fn test_withdraw_rejects_overdrawn_burn() {
        // Scenario F
        let mut engine = seeded_engine();
        let before = engine.clone();
        let (_, _, total) = engine.pool_details();

        assert_eq!(
            engine.withdraw(OWNER, total + 1),
            Err(PoolError::InsufficientShares)
        );
        assert_eq!(engine.withdraw(OWNER, 0), Err(PoolError::InsufficientShares));
        assert_eq!(engine, before);
    }

    #[test]
    fn test_provide_rejects_unfunded_account() {
        let mut engine = PoolEngine::new();
        assert_eq!(
            engine.provide(OWNER, 100, 10),
            Err(PoolError::InsufficientBalance)
        );

        engine.faucet(OWNER, 99, 1000).unwrap();
        assert_eq!(
            engine.provide(OWNER, 100, 10),
            Err(PoolError::InsufficientBalance)
        );
        assert_eq!(engine.holdings_of(&OWNER), (99, 1000, 0));
    }

    #[test]
    fn test_provide_rejects_ratio_distortion() {
        let mut engine = seeded_engine();
        let before = engine.clone();

        // Pool ratio is 10:1; 50:7 distorts it
        assert_eq!(engine.provide(OTHER, 50, 7), Err(PoolError::RatioMismatch));
        assert_eq!(engine, before);
    }

    #[test]
    fn test_provide_accepts_either_estimate_direction() {
        // Skewed reserves where floor is not its own inverse: pool 3:10.
        let mut engine = PoolEngine::new();
        engine.faucet(OWNER, 1000, 1000).unwrap();
        engine.faucet(OTHER, 1000, 1000).unwrap();
        engine.provide(OWNER, 3, 10).unwrap();

        // Caller sizes A from a B estimate: equivalent_a(5) == 1, but
        // equivalent_b(1) == 3 != 5. The deposit still matches the ratio
        // under floor rounding and must be accepted.
        let amount_a = engine.equivalent_a(5).unwrap();
        assert_eq!(amount_a, 1);
        assert!(engine.provide(OTHER, amount_a, 5).is_ok());
    }

    #[test]
    fn test_drain_to_zero() {
        let mut engine = seeded_engine();
        engine.provide(OTHER, 50, 5).unwrap();

        engine.withdraw(OTHER, engine.share_of(&OTHER)).unwrap();
        engine.withdraw(OWNER, engine.share_of(&OWNER)).unwrap();

        assert_eq!(engine.pool_details(), (0, 0, 0));
        assert_eq!(engine.holdings_of(&OWNER), (1000, 1000, 0));
        assert_eq!(engine.holdings_of(&OTHER), (1000, 1000, 0));
    }

    #[test]
    fn test_refill_after_drain_sets_new_ratio() {
        let mut engine = seeded_engine();
        engine.withdraw(OWNER, 100 * PRECISION).unwrap();
        assert_eq!(engine.pool_details(), (0, 0, 0));

        // A drained pool accepts any ratio again
        engine.provide(OWNER, 7, 300).unwrap();
        assert_eq!(engine.pool_details(), (7, 300, 7 * PRECISION));
    }

    #[test]
    fn test_partial_withdraw_keeps_ratio() {
        let mut engine = seeded_engine();
        let (return_a, return_b) = engine.withdraw(OWNER, 40 * PRECISION).unwrap();
        assert_eq!((return_a, return_b), (40, 4));
        assert_eq!(engine.pool_details(), (60, 6, 60 * PRECISION));
    }

    #[test]
    fn test_roundtrip_restores_state() {
        // P3: withdraw then provide the returned amounts
        let mut engine = seeded_engine();
        engine.provide(OTHER, 50, 5).unwrap();
        let before = engine.pool_details();

        let (return_a, return_b) = engine.withdraw(OTHER, 50 * PRECISION).unwrap();
        engine.provide(OTHER, return_a, return_b).unwrap();

        assert_eq!(engine.pool_details(), before);
        assert_eq!(engine.share_of(&OTHER), 50 * PRECISION);
    }
}
