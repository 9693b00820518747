//! Pool reserves and per-account ledgers

use alloc::collections::BTreeMap;

use crate::PoolError;

/// Account identity, supplied explicitly on every per-account operation.
pub type AccountId = [u8; 32];

/// Pooled reserves of both assets plus the total issued share supply.
///
/// Created empty, mutated only by provision and withdrawal, never replaced.
/// `total_shares` is scaled by [`crate::PRECISION`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pool {
    pub balance_a: u64,
    pub balance_b: u64,
    pub total_shares: u128,
}

impl Pool {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pool with no outstanding shares holds no liquidity.
    pub fn is_empty(&self) -> bool {
        self.total_shares == 0
    }
}

/// Per-account share holdings. An absent entry is equivalent to zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShareLedger {
    entries: BTreeMap<AccountId, u128>,
}

impl ShareLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn share_of(&self, account: &AccountId) -> u128 {
        self.entries.get(account).copied().unwrap_or(0)
    }

    /// Number of accounts currently holding shares.
    pub fn holders(&self) -> usize {
        self.entries.len()
    }

    /// Overwrite an account's holding, dropping the entry at zero.
    pub(crate) fn set(&mut self, account: AccountId, shares: u128) {
        if shares == 0 {
            self.entries.remove(&account);
        } else {
            self.entries.insert(account, shares);
        }
    }
}

impl FromIterator<(AccountId, u128)> for ShareLedger {
    fn from_iter<I: IntoIterator<Item = (AccountId, u128)>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for (account, shares) in iter {
            ledger.set(account, shares);
        }
        ledger
    }
}

/// Free (unpooled) balances of both assets for one account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Balances {
    pub asset_a: u64,
    pub asset_b: u64,
}

impl Balances {
    /// Both sides reduced, or `InsufficientBalance` if either falls short.
    pub(crate) fn debited(self, amount_a: u64, amount_b: u64) -> Result<Self, PoolError> {
        let asset_a = self
            .asset_a
            .checked_sub(amount_a)
            .ok_or(PoolError::InsufficientBalance)?;
        let asset_b = self
            .asset_b
            .checked_sub(amount_b)
            .ok_or(PoolError::InsufficientBalance)?;
        Ok(Self { asset_a, asset_b })
    }

    /// Both sides increased, or `Overflow` on wrap.
    pub(crate) fn credited(self, amount_a: u64, amount_b: u64) -> Result<Self, PoolError> {
        let asset_a = self
            .asset_a
            .checked_add(amount_a)
            .ok_or(PoolError::Overflow)?;
        let asset_b = self
            .asset_b
            .checked_add(amount_b)
            .ok_or(PoolError::Overflow)?;
        Ok(Self { asset_a, asset_b })
    }
}

/// Free balances per account, outside the pool.
///
/// This is the account balance store the engines settle against: faucet
/// funding credits it, provision debits it, withdrawal credits it back.
/// It carries no pool invariants of its own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceBook {
    entries: BTreeMap<AccountId, Balances>,
}

impl BalanceBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balances_of(&self, account: &AccountId) -> Balances {
        self.entries.get(account).copied().unwrap_or_default()
    }

    pub(crate) fn set(&mut self, account: AccountId, balances: Balances) {
        if balances == Balances::default() {
            self.entries.remove(&account);
        } else {
            self.entries.insert(account, balances);
        }
    }
}

impl FromIterator<(AccountId, Balances)> for BalanceBook {
    fn from_iter<I: IntoIterator<Item = (AccountId, Balances)>>(iter: I) -> Self {
        let mut book = Self::new();
        for (account, balances) in iter {
            book.set(account, balances);
        }
        book
    }
}
