//! JSON persistence for the pool engine state
//!
//! The whole pool (reserves, share ledger, free balances) is one JSON
//! document keyed by human-readable account names. Engine identities are
//! the name bytes padded to 32; the store keeps the names so holdings stay
//! legible in the file.

use pool_model::{AccountId, BalanceBook, Balances, Pool, PoolEngine, ShareLedger};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read state file {path}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid state file {path}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("failed to write state file {path}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreRecord {
    pool: PoolRecord,
    accounts: BTreeMap<String, AccountRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PoolRecord {
    balance_a: u64,
    balance_b: u64,
    total_shares: u128,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AccountRecord {
    free_a: u64,
    free_b: u64,
    shares: u128,
}

/// Engine identity for a named account: name bytes padded to 32.
pub fn account_id(name: &str) -> AccountId {
    let mut id = [0u8; 32];
    let bytes = name.as_bytes();
    let len = bytes.len().min(32);
    id[..len].copy_from_slice(&bytes[..len]);
    id
}

/// One state file plus the account names it knows about.
pub struct Store {
    path: PathBuf,
    names: BTreeSet<String>,
}

impl Store {
    /// Load the engine from `path`. A missing file is an empty pool.
    pub fn open(path: &Path) -> Result<(Self, PoolEngine), StoreError> {
        if !path.exists() {
            log::debug!("state file {} not found, starting empty", path.display());
            let store = Store {
                path: path.to_path_buf(),
                names: BTreeSet::new(),
            };
            return Ok((store, PoolEngine::new()));
        }

        let data = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let record: StoreRecord =
            serde_json::from_str(&data).map_err(|source| StoreError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let pool = Pool {
            balance_a: record.pool.balance_a,
            balance_b: record.pool.balance_b,
            total_shares: record.pool.total_shares,
        };
        let shares: ShareLedger = record
            .accounts
            .iter()
            .map(|(name, acct)| (account_id(name), acct.shares))
            .collect();
        let balances: BalanceBook = record
            .accounts
            .iter()
            .map(|(name, acct)| {
                (
                    account_id(name),
                    Balances {
                        asset_a: acct.free_a,
                        asset_b: acct.free_b,
                    },
                )
            })
            .collect();

        let store = Store {
            path: path.to_path_buf(),
            names: record.accounts.keys().cloned().collect(),
        };
        log::debug!(
            "loaded {} accounts from {}",
            store.names.len(),
            path.display()
        );
        Ok((store, PoolEngine::from_parts(pool, shares, balances)))
    }

    /// Register a name so its holdings are captured on save.
    pub fn touch(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    /// Write the engine state back out, dropping fully empty accounts.
    pub fn save(&self, engine: &PoolEngine) -> Result<(), StoreError> {
        let (balance_a, balance_b, total_shares) = engine.pool_details();
        let mut record = StoreRecord {
            pool: PoolRecord {
                balance_a,
                balance_b,
                total_shares,
            },
            accounts: BTreeMap::new(),
        };
        for name in &self.names {
            let (free_a, free_b, shares) = engine.holdings_of(&account_id(name));
            if free_a == 0 && free_b == 0 && shares == 0 {
                continue;
            }
            record.accounts.insert(
                name.clone(),
                AccountRecord {
                    free_a,
                    free_b,
                    shares,
                },
            );
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: self.path.display().to_string(),
                    source,
                })?;
            }
        }
        let data = serde_json::to_string_pretty(&record).expect("state record serializes");
        fs::write(&self.path, data).map_err(|source| StoreError::Write {
            path: self.path.display().to_string(),
            source,
        })?;
        log::debug!("saved pool state to {}", self.path.display());
        Ok(())
    }
}
