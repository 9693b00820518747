//! Pool operation handlers

use anyhow::{anyhow, Result};
use colored::Colorize;
use pool_model::{PoolError, PRECISION};

use crate::config::PoolConfig;
use crate::store::{account_id, Store};

/// Render a PRECISION-scaled share quantity with its fractional part.
fn fmt_shares(shares: u128) -> String {
    format!("{}.{:06}", shares / PRECISION, shares % PRECISION)
}

pub fn faucet(config: &PoolConfig, amount_a: u64, amount_b: u64) -> Result<()> {
    println!("{}", "=== Faucet ===".bright_green().bold());

    let (mut store, mut engine) = Store::open(&config.store_path)?;
    engine
        .faucet(account_id(&config.account), amount_a, amount_b)
        .map_err(|e| anyhow!("faucet failed: {e}"))?;
    store.touch(&config.account);
    store.save(&engine)?;
    log::info!(
        "faucet minted {}/{} to {}",
        amount_a,
        amount_b,
        config.account
    );

    let (free_a, free_b, _) = engine.holdings_of(&account_id(&config.account));
    println!("{} {}", "Minted A:".bright_cyan(), amount_a);
    println!("{} {}", "Minted B:".bright_cyan(), amount_b);
    println!("{} {} / {}", "Free balances:".bright_cyan(), free_a, free_b);
    Ok(())
}

pub fn provide(config: &PoolConfig, amount_a: u64, amount_b: Option<u64>) -> Result<()> {
    println!("{}", "=== Provide Liquidity ===".bright_green().bold());

    let (mut store, mut engine) = Store::open(&config.store_path)?;

    let amount_b = match amount_b {
        Some(amount) => amount,
        None => match engine.equivalent_b(amount_a) {
            Ok(amount) => {
                println!("{} {}", "Estimated B:".bright_cyan(), amount);
                amount
            }
            Err(PoolError::EmptyPool) => {
                anyhow::bail!(
                    "pool is empty; the first provision must name both amounts \
                     (they fix the pool's reference ratio)"
                );
            }
            Err(e) => return Err(anyhow!("estimate failed: {e}")),
        },
    };

    let minted = engine
        .provide(account_id(&config.account), amount_a, amount_b)
        .map_err(|e| anyhow!("provide failed: {e}"))?;
    store.touch(&config.account);
    store.save(&engine)?;
    log::info!(
        "{} provided {}/{} for {} shares",
        config.account,
        amount_a,
        amount_b,
        minted
    );

    println!("{} {}", "Deposited A:".bright_cyan(), amount_a);
    println!("{} {}", "Deposited B:".bright_cyan(), amount_b);
    println!(
        "{} {} ({})",
        "Shares minted:".bright_cyan(),
        minted,
        fmt_shares(minted)
    );
    Ok(())
}

pub fn withdraw(config: &PoolConfig, shares: Option<u128>, all: bool) -> Result<()> {
    println!("{}", "=== Withdraw Liquidity ===".bright_green().bold());

    let (mut store, mut engine) = Store::open(&config.store_path)?;
    let account = account_id(&config.account);

    let shares_to_burn = if all {
        engine.share_of(&account)
    } else {
        shares.ok_or_else(|| anyhow!("pass --shares N or --all"))?
    };

    let (return_a, return_b) = engine
        .withdraw(account, shares_to_burn)
        .map_err(|e| anyhow!("withdraw failed: {e}"))?;
    store.touch(&config.account);
    store.save(&engine)?;
    log::info!(
        "{} burned {} shares for {}/{}",
        config.account,
        shares_to_burn,
        return_a,
        return_b
    );

    println!(
        "{} {} ({})",
        "Shares burned:".bright_cyan(),
        shares_to_burn,
        fmt_shares(shares_to_burn)
    );
    println!("{} {}", "Returned A:".bright_cyan(), return_a);
    println!("{} {}", "Returned B:".bright_cyan(), return_b);
    Ok(())
}

pub fn estimate(config: &PoolConfig, asset: &str, amount: u64) -> Result<()> {
    println!("{}", "=== Equivalence Estimate ===".bright_green().bold());

    let (_, engine) = Store::open(&config.store_path)?;
    match asset {
        "a" | "A" => {
            let matching = engine
                .equivalent_b(amount)
                .map_err(|e| anyhow!("estimate failed: {e}"))?;
            println!("{} {} of asset A", "Given:".bright_cyan(), amount);
            println!("{} {} of asset B", "Matches:".bright_cyan(), matching);
        }
        "b" | "B" => {
            let matching = engine
                .equivalent_a(amount)
                .map_err(|e| anyhow!("estimate failed: {e}"))?;
            println!("{} {} of asset B", "Given:".bright_cyan(), amount);
            println!("{} {} of asset A", "Matches:".bright_cyan(), matching);
        }
        other => anyhow::bail!("Unknown asset {:?}. Use a or b", other),
    }
    Ok(())
}

pub fn show_pool(config: &PoolConfig) -> Result<()> {
    println!("{}", "=== Pool Details ===".bright_green().bold());

    let (_, engine) = Store::open(&config.store_path)?;
    let (balance_a, balance_b, total_shares) = engine.pool_details();
    println!("{} {}", "Reserve A:".bright_cyan(), balance_a);
    println!("{} {}", "Reserve B:".bright_cyan(), balance_b);
    println!(
        "{} {} ({})",
        "Total shares:".bright_cyan(),
        total_shares,
        fmt_shares(total_shares)
    );
    if total_shares == 0 {
        println!("\n{}", "Pool is empty".dimmed());
    }
    Ok(())
}

pub fn show_holdings(config: &PoolConfig) -> Result<()> {
    println!("{}", "=== Holdings ===".bright_green().bold());

    let (_, engine) = Store::open(&config.store_path)?;
    let (free_a, free_b, shares) = engine.holdings_of(&account_id(&config.account));
    println!("{} {}", "Account:".bright_cyan(), config.account);
    println!("{} {}", "Free A:".bright_cyan(), free_a);
    println!("{} {}", "Free B:".bright_cyan(), free_b);
    println!(
        "{} {} ({})",
        "Shares:".bright_cyan(),
        shares,
        fmt_shares(shares)
    );
    Ok(())
}
