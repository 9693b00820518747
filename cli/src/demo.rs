//! Scripted two-account walkthrough
//!
//! Replays the canonical pool lifecycle against a fresh in-memory engine:
//! faucet funding, an anchoring provision, a ratio-matched second provision,
//! and a full withdrawal, verifying the expected numbers at every step.

use anyhow::{anyhow, Result};
use colored::Colorize;
use pool_model::{PoolEngine, PRECISION};

use crate::config::PoolConfig;
use crate::store::account_id;

pub fn run(_config: &PoolConfig) -> Result<()> {
    println!("{}", "=== Pool Walkthrough ===".bright_yellow().bold());
    println!("{}", "Fresh in-memory pool; the state file is untouched\n".dimmed());

    let owner = account_id("owner");
    let other = account_id("other");
    let mut engine = PoolEngine::new();
    let mut passed = 0;
    let mut failed = 0;

    let steps: [(&str, Box<dyn Fn(&mut PoolEngine) -> Result<()>>); 6] = [
        (
            "Faucet funds both accounts",
            Box::new(move |engine| {
                engine.faucet(owner, 1000, 1000).map_err(|e| anyhow!("{e}"))?;
                engine.faucet(other, 1000, 1000).map_err(|e| anyhow!("{e}"))?;
                expect(engine.holdings_of(&owner) == (1000, 1000, 0), "owner funding")
            }),
        ),
        (
            "First provision anchors the share unit",
            Box::new(move |engine| {
                let minted = engine.provide(owner, 100, 10).map_err(|e| anyhow!("{e}"))?;
                expect(minted == 100 * PRECISION, "minted shares")?;
                expect(
                    engine.pool_details() == (100, 10, 100 * PRECISION),
                    "pool details",
                )
            }),
        ),
        (
            "Equivalence estimates follow the ratio",
            Box::new(move |engine| {
                expect(engine.equivalent_a(5) == Ok(50), "equivalent_a(5)")?;
                expect(engine.equivalent_b(50) == Ok(5), "equivalent_b(50)")
            }),
        ),
        (
            "Second provider joins at the pool ratio",
            Box::new(move |engine| {
                let amount_b = engine.equivalent_b(50).map_err(|e| anyhow!("{e}"))?;
                let minted = engine
                    .provide(other, 50, amount_b)
                    .map_err(|e| anyhow!("{e}"))?;
                expect(minted == 50 * PRECISION, "minted shares")?;
                expect(
                    engine.pool_details() == (150, 15, 150 * PRECISION),
                    "pool details",
                )
            }),
        ),
        (
            "Ratio-distorting deposit is rejected",
            Box::new(move |engine| {
                expect(engine.provide(other, 50, 7).is_err(), "rejection")?;
                expect(
                    engine.pool_details() == (150, 15, 150 * PRECISION),
                    "state unchanged",
                )
            }),
        ),
        (
            "Full withdrawal returns the proportional slice",
            Box::new(move |engine| {
                let returned = engine
                    .withdraw(other, 50 * PRECISION)
                    .map_err(|e| anyhow!("{e}"))?;
                expect(returned == (50, 5), "returned amounts")?;
                expect(
                    engine.pool_details() == (100, 10, 100 * PRECISION),
                    "pool details",
                )?;
                expect(engine.holdings_of(&other) == (1000, 1000, 0), "other restored")
            }),
        ),
    ];

    for (name, step) in &steps {
        match step(&mut engine) {
            Ok(()) => {
                println!("{} {}", "✓".bright_green(), name);
                passed += 1;
            }
            Err(e) => {
                println!("{} {}: {}", "✗".bright_red(), name, e);
                failed += 1;
            }
        }
    }

    println!(
        "\n{} {} passed, {} failed",
        "Result:".bright_cyan(),
        passed,
        failed
    );
    if failed > 0 {
        anyhow::bail!("{failed} walkthrough steps failed");
    }
    Ok(())
}

fn expect(condition: bool, what: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(anyhow!("unexpected {what}"))
    }
}
