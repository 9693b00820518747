//! Tidepool CLI - operate a two-asset liquidity pool from the terminal
//!
//! The pool lives in a JSON state file; every mutating command loads it,
//! runs one engine transition, and saves the result only on success.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

mod commands;
mod config;
mod demo;
mod store;

use config::PoolConfig;

#[derive(Parser)]
#[command(name = "tidepool")]
#[command(about = "Tidepool - two-asset liquidity pool engine", long_about = None)]
#[command(version)]
struct Cli {
    /// Acting account name (caller identity)
    #[arg(short, long)]
    account: Option<String>,

    /// Path to the pool state file (overrides config and TIDEPOOL_STORE)
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Mint free balances to the acting account (demo funding)
    Faucet {
        /// Amount of asset A to mint
        #[arg(long)]
        amount_a: u64,

        /// Amount of asset B to mint
        #[arg(long)]
        amount_b: u64,
    },

    /// Deposit both assets and mint pool shares
    Provide {
        /// Amount of asset A to deposit
        #[arg(long)]
        amount_a: u64,

        /// Amount of asset B to deposit (estimated from the pool ratio if omitted)
        #[arg(long)]
        amount_b: Option<u64>,
    },

    /// Burn shares for a proportional slice of both reserves
    Withdraw {
        /// Shares to burn (PRECISION-scaled)
        #[arg(long, conflicts_with = "all")]
        shares: Option<u128>,

        /// Burn the account's entire holding
        #[arg(long)]
        all: bool,
    },

    /// Estimate the matching amount of the other asset at the current ratio
    Estimate {
        /// Asset the given amount is denominated in (a or b)
        asset: String,

        /// Amount to match
        amount: u64,
    },

    /// Show pool reserves and share supply
    Pool,

    /// Show the acting account's free balances and shares
    Holdings,

    /// Run the scripted two-account walkthrough against a fresh pool
    Demo,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let config = PoolConfig::new(cli.account.clone(), cli.store.clone())?;

    if cli.verbose {
        println!("{} {}", "Account:".bright_cyan(), config.account);
        println!("{} {}", "Store:".bright_cyan(), config.store_path.display());
    }

    match cli.command {
        Commands::Faucet { amount_a, amount_b } => {
            commands::faucet(&config, amount_a, amount_b)?;
        }
        Commands::Provide { amount_a, amount_b } => {
            commands::provide(&config, amount_a, amount_b)?;
        }
        Commands::Withdraw { shares, all } => {
            commands::withdraw(&config, shares, all)?;
        }
        Commands::Estimate { asset, amount } => {
            commands::estimate(&config, &asset, amount)?;
        }
        Commands::Pool => {
            commands::show_pool(&config)?;
        }
        Commands::Holdings => {
            commands::show_holdings(&config)?;
        }
        Commands::Demo => {
            demo::run(&config)?;
        }
    }

    Ok(())
}
