//! defi-client CLI
//!
//! Presentation layer over the operation façade: one subcommand per
//! domain operation. Prints decoded values on success; on failure,
//! reports the error kind and message once and exits nonzero.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use defi_client::ops::DefiClient;
use defi_client::registry::{FileStore, PoolRegistry};
use defi_client::{load_config, Dispatcher, RpcLedger};

#[derive(Parser)]
#[command(name = "defi-client", about = "Drive AMM, lending and arbitrage contracts")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the pools known to the local registry
    Pools,
    /// Create a pool and register it locally
    CreatePool {
        token_a: String,
        token_b: String,
        amount_a: String,
        amount_b: String,
    },
    /// Approve both pool tokens for the pool contract
    ApprovePool { pool_id: String },
    /// Approve both pool tokens for LendingCore
    ApproveLending { pool_id: String },
    /// Mint test tokens to a recipient
    Mint {
        token: String,
        recipient: String,
        amount: String,
    },
    /// Add liquidity to a pool
    AddLiquidity {
        pool_id: String,
        amount_a: String,
        amount_b: String,
    },
    /// Add liquidity with a single token
    AddLiquidityOne {
        pool_id: String,
        token: String,
        amount: String,
    },
    /// Remove liquidity by share amount
    RemoveLiquidity { pool_id: String, shares: String },
    /// Swap a token against a pool
    Swap {
        pool_id: String,
        token_in: String,
        amount_in: String,
    },
    /// Read a pool's reserves
    Liquidity { pool_id: String },
    /// Read a pool's token pair from the chain
    PoolTokens { pool_id: String },
    /// Read the connected wallet's LP shares in a pool
    MyShares { pool_id: String },
    /// Read a pool's total LP shares
    TotalShares { pool_id: String },
    /// Ask DefiCore for the best pool for a swap
    BestPool {
        token_in: String,
        token_out: String,
        amount: String,
    },
    /// Lend token A into a pool's lending market
    LendA { pool_id: String, amount: String },
    /// Lend token B into a pool's lending market
    LendB { pool_id: String, amount: String },
    /// Borrow token A against collateral
    BorrowA {
        pool_id: String,
        collateral: String,
        amount: String,
    },
    /// Borrow token B against collateral
    BorrowB {
        pool_id: String,
        collateral: String,
        amount: String,
    },
    /// Repay an open loan
    Repay { pool_id: String, amount: String },
    /// Withdraw the lent token A position
    WithdrawA { pool_id: String },
    /// Withdraw the lent token B position
    WithdrawB { pool_id: String },
    /// Liquidate an undercollateralized user
    Liquidate { user: String, pool_id: String },
    /// Read a user's loan in a pool
    Loan { user: String, pool_id: String },
    /// Read a user's lending shares in a pool
    Shares { user: String, pool_id: String },
    /// Read a user's health factor in a pool
    Health { user: String, pool_id: String },
    /// Read a pool's aggregate lending stats
    Stats { pool_id: String },
    /// Search on-chain for the best arbitrage route
    FindArbitrage { base_token: String, amount_in: String },
    /// Execute the stored arbitrage route
    ExecuteArbitrage { base_token: String, amount_in: String },
    /// Read the stored best arbitrage path
    BestPath,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    let ledger = RpcLedger::connect(&config.rpc_url, &config.private_key)?;
    let account = ledger.account();
    let timeout = match config.request_timeout_ms {
        0 => None,
        ms => Some(Duration::from_millis(ms)),
    };
    let dispatcher = Dispatcher::new(ledger, timeout);
    let registry = PoolRegistry::load(FileStore::new(&config.state_dir));
    let mut client = DefiClient::new(dispatcher, registry, config.contracts);
    client.connect(account);

    if let Err(e) = run(&mut client, cli.command).await {
        error!("{} error: {}", e.kind(), e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(
    client: &mut DefiClient<RpcLedger, FileStore>,
    command: Command,
) -> defi_client::error::Result<()> {
    match command {
        Command::Pools => {
            for (id, pool, pair) in client.registry().entries() {
                println!(
                    "{id}  {}  tokens {}  creator {}",
                    pool.address.to_checksum(None),
                    pair,
                    pool.creator.to_checksum(None)
                );
            }
            if client.registry().is_empty() {
                println!("(no pools registered)");
            }
        }
        Command::CreatePool {
            token_a,
            token_b,
            amount_a,
            amount_b,
        } => {
            let created = client
                .create_pool(&token_a, &token_b, &amount_a, &amount_b)
                .await?;
            info!("Tx: {}", created.tx_hash);
            println!(
                "{} created at {} (creator {})",
                created.pool_id,
                created.address.to_checksum(None),
                created.creator.to_checksum(None)
            );
        }
        Command::ApprovePool { pool_id } => {
            client.approve_pool_tokens(&pool_id).await?;
            println!("Tokens approved for pool");
        }
        Command::ApproveLending { pool_id } => {
            client.approve_lending_tokens(&pool_id).await?;
            println!("Tokens approved for LendingCore");
        }
        Command::Mint {
            token,
            recipient,
            amount,
        } => {
            let out = client.mint(&token, &recipient, &amount).await?;
            println!("Minted. Tx: {}", out.tx_hash);
        }
        Command::AddLiquidity {
            pool_id,
            amount_a,
            amount_b,
        } => {
            let out = client.add_liquidity(&pool_id, &amount_a, &amount_b).await?;
            println!("Liquidity added. Tx: {}", out.tx_hash);
        }
        Command::AddLiquidityOne {
            pool_id,
            token,
            amount,
        } => {
            let out = client
                .add_liquidity_one_token(&pool_id, &token, &amount)
                .await?;
            println!("Liquidity added. Tx: {}", out.tx_hash);
        }
        Command::RemoveLiquidity { pool_id, shares } => {
            let out = client.remove_liquidity(&pool_id, &shares).await?;
            println!("Liquidity removed. Tx: {}", out.tx_hash);
        }
        Command::Swap {
            pool_id,
            token_in,
            amount_in,
        } => {
            let out = client.swap(&pool_id, &token_in, &amount_in).await?;
            println!("Swap complete. Tx: {}", out.tx_hash);
        }
        Command::Liquidity { pool_id } => {
            let liq = client.pool_liquidity(&pool_id).await?;
            println!("liquidity0: {}", liq.liquidity0);
            println!("liquidity1: {}", liq.liquidity1);
        }
        Command::PoolTokens { pool_id } => {
            let pair = client.pool_tokens(&pool_id).await?;
            println!("token0: {}", pair.token0.to_checksum(None));
            println!("token1: {}", pair.token1.to_checksum(None));
        }
        Command::MyShares { pool_id } => {
            println!("shares: {}", client.my_shares(&pool_id).await?);
        }
        Command::TotalShares { pool_id } => {
            println!("total shares: {}", client.total_shares(&pool_id).await?);
        }
        Command::BestPool {
            token_in,
            token_out,
            amount,
        } => {
            let best = client.best_pool(&token_in, &token_out, &amount).await?;
            println!("best pool: {}", best.to_checksum(None));
        }
        Command::LendA { pool_id, amount } => {
            let out = client.lend_token_a(&pool_id, &amount).await?;
            println!("Token A lent. Tx: {}", out.tx_hash);
        }
        Command::LendB { pool_id, amount } => {
            let out = client.lend_token_b(&pool_id, &amount).await?;
            println!("Token B lent. Tx: {}", out.tx_hash);
        }
        Command::BorrowA {
            pool_id,
            collateral,
            amount,
        } => {
            let out = client.borrow_token_a(&pool_id, &collateral, &amount).await?;
            println!("Token A borrowed. Tx: {}", out.tx_hash);
        }
        Command::BorrowB {
            pool_id,
            collateral,
            amount,
        } => {
            let out = client.borrow_token_b(&pool_id, &collateral, &amount).await?;
            println!("Token B borrowed. Tx: {}", out.tx_hash);
        }
        Command::Repay { pool_id, amount } => {
            let out = client.repay_loan(&pool_id, &amount).await?;
            println!("Loan repaid. Tx: {}", out.tx_hash);
        }
        Command::WithdrawA { pool_id } => {
            let out = client.withdraw_token_a(&pool_id).await?;
            println!("Token A withdrawn. Tx: {}", out.tx_hash);
        }
        Command::WithdrawB { pool_id } => {
            let out = client.withdraw_token_b(&pool_id).await?;
            println!("Token B withdrawn. Tx: {}", out.tx_hash);
        }
        Command::Liquidate { user, pool_id } => {
            let out = client.liquidate(&user, &pool_id).await?;
            println!("Liquidated. Tx: {}", out.tx_hash);
        }
        Command::Loan { user, pool_id } => {
            let loan = client.loan_of(&user, &pool_id).await?;
            println!("collateral: {}", loan.collateral_amount);
            println!("borrowed:   {}", loan.borrowed_amount);
            println!(
                "loan type:  {}",
                if loan.loan_type == 0 { "token A" } else { "token B" }
            );
        }
        Command::Shares { user, pool_id } => {
            let shares = client.lending_shares(&user, &pool_id).await?;
            println!("token A shares: {}", shares.token_a);
            println!("token B shares: {}", shares.token_b);
        }
        Command::Health { user, pool_id } => {
            println!("health factor: {}", client.health_factor(&user, &pool_id).await?);
        }
        Command::Stats { pool_id } => {
            let stats = client.pool_stats(&pool_id).await?;
            println!("token A staked: {}", stats.token_a_staked);
            println!("interest A:     {}", stats.interest_a);
            println!("token B staked: {}", stats.token_b_staked);
            println!("interest B:     {}", stats.interest_b);
        }
        Command::FindArbitrage {
            base_token,
            amount_in,
        } => {
            let out = client.find_best_arbitrage(&base_token, &amount_in).await?;
            println!("Search submitted. Tx: {}", out.tx_hash);
        }
        Command::ExecuteArbitrage {
            base_token,
            amount_in,
        } => {
            let out = client.execute_arbitrage(&base_token, &amount_in).await?;
            println!("Arbitrage executed. Tx: {}", out.tx_hash);
        }
        Command::BestPath => {
            let path = client.best_path().await?;
            println!("pool 1:          {}", path.pool1.to_checksum(None));
            println!("pool 2:          {}", path.pool2.to_checksum(None));
            println!("mid token:       {}", path.mid_token.to_checksum(None));
            println!("expected output: {}", path.expected_output);
        }
    }
    Ok(())
}
