//! Core data structures shared across the interaction layer

use alloy::primitives::{Address, B256, U256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One discovered liquidity pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub address: Address,
    pub creator: Address,
}

/// Ordered pair of constituent tokens for a pool.
///
/// `Address` compares on raw bytes, so hex case never affects equality;
/// serialization is lower-case hex, matching the persisted form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub token0: Address,
    pub token1: Address,
}

impl TokenPair {
    pub fn new(token0: Address, token1: Address) -> Self {
        Self { token0, token1 }
    }
}

impl fmt::Display for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.token0, self.token1)
    }
}

/// Outcome of a successful pool creation.
#[derive(Debug, Clone)]
pub struct PoolCreated {
    pub pool_id: String,
    pub address: Address,
    pub creator: Address,
    pub tx_hash: B256,
}

/// Outcome of a plain state-changing operation (no decoded payload).
#[derive(Debug, Clone)]
pub struct TxOutcome {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
}

/// Loan position decoded from `loans(address,address)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loan {
    pub collateral_amount: U256,
    pub borrowed_amount: U256,
    /// 0 = token A, 1 = token B.
    pub loan_type: u8,
}

/// Per-user lending shares decoded from `shares(address,address)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LendingShares {
    pub token_a: U256,
    pub token_b: U256,
}

/// Aggregate lending stats for one pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    pub token_a_staked: U256,
    pub interest_a: U256,
    pub token_b_staked: U256,
    pub interest_b: U256,
}

/// On-chain reserves read from a pool contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolLiquidity {
    pub liquidity0: U256,
    pub liquidity1: U256,
}

/// Best arbitrage route decoded from `bestPath()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbitragePath {
    pub pool1: Address,
    pub pool2: Address,
    pub mid_token: Address,
    pub expected_output: U256,
}
