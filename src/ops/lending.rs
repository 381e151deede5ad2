//! Lending operations against the LendingCore contract
//!
//! Every call targets LendingCore with the resolved pool address as an
//! argument; the pool contract itself is never called directly here.
//! Argument orders follow the deployed contract exactly, including the
//! lendTokenA / lendTokenB asymmetry.

use alloy::primitives::U256;

use crate::codec::Value;
use crate::contracts;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::registry::KvStore;
use crate::types::{LendingShares, Loan, PoolStats, TxOutcome};

use super::{parse_address, parse_amount, DefiClient};

impl<L: Ledger, S: KvStore> DefiClient<L, S> {
    /// Lend token A into a pool's lending market.
    pub async fn lend_token_a(&self, pool_id: &str, amount: &str) -> Result<TxOutcome> {
        let amount = parse_amount("amount", amount)?;
        let (pool, _) = self.resolve_pool(pool_id)?;
        let caller = self.require_session()?;

        let receipt = self
            .submit(
                &contracts::LEND_TOKEN_A,
                &[Value::Uint256(amount), Value::Address(pool.address)],
                self.contracts().lending_core,
                caller,
            )
            .await?;
        Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }

    /// Lend token B; note the reversed argument order on the wire.
    pub async fn lend_token_b(&self, pool_id: &str, amount: &str) -> Result<TxOutcome> {
        let amount = parse_amount("amount", amount)?;
        let (pool, _) = self.resolve_pool(pool_id)?;
        let caller = self.require_session()?;

        let receipt = self
            .submit(
                &contracts::LEND_TOKEN_B,
                &[Value::Address(pool.address), Value::Uint256(amount)],
                self.contracts().lending_core,
                caller,
            )
            .await?;
        Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }

    /// Borrow token A against posted collateral.
    pub async fn borrow_token_a(
        &self,
        pool_id: &str,
        collateral: &str,
        amount: &str,
    ) -> Result<TxOutcome> {
        self.borrow(&contracts::BORROW_TOKEN_A, pool_id, collateral, amount)
            .await
    }

    /// Borrow token B against posted collateral.
    pub async fn borrow_token_b(
        &self,
        pool_id: &str,
        collateral: &str,
        amount: &str,
    ) -> Result<TxOutcome> {
        self.borrow(&contracts::BORROW_TOKEN_B, pool_id, collateral, amount)
            .await
    }

    async fn borrow(
        &self,
        func: &contracts::FunctionSig,
        pool_id: &str,
        collateral: &str,
        amount: &str,
    ) -> Result<TxOutcome> {
        let collateral = parse_amount("collateral amount", collateral)?;
        let amount = parse_amount("borrow amount", amount)?;
        let (pool, _) = self.resolve_pool(pool_id)?;
        let caller = self.require_session()?;

        let receipt = self
            .submit(
                func,
                &[
                    Value::Uint256(collateral),
                    Value::Uint256(amount),
                    Value::Address(pool.address),
                ],
                self.contracts().lending_core,
                caller,
            )
            .await?;
        Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }

    /// Repay an open loan in a pool.
    pub async fn repay_loan(&self, pool_id: &str, amount: &str) -> Result<TxOutcome> {
        let amount = parse_amount("repay amount", amount)?;
        let (pool, _) = self.resolve_pool(pool_id)?;
        let caller = self.require_session()?;

        let receipt = self
            .submit(
                &contracts::REPAY_LOAN,
                &[Value::Address(pool.address), Value::Uint256(amount)],
                self.contracts().lending_core,
                caller,
            )
            .await?;
        Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }

    /// Withdraw the caller's token A position from a pool.
    pub async fn withdraw_token_a(&self, pool_id: &str) -> Result<TxOutcome> {
        self.withdraw(&contracts::WITHDRAW_TOKEN_A, pool_id).await
    }

    /// Withdraw the caller's token B position from a pool.
    pub async fn withdraw_token_b(&self, pool_id: &str) -> Result<TxOutcome> {
        self.withdraw(&contracts::WITHDRAW_TOKEN_B, pool_id).await
    }

    async fn withdraw(&self, func: &contracts::FunctionSig, pool_id: &str) -> Result<TxOutcome> {
        let (pool, _) = self.resolve_pool(pool_id)?;
        let caller = self.require_session()?;

        let receipt = self
            .submit(
                func,
                &[Value::Address(pool.address)],
                self.contracts().lending_core,
                caller,
            )
            .await?;
        Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }

    /// Liquidate an undercollateralized user in a pool.
    pub async fn liquidate(&self, user: &str, pool_id: &str) -> Result<TxOutcome> {
        let user = parse_address("user address", user)?;
        let (pool, _) = self.resolve_pool(pool_id)?;
        let caller = self.require_session()?;

        let receipt = self
            .submit(
                &contracts::LIQUIDATE,
                &[Value::Address(user), Value::Address(pool.address)],
                self.contracts().lending_core,
                caller,
            )
            .await?;
        Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }

    /// Read a user's loan position in a pool.
    pub async fn loan_of(&self, user: &str, pool_id: &str) -> Result<Loan> {
        let user = parse_address("user address", user)?;
        let (pool, _) = self.resolve_pool(pool_id)?;

        let values = self
            .read(
                &contracts::LOANS,
                &[Value::Address(user), Value::Address(pool.address)],
                self.contracts().lending_core,
            )
            .await?;
        Ok(Loan {
            collateral_amount: values[0].as_uint256()?,
            borrowed_amount: values[1].as_uint256()?,
            loan_type: values[2].as_uint8()?,
        })
    }

    /// Read a user's lending shares (token A and token B) in a pool.
    pub async fn lending_shares(&self, user: &str, pool_id: &str) -> Result<LendingShares> {
        let user = parse_address("user address", user)?;
        let (pool, _) = self.resolve_pool(pool_id)?;

        let values = self
            .read(
                &contracts::SHARES,
                &[Value::Address(user), Value::Address(pool.address)],
                self.contracts().lending_core,
            )
            .await?;
        Ok(LendingShares {
            token_a: values[0].as_uint256()?,
            token_b: values[1].as_uint256()?,
        })
    }

    /// Read a user's health factor in a pool.
    pub async fn health_factor(&self, user: &str, pool_id: &str) -> Result<U256> {
        let user = parse_address("user address", user)?;
        let (pool, _) = self.resolve_pool(pool_id)?;

        self.read(
            &contracts::GET_HEALTH_FACTOR,
            &[Value::Address(user), Value::Address(pool.address)],
            self.contracts().lending_core,
        )
        .await?[0]
            .as_uint256()
    }

    /// Read a pool's aggregate lending stats. Four reads, issued one
    /// after another; an operation never runs internal steps in
    /// parallel.
    pub async fn pool_stats(&self, pool_id: &str) -> Result<PoolStats> {
        let (pool, _) = self.resolve_pool(pool_id)?;
        let pool_arg = [Value::Address(pool.address)];
        let lending = self.contracts().lending_core;

        let token_a_staked = self
            .read(&contracts::TOTAL_TOKEN_A_STAKED, &pool_arg, lending)
            .await?[0]
            .as_uint256()?;
        let interest_a = self
            .read(&contracts::TOTAL_INTEREST_TOKEN_A, &pool_arg, lending)
            .await?[0]
            .as_uint256()?;
        let token_b_staked = self
            .read(&contracts::TOTAL_TOKEN_B_STAKED, &pool_arg, lending)
            .await?[0]
            .as_uint256()?;
        let interest_b = self
            .read(&contracts::TOTAL_INTEREST_TOKEN_B, &pool_arg, lending)
            .await?[0]
            .as_uint256()?;

        Ok(PoolStats {
            token_a_staked,
            interest_a,
            token_b_staked,
            interest_b,
        })
    }
}
