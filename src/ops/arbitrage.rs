//! Arbitrage operations
//!
//! The arbitrage contract searches and executes routes across the
//! registered pools on-chain; this client only triggers it and reads
//! back the best path it found.

use crate::codec::Value;
use crate::contracts;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::registry::KvStore;
use crate::types::{ArbitragePath, TxOutcome};

use super::{parse_address, parse_amount, DefiClient};

impl<L: Ledger, S: KvStore> DefiClient<L, S> {
    /// Run the on-chain search for the best arbitrage route starting
    /// from `base_token` with `amount_in`. State-changing: the contract
    /// stores the result for a later `best_path` read.
    pub async fn find_best_arbitrage(&self, base_token: &str, amount_in: &str) -> Result<TxOutcome> {
        self.arbitrage_call(&contracts::FIND_BEST_ARBITRAGE, base_token, amount_in)
            .await
    }

    /// Execute the arbitrage route for `base_token` and `amount_in`.
    pub async fn execute_arbitrage(&self, base_token: &str, amount_in: &str) -> Result<TxOutcome> {
        self.arbitrage_call(&contracts::EXECUTE_ARBITRAGE, base_token, amount_in)
            .await
    }

    async fn arbitrage_call(
        &self,
        func: &contracts::FunctionSig,
        base_token: &str,
        amount_in: &str,
    ) -> Result<TxOutcome> {
        let base_token = parse_address("base token", base_token)?;
        let amount_in = parse_amount("amount", amount_in)?;
        let caller = self.require_session()?;

        let receipt = self
            .submit(
                func,
                &[Value::Address(base_token), Value::Uint256(amount_in)],
                self.contracts().arbitrage,
                caller,
            )
            .await?;
        Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }

    /// Read the stored best path: two pools, the mid token, and the
    /// expected output amount.
    pub async fn best_path(&self) -> Result<ArbitragePath> {
        let values = self
            .read(&contracts::BEST_PATH, &[], self.contracts().arbitrage)
            .await?;
        Ok(ArbitragePath {
            pool1: values[0].as_address()?,
            pool2: values[1].as_address()?,
            mid_token: values[2].as_address()?,
            expected_output: values[3].as_uint256()?,
        })
    }
}
