//! Token helpers: mint (test-token faucet) and spend approvals
//!
//! Pools and LendingCore pull deposits with `transferFrom`, so both
//! tokens of a pool need an allowance before liquidity or lending
//! operations can succeed.

use alloy::primitives::Address;
use tracing::debug;

use crate::codec::Value;
use crate::contracts;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::registry::KvStore;
use crate::types::TxOutcome;

use super::{default_allowance, parse_address, parse_amount, DefiClient};

impl<L: Ledger, S: KvStore> DefiClient<L, S> {
    /// Approve `spender` for the standard allowance on `token`.
    pub(crate) async fn approve_token(
        &self,
        token: Address,
        spender: Address,
        caller: Address,
    ) -> Result<()> {
        debug!(
            "Approving {} for spender {}",
            token.to_checksum(None),
            spender.to_checksum(None)
        );
        self.submit(
            &contracts::APPROVE,
            &[Value::Address(spender), Value::Uint256(default_allowance())],
            token,
            caller,
        )
        .await?;
        Ok(())
    }

    /// Approve both of a pool's tokens for the pool contract itself.
    pub async fn approve_pool_tokens(&self, pool_id: &str) -> Result<()> {
        let (pool, pair) = self.resolve_pool(pool_id)?;
        let caller = self.require_session()?;

        self.approve_token(pair.token0, pool.address, caller).await?;
        self.approve_token(pair.token1, pool.address, caller).await?;
        Ok(())
    }

    /// Approve both of a pool's tokens for LendingCore.
    pub async fn approve_lending_tokens(&self, pool_id: &str) -> Result<()> {
        let (_, pair) = self.resolve_pool(pool_id)?;
        let caller = self.require_session()?;
        let lending = self.contracts().lending_core;

        self.approve_token(pair.token0, lending, caller).await?;
        self.approve_token(pair.token1, lending, caller).await?;
        Ok(())
    }

    /// Mint test tokens to `recipient`, then grant the recipient the
    /// standard allowance so the minted balance is spendable right away.
    pub async fn mint(&self, token: &str, recipient: &str, amount: &str) -> Result<TxOutcome> {
        let token = parse_address("token address", token)?;
        let recipient = parse_address("recipient", recipient)?;
        let amount = parse_amount("amount", amount)?;
        let caller = self.require_session()?;

        let receipt = self
            .submit(
                &contracts::MINT,
                &[Value::Address(recipient), Value::Uint256(amount)],
                token,
                caller,
            )
            .await?;
        self.approve_token(token, recipient, caller).await?;

        Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::codec;
    use crate::contracts;
    use crate::error::ClientError;
    use alloy::primitives::{address, Address, U256};
    use std::sync::Arc;

    const TOKEN_A: &str = "0x8C7c15E95D4cbF07386973Bcc596328e64886623";
    const TOKEN_B: &str = "0x92572C68e39E19cE505C1CA3E46190bb8C3a53a8";

    #[tokio::test]
    async fn test_approve_pool_tokens_targets_both_tokens() {
        let ledger = Arc::new(ScriptedLedger::default());
        let pool_addr = Address::repeat_byte(0xB0);
        ledger.queue_receipt(pool_created_receipt(pool_addr, CALLER));
        ledger.queue_receipt(plain_receipt());
        ledger.queue_receipt(plain_receipt());
        let mut client = test_client(ledger.clone());
        client
            .create_pool(TOKEN_A, TOKEN_B, "100", "200")
            .await
            .unwrap();

        ledger.queue_receipt(plain_receipt());
        ledger.queue_receipt(plain_receipt());
        client.approve_pool_tokens("pool0").await.unwrap();

        let sent = ledger.sent.lock().unwrap();
        let (first, second) = (&sent[sent.len() - 2], &sent[sent.len() - 1]);
        assert_eq!(first.to, address!("8C7c15E95D4cbF07386973Bcc596328e64886623"));
        assert_eq!(second.to, address!("92572C68e39E19cE505C1CA3E46190bb8C3a53a8"));
        // Spender argument is the pool contract.
        assert_eq!(&first.input[16..36], pool_addr.as_slice());
        // Allowance is 10 000 tokens at 18 decimals.
        let allowance = U256::from_be_slice(&first.input[36..68]);
        assert_eq!(
            allowance,
            U256::from(10_000u64) * U256::from(10u64).pow(U256::from(18u64))
        );
    }

    #[tokio::test]
    async fn test_approve_lending_tokens_spender_is_lending_core() {
        let ledger = Arc::new(ScriptedLedger::default());
        let pool_addr = Address::repeat_byte(0xB0);
        ledger.queue_receipt(pool_created_receipt(pool_addr, CALLER));
        ledger.queue_receipt(plain_receipt());
        ledger.queue_receipt(plain_receipt());
        let mut client = test_client(ledger.clone());
        client
            .create_pool(TOKEN_A, TOKEN_B, "100", "200")
            .await
            .unwrap();

        ledger.queue_receipt(plain_receipt());
        ledger.queue_receipt(plain_receipt());
        client.approve_lending_tokens("pool0").await.unwrap();

        let sent = ledger.sent.lock().unwrap();
        let first = &sent[sent.len() - 2];
        assert_eq!(&first.input[16..36], LENDING_CORE.as_slice());
    }

    #[tokio::test]
    async fn test_mint_then_approve() {
        let ledger = Arc::new(ScriptedLedger::default());
        ledger.queue_receipt(plain_receipt());
        ledger.queue_receipt(plain_receipt());
        let client = test_client(ledger.clone());

        let recipient = "0x00A329c0648769A73afAc7F9381E08FB43dBEA72";
        client.mint(TOKEN_A, recipient, "1000").await.unwrap();

        let sent = ledger.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            &sent[0].input[..4],
            codec::selector_of(contracts::MINT.signature).as_slice()
        );
        assert_eq!(
            &sent[1].input[..4],
            codec::selector_of(contracts::APPROVE.signature).as_slice()
        );
    }

    #[tokio::test]
    async fn test_approve_unknown_pool_sends_nothing() {
        let ledger = Arc::new(ScriptedLedger::default());
        let client = test_client(ledger.clone());

        let err = client.approve_pool_tokens("pool5").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
        assert_eq!(ledger.sent_count(), 0);
    }
}
