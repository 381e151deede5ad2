//! AMM operations: pool creation, liquidity, swaps, share reads
//!
//! Pool creation is the one operation with a registry side effect: the
//! new pool's address is not in the call return but in the PoolCreated
//! log, so the receipt is scanned and the decoded entry registered
//! before the follow-up token approvals run.

use alloy::primitives::U256;
use tracing::info;

use crate::codec::{self, Value};
use crate::contracts;
use crate::error::{ClientError, Result};
use crate::dispatcher::extract_event_log;
use crate::ledger::Ledger;
use crate::registry::KvStore;
use crate::types::{Pool, PoolCreated, PoolLiquidity, TokenPair, TxOutcome};

use super::{parse_address, parse_amount, require_distinct, DefiClient};

impl<L: Ledger, S: KvStore> DefiClient<L, S> {
    /// Create a pool for `(token_a, token_b)` seeded with the given
    /// amounts, register it under the next free identifier, and approve
    /// both tokens for the new pool.
    pub async fn create_pool(
        &mut self,
        token_a: &str,
        token_b: &str,
        amount_a: &str,
        amount_b: &str,
    ) -> Result<PoolCreated> {
        let token_a = parse_address("token A", token_a)?;
        let token_b = parse_address("token B", token_b)?;
        let amount_a = parse_amount("amount A", amount_a)?;
        let amount_b = parse_amount("amount B", amount_b)?;
        require_distinct(token_a, token_b)?;
        let caller = self.require_session()?;

        let receipt = self
            .submit(
                &contracts::CREATE_POOL,
                &[
                    Value::Address(token_a),
                    Value::Address(token_b),
                    Value::Uint256(amount_a),
                    Value::Uint256(amount_b),
                ],
                self.contracts().defi_core,
                caller,
            )
            .await?;

        let event_sig = codec::event_signature_hash(contracts::POOL_CREATED_EVENT);
        let log = extract_event_log(&receipt, event_sig).ok_or_else(|| {
            ClientError::Decoding(
                "pool created but PoolCreated event not found in receipt".to_string(),
            )
        })?;
        let creator_topic = log.topics.get(1).ok_or_else(|| {
            ClientError::Decoding("PoolCreated log is missing the creator topic".to_string())
        })?;
        let creator = codec::topic_address(creator_topic)?;
        let pool_address = codec::decode_log_address(&log.data)?;

        let pool_id = self.registry_mut().register(
            Pool {
                address: pool_address,
                creator,
            },
            TokenPair::new(token_a, token_b),
        );
        info!(
            "Pool {} created at {}",
            pool_id,
            pool_address.to_checksum(None)
        );

        // The pool needs spend rights on both sides before it can take
        // deposits; granting it at creation keeps the pool usable at once.
        self.approve_token(token_a, pool_address, caller).await?;
        self.approve_token(token_b, pool_address, caller).await?;

        Ok(PoolCreated {
            pool_id,
            address: pool_address,
            creator,
            tx_hash: receipt.tx_hash,
        })
    }

    /// Deposit both tokens into a pool at the given amounts.
    pub async fn add_liquidity(
        &self,
        pool_id: &str,
        amount_a: &str,
        amount_b: &str,
    ) -> Result<TxOutcome> {
        let amount_a = parse_amount("amount A", amount_a)?;
        let amount_b = parse_amount("amount B", amount_b)?;
        let (pool, _) = self.resolve_pool(pool_id)?;
        let caller = self.require_session()?;

        let receipt = self
            .submit(
                &contracts::ADD_LIQUIDITY,
                &[Value::Uint256(amount_a), Value::Uint256(amount_b)],
                pool.address,
                caller,
            )
            .await?;
        Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }

    /// Deposit a single token; the pool balances the other side itself.
    pub async fn add_liquidity_one_token(
        &self,
        pool_id: &str,
        token: &str,
        amount: &str,
    ) -> Result<TxOutcome> {
        let token = parse_address("token", token)?;
        let amount = parse_amount("amount", amount)?;
        let (pool, _) = self.resolve_pool(pool_id)?;
        let caller = self.require_session()?;

        let receipt = self
            .submit(
                &contracts::ADD_LIQUIDITY_ONE_TOKEN,
                &[Value::Address(token), Value::Uint256(amount)],
                pool.address,
                caller,
            )
            .await?;
        Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }

    /// Burn `shares` LP shares and withdraw the backing tokens.
    pub async fn remove_liquidity(&self, pool_id: &str, shares: &str) -> Result<TxOutcome> {
        let shares = parse_amount("share amount", shares)?;
        let (pool, _) = self.resolve_pool(pool_id)?;
        let caller = self.require_session()?;

        let receipt = self
            .submit(
                &contracts::REMOVE_LIQUIDITY,
                &[Value::Uint256(shares)],
                pool.address,
                caller,
            )
            .await?;
        Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }

    /// Swap `amount_in` of `token_in` against the pool.
    pub async fn swap(&self, pool_id: &str, token_in: &str, amount_in: &str) -> Result<TxOutcome> {
        let token_in = parse_address("token", token_in)?;
        let amount_in = parse_amount("amount", amount_in)?;
        let (pool, _) = self.resolve_pool(pool_id)?;
        let caller = self.require_session()?;

        let receipt = self
            .submit(
                &contracts::SWAP,
                &[Value::Address(token_in), Value::Uint256(amount_in)],
                pool.address,
                caller,
            )
            .await?;
        Ok(TxOutcome {
            tx_hash: receipt.tx_hash,
            block_number: receipt.block_number,
        })
    }

    /// Read both reserve sides of a pool.
    pub async fn pool_liquidity(&self, pool_id: &str) -> Result<PoolLiquidity> {
        let (pool, _) = self.resolve_pool(pool_id)?;
        let liquidity0 = self
            .read(&contracts::LIQUIDITY_0, &[], pool.address)
            .await?[0]
            .as_uint256()?;
        let liquidity1 = self
            .read(&contracts::LIQUIDITY_1, &[], pool.address)
            .await?[0]
            .as_uint256()?;
        Ok(PoolLiquidity {
            liquidity0,
            liquidity1,
        })
    }

    /// Read the pool's token pair as the contract reports it.
    pub async fn pool_tokens(&self, pool_id: &str) -> Result<TokenPair> {
        let (pool, _) = self.resolve_pool(pool_id)?;
        let token0 = self.read(&contracts::TOKEN_0, &[], pool.address).await?[0].as_address()?;
        let token1 = self.read(&contracts::TOKEN_1, &[], pool.address).await?[0].as_address()?;
        Ok(TokenPair::new(token0, token1))
    }

    /// LP shares held by the connected wallet in a pool.
    pub async fn my_shares(&self, pool_id: &str) -> Result<U256> {
        let (pool, _) = self.resolve_pool(pool_id)?;
        let caller = self.require_session()?;
        self.read(
            &contracts::LP_SHARES,
            &[Value::Address(caller)],
            pool.address,
        )
        .await?[0]
            .as_uint256()
    }

    /// Total LP shares outstanding for a pool.
    pub async fn total_shares(&self, pool_id: &str) -> Result<U256> {
        let (pool, _) = self.resolve_pool(pool_id)?;
        self.read(&contracts::TOTAL_SHARES, &[], pool.address)
            .await?[0]
            .as_uint256()
    }

    /// Ask DefiCore for the best pool to swap `amount` of one token
    /// into another.
    pub async fn best_pool(
        &self,
        token_in: &str,
        token_out: &str,
        amount: &str,
    ) -> Result<alloy::primitives::Address> {
        let token_in = parse_address("token in", token_in)?;
        let token_out = parse_address("token out", token_out)?;
        let amount = parse_amount("amount", amount)?;
        self.read(
            &contracts::BEST_POOL,
            &[
                Value::Address(token_in),
                Value::Address(token_out),
                Value::Uint256(amount),
            ],
            self.contracts().defi_core,
        )
        .await?[0]
            .as_address()
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
    async fn test_create_pool_registers_and_approves() {
        let ledger = Arc::new(ScriptedLedger::default());
        let pool_addr = Address::repeat_byte(0xB0);
        ledger.queue_receipt(pool_created_receipt(pool_addr, CALLER));
        ledger.queue_receipt(plain_receipt()); // approve token A
        ledger.queue_receipt(plain_receipt()); // approve token B

        let mut client = test_client(ledger.clone());
        let created = client
            .create_pool(TOKEN_A, TOKEN_B, "100", "200")
            .await
            .unwrap();

        assert_eq!(created.pool_id, "pool0");
        assert_eq!(created.address, pool_addr);
        assert_eq!(created.creator, CALLER);

        // Registry holds the token pair as submitted.
        let (pool, pair) = client.registry().lookup("pool0").unwrap();
        assert_eq!(pool.address, pool_addr);
        assert_eq!(pool.creator, CALLER);
        assert_eq!(
            pair.token0,
            address!("8C7c15E95D4cbF07386973Bcc596328e64886623")
        );

        // createPool + two approvals, in that order.
        let sent = ledger.sent.lock().unwrap();
        assert_eq!(sent.len(), 3);
        assert_eq!(
            &sent[0].input[..4],
            codec::selector_of(contracts::CREATE_POOL.signature).as_slice()
        );
        assert_eq!(
            &sent[1].input[..4],
            codec::selector_of(contracts::APPROVE.signature).as_slice()
        );
        assert_eq!(sent[1].to, address!("8C7c15E95D4cbF07386973Bcc596328e64886623"));
        assert_eq!(sent[2].to, address!("92572C68e39E19cE505C1CA3E46190bb8C3a53a8"));
    }

    #[tokio::test]
    async fn test_create_pool_same_token_rejected_before_network() {
        let ledger = Arc::new(ScriptedLedger::default());
        let mut client = test_client(ledger.clone());

        let err = client
            .create_pool(TOKEN_A, TOKEN_A, "100", "200")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
        assert_eq!(ledger.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_create_pool_without_session() {
        let ledger = Arc::new(ScriptedLedger::default());
        let mut client = test_client(ledger.clone());
        client.disconnect_for_test();

        let err = client
            .create_pool(TOKEN_A, TOKEN_B, "100", "200")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotConnected));
        assert_eq!(ledger.sent_count(), 0);
        assert!(client.registry().is_empty());
    }

    #[tokio::test]
    async fn test_create_pool_missing_event_registers_nothing() {
        let ledger = Arc::new(ScriptedLedger::default());
        ledger.queue_receipt(plain_receipt()); // no PoolCreated log

        let mut client = test_client(ledger.clone());
        let err = client
            .create_pool(TOKEN_A, TOKEN_B, "100", "200")
            .await
            .unwrap_err();

        assert!(matches!(err, ClientError::Decoding(_)));
        assert!(client.registry().is_empty());
        // Only the createPool submission went out; no approvals.
        assert_eq!(ledger.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_add_liquidity_unknown_pool() {
        let ledger = Arc::new(ScriptedLedger::default());
        let client = test_client(ledger.clone());

        let err = client.add_liquidity("pool0", "10", "20").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
        let err = client.add_liquidity("poolX", "10", "20").await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidIdentifier(_)));
        assert_eq!(ledger.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_swap_targets_pool_contract() {
        let ledger = Arc::new(ScriptedLedger::default());
        let pool_addr = Address::repeat_byte(0xB0);
        ledger.queue_receipt(pool_created_receipt(pool_addr, CALLER));
        ledger.queue_receipt(plain_receipt());
        ledger.queue_receipt(plain_receipt());
        ledger.queue_receipt(plain_receipt()); // the swap itself

        let mut client = test_client(ledger.clone());
        client
            .create_pool(TOKEN_A, TOKEN_B, "100", "200")
            .await
            .unwrap();
        client.swap("pool0", TOKEN_A, "5").await.unwrap();

        let sent = ledger.sent.lock().unwrap();
        let swap_tx = sent.last().unwrap();
        assert_eq!(swap_tx.to, pool_addr);
        assert_eq!(
            &swap_tx.input[..4],
            codec::selector_of(contracts::SWAP.signature).as_slice()
        );
    }

    #[tokio::test]
    async fn test_total_shares_decodes_word() {
        let ledger = Arc::new(ScriptedLedger::default());
        let pool_addr = Address::repeat_byte(0xB0);
        ledger.queue_receipt(pool_created_receipt(pool_addr, CALLER));
        ledger.queue_receipt(plain_receipt());
        ledger.queue_receipt(plain_receipt());
        ledger.queue_call(words(&[12_345]));

        let mut client = test_client(ledger.clone());
        client
            .create_pool(TOKEN_A, TOKEN_B, "100", "200")
            .await
            .unwrap();

        let total = client.total_shares("pool0").await.unwrap();
        assert_eq!(total, U256::from(12_345u64));
    }
}
