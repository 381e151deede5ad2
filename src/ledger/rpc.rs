//! HTTP provider implementation of the `Ledger` trait
//!
//! Wraps an alloy provider with a local signer so state-changing calls
//! are signed and submitted in one step.

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, Bytes};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::{Ledger, LogEntry, TxReceipt};

pub struct RpcLedger {
    provider: DynProvider,
    account: Address,
}

impl RpcLedger {
    /// Connect to an HTTP endpoint with a hex-encoded signing key.
    pub fn connect(rpc_url: &str, private_key: &str) -> Result<Self> {
        let signer: PrivateKeySigner =
            private_key.parse().context("Invalid private key")?;
        let account = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer))
            .connect_http(rpc_url.parse().context("Invalid RPC URL")?);

        debug!("Connected to {} as {}", rpc_url, account);
        Ok(Self {
            provider: provider.erased(),
            account,
        })
    }

    /// The signer's address, used as the active wallet identity.
    pub fn account(&self) -> Address {
        self.account
    }
}

#[async_trait]
impl Ledger for RpcLedger {
    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        input: Bytes,
    ) -> Result<TxReceipt> {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(input);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .context("Send failed")?;
        let receipt = pending
            .get_receipt()
            .await
            .context("Confirmation failed")?;

        let logs = receipt
            .logs()
            .iter()
            .map(|log| LogEntry {
                address: log.address(),
                topics: log.topics().to_vec(),
                data: log.inner.data.data.clone(),
            })
            .collect();

        Ok(TxReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            success: receipt.status(),
            logs,
        })
    }

    async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default().with_to(to).with_input(input);
        let out = self.provider.call(tx).await.context("Call failed")?;
        Ok(out)
    }
}
