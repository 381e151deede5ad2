//! Ledger access collaborator
//!
//! The interaction layer talks to the chain only through this trait:
//! submit one transaction, or perform one read-only call. Receipts carry
//! the ordered log list the dispatcher scans for side effects.

mod rpc;

pub use rpc::RpcLedger;

use alloy::primitives::{Address, Bytes, B256};
use async_trait::async_trait;

/// One emitted event-log entry, in emission order within its receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// Confirmation record for a submitted transaction.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    /// False means the transaction was mined but reverted.
    pub success: bool,
    pub logs: Vec<LogEntry>,
}

/// Remote ledger node, reachable for exactly two things.
///
/// Implementations surface transport and node failures as `anyhow`
/// errors; the dispatcher maps them onto the client taxonomy without
/// dropping the provider's message.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Submit one state-changing transaction and wait for its receipt.
    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        input: Bytes,
    ) -> anyhow::Result<TxReceipt>;

    /// Perform one read-only call. Must not mutate ledger state.
    async fn call(&self, to: Address, input: Bytes) -> anyhow::Result<Bytes>;
}
