//! Call Dispatcher
//!
//! Composes a function selector with encoded arguments into a full call
//! payload and submits it through the `Ledger` collaborator, either as a
//! state-changing transaction or a read-only query. Every submission is
//! a single best-effort attempt; nothing here retries.

use alloy::primitives::{Address, Bytes, Selector, B256};
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

use crate::codec::{self, Value};
use crate::contracts::FunctionSig;
use crate::error::{ClientError, Result};
use crate::ledger::{Ledger, LogEntry, TxReceipt};

/// Ephemeral, fully-encoded call: built per operation, consumed once.
#[derive(Debug, Clone)]
pub struct CallDescriptor {
    pub selector: Selector,
    pub encoded_args: Vec<u8>,
    pub target: Address,
    pub is_state_changing: bool,
}

impl CallDescriptor {
    /// Selector followed by the argument blob, as sent on the wire.
    pub fn payload(&self) -> Bytes {
        let mut data = Vec::with_capacity(4 + self.encoded_args.len());
        data.extend_from_slice(self.selector.as_slice());
        data.extend_from_slice(&self.encoded_args);
        Bytes::from(data)
    }
}

pub struct Dispatcher<L: Ledger> {
    ledger: L,
    /// Upper bound on one network round-trip. `None` defers cancellation
    /// entirely to the transport.
    timeout: Option<Duration>,
}

impl<L: Ledger> Dispatcher<L> {
    pub fn new(ledger: L, timeout: Option<Duration>) -> Self {
        Self { ledger, timeout }
    }

    /// Encode `args` against `func` for a call to `target`.
    pub fn build_call(
        &self,
        func: &FunctionSig,
        args: &[Value],
        target: Address,
        is_state_changing: bool,
    ) -> Result<CallDescriptor> {
        let encoded_args = codec::encode(func.params, args)?;
        Ok(CallDescriptor {
            selector: codec::selector_of(func.signature),
            encoded_args,
            target,
            is_state_changing,
        })
    }

    /// Submit a state-changing transaction and wait for its receipt.
    ///
    /// Requires an active wallet identity; a rejected or reverted
    /// transaction surfaces as `Transaction` with the provider's message.
    pub async fn send(
        &self,
        descriptor: &CallDescriptor,
        caller: Option<Address>,
    ) -> Result<TxReceipt> {
        let caller = caller.ok_or(ClientError::NotConnected)?;
        let payload = descriptor.payload();
        debug!(
            "send: {} -> {} ({} bytes)",
            caller,
            descriptor.target,
            payload.len()
        );

        let fut = self.ledger.send_transaction(caller, descriptor.target, payload);
        let receipt = match self.timeout {
            Some(limit) => timeout(limit, fut)
                .await
                .map_err(|_| {
                    ClientError::Transaction(format!(
                        "timed out after {}ms",
                        limit.as_millis()
                    ))
                })?
                .map_err(|e| ClientError::Transaction(format!("{e:#}")))?,
            None => fut
                .await
                .map_err(|e| ClientError::Transaction(format!("{e:#}")))?,
        };

        if !receipt.success {
            return Err(ClientError::Transaction(format!(
                "transaction {} reverted",
                receipt.tx_hash
            )));
        }
        Ok(receipt)
    }

    /// Perform a read-only query; no wallet identity required.
    pub async fn query(&self, descriptor: &CallDescriptor) -> Result<Bytes> {
        let payload = descriptor.payload();
        debug!("query: {} ({} bytes)", descriptor.target, payload.len());

        let fut = self.ledger.call(descriptor.target, payload);
        match self.timeout {
            Some(limit) => timeout(limit, fut)
                .await
                .map_err(|_| {
                    ClientError::Query(format!("timed out after {}ms", limit.as_millis()))
                })?
                .map_err(|e| ClientError::Query(format!("{e:#}"))),
            None => fut.await.map_err(|e| ClientError::Query(format!("{e:#}"))),
        }
    }
}

/// First log whose `topics[0]` equals `event_sig`, in emission order.
///
/// Returns `None` when no entry matches; callers must handle the absence
/// explicitly rather than assume the event fired.
pub fn extract_event_log<'a>(receipt: &'a TxReceipt, event_sig: B256) -> Option<&'a LogEntry> {
    receipt
        .logs
        .iter()
        .find(|log| log.topics.first() == Some(&event_sig))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts;
    use alloy::primitives::{address, U256};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Scripted ledger double: records payloads, replays canned results.
    struct MockLedger {
        sent: Mutex<Vec<(Address, Address, Bytes)>>,
        receipt: Option<TxReceipt>,
        call_result: std::result::Result<Bytes, String>,
    }

    impl MockLedger {
        fn with_receipt(receipt: TxReceipt) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                receipt: Some(receipt),
                call_result: Ok(Bytes::new()),
            }
        }

        fn with_call_result(result: std::result::Result<Bytes, String>) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                receipt: None,
                call_result: result,
            }
        }
    }

    #[async_trait]
    impl Ledger for MockLedger {
        async fn send_transaction(
            &self,
            from: Address,
            to: Address,
            input: Bytes,
        ) -> anyhow::Result<TxReceipt> {
            self.sent.lock().unwrap().push((from, to, input));
            self.receipt
                .clone()
                .ok_or_else(|| anyhow::anyhow!("rejected by wallet"))
        }

        async fn call(&self, _to: Address, _input: Bytes) -> anyhow::Result<Bytes> {
            self.call_result
                .clone()
                .map_err(|msg| anyhow::anyhow!(msg))
        }
    }

    fn ok_receipt() -> TxReceipt {
        TxReceipt {
            tx_hash: B256::repeat_byte(0x11),
            block_number: Some(42),
            success: true,
            logs: Vec::new(),
        }
    }

    #[test]
    fn test_payload_layout() {
        let descriptor = CallDescriptor {
            selector: codec::selector_of("approve(address,uint256)"),
            encoded_args: vec![0xaa; 64],
            target: Address::ZERO,
            is_state_changing: true,
        };
        let payload = descriptor.payload();
        assert_eq!(payload.len(), 68);
        assert_eq!(&payload[..4], &[0x09, 0x5e, 0xa7, 0xb3]);
    }

    #[test]
    fn test_build_call_propagates_encoding_error() {
        let dispatcher = Dispatcher::new(MockLedger::with_receipt(ok_receipt()), None);
        let err = dispatcher
            .build_call(
                &contracts::SWAP,
                &[Value::Uint256(U256::from(1u64))],
                Address::ZERO,
                true,
            )
            .unwrap_err();
        assert!(matches!(err, ClientError::Encoding(_)));
    }

    #[tokio::test]
    async fn test_send_without_caller_is_not_connected() {
        let ledger = MockLedger::with_receipt(ok_receipt());
        let dispatcher = Dispatcher::new(ledger, None);
        let descriptor = dispatcher
            .build_call(&contracts::REMOVE_LIQUIDITY, &[Value::Uint256(U256::ZERO)], Address::ZERO, true)
            .unwrap();

        let err = dispatcher.send(&descriptor, None).await.unwrap_err();
        assert!(matches!(err, ClientError::NotConnected));
        // No network call may happen before the identity check.
        assert!(dispatcher.ledger.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_surfaces_revert() {
        let mut receipt = ok_receipt();
        receipt.success = false;
        let dispatcher = Dispatcher::new(MockLedger::with_receipt(receipt), None);
        let descriptor = dispatcher
            .build_call(&contracts::REMOVE_LIQUIDITY, &[Value::Uint256(U256::ZERO)], Address::ZERO, true)
            .unwrap();

        let err = dispatcher
            .send(&descriptor, Some(Address::ZERO))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transaction(_)));
    }

    #[tokio::test]
    async fn test_query_surfaces_provider_message() {
        let dispatcher = Dispatcher::new(
            MockLedger::with_call_result(Err("execution reverted: no pool".to_string())),
            None,
        );
        let descriptor = dispatcher
            .build_call(&contracts::TOTAL_SHARES, &[], Address::ZERO, false)
            .unwrap();

        let err = dispatcher.query(&descriptor).await.unwrap_err();
        match err {
            ClientError::Query(msg) => assert!(msg.contains("no pool")),
            other => panic!("expected Query, got {other:?}"),
        }
    }

    #[test]
    fn test_extract_event_log_first_match() {
        let sig = codec::event_signature_hash(contracts::POOL_CREATED_EVENT);
        let creator = address!("00A329c0648769A73afAc7F9381E08FB43dBEA72");
        let matching = LogEntry {
            address: Address::ZERO,
            topics: vec![sig, creator.into_word()],
            data: Bytes::from(vec![0u8; 32]),
        };
        let other = LogEntry {
            address: Address::ZERO,
            topics: vec![B256::repeat_byte(0x99)],
            data: Bytes::new(),
        };
        let receipt = TxReceipt {
            tx_hash: B256::ZERO,
            block_number: None,
            success: true,
            logs: vec![other.clone(), matching.clone(), matching.clone()],
        };

        let found = extract_event_log(&receipt, sig).unwrap();
        assert_eq!(found, &matching);
        assert!(extract_event_log(&receipt, B256::repeat_byte(0x42)).is_none());
    }

    #[test]
    fn test_extract_event_log_empty_topics() {
        let receipt = TxReceipt {
            tx_hash: B256::ZERO,
            block_number: None,
            success: true,
            logs: vec![LogEntry {
                address: Address::ZERO,
                topics: Vec::new(),
                data: Bytes::new(),
            }],
        };
        assert!(extract_event_log(&receipt, B256::ZERO).is_none());
    }
}
