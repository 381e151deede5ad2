//! DeFi Client Library
//!
//! On-chain interaction layer for a set of AMM, lending and arbitrage
//! contracts driven through a connected wallet: ABI codec, call
//! dispatch, a persisted registry of discovered pools, and the domain
//! operations built on top of them.

pub mod codec;
pub mod config;
pub mod contracts;
pub mod dispatcher;
pub mod error;
pub mod ledger;
pub mod ops;
pub mod registry;
pub mod types;

// Re-export commonly used types
pub use config::{load_config, ClientConfig, ContractAddresses};
pub use dispatcher::{extract_event_log, CallDescriptor, Dispatcher};
pub use error::ClientError;
pub use ledger::{Ledger, LogEntry, RpcLedger, TxReceipt};
pub use ops::DefiClient;
pub use registry::{FileStore, KvStore, MemoryStore, PoolRegistry};
pub use types::{Pool, PoolCreated, TokenPair};
