//! Configuration management
//! Load settings from .env file

use alloy::primitives::Address;
use anyhow::{Context, Result};
use std::str::FromStr;

/// The three fixed contract endpoints every operation targets.
/// Pool contracts are discovered at runtime and live in the registry.
#[derive(Debug, Clone, Copy)]
pub struct ContractAddresses {
    pub defi_core: Address,
    pub lending_core: Address,
    pub arbitrage: Address,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub rpc_url: String,
    pub private_key: String,
    pub contracts: ContractAddresses,
    /// Directory for the persisted pool registry.
    pub state_dir: String,
    /// Per-round-trip timeout in milliseconds; 0 disables the limit.
    pub request_timeout_ms: u64,
}

pub fn load_config() -> Result<ClientConfig> {
    dotenv::dotenv().ok();

    let addr = |var: &str| -> Result<Address> {
        let raw = std::env::var(var).with_context(|| format!("{var} not set"))?;
        Address::from_str(raw.trim()).with_context(|| format!("{var} is not a valid address"))
    };

    Ok(ClientConfig {
        rpc_url: std::env::var("RPC_URL").context("RPC_URL not set")?,
        private_key: std::env::var("PRIVATE_KEY").context("PRIVATE_KEY not set")?,
        contracts: ContractAddresses {
            defi_core: addr("DEFI_CORE_ADDRESS")?,
            lending_core: addr("LENDING_CORE_ADDRESS")?,
            arbitrage: addr("ARBITRAGE_ADDRESS")?,
        },
        state_dir: std::env::var("STATE_DIR").unwrap_or_else(|_| "data/state".to_string()),
        request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
            .ok()
            .map(|v| v.parse().context("REQUEST_TIMEOUT_MS must be an integer"))
            .transpose()?
            .unwrap_or(30_000),
    })
}
