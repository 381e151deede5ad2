//! Operation Façade
//!
//! The domain operations a user can drive through a connected wallet.
//! Every operation follows one protocol: validate inputs, resolve any
//! pool identifier through the registry, require a session for
//! state-changing calls, build one call descriptor, submit or query,
//! decode. Errors are returned once, tagged, never re-thrown past here.

mod amm;
mod arbitrage;
mod lending;
mod token;

use alloy::primitives::{Address, U256};
use tracing::info;

use crate::config::ContractAddresses;
use crate::codec::Value;
use crate::contracts::FunctionSig;
use crate::dispatcher::Dispatcher;
use crate::error::{ClientError, Result};
use crate::ledger::{Ledger, TxReceipt};
use crate::registry::{KvStore, PoolRegistry};
use crate::types::{Pool, TokenPair};

/// Allowance granted by the approval helpers: 10 000 whole tokens at 18
/// decimals, the figure the deployed test tokens expect.
pub(crate) fn default_allowance() -> U256 {
    U256::from(10_000u64) * U256::from(10u64).pow(U256::from(18u64))
}

pub struct DefiClient<L: Ledger, S: KvStore> {
    dispatcher: Dispatcher<L>,
    registry: PoolRegistry<S>,
    contracts: ContractAddresses,
    session: Option<Address>,
}

impl<L: Ledger, S: KvStore> DefiClient<L, S> {
    pub fn new(dispatcher: Dispatcher<L>, registry: PoolRegistry<S>, contracts: ContractAddresses) -> Self {
        Self {
            dispatcher,
            registry,
            contracts,
            session: None,
        }
    }

    /// Attach the active wallet identity for this session.
    pub fn connect(&mut self, account: Address) {
        info!("Session connected: {}", account.to_checksum(None));
        self.session = Some(account);
    }

    pub fn session(&self) -> Option<Address> {
        self.session
    }

    #[cfg(test)]
    pub(crate) fn disconnect_for_test(&mut self) {
        self.session = None;
    }

    pub fn registry(&self) -> &PoolRegistry<S> {
        &self.registry
    }

    // ── shared protocol steps ────────────────────────────────────────

    pub(crate) fn require_session(&self) -> Result<Address> {
        self.session.ok_or(ClientError::NotConnected)
    }

    pub(crate) fn resolve_pool(&self, pool_id: &str) -> Result<(Pool, TokenPair)> {
        let (pool, pair) = self.registry.lookup(pool_id.trim())?;
        Ok((pool.clone(), pair.clone()))
    }

    pub(crate) fn registry_mut(&mut self) -> &mut PoolRegistry<S> {
        &mut self.registry
    }

    pub(crate) fn contracts(&self) -> &ContractAddresses {
        &self.contracts
    }

    /// Build and submit one state-changing call as `caller`.
    pub(crate) async fn submit(
        &self,
        func: &FunctionSig,
        args: &[Value],
        target: Address,
        caller: Address,
    ) -> Result<TxReceipt> {
        let descriptor = self.dispatcher.build_call(func, args, target, true)?;
        self.dispatcher.send(&descriptor, Some(caller)).await
    }

    /// Build and run one read-only call, decoding the declared returns.
    pub(crate) async fn read(
        &self,
        func: &FunctionSig,
        args: &[Value],
        target: Address,
    ) -> Result<Vec<Value>> {
        let descriptor = self.dispatcher.build_call(func, args, target, false)?;
        let blob = self.dispatcher.query(&descriptor).await?;
        crate::codec::decode(func.returns, &blob)
    }
}

// ── input validation ─────────────────────────────────────────────────
// User input arrives as strings; everything is checked here before any
// network access.

pub(crate) fn parse_address(field: &str, value: &str) -> Result<Address> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Validation(format!("{field} is required")));
    }
    trimmed
        .parse::<Address>()
        .map_err(|_| ClientError::Validation(format!("{field} is not a valid address: {trimmed}")))
}

pub(crate) fn parse_amount(field: &str, value: &str) -> Result<U256> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ClientError::Validation(format!("{field} is required")));
    }
    U256::from_str_radix(trimmed, 10).map_err(|_| {
        ClientError::Validation(format!(
            "{field} must be a non-negative integer: {trimmed}"
        ))
    })
}

pub(crate) fn require_distinct(token_a: Address, token_b: Address) -> Result<()> {
    if token_a == token_b {
        return Err(ClientError::Validation(
            "token A and token B must be different".to_string(),
        ));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_rejects_garbage() {
        assert!(matches!(
            parse_address("token A", ""),
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            parse_address("token A", "0x1234"),
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            parse_address("token A", "not-an-address"),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_address_case_insensitive() {
        let lower = parse_address("t", "0x8c7c15e95d4cbf07386973bcc596328e64886623").unwrap();
        let upper = parse_address("t", "0x8C7C15E95D4CBF07386973BCC596328E64886623").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("amount", " 100 ").unwrap(), U256::from(100u64));
        assert!(matches!(
            parse_amount("amount", ""),
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            parse_amount("amount", "-5"),
            Err(ClientError::Validation(_))
        ));
        assert!(matches!(
            parse_amount("amount", "12.5"),
            Err(ClientError::Validation(_))
        ));
        // Larger than uint256.
        let huge = "1".repeat(80);
        assert!(matches!(
            parse_amount("amount", &huge),
            Err(ClientError::Validation(_))
        ));
    }

    #[test]
    fn test_require_distinct() {
        let a = Address::repeat_byte(0x01);
        let b = Address::repeat_byte(0x02);
        assert!(require_distinct(a, b).is_ok());
        assert!(matches!(
            require_distinct(a, a),
            Err(ClientError::Validation(_))
        ));
    }
}
