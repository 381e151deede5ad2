//! Pool Registry
//!
//! Single source of truth for which pools this client knows about. Two
//! parallel append-only sequences (pools and their token pairs) share
//! one index space; a pool's positional identifier `pool<index>` is
//! assigned at discovery and never reused or renumbered.
//!
//! The registry owns both sequences outright: every append goes through
//! [`PoolRegistry::register`], which keeps the pair of sequences in
//! lockstep and snapshots after each append.

mod store;

pub use store::{FileStore, KvStore, MemoryStore};

use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::types::{Pool, TokenPair};

/// Persistence keys for the two snapshot sequences.
const POOLS_KEY: &str = "pools";
const POOL_TOKENS_KEY: &str = "pool_tokens";

pub struct PoolRegistry<S: KvStore> {
    pools: Vec<Pool>,
    token_pairs: Vec<TokenPair>,
    store: S,
}

impl<S: KvStore> PoolRegistry<S> {
    /// Create a registry hydrated from `store`, if a parseable snapshot
    /// exists. A malformed snapshot leaves the registry empty: the data
    /// is a cache, not ledger truth, so recovery beats failing fast.
    pub fn load(store: S) -> Self {
        let mut registry = Self {
            pools: Vec::new(),
            token_pairs: Vec::new(),
            store,
        };
        registry.restore();
        registry
    }

    fn restore(&mut self) {
        let (Some(pools_raw), Some(tokens_raw)) =
            (self.store.get(POOLS_KEY), self.store.get(POOL_TOKENS_KEY))
        else {
            return;
        };

        let pools: Vec<Pool> = match serde_json::from_str(&pools_raw) {
            Ok(p) => p,
            Err(e) => {
                warn!("Failed to parse stored pools: {}", e);
                return;
            }
        };
        let token_pairs: Vec<TokenPair> = match serde_json::from_str(&tokens_raw) {
            Ok(t) => t,
            Err(e) => {
                warn!("Failed to parse stored pool tokens: {}", e);
                return;
            }
        };
        if pools.len() != token_pairs.len() {
            warn!(
                "Snapshot sequences out of step ({} pools, {} token pairs); starting empty",
                pools.len(),
                token_pairs.len()
            );
            return;
        }

        debug!("Restored {} pool(s) from snapshot", pools.len());
        self.pools = pools;
        self.token_pairs = token_pairs;
    }

    /// Append a pool and its token pair as one step and return the new
    /// identifier. Snapshots to the store before returning.
    pub fn register(&mut self, pool: Pool, token_pair: TokenPair) -> String {
        self.pools.push(pool);
        self.token_pairs.push(token_pair);
        self.snapshot();
        format!("pool{}", self.pools.len() - 1)
    }

    /// Resolve a `pool<index>` identifier to its entry.
    pub fn lookup(&self, pool_id: &str) -> Result<(&Pool, &TokenPair)> {
        let index = parse_pool_id(pool_id)?;
        match (self.pools.get(index), self.token_pairs.get(index)) {
            (Some(pool), Some(pair)) => Ok((pool, pair)),
            _ => Err(ClientError::NotFound(pool_id.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    /// All entries with their identifiers, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = (String, &Pool, &TokenPair)> {
        self.pools
            .iter()
            .zip(&self.token_pairs)
            .enumerate()
            .map(|(idx, (pool, pair))| (format!("pool{idx}"), pool, pair))
    }

    fn snapshot(&mut self) {
        // Both sequences were just appended together, so serialization
        // can't fail for length reasons; address serde is infallible.
        match (
            serde_json::to_string(&self.pools),
            serde_json::to_string(&self.token_pairs),
        ) {
            (Ok(pools), Ok(tokens)) => {
                self.store.set(POOLS_KEY, &pools);
                self.store.set(POOL_TOKENS_KEY, &tokens);
            }
            (Err(e), _) | (_, Err(e)) => warn!("Failed to serialize snapshot: {}", e),
        }
    }
}

/// Parse the literal prefix `pool` plus a non-negative integer index.
fn parse_pool_id(pool_id: &str) -> Result<usize> {
    let suffix = pool_id
        .strip_prefix("pool")
        .ok_or_else(|| ClientError::InvalidIdentifier(pool_id.to_string()))?;
    suffix
        .parse::<usize>()
        .map_err(|_| ClientError::InvalidIdentifier(pool_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    fn sample_pool(byte: u8) -> (Pool, TokenPair) {
        let pool = Pool {
            address: alloy::primitives::Address::repeat_byte(byte),
            creator: address!("00A329c0648769A73afAc7F9381E08FB43dBEA72"),
        };
        let pair = TokenPair::new(
            address!("8C7c15E95D4cbF07386973Bcc596328e64886623"),
            address!("92572C68e39E19cE505C1CA3E46190bb8C3a53a8"),
        );
        (pool, pair)
    }

    #[test]
    fn test_register_assigns_sequential_ids() {
        let mut registry = PoolRegistry::load(MemoryStore::new());
        let (pool, pair) = sample_pool(0x01);
        assert_eq!(registry.register(pool.clone(), pair.clone()), "pool0");
        assert_eq!(registry.register(pool.clone(), pair.clone()), "pool1");
        assert_eq!(registry.register(pool, pair), "pool2");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_lookup_positional() {
        let mut registry = PoolRegistry::load(MemoryStore::new());
        for byte in [0x01, 0x02, 0x03, 0x04] {
            let (pool, pair) = sample_pool(byte);
            registry.register(pool, pair);
        }
        let (pool, _) = registry.lookup("pool3").unwrap();
        assert_eq!(pool.address, alloy::primitives::Address::repeat_byte(0x04));
    }

    #[test]
    fn test_lookup_out_of_bounds() {
        let mut registry = PoolRegistry::load(MemoryStore::new());
        let (pool, pair) = sample_pool(0x01);
        registry.register(pool.clone(), pair.clone());
        registry.register(pool, pair);

        let err = registry.lookup("pool3").unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[test]
    fn test_lookup_malformed_identifier() {
        let registry = PoolRegistry::load(MemoryStore::new());
        for bad in ["poolX", "pool", "pool-1", "3", "Pool0", ""] {
            let err = registry.lookup(bad).unwrap_err();
            assert!(
                matches!(err, ClientError::InvalidIdentifier(_)),
                "expected InvalidIdentifier for {bad:?}"
            );
        }
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut store = MemoryStore::new();
        {
            let mut registry = PoolRegistry::load(std::mem::take(&mut store));
            let (pool, pair) = sample_pool(0xAB);
            registry.register(pool, pair);
            store = registry.store;
        }

        let restored = PoolRegistry::load(store);
        assert_eq!(restored.len(), 1);
        let (pool, pair) = restored.lookup("pool0").unwrap();
        let (expected_pool, expected_pair) = sample_pool(0xAB);
        assert_eq!(pool, &expected_pool);
        assert_eq!(pair, &expected_pair);
    }

    #[test]
    fn test_restore_malformed_snapshot_is_empty() {
        let mut store = MemoryStore::new();
        store.set("pools", "not json at all");
        store.set("pool_tokens", "[]");

        let registry = PoolRegistry::load(store);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_restore_out_of_step_sequences_is_empty() {
        let mut seeded = PoolRegistry::load(MemoryStore::new());
        let (pool, pair) = sample_pool(0x01);
        seeded.register(pool, pair);
        let mut store = seeded.store;
        // Corrupt one sequence only.
        store.set("pool_tokens", "[]");

        let registry = PoolRegistry::load(store);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_entries_ordered() {
        let mut registry = PoolRegistry::load(MemoryStore::new());
        for byte in [0x01, 0x02] {
            let (pool, pair) = sample_pool(byte);
            registry.register(pool, pair);
        }
        let ids: Vec<String> = registry.entries().map(|(id, _, _)| id).collect();
        assert_eq!(ids, ["pool0", "pool1"]);
    }
}
