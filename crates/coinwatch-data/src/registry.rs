//! Canonical asset registry merged from two listing sources.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// One candidate row from a listing source, already normalized by the
/// source's adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    pub symbol: String,
    pub canonical_id: String,
    pub display_name: String,
    pub rank: Option<u32>,
}

impl ListingRecord {
    pub fn new(
        symbol: impl Into<String>,
        canonical_id: impl Into<String>,
        display_name: impl Into<String>,
        rank: Option<u32>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            canonical_id: canonical_id.into(),
            display_name: display_name.into(),
            rank,
        }
    }
}

/// A registered asset. Symbol is uppercased and unique within the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinRecord {
    pub symbol: String,
    pub canonical_id: String,
    pub display_name: String,
    pub rank: Option<u32>,
}

/// The known-asset universe, keyed by uppercased symbol.
///
/// Rebuilt wholesale on each discovery cycle. The map is published as an
/// `Arc` snapshot behind an `RwLock`: readers take the current snapshot and
/// a rebuild swaps in a complete replacement, so a partially-built mapping
/// is never observable.
#[derive(Debug, Default)]
pub struct CoinRegistry {
    map: RwLock<Arc<HashMap<String, CoinRecord>>>,
}

impl CoinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the registry contents from the two listing sources.
    ///
    /// Every candidate is keyed by uppercased symbol. A symbol present in
    /// both sources keeps the primary record outright (no field merge);
    /// symbols only the secondary source knows are added as-is. Within one
    /// source the first occurrence of a symbol wins.
    pub fn rebuild(&self, primary: Vec<ListingRecord>, secondary: Vec<ListingRecord>) {
        let mut map = HashMap::with_capacity(primary.len() + secondary.len());

        for record in primary {
            let symbol = record.symbol.to_uppercase();
            map.entry(symbol.clone()).or_insert(CoinRecord {
                symbol,
                canonical_id: record.canonical_id,
                display_name: record.display_name,
                rank: record.rank,
            });
        }

        for record in secondary {
            let symbol = record.symbol.to_uppercase();
            map.entry(symbol.clone()).or_insert(CoinRecord {
                symbol,
                canonical_id: record.canonical_id,
                display_name: record.display_name,
                rank: record.rank,
            });
        }

        let count = map.len();
        *self.write_lock() = Arc::new(map);
        tracing::info!(assets = count, "coin registry rebuilt");
    }

    /// Look up an asset by symbol (case-insensitive).
    pub fn lookup(&self, symbol: &str) -> Option<CoinRecord> {
        self.snapshot().get(&symbol.to_uppercase()).cloned()
    }

    pub fn is_known(&self, symbol: &str) -> bool {
        self.snapshot().contains_key(&symbol.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Case-insensitive substring search over symbol and display name,
    /// best-ranked results first (unranked assets last, then by symbol).
    pub fn search(&self, query: &str) -> Vec<CoinRecord> {
        let needle = query.to_lowercase();
        let snapshot = self.snapshot();

        let mut results: Vec<CoinRecord> = snapshot
            .values()
            .filter(|r| {
                r.symbol.to_lowercase().contains(&needle)
                    || r.display_name.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect();

        results.sort_by(|a, b| match (a.rank, b.rank) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.symbol.cmp(&b.symbol),
        });
        results
    }

    /// Current complete mapping.
    pub fn snapshot(&self) -> Arc<HashMap<String, CoinRecord>> {
        Arc::clone(&self.map.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, Arc<HashMap<String, CoinRecord>>> {
        self.map.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(symbol: &str, id: &str, name: &str, rank: Option<u32>) -> ListingRecord {
        ListingRecord::new(symbol, id, name, rank)
    }

    #[test]
    fn test_primary_wins_on_collision() {
        let registry = CoinRegistry::new();
        registry.rebuild(
            vec![listing("btc", "btc-primary", "Bitcoin", Some(1))],
            vec![listing("BTC", "bitcoin", "Bitcoin (alt)", None)],
        );

        let record = registry.lookup("btc").unwrap();
        assert_eq!(record.canonical_id, "btc-primary");
        assert_eq!(record.display_name, "Bitcoin");
        assert_eq!(record.rank, Some(1));
    }

    #[test]
    fn test_secondary_only_symbols_added_unchanged() {
        let registry = CoinRegistry::new();
        registry.rebuild(
            vec![listing("BTC", "btc-primary", "Bitcoin", Some(1))],
            vec![listing("pepe", "pepe-coin", "Pepe", None)],
        );

        assert_eq!(registry.len(), 2);
        let record = registry.lookup("PEPE").unwrap();
        assert_eq!(record.canonical_id, "pepe-coin");
        assert_eq!(record.symbol, "PEPE");
        assert_eq!(record.rank, None);
    }

    #[test]
    fn test_rebuild_replaces_wholesale() {
        let registry = CoinRegistry::new();
        registry.rebuild(vec![listing("OLD", "old", "Old Coin", None)], vec![]);
        assert!(registry.is_known("OLD"));

        registry.rebuild(vec![listing("NEW", "new", "New Coin", None)], vec![]);
        assert!(!registry.is_known("OLD"));
        assert!(registry.is_known("new"));
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let registry = CoinRegistry::new();
        let primary = vec![listing("BTC", "bitcoin", "Bitcoin", Some(1))];
        let secondary = vec![listing("ETH", "ethereum", "Ethereum", None)];

        registry.rebuild(primary.clone(), secondary.clone());
        let first = registry.snapshot();
        registry.rebuild(primary, secondary);
        let second = registry.snapshot();

        assert_eq!(first.len(), second.len());
        assert_eq!(
            first.get("BTC").map(|r| &r.canonical_id),
            second.get("BTC").map(|r| &r.canonical_id)
        );
    }

    #[test]
    fn test_snapshot_survives_rebuild() {
        let registry = CoinRegistry::new();
        registry.rebuild(vec![listing("BTC", "bitcoin", "Bitcoin", Some(1))], vec![]);

        let held = registry.snapshot();
        registry.rebuild(vec![listing("ETH", "ethereum", "Ethereum", None)], vec![]);

        // The old snapshot is still complete and untouched.
        assert!(held.contains_key("BTC"));
        assert!(!held.contains_key("ETH"));
        assert!(registry.is_known("ETH"));
    }

    #[test]
    fn test_search_orders_by_rank() {
        let registry = CoinRegistry::new();
        registry.rebuild(
            vec![
                listing("ETH", "ethereum", "Ethereum", Some(2)),
                listing("BTC", "bitcoin", "Bitcoin", Some(1)),
                listing("ETC", "ethereum-classic", "Ethereum Classic", None),
            ],
            vec![],
        );

        let results = registry.search("ethereum");
        let symbols: Vec<&str> = results.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["ETH", "ETC"]);
    }
}
