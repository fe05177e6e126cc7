//! Asset registry and market data retrieval for coinwatch.
//!
//! - `CoinRegistry` - known-asset universe merged from two listing sources
//! - `MarketData` - OHLCV retrieval with registry-addressed close-only
//!   fallback when the primary provider is unavailable

pub mod registry;
pub mod source;

pub use registry::{CoinRecord, CoinRegistry, ListingRecord};
pub use source::{DataUnavailable, MarketData, UnavailableReason};
