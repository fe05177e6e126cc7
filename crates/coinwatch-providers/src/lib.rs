//! REST clients for the coinwatch market data providers.
//!
//! Two public endpoints are wrapped here:
//! - a Binance-style kline endpoint (primary OHLCV source)
//! - a CoinGecko-style market-chart + coin-list endpoint (close-only
//!   fallback and supplementary asset listing)
//!
//! Both share the same `RestClient` plumbing: request throttling, uniform
//! status handling, and tagged errors. Nothing here interprets market data;
//! that lives in `coinwatch-data` and above.

pub mod binance;
pub mod client;
pub mod coingecko;
pub mod error;
pub mod rate_limit;

pub use binance::{BinanceMarket, ExchangeInfo, Kline, SymbolInfo, WireDecimal};
pub use client::RestClient;
pub use coingecko::{CoinGecko, CoinListEntry, MarketChart};
pub use error::{ProviderError, Result};
pub use rate_limit::{RateLimitConfig, RateLimiter};
