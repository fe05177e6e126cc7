//! Command line interface for coinwatch.
//!
//! Thin wiring only: configuration → providers → registry → analysis, with
//! plain-text reports. All analysis logic lives in the library crates.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use coinwatch_config::Config;
use coinwatch_core::Interval;
use coinwatch_data::{CoinRegistry, ListingRecord, MarketData};
use coinwatch_forecast::{forecast_closes, ForecastError};
use coinwatch_indicators::enrich;
use coinwatch_providers::{BinanceMarket, CoinGecko, RateLimitConfig, RestClient};
use coinwatch_ta::{score, AggregateResult, Aggregator, Screener, ScreenerSettings};

#[derive(Parser)]
#[command(
    name = "coinwatch",
    version,
    about = "Multi-timeframe technical analysis and price forecasts for crypto assets"
)]
struct Cli {
    /// Path to a config file (defaults to the coinwatch.toml search path).
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score a symbol across the configured intervals.
    Analyze { symbol: String },
    /// Forecast the next closes for a symbol.
    Predict {
        symbol: String,
        /// Interval to forecast on.
        #[arg(long, default_value = "1d")]
        interval: Interval,
    },
    /// Screen the configured universe and analyze the best candidates.
    Discover,
    /// Search the asset registry by symbol or name.
    Search { query: String },
}

struct App {
    config: Config,
    primary: BinanceMarket,
    fallback: CoinGecko,
    registry: Arc<CoinRegistry>,
    aggregator: Aggregator,
}

impl App {
    fn build(config: Config) -> anyhow::Result<Self> {
        let timeout = Duration::from_secs(config.api.timeout_secs);

        let primary_client = RestClient::new(
            config.api.primary_url.clone(),
            timeout,
            &config.api.user_agent,
            RateLimitConfig {
                max_requests: config.limits.primary_requests,
                window: Duration::from_secs(config.limits.primary_window_secs),
                max_retries: 3,
            },
        )
        .context("building primary provider client")?;

        let fallback_client = RestClient::new(
            config.api.secondary_url.clone(),
            timeout,
            &config.api.user_agent,
            RateLimitConfig {
                max_requests: config.limits.secondary_requests,
                window: Duration::from_secs(config.limits.secondary_window_secs),
                max_retries: 3,
            },
        )
        .context("building fallback provider client")?;

        let primary = BinanceMarket::new(primary_client);
        let fallback = CoinGecko::new(fallback_client);
        let registry = Arc::new(CoinRegistry::new());

        let market = MarketData::new(
            primary.clone(),
            fallback.clone(),
            Arc::clone(&registry),
            config.api.quote_suffix.clone(),
            config.api.vs_currency.clone(),
        );

        let aggregator = Aggregator::new(
            market,
            config.analysis.intervals.clone(),
            config.analysis.bars,
        );

        Ok(Self {
            config,
            primary,
            fallback,
            registry,
            aggregator,
        })
    }

    /// Rebuild the registry from both listing sources.
    ///
    /// The id-bearing listing is authoritative (the fallback provider is
    /// addressed by those ids); the exchange's tradable symbols supplement
    /// it. Either source failing downgrades to a smaller registry with a
    /// warning — primary-provider fetches keep working regardless.
    async fn refresh_registry(&self) {
        let primary_listing: Vec<ListingRecord> = match self.fallback.coins_list().await {
            Ok(list) => list
                .into_iter()
                .map(|e| ListingRecord::new(e.symbol, e.id, e.name, None))
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "asset listing source unavailable");
                Vec::new()
            }
        };

        let quote = &self.config.api.quote_suffix;
        let secondary_listing: Vec<ListingRecord> = match self.primary.exchange_info().await {
            Ok(info) => info
                .symbols
                .into_iter()
                .filter(|s| &s.quote_asset == quote)
                .map(|s| {
                    let id = s.base_asset.to_lowercase();
                    ListingRecord::new(s.base_asset.clone(), id, s.base_asset, None)
                })
                .collect(),
            Err(e) => {
                tracing::warn!(error = %e, "exchange listing unavailable");
                Vec::new()
            }
        };

        self.registry.rebuild(primary_listing, secondary_listing);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            Config::load(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::load_default(),
    };

    let app = App::build(config)?;
    app.refresh_registry().await;

    match cli.command {
        Command::Analyze { symbol } => run_analyze(&app, &symbol).await,
        Command::Predict { symbol, interval } => run_predict(&app, &symbol, interval).await,
        Command::Discover => run_discover(&app).await,
        Command::Search { query } => run_search(&app, &query),
    }
}

async fn run_analyze(app: &App, symbol: &str) -> anyhow::Result<()> {
    let result = app.aggregator.analyze(symbol).await?;
    print_aggregate(&result);
    Ok(())
}

async fn run_predict(app: &App, symbol: &str, interval: Interval) -> anyhow::Result<()> {
    let series = app
        .aggregator
        .data()
        .fetch(symbol, interval, app.config.analysis.bars)
        .await?;

    let enriched = enrich(&series);
    println!(
        "{} ({} interval, {} bars{})",
        symbol.to_uppercase(),
        interval,
        series.len(),
        if series.is_close_only() {
            ", close-only fallback data"
        } else {
            ""
        }
    );

    match score(&enriched) {
        Ok(result) => {
            println!(
                "signals: trend {:?}, momentum {:?}, bands {:?}, breakout {:?} (score {:+})",
                result.labels.trend,
                result.labels.momentum,
                result.labels.volatility,
                result.labels.breakout,
                result.score
            );
        }
        Err(e) => println!("signals unavailable: {e}"),
    }

    match forecast_closes(&series, app.config.forecast.horizon) {
        Ok(forecast) => {
            println!("forecast (next {} periods):", forecast.horizon);
            for (i, point) in forecast.points.iter().enumerate() {
                println!("  period {}: {:.4}", i + 1, point);
            }
        }
        Err(e @ ForecastError::InsufficientHistory { .. }) => {
            println!("forecast unavailable: {e}");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

async fn run_discover(app: &App) -> anyhow::Result<()> {
    let settings = ScreenerSettings {
        interval: app.config.discovery.interval,
        bars: app.config.analysis.bars,
        macd_divergence: app.config.discovery.macd_divergence,
        score_cutoff: app.config.discovery.score_cutoff,
        top_n: app.config.discovery.top_n,
    };
    let screener = Screener::new(app.aggregator.clone(), settings);
    let report = screener.run(&app.config.discovery.universe).await;

    if report.ranked.is_empty() {
        println!("no promising candidates in the current universe");
    } else {
        println!("candidates (preliminary score):");
        for candidate in &report.ranked {
            println!("  {:<8} {}", candidate.symbol, candidate.score);
        }
        println!();
        for result in &report.results {
            print_aggregate(result);
            println!();
        }
    }

    if !report.unavailable.is_empty() {
        println!("unavailable: {}", report.unavailable.join(", "));
    }

    Ok(())
}

fn run_search(app: &App, query: &str) -> anyhow::Result<()> {
    let results = app.registry.search(query);
    if results.is_empty() {
        println!("no assets found for '{query}'");
        return Ok(());
    }

    for record in results.iter().take(10) {
        match record.rank {
            Some(rank) => println!("{:<8} {} (rank {})", record.symbol, record.display_name, rank),
            None => println!("{:<8} {}", record.symbol, record.display_name),
        }
    }
    if results.len() > 10 {
        println!("... and {} more", results.len() - 10);
    }

    Ok(())
}

fn print_aggregate(result: &AggregateResult) {
    println!(
        "{}: total score {:+} -> {}",
        result.symbol, result.total_score, result.recommendation
    );
    for interval_score in &result.per_interval {
        println!(
            "  {:<4} {:+}  trend {:?}, momentum {:?}, bands {:?}, breakout {:?}",
            interval_score.interval.as_str(),
            interval_score.score,
            interval_score.labels.trend,
            interval_score.labels.momentum,
            interval_score.labels.volatility,
            interval_score.labels.breakout,
        );
    }
    for skipped in &result.skipped {
        println!("  {:<4} skipped: {}", skipped.interval.as_str(), skipped.reason);
    }
}
