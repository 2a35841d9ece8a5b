mod analysis;
mod config;
mod data;
mod loader;
mod output;
mod price;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::Parser;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use analysis::{analyze, diff, find_by_label, sequence};
use config::AppConfig;
use data::Threshold;
use loader::{load_quote, load_thresholds};
use output::{print_boss_detail, print_report, render_boss_json, render_json};
use price::{validate_price, Freshness, PriceCache};

fn main() -> Result<()> {
    let config = AppConfig::parse();
    init_tracing(config.verbose);
    run(&config)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(config: &AppConfig) -> Result<()> {
    let thresholds = load_thresholds(&config.thresholds_path).with_context(|| {
        format!(
            "failed to load thresholds from {:?}",
            config.thresholds_path
        )
    })?;
    info!(count = thresholds.len(), "threshold ladder loaded");

    if let Some(name) = &config.boss {
        return show_boss(config, &thresholds, name);
    }

    let current_price = resolve_price(config)?;
    let state = analyze(current_price, &thresholds);
    debug!(
        cleared = state.cleared_count,
        total = state.total_count,
        progress = state.progress,
        status = state.status.as_str(),
        "battle state analyzed"
    );

    let events = match config.previous_price {
        Some(previous) => {
            let previous = validate_price(previous).context("invalid --previous-price")?;
            let earlier = analyze(previous, &thresholds);
            let events = diff(&earlier, &state, &thresholds);
            info!(count = events.len(), previous, "compared against earlier price");
            events
        }
        None => Vec::new(),
    };

    if config.json {
        println!("{}", render_json(&state, &events)?);
    } else {
        print_report(&state, &thresholds, &events);
    }

    Ok(())
}

fn show_boss(config: &AppConfig, thresholds: &[Threshold], name: &str) -> Result<()> {
    let ladder = sequence(thresholds);
    let boss = find_by_label(&ladder, name).with_context(|| format!("no boss named {name:?}"))?;
    let rank = ladder
        .iter()
        .position(|threshold| std::ptr::eq(threshold, boss))
        .map_or(0, |idx| idx + 1);
    debug!(rank, value = boss.value, "boss found");

    let current_price = if config.price.is_some() || config.quote.is_some() {
        Some(resolve_price(config)?)
    } else {
        None
    };

    if config.json {
        println!("{}", render_boss_json(boss, rank, current_price)?);
    } else {
        print_boss_detail(boss, rank, current_price);
    }
    Ok(())
}

fn resolve_price(config: &AppConfig) -> Result<f64> {
    if let Some(price) = config.price {
        return validate_price(price).context("invalid --price");
    }

    let path = config
        .quote
        .as_ref()
        .context("either --price or --quote must be provided")?;
    let quote = load_quote(path)?;
    let mut cache = PriceCache::new(Duration::seconds(config.max_quote_age));
    cache
        .store(quote)
        .with_context(|| format!("rejected price quote from {:?}", path))?;

    let (quote, freshness) = cache.resolve(Utc::now())?;
    if freshness == Freshness::Stale {
        warn!(
            source = %quote.source,
            fetched_at = %quote.fetched_at,
            "price quote is stale; using last known value"
        );
    }
    info!(price = quote.price_usd, source = %quote.source, "using quoted price");
    Ok(quote.price_usd)
}
