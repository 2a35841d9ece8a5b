use std::path::PathBuf;

use clap::{ArgGroup, Parser};

/// Upper bound for `--max-quote-age`: one day.
pub const MAX_QUOTE_AGE_SECS: i64 = 86_400;

/// Command-line configuration for the boss ladder tracker.
#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
#[command(group(ArgGroup::new("price_source").args(["price", "quote"])))]
pub struct AppConfig {
    /// Threshold list: JSON array of {date, high, name?, image?, tier?, lore?}, or CSV (date,high[,name[,tier]]).
    #[arg(short = 't', long = "thresholds", value_name = "FILE")]
    pub thresholds_path: PathBuf,

    /// Current price.
    #[arg(short = 'p', long, allow_negative_numbers = true)]
    pub price: Option<f64>,

    /// JSON price quote file ({"priceUsd", "source", "ts"}).
    #[arg(short = 'q', long, value_name = "FILE")]
    pub quote: Option<PathBuf>,

    /// Seconds a quote stays fresh; older quotes are still used with a warning.
    #[arg(
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(i64).range(0..=MAX_QUOTE_AGE_SECS)
    )]
    pub max_quote_age: i64,

    /// Earlier price to diff against for cleared/switched events.
    #[arg(long, allow_negative_numbers = true)]
    pub previous_price: Option<f64>,

    /// Show a single boss by name (case-insensitive) instead of the full ladder.
    #[arg(short = 'b', long, value_name = "NAME")]
    pub boss: Option<String>,

    /// Emit the snapshot as JSON instead of the table report.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable debug logging (RUST_LOG takes precedence when set).
    #[arg(short = 'v', long, default_value_t = false)]
    pub verbose: bool,
}
