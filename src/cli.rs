use clap::{Args, Parser, Subcommand};
use gpw_analyst_core::{SortDirection, SortKey};

use crate::constants::{
    BASE_URL_ENV, DEFAULT_BASE_URL, PREDICTION_DELAY_MS, REQUEST_TIMEOUT_SECS,
    WATCH_INTERVAL_SECS,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Progressive stock dashboard client")]
pub struct Cli {
    /// Emit debug-level log events on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn command(self) -> Command {
        self.command
            .unwrap_or_else(|| Command::Table(TableArgs::default()))
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load baseline data and forecasts once, then print the table
    Table(TableArgs),
    /// Reload and reprint the table on an interval until interrupted
    Watch(WatchArgs),
    /// Print every metric and the quality breakdown for one ticker
    Inspect(InspectArgs),
}

#[derive(Debug, Args, Clone, PartialEq, Eq)]
pub struct ConnectionArgs {
    /// Base URL of the market data API
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Pause between two prediction requests, in milliseconds
    #[arg(long, default_value_t = PREDICTION_DELAY_MS)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl Default for ConnectionArgs {
    fn default() -> Self {
        Self {
            base_url: std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            delay_ms: PREDICTION_DELAY_MS,
            timeout_secs: REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Args, Clone, Default, PartialEq, Eq)]
pub struct ViewArgs {
    /// Keep rows whose name, ticker or sector contains this text
    #[arg(short, long)]
    pub search: Option<String>,

    /// Column to order by (e.g. quality_score, trend_pct, market_cap)
    #[arg(long, value_name = "KEY")]
    pub sort: Option<SortKey>,

    /// Sort direction: asc or desc
    #[arg(long, default_value_t = SortDirection::Desc)]
    pub direction: SortDirection,

    /// Print rows as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl ViewArgs {
    pub fn search_term(&self) -> &str {
        self.search.as_deref().unwrap_or_default()
    }

    pub fn sort(&self) -> Option<(SortKey, SortDirection)> {
        self.sort.map(|key| (key, self.direction))
    }
}

#[derive(Debug, Args, Clone, Default, PartialEq, Eq)]
pub struct TableArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub view: ViewArgs,
}

#[derive(Debug, Args, Clone, PartialEq, Eq)]
pub struct WatchArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub view: ViewArgs,

    /// Seconds between the end of one cycle and the start of the next
    #[arg(long, default_value_t = WATCH_INTERVAL_SECS)]
    pub interval_secs: u64,
}

#[derive(Debug, Args, Clone, PartialEq, Eq)]
pub struct InspectArgs {
    /// Ticker to inspect (e.g. PKO.WA)
    pub ticker: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}
