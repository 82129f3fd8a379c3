//! CLI argument definitions for quotewatch.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `quote` | Latest quote with nearest-the-money implied volatility |
//! | `history` | Last 30 daily bars |
//! | `balance-sheet` | Last four annual balance sheets |
//! | `income-statement` | Last four annual income statements |
//! | `watch` | Live dashboard refreshed on an interval |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--timeout-ms` | `5000` | Per-request timeout in ms |
//!
//! # Examples
//!
//! ```bash
//! quotewatch quote AAPL
//! quotewatch history TSLA --chronological --format json --pretty
//! QUOTEWATCH_API_KEY=... quotewatch watch TSLA GME INTC AAPL
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Alpha Vantage stock dashboard for the terminal.
///
/// The API key is read from QUOTEWATCH_API_KEY (default: the public `demo`
/// key, which only answers for a handful of symbols).
#[derive(Debug, Parser)]
#[command(name = "quotewatch", author, version, about = "Alpha Vantage stock dashboard")]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Per-request timeout in milliseconds. Overrides the configured value.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text for terminal display.
    Table,
    /// Single JSON document.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the latest quote for a symbol.
    ///
    ///   quotewatch quote AAPL
    Quote(SymbolArgs),

    /// Fetch the last 30 daily bars, newest first.
    ///
    ///   quotewatch history TSLA
    ///   quotewatch history TSLA --chronological
    History(HistoryArgs),

    /// Fetch the last four annual balance sheets.
    BalanceSheet(SymbolArgs),

    /// Fetch the last four annual income statements.
    IncomeStatement(SymbolArgs),

    /// Track a watch-list, re-rendering whenever the dashboard settles.
    ///
    /// Symbols load one per second; quotes refresh on an interval until
    /// interrupted with Ctrl-C.
    ///
    ///   quotewatch watch
    ///   quotewatch watch NVDA AMD --refresh-secs 120
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
pub struct SymbolArgs {
    /// Ticker symbol (e.g., AAPL).
    pub symbol: String,
}

#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Ticker symbol (e.g., AAPL).
    pub symbol: String,

    /// Print oldest first instead of newest first.
    #[arg(long, default_value_t = false)]
    pub chronological: bool,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Symbols to track. Defaults to TSLA GME INTC AAPL.
    pub symbols: Vec<String>,

    /// Seconds between quote refreshes.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub refresh_secs: Option<u64>,
}
