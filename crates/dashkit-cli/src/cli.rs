//! CLI argument definitions for dashkit.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `stocks` | List, filter, sort and show catalog stocks |
//! | `quote` | Single quote card (remembers the last symbol) |
//! | `weather` | Current conditions and five-day forecast |
//! | `movie` | Movie lookup |
//! | `todo` | Persisted to-do list |
//! | `search` | Typed search over the offline documents |
//! | `voice` | Transcript-driven search (stdin lines are interim transcripts) |
//! | `player` | Interactive music queue |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--offline` | `false` | Disable every live provider |
//! | `--data-dir` | platform data dir | Persistence directory |
//! | `--timeout-ms` | `5000` | HTTP timeout in ms |
//! | `--verbose` | `false` | Debug logging on stderr |

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dashkit_core::SortOrder;

/// Personal dashboard widgets in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "dashkit",
    author,
    version,
    about = "Personal dashboard widgets in the terminal",
    long_about = "dashkit bundles a stock dashboard, quote card, weather, movie finder, \
to-do list, document search and music queue.\n\
\n\
Live data comes from Alpha Vantage, Nominatim, Open-Meteo and OMDb. Stock widgets \
fall back to bundled sample data when the live source is unavailable.\n\
\n\
Use 'dashkit <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Never call live providers.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    /// Directory for persisted widget state.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Request timeout in milliseconds.
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// Log debug output to stderr.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Widget region as text.
    Table,
    /// Single JSON envelope.
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stock catalog and price chart.
    ///
    /// # Examples
    ///
    ///   dashkit stocks list --filter inc --sort price-desc
    ///   dashkit stocks show AAPL --chart
    #[command(subcommand)]
    Stocks(StocksCommand),

    /// Single quote card. Without a symbol, shows the last saved quote.
    ///
    /// # Examples
    ///
    ///   dashkit quote MSFT
    ///   dashkit quote
    Quote(QuoteArgs),

    /// Weather for a city.
    ///
    /// # Examples
    ///
    ///   dashkit weather Paris
    ///   dashkit weather "New York" --watch
    Weather(WeatherArgs),

    /// Look up a movie by title.
    Movie(MovieArgs),

    /// Persisted to-do list.
    #[command(subcommand)]
    Todo(TodoCommand),

    /// Search the offline documents.
    Search(SearchArgs),

    /// Search by transcript: each stdin line replaces the transcript, EOF ends.
    Voice,

    /// Interactive music queue (play, pause, next, prev, seek, vol, mute, quit).
    Player,
}

#[derive(Debug, Subcommand)]
pub enum StocksCommand {
    /// List catalog stocks.
    List(StocksListArgs),
    /// Select one stock.
    Show(StocksShowArgs),
}

#[derive(Debug, Args)]
pub struct StocksListArgs {
    /// Case-insensitive match on symbol or name.
    #[arg(long)]
    pub filter: Option<String>,

    /// Sort order (price-asc, price-desc, change-desc).
    #[arg(long)]
    pub sort: Option<SortOrder>,
}

#[derive(Debug, Args)]
pub struct StocksShowArgs {
    /// Catalog symbol (e.g., AAPL).
    pub symbol: String,

    /// Draw the close history.
    #[arg(long, default_value_t = false)]
    pub chart: bool,
}

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Market symbol (e.g., AAPL, MSFT).
    pub symbol: Option<String>,
}

#[derive(Debug, Args)]
pub struct WeatherArgs {
    /// City name.
    pub city: String,

    /// Keep running and print each refresh until interrupted.
    #[arg(long, default_value_t = false)]
    pub watch: bool,
}

#[derive(Debug, Args)]
pub struct MovieArgs {
    /// Movie title.
    pub title: String,
}

#[derive(Debug, Subcommand)]
pub enum TodoCommand {
    /// Show every item.
    List,
    /// Add an item.
    Add {
        /// Item text.
        text: String,
    },
    /// Flip an item between open and done.
    Toggle {
        /// Item id or a unique prefix of it.
        id: String,
    },
    /// Delete an item.
    Remove {
        /// Item id or a unique prefix of it.
        id: String,
    },
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Free-form search text.
    pub query: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dashkit", "stocks", "list", "--sort", "price-desc", "--format", "json", "--offline",
        ])
        .expect("parse");

        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.offline);
        match cli.command {
            Command::Stocks(StocksCommand::List(args)) => {
                assert_eq!(args.sort, Some(SortOrder::PriceDesc));
                assert_eq!(args.filter, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_sort_order() {
        let result = Cli::try_parse_from(["dashkit", "stocks", "list", "--sort", "name"]);
        assert!(result.is_err());
    }

    #[test]
    fn quote_symbol_is_optional() {
        let cli = Cli::try_parse_from(["dashkit", "quote"]).expect("parse");
        assert!(matches!(cli.command, Command::Quote(QuoteArgs { symbol: None })));
    }
}
