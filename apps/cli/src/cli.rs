use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show every watched symbol with its latest price and daily change.
    Watchlist {
        /// Print the skeleton rows before the fetched ones.
        #[arg(long)]
        placeholders: bool,
    },

    /// Add a symbol to the watchlist.
    Add {
        symbol: String,
        /// Company name shown next to the symbol.
        name: Vec<String>,
    },

    /// Remove a symbol from the watchlist.
    Remove { symbol: String },

    /// Show price chart data, metrics, and news for one symbol.
    Detail {
        symbol: String,
        /// Add the symbol to the watchlist after showing it.
        #[arg(long)]
        watch: bool,
    },

    /// Search for symbols by ticker or company name.
    Search { query: Vec<String> },

    /// Show top market stories, or company news with --symbol.
    News {
        #[arg(long)]
        symbol: Option<String>,
    },
}
