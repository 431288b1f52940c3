//! CLI interface for feed-dash
//!
//! Provides subcommands for:
//! - `serve`: Run the dashboard server and poll loop
//! - `fetch`: Run a single poll cycle and print the snapshot
//! - `config`: Show the effective configuration

mod fetch;
mod serve;

pub use fetch::FetchArgs;
pub use serve::ServeArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "feed-dash")]
#[command(about = "Live dashboard for seismic, weather and crypto feeds")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the dashboard server
    Serve(ServeArgs),
    /// Poll every feed once and print the snapshot
    Fetch(FetchArgs),
    /// Show the effective configuration
    Config,
}
