//! Command-line interface: runs the API server or queries a running one.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::{cmd_recent, cmd_search};

/// MedScan - medicine label lookup
#[derive(Parser)]
#[command(name = "medscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Look up a medicine on a running server
    #[command(alias = "s")]
    Search {
        /// Brand, generic or substance name
        #[arg(required = true)]
        name: Vec<String>,

        /// Base URL of the MedScan API
        #[arg(long, default_value = "http://localhost:5000")]
        server: String,
    },

    /// Show the last searches made from this machine
    #[command(alias = "r")]
    Recent,
}

/// Where the client remembers recent searches.
pub fn recent_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("medscan")
        .join("recent.json")
}
