use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::launch::FrameMode;

#[derive(Parser, Debug)]
#[command(name = "appseed")]
#[command(about = "Static appseed server and helpers for desktop runtime test suites", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log filter, e.g. `debug` or `appseed=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Configuration file (defaults to the nearest .appseed.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the appseed document tree over HTTP
    Serve {
        /// Address to bind (overrides HOST and the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides PORT and the config file)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory to serve
        #[arg(short, long)]
        root: Option<PathBuf>,
    },

    /// Initialize a new appseed configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Print fresh v4 UUIDs
    Uuid {
        /// How many to print
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },

    /// Build the bootstrap URL for a new test window
    LaunchUrl {
        /// Document to load (defaults to the app document under the configured origin)
        #[arg(long, conflicts_with = "empty")]
        url: Option<String>,

        /// Use the empty document instead of the app document
        #[arg(long)]
        empty: bool,

        /// Test name (defaults to the configured one)
        #[arg(long)]
        test_name: Option<String>,

        /// Script evaluated inside the main entry point
        #[arg(long)]
        code: Option<String>,

        /// Script evaluated outside the main entry point
        #[arg(long)]
        code_om: Option<String>,

        /// Treat --code and --code-om as full function text and ship only the body
        #[arg(long)]
        function: bool,

        /// Frame arrangement (with-iframe, with-cors-iframe, within-iframe, within-cors-iframe)
        #[arg(long)]
        frame: Option<FrameMode>,

        /// Response header for the served document, as NAME=VALUE
        #[arg(long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// Print the full window options as JSON instead of the URL
        #[arg(long)]
        json: bool,
    },

    /// Format milliseconds (or bytes) for humans
    Humanize {
        /// Milliseconds, or bytes with --bytes
        value: u64,

        /// Treat the value as a byte count
        #[arg(long)]
        bytes: bool,

        /// Use powers of 1000 for byte sizes
        #[arg(long, requires = "bytes")]
        si: bool,
    },
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
