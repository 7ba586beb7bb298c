//! CLI command implementations for appseed.
//!
//! Available commands:
//! - **serve**: Serve the appseed document tree over HTTP
//! - **init**: Write a default `.appseed.toml`
//!
//! The remaining subcommands are one-liners handled directly in `main`.

pub mod init;
pub mod serve;

pub use init::{init_config, init_config_in};
pub use serve::{handle_serve, resolve_serve_config, ServeOverrides};
