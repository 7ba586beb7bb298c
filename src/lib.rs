// Export modules for library usage
pub mod appseed_error;
pub mod cli;
pub mod commands;
pub mod config;
pub mod humanize;
pub mod ident;
pub mod launch;
pub mod observability;
pub mod runtime;
pub mod server;
pub mod shape;

// Re-export commonly used types
pub use crate::appseed_error::{AppseedError, ErrorCode};
pub use crate::config::AppseedConfig;
pub use crate::shape::{shape_test, ArgKindSpec, ShapeConfig, ShapeOutcome, ShapeReport};
