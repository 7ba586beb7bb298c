//! Configuration loaded from `.appseed.toml`.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 9070
//! root = "public"
//!
//! [shape]
//! grace_period_ms = 2000
//! # probe_timeout_ms = 10000
//!
//! [launch]
//! origin = "http://localhost:9070"
//! test_name = ""
//! ```

mod core;
mod loader;

pub use self::core::{AppseedConfig, LaunchSettings, ServerConfig, ShapeSettings};
pub use loader::{
    directory_ancestors, load_config, load_config_file, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};

/// Contents written by `appseed init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Appseed Configuration

[server]
host = "0.0.0.0"
port = 9070
root = "public"

[shape]
# Wait before passing a target that had no wrong-argument calls to check
grace_period_ms = 2000
# Fail a target that never answers its wrong-argument calls (unset waits forever)
# probe_timeout_ms = 10000

[launch]
origin = "http://localhost:9070"
test_name = ""
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_parses_to_defaults() {
        let config = parse_and_validate_config(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(config, AppseedConfig::default());
    }
}
