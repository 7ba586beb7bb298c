use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::appseed_error::AppseedError;
use crate::shape::ShapeConfig;

/// Root configuration structure for appseed
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppseedConfig {
    /// Static server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Shape-test harness timing
    #[serde(default)]
    pub shape: ShapeSettings,

    /// Defaults for bootstrap URLs of new windows and apps
    #[serde(default)]
    pub launch: LaunchSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served unmodified
    #[serde(default = "default_root")]
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            root: default_root(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    9070
}

fn default_root() -> PathBuf {
    PathBuf::from("public")
}

impl ServerConfig {
    /// `host:port` as handed to the listener. Hostnames are resolved at bind
    /// time; bare IPv6 literals get brackets.
    pub fn bind_address(&self) -> String {
        let host = self.host.trim();
        if host.contains(':') && !host.starts_with('[') {
            format!("[{}]:{}", host, self.port)
        } else {
            format!("{}:{}", host, self.port)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShapeSettings {
    #[serde(default = "default_grace_period_ms")]
    pub grace_period_ms: u64,

    /// Unset keeps waiting on a target that never answers.
    #[serde(default)]
    pub probe_timeout_ms: Option<u64>,
}

impl Default for ShapeSettings {
    fn default() -> Self {
        Self {
            grace_period_ms: default_grace_period_ms(),
            probe_timeout_ms: None,
        }
    }
}

fn default_grace_period_ms() -> u64 {
    2000
}

impl ShapeSettings {
    #[must_use]
    pub fn to_shape_config(&self) -> ShapeConfig {
        ShapeConfig {
            grace_period: Duration::from_millis(self.grace_period_ms),
            probe_timeout: self.probe_timeout_ms.map(Duration::from_millis),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LaunchSettings {
    /// Origin the appseed is served from
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Value of the `testName` parameter added to every bootstrap URL
    #[serde(default)]
    pub test_name: String,
}

impl Default for LaunchSettings {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            test_name: String::new(),
        }
    }
}

fn default_origin() -> String {
    "http://localhost:9070".to_string()
}

impl AppseedConfig {
    /// Check invariants serde cannot express. Collects every problem.
    pub fn validate(&self) -> Result<(), AppseedError> {
        let mut errors = Vec::new();

        if self.server.host.trim().is_empty() {
            errors.push("server.host must not be empty".to_string());
        }
        if self.server.root.as_os_str().is_empty() {
            errors.push("server.root must not be empty".to_string());
        }
        if self.shape.probe_timeout_ms == Some(0) {
            errors.push("shape.probe_timeout_ms must be greater than zero".to_string());
        }
        let origin = &self.launch.origin;
        if !(origin.starts_with("http://") || origin.starts_with("https://")) {
            errors.push(format!(
                "launch.origin must start with http:// or https:// (got '{}')",
                self.launch.origin
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppseedError::validations(errors))
        }
    }

    /// Apply `PORT` and `HOST` overrides. `lookup` is `std::env::var` in
    /// production and a map in tests.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), AppseedError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                AppseedError::config_with_field(
                    format!("PORT '{}' is not a valid port", port),
                    "server.port",
                )
            })?;
        }
        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            self.server.host = host;
        }
        Ok(())
    }
}
