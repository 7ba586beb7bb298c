use anyhow::Result;
use std::path::PathBuf;

use crate::config::AppseedConfig;
use crate::observability::{set_phase_persistent, RunPhase};
use crate::server;

/// Command-line overrides for `appseed serve`. Unset fields keep the
/// configured value.
#[derive(Debug, Clone, Default)]
pub struct ServeOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub root: Option<PathBuf>,
}

/// Layer environment and flag overrides on top of the loaded config.
/// Flags win over `PORT`/`HOST`, which win over the file.
pub fn resolve_serve_config(
    mut config: AppseedConfig,
    overrides: ServeOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<AppseedConfig> {
    config.apply_env_overrides(env)?;

    if let Some(host) = overrides.host {
        config.server.host = host;
    }
    if let Some(port) = overrides.port {
        config.server.port = port;
    }
    if let Some(root) = overrides.root {
        config.server.root = root;
    }

    config.validate()?;
    Ok(config)
}

pub async fn handle_serve(config: AppseedConfig, overrides: ServeOverrides) -> Result<()> {
    let config = resolve_serve_config(config, overrides, |key| std::env::var(key).ok())?;
    set_phase_persistent(RunPhase::Serving);
    server::serve(&config.server, server::shutdown_signal()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_win_over_env() {
        let config = resolve_serve_config(
            AppseedConfig::default(),
            ServeOverrides {
                port: Some(8000),
                ..ServeOverrides::default()
            },
            |key| match key {
                "PORT" => Some("3000".to_string()),
                "HOST" => Some("127.0.0.1".to_string()),
                _ => None,
            },
        )
        .unwrap();

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_hostname_from_env_is_kept_for_binding() {
        let config = resolve_serve_config(
            AppseedConfig::default(),
            ServeOverrides::default(),
            |key| (key == "HOST").then(|| "localhost".to_string()),
        )
        .unwrap();

        assert_eq!(config.server.bind_address(), "localhost:9070");
    }

    #[test]
    fn test_empty_host_flag_is_rejected() {
        let result = resolve_serve_config(
            AppseedConfig::default(),
            ServeOverrides {
                host: Some(String::new()),
                ..ServeOverrides::default()
            },
            |_| None,
        );
        assert!(result.is_err());
    }
}
