//! Layered server configuration.
//!
//! Sources in precedence order, later ones win:
//! 1. built-in defaults
//! 2. YAML file given with `--config`
//! 3. environment variables `CMS__SECTION__KEY`
//! 4. command line overrides

use std::net::SocketAddr;
use std::path::Path;

use anyhow::{Context, Result};
use cms::config::CmsConfig;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "CMS__";

/// DSN used by `--mock` and by default.
pub const MEMORY_DSN: &str = "sqlite::memory:";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub bind_addr: SocketAddr,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8087)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: MEMORY_DSN.to_owned(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerSection,
    pub database: DatabaseSection,
    pub logging: LoggingSection,
    pub cms: CmsConfig,
}

/// Command line values that override every other source.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub mock: bool,
    pub verbose: u8,
}

impl AppConfig {
    /// Merge defaults, the optional YAML file and the environment.
    ///
    /// # Errors
    /// Returns an error if the file is missing or any source fails to deserialize.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
        if let Some(path) = path {
            if !path.is_file() {
                anyhow::bail!("config file does not exist: {}", path.display());
            }
            figment = figment.merge(Yaml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        figment
            .extract()
            .context("failed to load configuration")
    }

    pub fn apply_cli_overrides(&mut self, cli: CliOverrides) {
        if let Some(port) = cli.port {
            self.server.bind_addr.set_port(port);
        }
        if cli.mock {
            MEMORY_DSN.clone_into(&mut self.database.url);
        }
        match cli.verbose {
            0 => {}
            1 => "info".clone_into(&mut self.logging.level),
            2 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }
    }

    /// Effective configuration rendered as YAML.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("failed to render configuration")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.server.bind_addr.port(), 8087);
        assert_eq!(config.database.url, MEMORY_DSN);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.cms.default_page_size, 25);
    }

    #[test]
    fn test_yaml_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  bind_addr: \"0.0.0.0:9000\"\ncms:\n  docs_cache_ttl: \"10m\"\n  docs_title: \"Blog\""
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.bind_addr.port(), 9000);
        assert_eq!(config.cms.docs_cache_ttl, Duration::from_secs(600));
        assert_eq!(config.cms.docs_title, "Blog");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/definitely/not/here.yaml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_cli_overrides_win() {
        let mut config = AppConfig::default();
        config.database.url = "sqlite://cms.db".to_owned();
        config.apply_cli_overrides(CliOverrides {
            port: Some(1234),
            mock: true,
            verbose: 2,
        });
        assert_eq!(config.server.bind_addr.port(), 1234);
        assert_eq!(config.database.url, MEMORY_DSN);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_yaml_dump_round_trips_through_loader() {
        let yaml = AppConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("bind_addr"));
        assert!(yaml.contains("docs_cache_ttl: 1h"));
    }
}
