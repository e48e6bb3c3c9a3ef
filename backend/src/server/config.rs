//! Service settings loaded via OrthoConfig and the server configuration
//! derived from them.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use babygen::domain::watermark::DEFAULT_FONT_PATH;
use babygen::outbound::media::DEFAULT_FETCH_TIMEOUT;
use babygen::outbound::persistence::DbPool;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TRUSTED_HOSTS: &str = "storage.googleapis.com";
const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(180);

/// Settings merged from CLI arguments, `BABYGEN_*` environment variables and
/// configuration files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BABYGEN")]
pub struct BabygenSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// URL of the image-generation capability.
    pub generation_endpoint: Option<String>,
    /// Bearer token sent to the generation capability.
    pub generation_api_key: Option<String>,
    /// Comma-separated media hosts trusted for download.
    pub trusted_media_hosts: Option<String>,
    /// Media fetch timeout in seconds.
    pub fetch_timeout_secs: Option<u64>,
    /// Generation request timeout in seconds.
    pub generation_timeout_secs: Option<u64>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// TrueType font used for watermarks.
    pub font_path: Option<PathBuf>,
}

/// Invalid or missing settings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was not supplied.
    #[error("missing required setting {name}")]
    Missing {
        /// Environment variable name.
        name: &'static str,
    },
    /// A setting could not be parsed.
    #[error("invalid {name}: {message}")]
    Invalid {
        /// Environment variable name.
        name: &'static str,
        /// Parser message.
        message: String,
    },
}

impl BabygenSettings {
    /// Listen address, defaulting to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::Invalid {
                name: "BABYGEN_BIND_ADDR",
                message: err.to_string(),
            })
    }

    /// Generation capability URL. Required.
    pub fn generation_endpoint(&self) -> Result<Url, ConfigError> {
        let raw = self
            .generation_endpoint
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or(ConfigError::Missing {
                name: "BABYGEN_GENERATION_ENDPOINT",
            })?;
        Url::parse(raw).map_err(|err| ConfigError::Invalid {
            name: "BABYGEN_GENERATION_ENDPOINT",
            message: err.to_string(),
        })
    }

    /// Trusted media hosts, defaulting to `storage.googleapis.com`.
    pub fn trusted_media_hosts(&self) -> Vec<String> {
        self.trusted_media_hosts
            .as_deref()
            .unwrap_or(DEFAULT_TRUSTED_HOSTS)
            .split(',')
            .map(str::trim)
            .filter(|host| !host.is_empty())
            .map(str::to_ascii_lowercase)
            .collect()
    }

    /// Media fetch timeout, defaulting to 30 seconds.
    pub fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout_secs
            .map_or(DEFAULT_FETCH_TIMEOUT, Duration::from_secs)
    }

    /// Generation timeout, defaulting to 180 seconds.
    pub fn generation_timeout(&self) -> Duration {
        self.generation_timeout_secs
            .map_or(DEFAULT_GENERATION_TIMEOUT, Duration::from_secs)
    }

    /// Database URL, if one is configured.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Watermark font path.
    pub fn font_path(&self) -> PathBuf {
        self.font_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FONT_PATH))
    }
}

/// Resolved configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) generation_endpoint: Url,
    pub(crate) generation_api_key: Option<String>,
    pub(crate) trusted_hosts: Vec<String>,
    pub(crate) fetch_timeout: Duration,
    pub(crate) generation_timeout: Duration,
    pub(crate) font_path: PathBuf,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Resolve settings into a server configuration without a database pool.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required setting is missing or invalid.
    pub fn from_settings(settings: &BabygenSettings) -> Result<Self, ConfigError> {
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            generation_endpoint: settings.generation_endpoint()?,
            generation_api_key: settings.generation_api_key.clone(),
            trusted_hosts: settings.trusted_media_hosts(),
            fetch_timeout: settings.fetch_timeout(),
            generation_timeout: settings.generation_timeout(),
            font_path: settings.font_path(),
            db_pool: None,
        })
    }

    /// Attach a database pool so records are persisted in PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Socket address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "BABYGEN_BIND_ADDR",
        "BABYGEN_GENERATION_ENDPOINT",
        "BABYGEN_GENERATION_API_KEY",
        "BABYGEN_TRUSTED_MEDIA_HOSTS",
        "BABYGEN_FETCH_TIMEOUT_SECS",
        "BABYGEN_GENERATION_TIMEOUT_SECS",
        "BABYGEN_DATABASE_URL",
        "BABYGEN_FONT_PATH",
    ];

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    fn load() -> BabygenSettings {
        BabygenSettings::load_from_iter([OsString::from("babygen")]).expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load();

        assert_eq!(
            settings.bind_addr().expect("default parses"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("valid addr")
        );
        assert_eq!(settings.trusted_media_hosts(), vec!["storage.googleapis.com"]);
        assert_eq!(settings.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(settings.generation_timeout(), Duration::from_secs(180));
        assert_eq!(settings.font_path(), PathBuf::from(DEFAULT_FONT_PATH));
        assert!(settings.database_url().is_none());
        assert_eq!(
            settings.generation_endpoint(),
            Err(ConfigError::Missing {
                name: "BABYGEN_GENERATION_ENDPOINT"
            })
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("BABYGEN_BIND_ADDR", "127.0.0.1:9000"),
            ("BABYGEN_GENERATION_ENDPOINT", "http://llm.internal/execute"),
            ("BABYGEN_TRUSTED_MEDIA_HOSTS", " Media.Example.com , ,cdn.example.org"),
            ("BABYGEN_FETCH_TIMEOUT_SECS", "5"),
            ("BABYGEN_DATABASE_URL", "postgres://localhost/babygen"),
        ]));

        let settings = load();
        let config = ServerConfig::from_settings(&settings).expect("config resolves");

        assert_eq!(config.bind_addr().port(), 9000);
        assert_eq!(
            config.generation_endpoint.as_str(),
            "http://llm.internal/execute"
        );
        assert_eq!(
            config.trusted_hosts,
            vec!["media.example.com", "cdn.example.org"]
        );
        assert_eq!(config.fetch_timeout, Duration::from_secs(5));
        assert_eq!(settings.database_url(), Some("postgres://localhost/babygen"));
    }

    #[rstest]
    #[case("BABYGEN_BIND_ADDR", "not an address")]
    #[case("BABYGEN_GENERATION_ENDPOINT", "::not a url::")]
    fn invalid_values_are_reported(#[case] name: &'static str, #[case] value: &str) {
        let mut overrides = vec![("BABYGEN_GENERATION_ENDPOINT", "http://llm.internal/")];
        overrides.retain(|(key, _)| *key != name);
        overrides.push((name, value));
        let _guard = lock_env(env_with(&overrides));

        let error = ServerConfig::from_settings(&load())
            .err()
            .expect("resolution fails");

        assert!(matches!(error, ConfigError::Invalid { name: n, .. } if n == name));
    }
}
