//! Server configuration.
//!
//! Loaded once at startup from a TOML file with a single `[server]`
//! table; the resulting [`Config`] is immutable for the process
//! lifetime. Anything wrong with it (unreadable file, unknown strategy,
//! missing corpus path) is fatal before the listener binds; query time
//! never sees configuration errors.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 44445
//! corpus_path = "data/corpus.txt"
//! search_algorithm = "sorted"
//! reread_on_query = false
//! ssl_enabled = false
//! certfile = "server.crt"
//! keyfile = "server.key"
//! whole_line_only = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::search::{MatchMode, Strategy};

/// Errors that make the configuration unusable. All fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("missing required entry: server.corpus_path")]
    MissingCorpusPath,

    #[error("unknown search algorithm: {0:?}")]
    UnknownStrategy(String),
}

/// Resolved, validated configuration. Read-only after startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address for the listener.
    pub host: String,
    /// Bind port for the listener.
    pub port: u16,
    /// Reload the corpus file on every query instead of caching it once.
    pub reread_on_query: bool,
    /// Wrap accepted connections in TLS.
    pub ssl_enabled: bool,
    /// PEM certificate chain, used when `ssl_enabled` is set.
    pub certfile: PathBuf,
    /// PEM private key, used when `ssl_enabled` is set.
    pub keyfile: PathBuf,
    /// The text file queries are answered against.
    pub corpus_path: PathBuf,
    /// The matching strategy, fixed for the process lifetime.
    pub strategy: Strategy,
    /// How the substring backends interpret hits.
    pub match_mode: MatchMode,
}

/// Raw on-disk shape; validation happens in [`Config::from_toml`].
#[derive(Debug, Deserialize)]
struct ConfigFile {
    server: ServerSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServerSection {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    reread_on_query: bool,
    #[serde(default)]
    ssl_enabled: bool,
    #[serde(default = "default_certfile")]
    certfile: PathBuf,
    #[serde(default = "default_keyfile")]
    keyfile: PathBuf,
    corpus_path: Option<PathBuf>,
    #[serde(default = "default_algorithm")]
    search_algorithm: String,
    #[serde(default)]
    whole_line_only: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    44445
}

fn default_certfile() -> PathBuf {
    PathBuf::from("server.crt")
}

fn default_keyfile() -> PathBuf {
    PathBuf::from("server.key")
}

fn default_algorithm() -> String {
    "sorted".to_string()
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let raw: ConfigFile = toml::from_str(contents)?;
        let server = raw.server;

        let corpus_path = server.corpus_path.ok_or(ConfigError::MissingCorpusPath)?;
        let strategy = server
            .search_algorithm
            .parse::<Strategy>()
            .map_err(|e| ConfigError::UnknownStrategy(e.0))?;
        let match_mode = if server.whole_line_only {
            MatchMode::WholeLine
        } else {
            MatchMode::Substring
        };

        Ok(Config {
            host: server.host,
            port: server.port,
            reread_on_query: server.reread_on_query,
            ssl_enabled: server.ssl_enabled,
            certfile: server.certfile,
            keyfile: server.keyfile,
            corpus_path,
            strategy,
            match_mode,
        })
    }

    /// The address string the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
