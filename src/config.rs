//! Server configuration
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. built-in defaults,
//! 2. an optional YAML file (`--config courier.yaml`),
//! 3. command-line flags and environment variables.
//!
//! ```yaml
//! listen_addr: "0.0.0.0:4221"
//! directory: /srv/files
//! max_connections: 256
//! max_request_bytes: 16384
//! read_timeout_secs: 10
//! log_level: debug
//! ```

use anyhow::{Context, bail};
use clap::Parser;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:4221";
pub const DEFAULT_MAX_CONNECTIONS: usize = 1024;
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 8 * 1024;

/// Command-line interface.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "courier")]
#[command(about = "Minimal concurrent HTTP/1.1 server with echo and static file routes")]
#[command(version)]
pub struct Cli {
    /// Directory served under /files/; file serving is disabled without it
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "LISTEN")]
    pub listen: Option<String>,

    /// YAML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Maximum number of connections handled at once
    #[arg(long)]
    pub max_connections: Option<usize>,

    /// Largest request (headers plus body) accepted, in bytes
    #[arg(long)]
    pub max_request_bytes: Option<usize>,

    /// Close connections that send nothing for this many seconds
    #[arg(long)]
    pub read_timeout_secs: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub listen_addr: String,
    /// Static file root; read-only for the life of the process
    pub directory: Option<PathBuf>,
    pub max_connections: usize,
    pub max_request_bytes: usize,
    /// No timeout when unset
    pub read_timeout_secs: Option<u64>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            directory: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            read_timeout_secs: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Builds the effective configuration and validates it.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut cfg = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        cfg.apply_cli(cli);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not to an all-default map
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(directory) = &cli.directory {
            self.directory = Some(directory.clone());
        }
        if let Some(listen) = &cli.listen {
            self.listen_addr = listen.clone();
        }
        if let Some(n) = cli.max_connections {
            self.max_connections = n;
        }
        if let Some(n) = cli.max_request_bytes {
            self.max_request_bytes = n;
        }
        if let Some(secs) = cli.read_timeout_secs {
            self.read_timeout_secs = Some(secs);
        }
        if let Some(level) = &cli.log_level {
            self.log_level = level.clone();
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_connections == 0 {
            bail!("max_connections must be at least 1");
        }
        if self.max_request_bytes == 0 {
            bail!("max_request_bytes must be at least 1");
        }
        if let Some(dir) = &self.directory {
            if !dir.is_dir() {
                bail!("static directory {} is not a directory", dir.display());
            }
        }
        self.tracing_level()?;
        Ok(())
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }

    pub fn tracing_level(&self) -> anyhow::Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow::anyhow!("unknown log level {:?}", self.log_level))
    }
}
