//! Instance configuration
//!
//! Loaded from a TOML file. Only `host` and `rx_port` are required by the
//! protocol; everything else has a default.
//!
//! ```toml
//! host = "192.168.1.20"
//! rx_port = 3456
//!
//! [log]
//! level = "debug"
//! ```

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use tracing::level_filters::LevelFilter;

use crate::{error::TilesError, Result};

/// Target host used when none is configured
pub const DEFAULT_HOST: Ipv4Addr = Ipv4Addr::LOCALHOST;
/// Port the tiles app listens on by default
pub const DEFAULT_RX_PORT: u16 = 3456;

/// Top-level configuration of one control instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesConfig {
    /// IPv4 address of the machine running the tiles app (empty = localhost)
    #[serde(default)]
    pub host: String,
    /// Port the tiles app receives OSC on
    #[serde(default = "default_rx_port")]
    pub rx_port: u16,
    /// Local address the session socket binds to
    #[serde(default = "default_local_address")]
    pub local_address: IpAddr,
    /// Local port the session socket binds to (defaults to `rx_port`, 0 = ephemeral)
    #[serde(default)]
    pub local_port: Option<u16>,
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,
}

fn default_rx_port() -> u16 {
    DEFAULT_RX_PORT
}

fn default_local_address() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

impl Default for TilesConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            rx_port: DEFAULT_RX_PORT,
            local_address: default_local_address(),
            local_port: None,
            log: LogConfig::default(),
        }
    }
}

/// Resolved socket addresses consumed by a transport session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Where commands are sent
    pub target: SocketAddr,
    /// Where the session socket binds
    pub bind: SocketAddr,
}

impl TilesConfig {
    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            TilesError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TilesConfig = toml::from_str(content)?;
        config.connection()?;
        Ok(config)
    }

    /// Resolve host and ports into socket addresses
    pub fn connection(&self) -> Result<ConnectionConfig> {
        if self.rx_port == 0 {
            return Err(TilesError::ConfigError(
                "rx_port must be between 1 and 65535".to_string(),
            ));
        }

        let host = self.host.trim();
        let host: Ipv4Addr = if host.is_empty() {
            DEFAULT_HOST
        } else {
            host.parse().map_err(|_| {
                TilesError::ConfigError(format!("host must be an IPv4 address: '{}'", host))
            })?
        };

        Ok(ConnectionConfig {
            target: SocketAddr::new(IpAddr::V4(host), self.rx_port),
            bind: SocketAddr::new(self.local_address, self.local_port.unwrap_or(self.rx_port)),
        })
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level filter (`RUST_LOG` takes precedence)
    pub level: String,
    /// Log to stderr
    pub console_output: bool,
    /// Log to a file in `log_dir`
    pub file_output: bool,
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Number of log files kept in `log_dir`
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            console_output: true,
            file_output: false,
            log_dir: PathBuf::from("logs"),
            max_files: 10,
        }
    }
}

impl LogConfig {
    /// Parse `level`, falling back to INFO
    pub fn parse_level(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::INFO)
    }

    pub fn ensure_log_directory(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.log_dir)
    }

    /// Path of today's log file
    pub fn current_log_path(&self) -> PathBuf {
        let date = chrono::Local::now().format("%Y-%m-%d");
        self.log_dir.join(format!("tiles_{}.log", date))
    }

    /// Delete the oldest `tiles_*.log` files so at most `max_files` remain
    pub fn cleanup_old_logs(&self) -> std::io::Result<usize> {
        if !self.log_dir.exists() {
            return Ok(0);
        }

        let mut logs: Vec<PathBuf> = fs::read_dir(&self.log_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with("tiles_") && n.ends_with(".log"))
            })
            .collect();

        if logs.len() <= self.max_files {
            return Ok(0);
        }

        // Dated names sort chronologically
        logs.sort();
        let excess = logs.len() - self.max_files;
        for path in &logs[..excess] {
            fs::remove_file(path)?;
        }
        Ok(excess)
    }

    /// Open today's log file for appending, after creating `log_dir` and
    /// pruning old files. `None` when file output is disabled.
    pub fn open_log_file(&self) -> std::io::Result<Option<(PathBuf, File)>> {
        if !self.file_output {
            return Ok(None);
        }

        self.ensure_log_directory()?;
        // Pruning failures are not fatal
        let _ = self.cleanup_old_logs();

        let path = self.current_log_path();
        let file = File::options().create(true).append(true).open(&path)?;
        Ok(Some((path, file)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TilesConfig::default();
        let connection = config.connection().unwrap();
        assert_eq!(connection.target, "127.0.0.1:3456".parse().unwrap());
        assert_eq!(connection.bind, "0.0.0.0:3456".parse().unwrap());
    }

    #[test]
    fn test_from_toml() {
        let config = TilesConfig::from_toml_str(
            r#"
            host = "10.0.0.5"
            rx_port = 9000
            local_port = 0

            [log]
            level = "debug"
            "#,
        )
        .unwrap();

        let connection = config.connection().unwrap();
        assert_eq!(connection.target, "10.0.0.5:9000".parse().unwrap());
        assert_eq!(connection.bind.port(), 0);
        assert_eq!(config.log.parse_level(), LevelFilter::DEBUG);
        assert!(config.log.console_output);
    }

    #[test]
    fn test_rejects_bad_host() {
        let result = TilesConfig::from_toml_str(r#"host = "zoom.local""#);
        assert!(matches!(result, Err(TilesError::ConfigError(_))));

        let result = TilesConfig::from_toml_str(r#"host = "::1""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_port_zero() {
        let result = TilesConfig::from_toml_str("rx_port = 0");
        assert!(matches!(result, Err(TilesError::ConfigError(_))));

        let result = TilesConfig::from_toml_str("rx_port = 70000");
        assert!(matches!(result, Err(TilesError::TomlError(_))));
    }

    #[test]
    fn test_invalid_level_falls_back() {
        let log = LogConfig {
            level: "loud".into(),
            ..Default::default()
        };
        assert_eq!(log.parse_level(), LevelFilter::INFO);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiles.toml");
        fs::write(&path, "host = \"192.168.0.9\"\n").unwrap();

        let config = TilesConfig::load(&path).unwrap();
        assert_eq!(config.host, "192.168.0.9");
        assert_eq!(config.rx_port, DEFAULT_RX_PORT);

        assert!(TilesConfig::load(dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_cleanup_old_logs() {
        let dir = tempfile::tempdir().unwrap();
        for day in 1..=5 {
            fs::write(dir.path().join(format!("tiles_2026-01-0{}.log", day)), "").unwrap();
        }
        fs::write(dir.path().join("other.txt"), "").unwrap();

        let log = LogConfig {
            log_dir: dir.path().to_path_buf(),
            max_files: 2,
            ..Default::default()
        };
        assert_eq!(log.cleanup_old_logs().unwrap(), 3);
        assert!(dir.path().join("tiles_2026-01-05.log").exists());
        assert!(dir.path().join("tiles_2026-01-04.log").exists());
        assert!(!dir.path().join("tiles_2026-01-03.log").exists());
        assert!(dir.path().join("other.txt").exists());
    }

    #[test]
    fn test_open_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = LogConfig {
            log_dir: dir.path().join("nested"),
            max_files: 1,
            ..Default::default()
        };
        assert!(log.open_log_file().unwrap().is_none());
        assert!(!log.log_dir.exists());

        log.file_output = true;
        fs::create_dir_all(&log.log_dir).unwrap();
        fs::write(log.log_dir.join("tiles_2000-01-01.log"), "old").unwrap();
        fs::write(log.log_dir.join("tiles_2000-01-02.log"), "old").unwrap();

        let (path, _file) = log.open_log_file().unwrap().unwrap();
        assert_eq!(path, log.current_log_path());
        assert!(path.exists());
        assert!(!log.log_dir.join("tiles_2000-01-01.log").exists());
    }
}
