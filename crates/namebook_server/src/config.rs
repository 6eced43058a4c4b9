//! Server configuration from flags with environment fallbacks.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::Parser;
use namebook_core::{default_log_level, LogConfig};

const DEFAULT_DB_FILE_NAME: &str = "namebook.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "namebook-logs";

#[derive(Debug, Clone, Parser)]
#[command(name = "namebook-server", version, about = "Serve the Namebook name registry")]
pub struct ServerConfig {
    /// Address to listen on.
    #[arg(long, env = "NAMEBOOK_BIND", default_value = "127.0.0.1:8080")]
    pub bind: SocketAddr,

    /// SQLite database file; defaults to the system temp directory.
    #[arg(long, env = "NAMEBOOK_DB_PATH")]
    pub db_path: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "NAMEBOOK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rolling log files.
    #[arg(long, env = "NAMEBOOK_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl ServerConfig {
    pub fn resolved_db_path(&self) -> PathBuf {
        match &self.db_path {
            Some(path) if !path.as_os_str().is_empty() => path.clone(),
            _ => std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
        }
    }

    /// Always absolute; relative paths are joined onto the working directory.
    pub fn resolved_log_dir(&self) -> PathBuf {
        match &self.log_dir {
            Some(path) if !path.as_os_str().is_empty() => absolutize(path),
            _ => std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME),
        }
    }

    pub fn log_config(&self) -> LogConfig {
        let level = self
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        LogConfig::new(level, self.resolved_log_dir()).with_stderr(true)
    }
}

fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::ServerConfig;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn explicit_flags_override_defaults() {
        let config = ServerConfig::try_parse_from([
            "namebook-server",
            "--bind",
            "0.0.0.0:9000",
            "--db-path",
            "/var/lib/namebook/names.db",
            "--log-level",
            "warn",
            "--log-dir",
            "/var/log/namebook",
        ])
        .expect("valid flags");

        assert_eq!(config.bind.port(), 9000);
        assert_eq!(
            config.resolved_db_path(),
            PathBuf::from("/var/lib/namebook/names.db")
        );
        let log = config.log_config();
        assert_eq!(log.level, "warn");
        assert_eq!(log.log_dir, PathBuf::from("/var/log/namebook"));
        assert!(log.mirror_to_stderr);
    }

    #[test]
    fn relative_log_dir_becomes_absolute() {
        let config = ServerConfig::try_parse_from(["namebook-server", "--log-dir", "logs"])
            .expect("valid flags");
        assert!(config.resolved_log_dir().is_absolute());
        assert!(config.resolved_log_dir().ends_with("logs"));
    }

    #[test]
    fn invalid_bind_address_is_rejected() {
        assert!(ServerConfig::try_parse_from(["namebook-server", "--bind", "nowhere"]).is_err());
    }
}
