use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct TapeConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub tape: TapeDefaults,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: String,
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    /// Owner used when a tool call or CLI command does not name one.
    pub default_owner: String,
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TapeDefaults {
    pub trajectory_max_depth: usize,
    pub page_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            log_level: "info".into(),
            host: "127.0.0.1".into(),
            port: 7411,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_tape_dir()
            .join("tape.db")
            .to_string_lossy()
            .into_owned();
        Self {
            db_path,
            default_owner: "default".into(),
            busy_timeout_ms: 5000,
        }
    }
}

impl Default for TapeDefaults {
    fn default() -> Self {
        Self {
            trajectory_max_depth: 50,
            page_size: 50,
        }
    }
}

/// Returns `~/.tape/`, or `./.tape/` when no home directory can be found.
pub fn default_tape_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tape")
}

/// Returns the default config file path: `~/.tape/config.toml`
pub fn default_config_path() -> PathBuf {
    default_tape_dir().join("config.toml")
}

impl TapeConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            TapeConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (TAPE_DB, TAPE_OWNER, TAPE_LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("TAPE_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("TAPE_OWNER") {
            self.storage.default_owner = val;
        }
        if let Ok(val) = std::env::var("TAPE_LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// The owner to act as when none is given explicitly.
    pub fn owner_or_default<'a>(&'a self, owner: Option<&'a str>) -> &'a str {
        owner.unwrap_or(&self.storage.default_owner)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = TapeConfig::default();
        assert_eq!(config.server.transport, "stdio");
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.storage.default_owner, "default");
        assert_eq!(config.tape.trajectory_max_depth, 50);
        assert_eq!(config.tape.page_size, 50);
        assert!(config.storage.db_path.ends_with("tape.db"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"
port = 9000

[storage]
db_path = "/tmp/test.db"
default_owner = "ada"

[tape]
trajectory_max_depth = 10
"#;
        let config: TapeConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.db_path, "/tmp/test.db");
        assert_eq!(config.storage.default_owner, "ada");
        assert_eq!(config.tape.trajectory_max_depth, 10);
        // defaults still apply for unset fields
        assert_eq!(config.tape.page_size, 50);
        assert_eq!(config.storage.busy_timeout_ms, 5000);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = TapeConfig::default();
        std::env::set_var("TAPE_DB", "/tmp/override.db");
        std::env::set_var("TAPE_OWNER", "env-owner");
        std::env::set_var("TAPE_LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.db_path, "/tmp/override.db");
        assert_eq!(config.storage.default_owner, "env-owner");
        assert_eq!(config.server.log_level, "trace");

        std::env::remove_var("TAPE_DB");
        std::env::remove_var("TAPE_OWNER");
        std::env::remove_var("TAPE_LOG_LEVEL");
    }

    #[test]
    fn owner_falls_back_to_default() {
        let config = TapeConfig::default();
        assert_eq!(config.owner_or_default(None), "default");
        assert_eq!(config.owner_or_default(Some("ada")), "ada");
    }

    #[test]
    fn missing_config_file_uses_defaults() {
        let dir = std::env::temp_dir().join("tape-config-test-missing");
        let config = TapeConfig::load_from(dir.join("nope.toml")).unwrap();
        assert_eq!(config.server.transport, "stdio");
    }
}
