use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants::{bootstrap, limits};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub security: SecurityConfig,

    pub bootstrap: BootstrapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// `sqlite:<path>` or `sqlite::memory:`
    pub database_path: String,

    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/portal.db".to_string(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Random bytes per salt before hex encoding (default: 16)
    pub salt_bytes: usize,

    /// Rewrite legacy credentials to salted form on the first successful login
    pub auto_migrate_legacy_credentials: bool,

    /// Activity log entries kept, newest first (default: 200)
    pub activity_log_cap: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            salt_bytes: limits::SALT_BYTES,
            auto_migrate_legacy_credentials: true,
            activity_log_cap: limits::ACTIVITY_LOG_CAP,
        }
    }
}

/// Administrator created on first start when absent.
///
/// The defaults are well known. Production deployments must override the
/// password here or change it right after the first start.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub admin_email: String,

    pub admin_password: String,

    pub admin_name: String,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            admin_email: bootstrap::ADMIN_EMAIL.to_string(),
            admin_password: bootstrap::ADMIN_PASSWORD.to_string(),
            admin_name: bootstrap::ADMIN_NAME.to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var("PORTAL_CONFIG") {
            let path = PathBuf::from(path);
            info!("Loading config from PORTAL_CONFIG: {}", path.display());
            return Self::load_from_path(&path);
        }

        for path in &Self::config_paths() {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("portal").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".portal").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.bootstrap.admin_email.trim().is_empty() {
            anyhow::bail!("Bootstrap admin email cannot be empty");
        }

        if self.bootstrap.admin_password.is_empty() {
            anyhow::bail!("Bootstrap admin password cannot be empty");
        }

        if self.security.salt_bytes < limits::MIN_SALT_BYTES {
            anyhow::bail!(
                "Salt must be at least {} bytes (got {})",
                limits::MIN_SALT_BYTES,
                self.security.salt_bytes
            );
        }

        if self.security.activity_log_cap == 0 {
            anyhow::bail!("Activity log cap must be > 0");
        }

        if !matches!(self.general.log_format.as_str(), "pretty" | "json") {
            anyhow::bail!(
                "Unknown log format '{}', expected \"pretty\" or \"json\"",
                self.general.log_format
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bootstrap.admin_email, "admin@portal");
        assert_eq!(config.bootstrap.admin_password, "admin123");
        assert_eq!(config.security.activity_log_cap, 200);
        assert_eq!(config.security.salt_bytes, 16);
        assert!(config.security.auto_migrate_legacy_credentials);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[security]"));
        assert!(toml_str.contains("[bootstrap]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [security]
            activity_log_cap = 50
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.security.activity_log_cap, 50);

        assert_eq!(config.security.salt_bytes, 16);
        assert_eq!(config.bootstrap.admin_email, "admin@portal");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.security.salt_bytes = 4;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.security.activity_log_cap = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.bootstrap.admin_email = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.general.log_format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip_on_disk() {
        let path = std::env::temp_dir()
            .join(format!("portal-config-{}", uuid::Uuid::new_v4()))
            .join("config.toml");

        let mut config = Config::default();
        config.bootstrap.admin_name = "Registrar".to_string();
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.bootstrap.admin_name, "Registrar");

        std::fs::remove_dir_all(path.parent().unwrap()).ok();
    }
}
