//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/physidash/config.toml)
//! 3. Environment variables (PHYSIDASH_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "PHYSIDASH";

/// Fixed path of the backing document on the source host
///
/// The curation agent writes the document next to its own web assets; the
/// dashboard only ever polls this one path.
pub const DOCUMENT_PATH: &str = "/curated_datasets.json";

/// Name of the fallback cache slot (also the export artifact stem)
pub const CACHE_SLOT: &str = "physionet_curated";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the host serving the curated document
    #[serde(default = "default_source_url")]
    pub source_url: String,

    /// Directory for local data (fallback cache, debug log)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Poll interval for the refresh loop, in seconds
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,

    /// Directory exported files are written to (default: current directory)
    #[serde(default)]
    pub export_dir: Option<PathBuf>,

    /// TUI debug log file (default: {data_dir}/debug.log when logging is on)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: default_source_url(),
            data_dir: default_data_dir(),
            refresh_secs: default_refresh_secs(),
            export_dir: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (PHYSIDASH_SOURCE_URL, PHYSIDASH_DATA_DIR, ...)
    /// 2. Config file (~/.config/physidash/config.toml or PHYSIDASH_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(path: Option<&PathBuf>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from_path(p),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // PHYSIDASH_SOURCE_URL
        if let Ok(val) = std::env::var(format!("{}_SOURCE_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.source_url = val;
            }
        }

        // PHYSIDASH_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // PHYSIDASH_REFRESH_SECS
        if let Ok(val) = std::env::var(format!("{}_REFRESH_SECS", ENV_PREFIX)) {
            if let Ok(secs) = val.parse::<u64>() {
                self.refresh_secs = secs;
            }
        }

        // PHYSIDASH_EXPORT_DIR
        if let Ok(val) = std::env::var(format!("{}_EXPORT_DIR", ENV_PREFIX)) {
            self.export_dir = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with PHYSIDASH_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("physidash")
            .join("config.toml")
    }

    /// Full URL of the backing document
    pub fn document_url(&self) -> String {
        format!("{}{}", self.source_url.trim_end_matches('/'), DOCUMENT_PATH)
    }

    /// Path of the fallback cache file
    pub fn cache_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", CACHE_SLOT))
    }

    /// Directory exported artifacts land in
    pub fn effective_export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Get the default source URL (the curation agent's local web host)
fn default_source_url() -> String {
    "http://localhost:8000".to_string()
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("physidash")
}

fn default_refresh_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap();
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            // Clear all the vars
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "PHYSIDASH_SOURCE_URL",
        "PHYSIDASH_DATA_DIR",
        "PHYSIDASH_REFRESH_SECS",
        "PHYSIDASH_EXPORT_DIR",
    ];

    #[test]
    fn test_default_config() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::default();
        assert_eq!(config.source_url, "http://localhost:8000");
        assert_eq!(config.refresh_secs, 10);
        assert!(config.export_dir.is_none());
        assert!(config.data_dir.ends_with("physidash"));
    }

    #[test]
    fn test_document_url_joins_fixed_path() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        assert_eq!(
            config.document_url(),
            "http://localhost:8000/curated_datasets.json"
        );

        // Trailing slash on the base does not double up
        config.source_url = "http://example.com:8080/".to_string();
        assert_eq!(
            config.document_url(),
            "http://example.com:8080/curated_datasets.json"
        );
    }

    #[test]
    fn test_cache_path() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::default();
        assert!(config.cache_path().ends_with("physionet_curated.json"));
    }

    #[test]
    fn test_env_override_source_url() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("PHYSIDASH_SOURCE_URL", "http://10.0.0.2:9000");
        config.apply_env_overrides();
        assert_eq!(config.source_url, "http://10.0.0.2:9000");
    }

    #[test]
    fn test_env_override_refresh_secs() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("PHYSIDASH_REFRESH_SECS", "30");
        config.apply_env_overrides();
        assert_eq!(config.refresh_secs, 30);

        // Junk values are ignored
        env::set_var("PHYSIDASH_REFRESH_SECS", "soon");
        config.apply_env_overrides();
        assert_eq!(config.refresh_secs, 30);
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("PHYSIDASH_DATA_DIR", "/tmp/physidash-test");
        config.apply_env_overrides();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/physidash-test"));
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            source_url = "http://curation-host:8000"
            data_dir = "/custom/data"
            refresh_secs = 5
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.source_url, "http://curation-host:8000");
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.refresh_secs, 5);
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let dir = tempfile::tempdir().unwrap();
        env::set_var("PHYSIDASH_DATA_DIR", dir.path().join("data").to_str().unwrap());

        let path = dir.path().join("nonexistent.toml");
        let config = Config::load_from_path(&path).unwrap();
        // Should return defaults when file doesn't exist
        assert_eq!(config.refresh_secs, 10);
        assert_eq!(config.source_url, "http://localhost:8000");
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        env::set_var("PHYSIDASH_DATA_DIR", dir.path().join("data").to_str().unwrap());

        let mut config = Config::default();
        config.source_url = "http://saved:8000".to_string();
        config.refresh_secs = 42;
        config.save_to_path(&path).unwrap();

        let reloaded = Config::load_from_path(&path).unwrap();
        assert_eq!(reloaded.source_url, "http://saved:8000");
        assert_eq!(reloaded.refresh_secs, 42);
    }
}
