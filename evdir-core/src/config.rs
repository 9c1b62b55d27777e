//! evdir configuration.
//!
//! Sources, lowest priority first: built-in defaults, the TOML config file,
//! `EVDIR_*` environment variables, then the legacy `PORT` variable (only
//! when `EVDIR_PORT` is unset). Command-line flags are layered on top by the
//! server binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_LIMIT;
use crate::error::{EvdirError, EvdirResult};
use crate::query::QueryDefaults;

static DEFAULT_DATA_FILE: &str = "data/events.json";
static DEFAULT_PUBLIC_DIR: &str = "public";
static DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_public_dir() -> PathBuf {
    PathBuf::from(DEFAULT_PUBLIC_DIR)
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Server configuration, by default at ~/.config/evdir/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EvdirConfig {
    /// JSON array of event records
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Browser client assets
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Page size when a request doesn't ask for one
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for EvdirConfig {
    fn default() -> Self {
        EvdirConfig {
            data_file: default_data_file(),
            public_dir: default_public_dir(),
            host: default_host(),
            port: default_port(),
            default_limit: default_limit(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl EvdirConfig {
    pub fn config_path() -> EvdirResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EvdirError::Config("Could not determine config directory".into()))?
            .join("evdir");

        Ok(config_dir.join("config.toml"))
    }

    /// Load configuration. An explicitly given file must exist; the default
    /// location is optional.
    pub fn load(path: Option<&Path>) -> EvdirResult<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::config_path()?, false),
        };

        let mut config: EvdirConfig = Config::builder()
            .add_source(File::from(path).required(required))
            .add_source(Environment::with_prefix("EVDIR").try_parsing(true))
            .build()
            .map_err(|e| EvdirError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| EvdirError::Config(e.to_string()))?;

        if std::env::var_os("EVDIR_PORT").is_none() {
            if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
                config.port = port;
            }
        }

        Ok(config)
    }

    pub fn data_file_path(&self) -> PathBuf {
        expand(&self.data_file)
    }

    pub fn public_dir_path(&self) -> PathBuf {
        expand(&self.public_dir)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn query_defaults(&self) -> QueryDefaults {
        QueryDefaults {
            limit: self.default_limit,
        }
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;
    use std::fs;
    use std::sync::{Mutex, MutexGuard, OnceLock};
    use tempfile::tempdir;

    const ENV_KEYS: [&str; 4] = ["EVDIR_PORT", "EVDIR_DEFAULT_LIMIT", "EVDIR_DATA_FILE", "PORT"];

    fn env_lock() -> &'static Mutex<()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(()))
    }

    /// Serializes environment access across tests. Clears every variable
    /// `load` reads, applies `vars`, and restores the originals on drop.
    struct EnvGuard {
        saved: Vec<(&'static str, Option<OsString>)>,
        _lock: MutexGuard<'static, ()>,
    }

    impl EnvGuard {
        fn with(vars: &[(&str, &str)]) -> Self {
            let lock = env_lock().lock().unwrap_or_else(|e| e.into_inner());
            let saved = ENV_KEYS
                .iter()
                .map(|key| (*key, std::env::var_os(key)))
                .collect();

            // SAFETY: every test touching these variables holds `env_lock`.
            unsafe {
                for key in ENV_KEYS {
                    std::env::remove_var(key);
                }
                for (key, value) in vars {
                    std::env::set_var(key, value);
                }
            }

            EnvGuard { saved, _lock: lock }
        }

        fn clean() -> Self {
            Self::with(&[])
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            // SAFETY: the lock is still held until this guard is gone.
            unsafe {
                for (key, value) in &self.saved {
                    match value {
                        Some(value) => std::env::set_var(key, value),
                        None => std::env::remove_var(key),
                    }
                }
            }
        }
    }

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join("config.toml");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = EvdirConfig::default();
        assert_eq!(config.data_file, PathBuf::from("data/events.json"));
        assert_eq!(config.default_limit, 12);
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_load_partial_file() {
        let _env = EnvGuard::clean();
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "data_file = \"/srv/events.json\"\ndefault_limit = 4\n",
        )
        .unwrap();

        let config = EvdirConfig::load(Some(&path)).unwrap();
        assert_eq!(config.data_file, PathBuf::from("/srv/events.json"));
        assert_eq!(config.default_limit, 4);
        assert_eq!(config.query_defaults().limit, 4);
        assert_eq!(config.public_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let _env = EnvGuard::clean();
        let dir = tempdir().unwrap();
        let err = EvdirConfig::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, EvdirError::Config(_)));
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let _env = EnvGuard::clean();
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "port = \"not a port\"\n").unwrap();

        assert!(EvdirConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let _env = EnvGuard::with(&[
            ("EVDIR_DEFAULT_LIMIT", "7"),
            ("EVDIR_DATA_FILE", "/var/lib/evdir/events.json"),
        ]);
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "default_limit = 4\nport = 8080\n");

        let config = EvdirConfig::load(Some(&path)).unwrap();
        assert_eq!(config.default_limit, 7);
        assert_eq!(config.data_file, PathBuf::from("/var/lib/evdir/events.json"));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_legacy_port_used_without_evdir_port() {
        let _env = EnvGuard::with(&[("PORT", "4100")]);
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "port = 8080\n");

        let config = EvdirConfig::load(Some(&path)).unwrap();
        assert_eq!(config.port, 4100);
    }

    #[test]
    fn test_evdir_port_wins_over_legacy_port() {
        let _env = EnvGuard::with(&[("PORT", "4100"), ("EVDIR_PORT", "4200")]);
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "port = 8080\n");

        let config = EvdirConfig::load(Some(&path)).unwrap();
        assert_eq!(config.port, 4200);
    }

    #[test]
    fn test_unparsable_legacy_port_is_ignored() {
        let _env = EnvGuard::with(&[("PORT", "http")]);
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "port = 8080\n");

        let config = EvdirConfig::load(Some(&path)).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_request_timeout() {
        let _env = EnvGuard::clean();
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "request_timeout_secs = 3\n");

        let config = EvdirConfig::load(Some(&path)).unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(EvdirConfig::default().request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_tilde_is_expanded() {
        let config = EvdirConfig {
            data_file: PathBuf::from("~/events.json"),
            ..Default::default()
        };
        let expanded = config.data_file_path();
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("events.json"));
    }
}
