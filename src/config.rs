use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{WalletError, WalletResult};

/// Default `host:port` of the node HTTP server.
pub const DEFAULT_NODE_SERVER: &str = "localhost:9090";

/// Node connection configuration
#[derive(Debug, Deserialize, Clone)]
pub struct NodeConfig {
    /// `host:port` of the node HTTP server
    #[serde(default = "default_server")]
    pub server: String,
    /// Path prefix of the versioned API
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Log every request and response body at debug level
    #[serde(default = "default_log_io")]
    pub log_io: bool,
}

fn default_server() -> String {
    DEFAULT_NODE_SERVER.to_string()
}

fn default_api_prefix() -> String {
    "/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_io() -> bool {
    true
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            api_prefix: default_api_prefix(),
            timeout_secs: default_timeout_secs(),
            log_io: default_log_io(),
        }
    }
}

impl NodeConfig {
    /// `http://<server><api_prefix>`, without a trailing slash.
    ///
    /// A server given with an explicit scheme is used as is.
    pub fn base_url(&self) -> String {
        let server = self.server.trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        let root = if server.contains("://") {
            server.to_string()
        } else {
            format!("http://{}", server)
        };
        if prefix.is_empty() {
            root
        } else {
            format!("{}/{}", root, prefix)
        }
    }

    /// Full URL of an API path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }
}

/// Local wallet storage configuration
#[derive(Debug, Deserialize, Clone)]
pub struct WalletConfig {
    /// Directory holding the key file
    #[serde(default = "default_datadir")]
    pub datadir: PathBuf,
    /// Key file name inside `datadir`
    #[serde(default = "default_accounts_file")]
    pub accounts_file: String,
    #[serde(default = "default_gas_price")]
    pub default_gas_price: u64,
    #[serde(default = "default_gas_limit")]
    pub default_gas_limit: u64,
}

fn default_datadir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

fn default_accounts_file() -> String {
    "accounts.json".to_string()
}

fn default_gas_price() -> u64 {
    1
}

fn default_gas_limit() -> u64 {
    100
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            datadir: default_datadir(),
            accounts_file: default_accounts_file(),
            default_gas_price: default_gas_price(),
            default_gas_limit: default_gas_limit(),
        }
    }
}

impl WalletConfig {
    pub fn accounts_path(&self) -> PathBuf {
        self.datadir.join(&self.accounts_file)
    }

    /// Create the data directory (and parents) if it does not exist yet.
    pub fn ensure_datadir(&self) -> WalletResult<&Path> {
        std::fs::create_dir_all(&self.datadir).map_err(|e| WalletError::io(&self.datadir, e))?;
        Ok(&self.datadir)
    }
}

/// Root application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub wallet: WalletConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Like [`AppConfig::load`], with an extra explicit file layered on top
    /// of the default files.
    pub fn load_from(extra_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // Start with default config file
            .add_source(File::with_name("config/default").required(false))
            // Override with local config if present
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = extra_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            // Override with environment variables (prefix: NODEWALLET_)
            // e.g., NODEWALLET_NODE__SERVER, NODEWALLET_WALLET__DATADIR
            .add_source(
                Environment::with_prefix("NODEWALLET")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_and_endpoint() {
        let config = NodeConfig {
            server: "localhost:9090".to_string(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "http://localhost:9090/v1");
        assert_eq!(config.endpoint("/nonce"), "http://localhost:9090/v1/nonce");
        assert_eq!(config.endpoint("nonce"), "http://localhost:9090/v1/nonce");
    }

    #[test]
    fn test_base_url_keeps_explicit_scheme() {
        let config = NodeConfig {
            server: "https://node.example.org/".to_string(),
            api_prefix: String::new(),
            ..Default::default()
        };
        assert_eq!(config.base_url(), "https://node.example.org");
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.node.server, DEFAULT_NODE_SERVER);
        assert_eq!(config.node.timeout_secs, 30);
        assert_eq!(config.wallet.accounts_file, "accounts.json");
        assert_eq!(config.wallet.default_gas_price, 1);
        assert_eq!(config.wallet.default_gas_limit, 100);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("wallet.toml");
        std::fs::write(
            &path,
            "[node]\nserver = \"10.0.0.5:9191\"\n\n[wallet]\naccounts_file = \"keys.json\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(Some(&path)).unwrap();
        assert_eq!(config.node.server, "10.0.0.5:9191");
        assert_eq!(config.node.api_prefix, "/v1");
        assert_eq!(config.wallet.accounts_file, "keys.json");
    }

    #[test]
    fn test_ensure_datadir_creates_nested_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let wallet = WalletConfig {
            datadir: dir.path().join("a").join("b"),
            ..Default::default()
        };
        assert!(wallet.ensure_datadir().unwrap().is_dir());
        assert_eq!(wallet.accounts_path(), dir.path().join("a/b/accounts.json"));
    }
}
