//! Bridge configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Name of the credential file inside [`BridgeConfig::base_dir`].
pub const CREDENTIAL_FILE_NAME: &str = ".credential";

/// Top-level bridge configuration.
///
/// Loaded once at startup via [`BridgeConfig::from_env`].
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:9999`).
    pub listen_addr: SocketAddr,

    /// Environment name announced to every new connection.
    pub env_name: String,

    /// API version passed to backend capabilities.
    pub api_version: String,

    /// Directory holding the credential file and dashboard assets.
    pub base_dir: PathBuf,

    /// File containing the local release version.
    pub version_file: PathBuf,

    /// Plaintext URL returning the newest released version.
    pub version_check_url: String,

    /// Scheme used to reach the accounts service.
    pub accounts_scheme: String,

    /// Host of the accounts service listing push destinations.
    pub accounts_host: String,

    /// Port of the accounts service.
    pub accounts_port: u16,

    /// Hard limit on a destinations lookup.
    pub destinations_timeout: Duration,

    /// Base URL of the backend API.
    pub backend_url: String,

    /// Explicit dashboard asset directory.
    pub static_dir: Option<PathBuf>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 9999)),
            env_name: "local".to_string(),
            api_version: "v2".to_string(),
            base_dir: PathBuf::from("."),
            version_file: PathBuf::from("VERSION"),
            version_check_url: "http://www.continuuity.com/version".to_string(),
            accounts_scheme: "https".to_string(),
            accounts_host: "accounts.continuuity.net".to_string(),
            accounts_port: 443,
            destinations_timeout: Duration::from_secs(10),
            backend_url: "http://127.0.0.1:10000".to_string(),
            static_dir: None,
        }
    }
}

impl BridgeConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to the [`Default`] values when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr: SocketAddr = match std::env::var("LISTEN_ADDR") {
            Ok(addr) => addr.parse()?,
            Err(_) => defaults.listen_addr,
        };

        let base_dir = std::env::var("BRIDGE_BASE_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.base_dir);
        let version_file = std::env::var("BRIDGE_VERSION_FILE")
            .map(PathBuf::from)
            .unwrap_or(defaults.version_file);

        Ok(Self {
            listen_addr,
            env_name: env_or("BRIDGE_ENV_NAME", defaults.env_name),
            api_version: env_or("BRIDGE_API_VERSION", defaults.api_version),
            base_dir,
            version_file,
            version_check_url: env_or("VERSION_CHECK_URL", defaults.version_check_url),
            accounts_scheme: env_or("ACCOUNTS_SCHEME", defaults.accounts_scheme),
            accounts_host: env_or("ACCOUNTS_HOST", defaults.accounts_host),
            accounts_port: parse_env("ACCOUNTS_PORT", defaults.accounts_port),
            destinations_timeout: Duration::from_millis(parse_env(
                "DESTINATIONS_TIMEOUT_MS",
                10_000,
            )),
            backend_url: env_or("BACKEND_URL", defaults.backend_url),
            static_dir: std::env::var("STATIC_DIR").ok().map(PathBuf::from),
        })
    }

    /// Path of the credential file.
    #[must_use]
    pub fn credential_path(&self) -> PathBuf {
        self.base_dir.join(CREDENTIAL_FILE_NAME)
    }

    /// Dashboard asset directory: `STATIC_DIR` if set, else the first of
    /// `client/` and `../client/` under the base directory that exists.
    #[must_use]
    pub fn client_dir(&self) -> Option<PathBuf> {
        if let Some(dir) = &self.static_dir {
            return Some(dir.clone());
        }
        [self.base_dir.join("client"), self.base_dir.join("../client")]
            .into_iter()
            .find(|dir| dir.is_dir())
    }
}

/// Reads an environment variable, returning `default` when unset.
fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
