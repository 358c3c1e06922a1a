//! Service configuration with TOML file support.

use devdrop_ledger_client::RpcClientOptions;
use devdrop_types::{Cluster, ClusterConfig, Commitment};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::DevdropError;

/// Configuration shared by every devdrop service.
///
/// Can be loaded from a TOML file via [`DevdropConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DevdropConfig {
    /// Which cluster to talk to.
    #[serde(default)]
    pub network: Cluster,

    /// RPC endpoint. Defaults to the cluster's public endpoint.
    #[serde(default)]
    pub ledger_endpoint: Option<String>,

    /// Commitment required before a submitted transaction counts as done.
    #[serde(default)]
    pub commitment: Commitment,

    /// Upper bound on balance queries in flight per snapshot. Unbounded if unset.
    #[serde(default)]
    pub max_concurrent_queries: Option<usize>,

    /// Give up waiting on a drop after this many seconds. 0 waits forever.
    #[serde(default = "default_confirm_timeout_secs")]
    pub confirm_timeout_secs: u64,

    /// Delay between signature status polls.
    #[serde(default = "default_confirm_poll_interval_ms")]
    pub confirm_poll_interval_ms: u64,

    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Extra lamports requested from the faucet to cover the transfer fee.
    #[serde(default = "default_fee_reserve_lamports")]
    pub fee_reserve_lamports: u64,

    /// Keypair file of the funder / mint authority.
    #[serde(default)]
    pub keypair_path: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_confirm_timeout_secs() -> u64 {
    60
}

fn default_confirm_poll_interval_ms() -> u64 {
    500
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_fee_reserve_lamports() -> u64 {
    5_000
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl DevdropConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, DevdropError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| DevdropError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, DevdropError> {
        let config: Self = toml::from_str(s).map_err(|e| DevdropError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, DevdropError> {
        toml::to_string_pretty(self).map_err(|e| DevdropError::Config(e.to_string()))
    }

    /// Reject values no service can work with.
    pub fn validate(&self) -> Result<(), DevdropError> {
        if self.max_concurrent_queries == Some(0) {
            return Err(DevdropError::Config(
                "max_concurrent_queries must be at least 1".into(),
            ));
        }
        if self.confirm_poll_interval_ms == 0 {
            return Err(DevdropError::Config(
                "confirm_poll_interval_ms must be positive".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(DevdropError::Config(
                "request_timeout_secs must be positive".into(),
            ));
        }
        Ok(())
    }

    /// The cluster and the endpoint actually used to reach it.
    pub fn cluster_config(&self) -> ClusterConfig {
        match &self.ledger_endpoint {
            Some(endpoint) => ClusterConfig::new(self.network, endpoint.clone()),
            None => ClusterConfig::public(self.network),
        }
    }

    /// Transport options for `RpcLedgerClient`.
    pub fn rpc_options(&self) -> RpcClientOptions {
        RpcClientOptions {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            poll_interval: Duration::from_millis(self.confirm_poll_interval_ms),
            commitment: self.commitment,
            ..Default::default()
        }
    }

    /// Bound on one drop's confirmation wait, if any.
    pub fn confirm_timeout(&self) -> Option<Duration> {
        (self.confirm_timeout_secs > 0).then(|| Duration::from_secs(self.confirm_timeout_secs))
    }
}

impl Default for DevdropConfig {
    fn default() -> Self {
        Self {
            network: Cluster::default(),
            ledger_endpoint: None,
            commitment: Commitment::default(),
            max_concurrent_queries: None,
            confirm_timeout_secs: default_confirm_timeout_secs(),
            confirm_poll_interval_ms: default_confirm_poll_interval_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            fee_reserve_lamports: default_fee_reserve_lamports(),
            keypair_path: None,
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = DevdropConfig {
            max_concurrent_queries: Some(8),
            ledger_endpoint: Some("http://127.0.0.1:8899".into()),
            ..Default::default()
        };
        let toml_str = config.to_toml_string().unwrap();
        let parsed = DevdropConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = DevdropConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.network, Cluster::Devnet);
        assert_eq!(config.commitment, Commitment::Confirmed);
        assert_eq!(config.max_concurrent_queries, None);
        assert_eq!(config.confirm_timeout(), Some(Duration::from_secs(60)));
        assert_eq!(
            config.cluster_config().ledger_endpoint,
            "https://api.devnet.solana.com"
        );
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            network = "mainnet-beta"
            ledger_endpoint = "http://localhost:8899"
            commitment = "finalized"
            confirm_timeout_secs = 0
        "#;
        let config = DevdropConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.network, Cluster::MainnetBeta);
        assert_eq!(config.commitment, Commitment::Finalized);
        assert_eq!(config.confirm_timeout(), None);
        assert_eq!(
            config.cluster_config().ledger_endpoint,
            "http://localhost:8899"
        );
        assert_eq!(config.log_format, "human"); // default
    }

    #[test]
    fn zero_concurrency_rejected() {
        let err = DevdropConfig::from_toml_str("max_concurrent_queries = 0").unwrap_err();
        assert!(matches!(err, DevdropError::Config(_)));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = DevdropConfig::from_toml_file("/nonexistent/devdrop.toml");
        assert!(matches!(result, Err(DevdropError::Config(_))));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devdrop.toml");
        std::fs::write(&path, "fee_reserve_lamports = 0\n").unwrap();
        let config = DevdropConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.fee_reserve_lamports, 0);
    }
}
