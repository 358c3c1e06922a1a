//! Cluster selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// Identifies which ledger cluster the services talk to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    /// The test network. The only cluster with a faucet.
    #[default]
    Devnet,
    /// The staging network.
    Testnet,
    /// The production network.
    MainnetBeta,
}

impl Cluster {
    /// Public RPC endpoint for this cluster.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
        }
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Devnet => "devnet",
            Self::Testnet => "testnet",
            Self::MainnetBeta => "mainnet-beta",
        }
    }

    /// Whether faucet requests are permitted against this cluster.
    pub fn supports_faucet(&self) -> bool {
        matches!(self, Self::Devnet)
    }
}

impl FromStr for Cluster {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "devnet" | "test-network" => Ok(Self::Devnet),
            "testnet" | "staging-network" => Ok(Self::Testnet),
            "mainnet-beta" | "mainnet" | "production-network" => Ok(Self::MainnetBeta),
            _ => Err(TypesError::UnknownCluster(s.to_string())),
        }
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The cluster a service is bound to and the endpoint used to reach it.
///
/// Passed explicitly into every service constructor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterConfig {
    pub network: Cluster,
    pub ledger_endpoint: String,
}

impl ClusterConfig {
    pub fn new(network: Cluster, ledger_endpoint: impl Into<String>) -> Self {
        Self {
            network,
            ledger_endpoint: ledger_endpoint.into(),
        }
    }

    /// Use the cluster's public endpoint.
    pub fn public(network: Cluster) -> Self {
        Self::new(network, network.default_endpoint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_devnet_has_faucet() {
        assert!(Cluster::Devnet.supports_faucet());
        assert!(!Cluster::Testnet.supports_faucet());
        assert!(!Cluster::MainnetBeta.supports_faucet());
    }

    #[test]
    fn parses_both_spellings() {
        assert_eq!("devnet".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert_eq!("test-network".parse::<Cluster>().unwrap(), Cluster::Devnet);
        assert_eq!("staging-network".parse::<Cluster>().unwrap(), Cluster::Testnet);
        assert_eq!(
            "production-network".parse::<Cluster>().unwrap(),
            Cluster::MainnetBeta
        );
        assert!("localnet".parse::<Cluster>().is_err());
    }

    #[test]
    fn public_config_uses_default_endpoint() {
        let config = ClusterConfig::public(Cluster::Testnet);
        assert_eq!(config.ledger_endpoint, "https://api.testnet.solana.com");
    }
}
