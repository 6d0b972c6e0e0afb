//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the onboarding flow.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::wallet::types::{ChainId, NativeCurrency, NetworkDescriptor};

/// Root configuration for the wallet onboarding flow.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Target network the wallet must be connected to.
    pub network: NetworkConfig,

    /// Deployed crime-report contract.
    pub contract: ContractConfig,

    /// Admin identity used for the admin view.
    pub admin: AdminConfig,

    /// Wallet bridge settings.
    pub wallet: WalletConfig,

    /// Navigation destinations.
    pub app: AppRoutesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Target network configuration.
///
/// Doubles as the descriptor handed to `wallet_addEthereumChain` when the
/// wallet does not know the chain yet.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Chain ID (11155111 for Sepolia).
    pub chain_id: u64,

    /// Human readable chain name shown by the wallet.
    pub chain_name: String,

    /// JSON-RPC endpoints registered with the wallet.
    pub rpc_urls: Vec<String>,

    /// Native currency name.
    pub currency_name: String,

    /// Native currency ticker.
    pub currency_symbol: String,

    /// Native currency decimals.
    pub currency_decimals: u8,

    /// Block explorer URLs registered with the wallet.
    pub block_explorer_urls: Vec<String>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            chain_id: 11_155_111,
            chain_name: "Sepolia".to_string(),
            rpc_urls: vec!["https://sepolia.infura.io".to_string()],
            currency_name: "Ether".to_string(),
            currency_symbol: "ETH".to_string(),
            currency_decimals: 18,
            block_explorer_urls: vec!["https://sepolia.etherscan.io".to_string()],
        }
    }
}

impl NetworkConfig {
    /// Target chain ID.
    pub fn chain_id(&self) -> ChainId {
        ChainId(self.chain_id)
    }

    /// Build the immutable descriptor sent to the wallet.
    pub fn descriptor(&self) -> NetworkDescriptor {
        NetworkDescriptor {
            chain_id: self.chain_id(),
            chain_name: self.chain_name.clone(),
            rpc_urls: self.rpc_urls.clone(),
            native_currency: NativeCurrency {
                name: self.currency_name.clone(),
                symbol: self.currency_symbol.clone(),
                decimals: self.currency_decimals,
            },
            block_explorer_urls: self.block_explorer_urls.clone(),
        }
    }
}

/// Deployed contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractConfig {
    /// Address of the deployed crime-report contract.
    pub address: String,
}

/// Admin identity configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Address allowed into the admin view (compared case-insensitively).
    pub address: String,
}

/// Wallet bridge configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WalletConfig {
    /// EIP-1193 JSON-RPC endpoint exposed by the wallet.
    pub endpoint: String,

    /// Per-request timeout in seconds. Covers user prompts, so keep it generous.
    pub request_timeout_secs: u64,

    /// Timeout for the initial presence probe in seconds.
    pub detect_timeout_secs: u64,

    /// Polling interval for account changes in milliseconds.
    pub account_poll_interval_ms: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            // Frame exposes its provider here.
            endpoint: "http://127.0.0.1:1248".to_string(),
            request_timeout_secs: 120,
            detect_timeout_secs: 3,
            account_poll_interval_ms: 2000,
        }
    }
}

/// Navigation destinations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppRoutesConfig {
    /// Base URL the route paths are appended to.
    pub base_url: String,
}

impl Default for AppRoutesConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_network_is_sepolia() {
        let network = NetworkConfig::default();
        assert_eq!(network.chain_id().to_hex(), "0xaa36a7");
        assert_eq!(network.chain_name, "Sepolia");
    }

    #[test]
    fn test_descriptor_from_config() {
        let descriptor = NetworkConfig::default().descriptor();
        assert_eq!(descriptor.native_currency.symbol, "ETH");
        assert_eq!(descriptor.native_currency.decimals, 18);
        assert_eq!(descriptor.rpc_urls, vec!["https://sepolia.infura.io"]);
        assert_eq!(descriptor.block_explorer_urls, vec!["https://sepolia.etherscan.io"]);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [admin]
            address = "0xABC0000000000000000000000000000000000001"
            "#,
        )
        .unwrap();
        assert_eq!(config.network.chain_id, 11_155_111);
        assert_eq!(config.wallet.request_timeout_secs, 120);
        assert!(config.contract.address.is_empty());
    }
}
