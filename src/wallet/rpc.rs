//! EIP-1193 wallet bridged over JSON-RPC.
//!
//! # Responsibilities
//! - Connect to a wallet that exposes its provider over HTTP (e.g. Frame)
//! - Forward `wallet_*` / `eth_requestAccounts` requests with timeouts
//! - Surface wallet error codes untouched
//! - Poll `eth_accounts` to emulate `accountsChanged`

use std::time::Duration;

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::transports::{RpcError, TransportError};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::timeout;

use crate::config::WalletConfig;
use crate::observability::metrics;
use crate::wallet::provider::WalletProvider;
use crate::wallet::subscription::{
    AccountsSubscription, ActiveAccountFilter, ACCOUNTS_CHANNEL_CAPACITY,
};
use crate::wallet::types::{ChainId, NetworkDescriptor, WalletError, WalletResult};

/// Wallet reached through its JSON-RPC endpoint.
#[derive(Clone)]
pub struct RpcWallet {
    provider: DynProvider,
    endpoint: url::Url,
    request_timeout: Duration,
    poll_interval: Duration,
}

impl RpcWallet {
    /// Build a wallet handle. Does not touch the network.
    pub fn new(config: &WalletConfig) -> WalletResult<Self> {
        let endpoint: url::Url = config.endpoint.parse().map_err(|e| {
            WalletError::Transport(format!("Invalid wallet endpoint '{}': {}", config.endpoint, e))
        })?;
        let provider = ProviderBuilder::new().connect_http(endpoint.clone()).erased();

        Ok(Self {
            provider,
            endpoint,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            poll_interval: Duration::from_millis(config.account_poll_interval_ms),
        })
    }

    /// Probe the endpoint and return a wallet only if something answers.
    ///
    /// This is the "is a provider injected?" check: no answer within
    /// `detect_timeout_secs` means no wallet.
    pub async fn detect(config: &WalletConfig) -> Option<Self> {
        let wallet = match Self::new(config) {
            Ok(wallet) => wallet,
            Err(e) => {
                tracing::error!(error = %e, "Wallet endpoint misconfigured");
                return None;
            }
        };

        let probe = wallet.provider.get_chain_id();
        match timeout(Duration::from_secs(config.detect_timeout_secs), probe).await {
            Ok(Ok(chain_id)) => {
                tracing::info!(
                    endpoint = %wallet.endpoint,
                    chain_id = chain_id,
                    "Wallet provider detected"
                );
                Some(wallet)
            }
            Ok(Err(e)) => {
                tracing::warn!(endpoint = %wallet.endpoint, error = %e, "Wallet probe failed");
                None
            }
            Err(_) => {
                tracing::warn!(endpoint = %wallet.endpoint, "Wallet probe timed out");
                None
            }
        }
    }

    /// Wallet endpoint.
    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    async fn call(&self, method: &'static str, params: Value) -> WalletResult<Value> {
        let fut = self.provider.raw_request::<_, Value>(method.into(), params);
        let result = match timeout(self.request_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(map_rpc_error(e)),
            Err(_) => Err(WalletError::Timeout(self.request_timeout.as_secs())),
        };

        metrics::record_wallet_request(method, result.is_ok());
        if let Err(e) = &result {
            tracing::debug!(method = method, error = %e, "Wallet request failed");
        }
        result
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn switch_chain(&self, chain_id: ChainId) -> WalletResult<()> {
        self.call(
            "wallet_switchEthereumChain",
            json!([{ "chainId": chain_id.to_hex() }]),
        )
        .await
        .map(|_| ())
    }

    async fn add_chain(&self, network: &NetworkDescriptor) -> WalletResult<()> {
        let descriptor = serde_json::to_value(network)
            .map_err(|e| WalletError::InvalidResponse(format!("descriptor encoding: {e}")))?;
        self.call("wallet_addEthereumChain", Value::Array(vec![descriptor]))
            .await
            .map(|_| ())
    }

    async fn request_accounts(&self) -> WalletResult<Vec<String>> {
        let value = self.call("eth_requestAccounts", json!([])).await?;
        parse_accounts(value)
    }

    fn subscribe_accounts(&self, active: Option<&str>) -> AccountsSubscription {
        let (tx, rx) = tokio::sync::mpsc::channel(ACCOUNTS_CHANNEL_CAPACITY);
        let wallet = self.clone();
        let mut filter = ActiveAccountFilter::new(active);

        let producer = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(wallet.poll_interval);

            loop {
                ticker.tick().await;
                if tx.is_closed() {
                    break;
                }

                let accounts = match wallet.call("eth_accounts", json!([])).await.and_then(parse_accounts) {
                    Ok(accounts) => accounts,
                    Err(e) => {
                        tracing::debug!(error = %e, "Account poll failed");
                        continue;
                    }
                };

                if !filter.observe(&accounts) {
                    continue;
                }

                if tx.send(accounts).await.is_err() {
                    break;
                }
            }
            tracing::debug!("Account poller stopped");
        });

        AccountsSubscription::new(rx, Some(producer))
    }

    fn chain_provider(&self) -> DynProvider {
        self.provider.clone()
    }
}

impl std::fmt::Debug for RpcWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcWallet")
            .field("endpoint", &self.endpoint.as_str())
            .field("request_timeout_secs", &self.request_timeout.as_secs())
            .field("poll_interval_ms", &self.poll_interval.as_millis())
            .finish()
    }
}

fn map_rpc_error(err: TransportError) -> WalletError {
    match err {
        RpcError::ErrorResp(payload) => WalletError::Rpc {
            code: payload.code,
            message: payload.message.to_string(),
        },
        RpcError::DeserError { err, text } => {
            WalletError::InvalidResponse(format!("{err}: {text}"))
        }
        other => WalletError::Transport(other.to_string()),
    }
}

fn parse_accounts(value: Value) -> WalletResult<Vec<String>> {
    serde_json::from_value(value)
        .map_err(|e| WalletError::InvalidResponse(format!("account list: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::rpc::json_rpc::ErrorPayload;

    fn test_config() -> WalletConfig {
        WalletConfig {
            endpoint: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: 1,
            detect_timeout_secs: 1,
            account_poll_interval_ms: 50,
        }
    }

    #[test]
    fn test_invalid_endpoint() {
        let mut config = test_config();
        config.endpoint = "::not a url::".to_string();
        let err = RpcWallet::new(&config).unwrap_err();
        assert!(err.to_string().contains("Invalid wallet endpoint"));
    }

    #[test]
    fn test_error_payload_keeps_code() {
        let payload = ErrorPayload {
            code: 4902,
            message: "Unrecognized chain ID \"0xaa36a7\"".into(),
            data: None,
        };
        let err = map_rpc_error(RpcError::ErrorResp(payload));
        assert!(err.is_unrecognized_chain());
    }

    #[test]
    fn test_parse_accounts_keeps_case() {
        let accounts = parse_accounts(json!(["0xAbC0000000000000000000000000000000000001"])).unwrap();
        assert_eq!(accounts[0], "0xAbC0000000000000000000000000000000000001");
        assert!(parse_accounts(json!({"not": "a list"})).is_err());
    }

    #[tokio::test]
    async fn test_detect_without_wallet() {
        // Nothing listens on port 1.
        assert!(RpcWallet::detect(&test_config()).await.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_wallet_is_transport_error() {
        let wallet = RpcWallet::new(&test_config()).unwrap();
        let err = wallet.switch_chain(ChainId(11_155_111)).await.unwrap_err();
        assert!(matches!(err, WalletError::Transport(_) | WalletError::Timeout(_)));
        assert!(!err.is_unrecognized_chain());
    }
}
