//! Wallet provider capability.
//!
//! The wallet is an external collaborator (a browser extension or a desktop
//! wallet speaking EIP-1193). Everything the onboarding flow needs from it is
//! behind this trait so the flow can run against a substitute in tests.

use alloy::providers::DynProvider;
use async_trait::async_trait;

use crate::wallet::subscription::AccountsSubscription;
use crate::wallet::types::{ChainId, NetworkDescriptor, WalletResult};

#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// `wallet_switchEthereumChain`. Fails with code 4902 when the wallet
    /// does not know the chain.
    async fn switch_chain(&self, chain_id: ChainId) -> WalletResult<()>;

    /// `wallet_addEthereumChain` with the given descriptor.
    async fn add_chain(&self, network: &NetworkDescriptor) -> WalletResult<()>;

    /// `eth_requestAccounts`. May prompt the user. Returns raw addresses as
    /// reported, active account first.
    async fn request_accounts(&self) -> WalletResult<Vec<String>>;

    /// Subscribe to `accountsChanged` notifications.
    ///
    /// `active` is the account the caller already tracks; a wallet that has
    /// moved away from it by the time the subscription starts reports that
    /// as the first notification.
    fn subscribe_accounts(&self, active: Option<&str>) -> AccountsSubscription;

    /// Chain provider routed through the wallet, so transactions sent with a
    /// `from` account are signed by the wallet.
    fn chain_provider(&self) -> DynProvider;
}
