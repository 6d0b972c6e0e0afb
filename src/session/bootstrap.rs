//! Wallet session bootstrap.
//!
//! # Sequence
//! ```text
//! provider present?
//!     → wallet_switchEthereumChain(target)
//!         └─ 4902 → wallet_addEthereumChain(descriptor)
//!     → eth_requestAccounts
//!     → lower-case first account → session
//!     → signer + contract handle
//!     → accountsChanged watcher
//! ```
//!
//! Each step waits for the previous one. Nothing is retried; failures are
//! logged and returned as [`BootstrapError`].
//!
//! Account changes bump an epoch under a lock. A bootstrap commits its
//! account only if no change arrived since it asked the wallet, so a
//! notification is never overwritten by an older `eth_requestAccounts` answer.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use alloy::primitives::Address;
use arc_swap::ArcSwapOption;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::observability::metrics;
use crate::session::contract::{ContractHandle, SignerContext};
use crate::session::state::{apply_accounts_changed, Session, SessionStore};
use crate::wallet::{NetworkDescriptor, WalletError, WalletProvider};

/// Errors that abort a bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// No wallet in the execution environment.
    #[error("Wallet provider unavailable")]
    ProviderUnavailable,

    /// Another bootstrap is still running.
    #[error("Bootstrap already in progress")]
    InProgress,

    /// Switching networks failed for a reason other than an unknown chain.
    #[error("Failed to switch network: {0}")]
    SwitchFailed(#[source] WalletError),

    /// The wallet refused to register the network.
    #[error("Failed to add network: {0}")]
    RegistrationFailed(#[source] WalletError),

    /// `eth_requestAccounts` failed.
    #[error("Account request failed: {0}")]
    AccountRequest(#[source] WalletError),

    /// The wallet authorized no account.
    #[error("Wallet returned no accounts")]
    NoAccounts,

    /// The wallet returned something that is not an address.
    #[error("Invalid account address '{0}'")]
    InvalidAccount(String),

    /// The active account changed while the bootstrap was waiting on the
    /// wallet, and the newer account left no usable connection.
    #[error("Active account changed during bootstrap")]
    AccountChanged,
}

impl BootstrapError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable => "provider_unavailable",
            Self::InProgress => "in_progress",
            Self::SwitchFailed(_) => "switch_failed",
            Self::RegistrationFailed(_) => "registration_failed",
            Self::AccountRequest(_) => "account_request_failed",
            Self::NoAccounts => "no_accounts",
            Self::InvalidAccount(_) => "invalid_account",
            Self::AccountChanged => "account_changed",
        }
    }
}

/// Signer and contract handle for the active account.
#[derive(Debug, Clone)]
pub struct WalletConnection {
    pub signer: SignerContext,
    pub contract: ContractHandle,
}

/// Drives the wallet through network alignment and account access, and keeps
/// the session in step with the wallet afterwards.
pub struct Bootstrapper {
    wallet: Option<Arc<dyn WalletProvider>>,
    network: NetworkDescriptor,
    contract_address: Address,
    session: SessionStore,
    connection: ArcSwapOption<WalletConnection>,
    in_progress: AtomicBool,
    account_epoch: Mutex<u64>,
}

impl Bootstrapper {
    /// `wallet` is `None` when no provider was detected.
    pub fn new(
        wallet: Option<Arc<dyn WalletProvider>>,
        network: NetworkDescriptor,
        contract_address: Address,
    ) -> Self {
        Self {
            wallet,
            network,
            contract_address,
            session: SessionStore::new(),
            connection: ArcSwapOption::empty(),
            in_progress: AtomicBool::new(false),
            account_epoch: Mutex::new(0),
        }
    }

    /// Current session.
    pub fn session(&self) -> Arc<Session> {
        self.session.snapshot()
    }

    /// Signer and contract for the active account, once connected.
    pub fn connection(&self) -> Option<Arc<WalletConnection>> {
        self.connection.load_full()
    }

    /// Whether a bootstrap is running right now.
    pub fn is_bootstrapping(&self) -> bool {
        self.in_progress.load(Ordering::Acquire)
    }

    /// Full sequence: bootstrap, then watch for account changes until
    /// `shutdown` fires or the watcher is dropped.
    pub async fn connect(
        self: &Arc<Self>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(Arc<WalletConnection>, AccountWatcher), BootstrapError> {
        let connection = self.bootstrap().await?;
        let watcher = self
            .watch_accounts(shutdown)
            .ok_or(BootstrapError::ProviderUnavailable)?;
        Ok((connection, watcher))
    }

    /// One-shot initializer: align network, request accounts, bind contract.
    ///
    /// Returns [`BootstrapError::InProgress`] without touching the wallet if
    /// another bootstrap has not finished.
    pub async fn bootstrap(&self) -> Result<Arc<WalletConnection>, BootstrapError> {
        let session_id = self.session.snapshot().id;
        let result = self.run_bootstrap().await;

        match &result {
            Ok(connection) => {
                metrics::record_bootstrap("connected");
                tracing::info!(
                    session_id = %session_id,
                    account = %connection.signer.address(),
                    contract = %connection.contract.address(),
                    chain_id = %self.network.chain_id,
                    "Wallet session established"
                );
            }
            Err(BootstrapError::InProgress) => {
                metrics::record_bootstrap(BootstrapError::InProgress.kind());
                tracing::debug!(session_id = %session_id, "Bootstrap skipped, already running");
            }
            Err(e) => {
                metrics::record_bootstrap(e.kind());
                tracing::error!(session_id = %session_id, error = %e, "Wallet bootstrap failed");
            }
        }

        result
    }

    async fn run_bootstrap(&self) -> Result<Arc<WalletConnection>, BootstrapError> {
        let wallet = self.wallet.as_ref().ok_or(BootstrapError::ProviderUnavailable)?;
        let _guard = InProgressGuard::acquire(&self.in_progress).ok_or(BootstrapError::InProgress)?;

        self.align_network(wallet.as_ref()).await?;

        let epoch = *self.epoch();
        let accounts = wallet
            .request_accounts()
            .await
            .map_err(BootstrapError::AccountRequest)?;
        let raw = accounts.first().ok_or(BootstrapError::NoAccounts)?;
        let account: Address = raw
            .parse()
            .map_err(|_| BootstrapError::InvalidAccount(raw.clone()))?;

        let connection = Arc::new(self.bind(wallet.as_ref(), account));

        let latest = self.epoch();
        if *latest != epoch {
            tracing::info!(
                requested = %raw,
                active = %self.session.snapshot().display_address(),
                "Account changed during bootstrap, keeping the newer account"
            );
            return self.connection.load_full().ok_or(BootstrapError::AccountChanged);
        }
        self.session.update(|s| s.connect(raw));
        self.connection.store(Some(connection.clone()));
        drop(latest);

        Ok(connection)
    }

    fn epoch(&self) -> MutexGuard<'_, u64> {
        self.account_epoch.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn align_network(&self, wallet: &dyn WalletProvider) -> Result<(), BootstrapError> {
        let chain_id = self.network.chain_id;

        match wallet.switch_chain(chain_id).await {
            Ok(()) => {
                tracing::debug!(chain_id = %chain_id, "Wallet on target network");
                Ok(())
            }
            Err(e) if e.is_unrecognized_chain() => {
                tracing::info!(
                    chain_id = %chain_id,
                    chain_name = %self.network.chain_name,
                    "Network unknown to wallet, registering it"
                );
                wallet
                    .add_chain(&self.network)
                    .await
                    .map_err(BootstrapError::RegistrationFailed)
            }
            Err(e) => Err(BootstrapError::SwitchFailed(e)),
        }
    }

    fn bind(&self, wallet: &dyn WalletProvider, account: Address) -> WalletConnection {
        let signer = SignerContext::new(account, wallet.chain_provider());
        let contract = ContractHandle::bind(self.contract_address, signer.clone());
        WalletConnection { signer, contract }
    }

    /// Apply an `accountsChanged` notification.
    ///
    /// Never prompts the wallet. A parsable new account gets a freshly bound
    /// signer and contract; an empty list drops the connection.
    pub fn on_accounts_changed(&self, accounts: &[String]) -> Arc<Session> {
        let mut epoch = self.epoch();
        *epoch += 1;

        let session = self.session.update(|s| apply_accounts_changed(s, accounts));

        let rebound = match (&self.wallet, accounts.first()) {
            (Some(wallet), Some(raw)) => match raw.parse::<Address>() {
                Ok(account) => Some(Arc::new(self.bind(wallet.as_ref(), account))),
                Err(_) => {
                    tracing::warn!(account = %raw, "Wallet reported an unparsable account");
                    None
                }
            },
            _ => None,
        };
        self.connection.store(rebound);
        drop(epoch);

        metrics::record_account_change(session.is_connected);
        tracing::info!(
            session_id = %session.id,
            account = %session.display_address(),
            connected = session.is_connected,
            "Active account changed"
        );

        session
    }

    /// Start the account watcher. `None` without a wallet.
    ///
    /// The subscription starts from the session's current account, so a
    /// switch made before the watcher existed is still delivered.
    pub fn watch_accounts(
        self: &Arc<Self>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Option<AccountWatcher> {
        let wallet = self.wallet.as_ref()?;
        let active = self.session.snapshot();
        let mut subscription = wallet.subscribe_accounts(active.active_address.as_deref());
        let this = Arc::clone(self);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    next = subscription.recv() => match next {
                        Some(accounts) => {
                            this.on_accounts_changed(&accounts);
                        }
                        None => {
                            tracing::debug!("Account subscription closed by wallet");
                            break;
                        }
                    },
                    _ = shutdown.recv() => {
                        tracing::debug!("Account watcher received shutdown signal");
                        break;
                    }
                }
            }
            subscription.unsubscribe();
        });

        Some(AccountWatcher { handle })
    }
}

impl std::fmt::Debug for Bootstrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bootstrapper")
            .field("has_wallet", &self.wallet.is_some())
            .field("chain_id", &self.network.chain_id)
            .field("contract_address", &self.contract_address)
            .field("session", &self.session.snapshot())
            .finish()
    }
}

/// Running account watcher. Dropping it stops the watch.
#[derive(Debug)]
pub struct AccountWatcher {
    handle: JoinHandle<()>,
}

impl AccountWatcher {
    /// Stop watching.
    pub fn cancel(self) {
        drop(self);
    }

    /// Wait for the watcher to end on its own (shutdown or closed subscription).
    pub async fn join(mut self) {
        if let Err(e) = (&mut self.handle).await {
            if e.is_panic() {
                tracing::error!(error = %e, "Account watcher panicked");
            } else {
                tracing::debug!(error = %e, "Account watcher cancelled");
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for AccountWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Holds the in-progress flag for the lifetime of one bootstrap.
struct InProgressGuard<'a>(&'a AtomicBool);

impl<'a> InProgressGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InProgressGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
