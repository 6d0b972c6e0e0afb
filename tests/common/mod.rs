//! Shared utilities for integration tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use tokio::sync::{mpsc, Notify};

use crime_alert::config::NetworkConfig;
use crime_alert::session::Bootstrapper;
use crime_alert::wallet::{
    AccountsSubscription, ChainId, NetworkDescriptor, WalletError, WalletProvider, WalletResult,
};

pub const CONTRACT: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// A wallet request as seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Switch(ChainId),
    Add(NetworkDescriptor),
    RequestAccounts,
}

/// Scriptable in-memory wallet.
pub struct MockWallet {
    accounts: Vec<String>,
    switch_error: Option<WalletError>,
    add_error: Option<WalletError>,
    account_gate: Option<Arc<Notify>>,
    calls: Mutex<Vec<Call>>,
    subscribers: Mutex<Vec<mpsc::Sender<Vec<String>>>>,
    baselines: Mutex<Vec<Option<String>>>,
    provider: DynProvider,
}

#[allow(dead_code)]
impl MockWallet {
    pub fn new(accounts: &[&str]) -> Self {
        let url: url::Url = "http://127.0.0.1:1".parse().unwrap();
        Self {
            accounts: accounts.iter().map(|a| a.to_string()).collect(),
            switch_error: None,
            add_error: None,
            account_gate: None,
            calls: Mutex::new(Vec::new()),
            subscribers: Mutex::new(Vec::new()),
            baselines: Mutex::new(Vec::new()),
            provider: ProviderBuilder::new().connect_http(url).erased(),
        }
    }

    /// Make `wallet_switchEthereumChain` fail with `code`.
    pub fn switch_fails(mut self, code: i64) -> Self {
        self.switch_error = Some(rpc_error(code));
        self
    }

    /// Make `wallet_addEthereumChain` fail with `code`.
    pub fn add_fails(mut self, code: i64) -> Self {
        self.add_error = Some(rpc_error(code));
        self
    }

    /// Hold `eth_requestAccounts` until the returned gate is notified.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.account_gate = Some(gate.clone());
        (self, gate)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Push an `accountsChanged` notification to every live subscriber.
    pub async fn emit(&self, accounts: &[&str]) {
        let senders: Vec<_> = self.subscribers.lock().unwrap().clone();
        let accounts: Vec<String> = accounts.iter().map(|a| a.to_string()).collect();
        for tx in senders {
            let _ = tx.send(accounts.clone()).await;
        }
    }

    /// Subscriptions not yet cancelled.
    pub fn open_subscriptions(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap()
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }

    /// Active account each subscriber started from, in subscription order.
    pub fn baselines(&self) -> Vec<Option<String>> {
        self.baselines.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    async fn switch_chain(&self, chain_id: ChainId) -> WalletResult<()> {
        self.record(Call::Switch(chain_id));
        match &self.switch_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn add_chain(&self, network: &NetworkDescriptor) -> WalletResult<()> {
        self.record(Call::Add(network.clone()));
        match &self.add_error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    async fn request_accounts(&self) -> WalletResult<Vec<String>> {
        self.record(Call::RequestAccounts);
        if let Some(gate) = &self.account_gate {
            gate.notified().await;
        }
        Ok(self.accounts.clone())
    }

    fn subscribe_accounts(&self, active: Option<&str>) -> AccountsSubscription {
        self.baselines.lock().unwrap().push(active.map(str::to_string));
        let (tx, subscription) = AccountsSubscription::channel();
        self.subscribers.lock().unwrap().push(tx);
        subscription
    }

    fn chain_provider(&self) -> DynProvider {
        self.provider.clone()
    }
}

pub fn rpc_error(code: i64) -> WalletError {
    WalletError::Rpc {
        code,
        message: format!("mock error {code}"),
    }
}

#[allow(dead_code)]
pub fn contract_address() -> Address {
    CONTRACT.parse().unwrap()
}

/// Bootstrapper over the given mock, targeting the default (Sepolia) network.
#[allow(dead_code)]
pub fn bootstrapper(wallet: Arc<MockWallet>) -> Arc<Bootstrapper> {
    Arc::new(Bootstrapper::new(
        Some(wallet as Arc<dyn WalletProvider>),
        NetworkConfig::default().descriptor(),
        contract_address(),
    ))
}

/// Poll `check` until it holds or a second passes.
#[allow(dead_code)]
pub async fn eventually<F: Fn() -> bool>(check: F) -> bool {
    for _ in 0..200 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}
