//! Cancellable account-change subscription.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Channel depth for account notifications. Slow consumers apply backpressure
/// to the producer rather than losing notifications.
pub const ACCOUNTS_CHANNEL_CAPACITY: usize = 16;

/// A live `accountsChanged` subscription.
///
/// Each notification is the raw account list reported by the wallet, first
/// entry being the active account. Dropping the subscription (or calling
/// [`AccountsSubscription::unsubscribe`]) closes the channel and stops any
/// background producer.
#[derive(Debug)]
pub struct AccountsSubscription {
    rx: mpsc::Receiver<Vec<String>>,
    producer: Option<JoinHandle<()>>,
}

impl AccountsSubscription {
    /// Wrap a receiver and, optionally, the task feeding it.
    pub fn new(rx: mpsc::Receiver<Vec<String>>, producer: Option<JoinHandle<()>>) -> Self {
        Self { rx, producer }
    }

    /// Create a subscription together with its sending half.
    pub fn channel() -> (mpsc::Sender<Vec<String>>, Self) {
        let (tx, rx) = mpsc::channel(ACCOUNTS_CHANNEL_CAPACITY);
        (tx, Self::new(rx, None))
    }

    /// Wait for the next notification. `None` once the producer is gone.
    pub async fn recv(&mut self) -> Option<Vec<String>> {
        self.rx.recv().await
    }

    /// Stop receiving notifications.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

/// Tracks the active account seen by a polling producer and reports only
/// real changes of it.
///
/// Seeded with the account the subscriber already holds, so a switch that
/// happens before the first poll is still reported.
#[derive(Debug, Clone, Default)]
pub struct ActiveAccountFilter {
    active: Option<String>,
}

impl ActiveAccountFilter {
    pub fn new(active: Option<&str>) -> Self {
        Self {
            active: active.map(str::to_lowercase),
        }
    }

    /// Record a polled account list. `true` when its first entry differs
    /// (case-insensitively) from the last known active account.
    pub fn observe(&mut self, accounts: &[String]) -> bool {
        let next = accounts.first().map(|a| a.to_lowercase());
        if next == self.active {
            return false;
        }
        self.active = next;
        true
    }
}

impl Drop for AccountsSubscription {
    fn drop(&mut self) {
        self.rx.close();
        if let Some(producer) = self.producer.take() {
            producer.abort();
        }
    }
}
