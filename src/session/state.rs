//! Session state and the account-change reducer.

use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Placeholder shown when no account is active.
pub const NO_ACCOUNT: &str = "none";

/// Connection state of the current page session. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Correlation id for log events of this session.
    pub id: Uuid,
    /// Active account, if any. Serialized as `"none"` when absent.
    #[serde(serialize_with = "serialize_address")]
    pub active_address: Option<String>,
    /// Whether an account is currently connected.
    pub is_connected: bool,
}

impl Session {
    /// Empty session, as created at load.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            active_address: None,
            is_connected: false,
        }
    }

    /// Session after a successful connect. The address is lower-cased.
    pub fn connect(&self, address: &str) -> Self {
        Self {
            id: self.id,
            active_address: Some(address.to_lowercase()),
            is_connected: true,
        }
    }

    /// Session with no active account.
    pub fn disconnect(&self) -> Self {
        Self {
            id: self.id,
            active_address: None,
            is_connected: false,
        }
    }

    /// Active address as stored, or `"none"`.
    pub fn display_address(&self) -> &str {
        self.active_address.as_deref().unwrap_or(NO_ACCOUNT)
    }

    /// Active address lower-cased, for comparisons.
    pub fn normalized_address(&self) -> Option<String> {
        self.active_address.as_deref().map(str::to_lowercase)
    }
}

fn serialize_address<S: Serializer>(address: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(address.as_deref().unwrap_or(NO_ACCOUNT))
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply an `accountsChanged` notification.
///
/// The first reported account becomes active as reported (no case change);
/// an empty list disconnects.
pub fn apply_accounts_changed(session: &Session, accounts: &[String]) -> Session {
    match accounts.first() {
        Some(first) => Session {
            id: session.id,
            active_address: Some(first.clone()),
            is_connected: true,
        },
        None => session.disconnect(),
    }
}

/// Shared, atomically replaced session value.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: ArcSwap<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            inner: ArcSwap::from_pointee(Session::new()),
        }
    }

    /// Current session.
    pub fn snapshot(&self) -> Arc<Session> {
        self.inner.load_full()
    }

    /// Replace the session with `f(current)` and return the value this call
    /// stored. `f` may run more than once under contention.
    pub fn update<F>(&self, f: F) -> Arc<Session>
    where
        F: Fn(&Session) -> Session,
    {
        let mut stored = None;
        self.inner.rcu(|current| {
            let next = Arc::new(f(current.as_ref()));
            stored = Some(Arc::clone(&next));
            next
        });
        stored.unwrap_or_else(|| self.inner.load_full())
    }
}
