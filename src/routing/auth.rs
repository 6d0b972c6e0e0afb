//! Admin authorization.

use thiserror::Error;

use crate::session::Session;

/// Notice shown when a non-admin asks for the admin view.
pub const NOT_ADMIN_NOTICE: &str = "You are not an admin";

/// Reasons the admin view is refused. Non-fatal; nothing changes state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("{}", NOT_ADMIN_NOTICE)]
    NotConnected,

    #[error("{}", NOT_ADMIN_NOTICE)]
    NotAdmin { address: String },
}

/// The single address allowed into the admin view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminIdentity {
    normalized: String,
}

impl AdminIdentity {
    pub fn new(address: &str) -> Self {
        Self {
            normalized: address.trim().to_lowercase(),
        }
    }

    /// Lower-cased admin address.
    pub fn address(&self) -> &str {
        &self.normalized
    }

    /// Case-insensitive address comparison.
    pub fn is_admin(&self, address: &str) -> bool {
        !self.normalized.is_empty() && address.trim().to_lowercase() == self.normalized
    }

    /// Check the session's active account against the admin address.
    pub fn authorize(&self, session: &Session) -> Result<(), AuthError> {
        let address = session.normalized_address().ok_or(AuthError::NotConnected)?;
        if self.is_admin(&address) {
            Ok(())
        } else {
            Err(AuthError::NotAdmin { address })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPPER: &str = "0xABC0000000000000000000000000000000000DEF";

    #[test]
    fn test_case_insensitive_both_ways() {
        let admin = AdminIdentity::new(UPPER);
        assert!(admin.is_admin(&UPPER.to_lowercase()));
        assert!(admin.is_admin(UPPER));

        let lower_admin = AdminIdentity::new(&UPPER.to_lowercase());
        assert!(lower_admin.is_admin(UPPER));
    }

    #[test]
    fn test_authorize_session() {
        let admin = AdminIdentity::new(UPPER);
        let session = Session::new().connect(&UPPER.to_lowercase());
        assert_eq!(admin.authorize(&session), Ok(()));

        // Raw mixed-case address from an account change still matches.
        let session = crate::session::apply_accounts_changed(&Session::new(), &[UPPER.to_string()]);
        assert_eq!(admin.authorize(&session), Ok(()));
    }

    #[test]
    fn test_reject_other_and_disconnected() {
        let admin = AdminIdentity::new(UPPER);
        let other = Session::new().connect("0x0000000000000000000000000000000000000001");
        let err = admin.authorize(&other).unwrap_err();
        assert!(matches!(err, AuthError::NotAdmin { .. }));
        assert_eq!(err.to_string(), "You are not an admin");

        let err = admin.authorize(&Session::new()).unwrap_err();
        assert_eq!(err, AuthError::NotConnected);
        assert_eq!(err.to_string(), NOT_ADMIN_NOTICE);
    }

    #[test]
    fn test_empty_admin_matches_nobody() {
        let admin = AdminIdentity::new("");
        assert!(!admin.is_admin(""));
    }
}
