//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Login action (user / admin)
//!     → Bootstrapper (wallet session; required for admin only)
//!     → navigator.rs (pick destination)
//!     → auth.rs (admin only: case-insensitive address check)
//!     → Navigator (navigate) or Notifier (reject)
//! ```

pub mod auth;
pub mod navigator;

pub use auth::{AdminIdentity, AuthError, NOT_ADMIN_NOTICE};
pub use navigator::{dispatch, login, ConsoleNotifier, Dispatch, LoginAction, Navigator, Notifier, Route, UrlNavigator};
