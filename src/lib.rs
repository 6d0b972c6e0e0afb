//! Crime Alert wallet onboarding.
//!
//! Aligns an EIP-1193 wallet with the reporting network, obtains account
//! access, binds the crime-report contract to the wallet's signer, and routes
//! visitors to the user or admin dashboard.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod session;
pub mod wallet;

pub use config::AppConfig;
pub use lifecycle::Shutdown;
pub use session::{Bootstrapper, Session};
pub use wallet::{RpcWallet, WalletProvider};
