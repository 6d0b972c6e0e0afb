//! Wallet integration subsystem.
//!
//! # Data Flow
//! ```text
//! Wallet (EIP-1193 over JSON-RPC)
//!     → rpc.rs (requests with timeouts, error codes preserved)
//!     → provider.rs (capability trait consumed by the session bootstrapper)
//!     → subscription.rs (accountsChanged, cancellable)
//! ```
//!
//! # Constraints
//! - The wallet owns keys and prompts; this crate never sees a private key
//! - All wallet calls have configurable timeouts
//! - Error codes from the wallet are kept so callers can branch on them

pub mod provider;
pub mod rpc;
pub mod subscription;
pub mod types;

pub use provider::WalletProvider;
pub use rpc::RpcWallet;
pub use subscription::{AccountsSubscription, ActiveAccountFilter};
pub use types::{ChainId, NativeCurrency, NetworkDescriptor, WalletError, WalletResult};
