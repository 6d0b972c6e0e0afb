//! Wallet session subsystem.
//!
//! # Data Flow
//! ```text
//! bootstrap.rs (network → accounts → signer/contract)
//!     → state.rs (Session in an ArcSwap, replaced whole)
//!     → contract.rs (CrimeReport binding for the active signer)
//!
//! accountsChanged
//!     → state.rs reducer (no wallet prompts)
//!     → contract.rs rebind
//! ```

pub mod bootstrap;
pub mod contract;
pub mod state;

pub use bootstrap::{AccountWatcher, BootstrapError, Bootstrapper, WalletConnection};
pub use contract::{ContractHandle, CrimeReport, SignerContext};
pub use state::{apply_accounts_changed, Session, SessionStore, NO_ACCOUNT};
