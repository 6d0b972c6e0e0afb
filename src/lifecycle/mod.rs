//! Lifecycle management.
//!
//! ```text
//! Startup:  load config → init logging/metrics → detect wallet → bootstrap
//! Shutdown: signal received → watchers stop → exit
//! ```

pub mod shutdown;

pub use shutdown::{wait_for_signal, Shutdown};
