//! Waitlist core library
//!
//! Collects email signups for a pre-launch waitlist and serves a small JSON
//! API over a shared set-membership store.
//!
//! ## Modules
//! - **`core_email`**: normalization and validation of raw email input.
//! - **`core_store`**: the storage contract plus in-memory and Upstash Redis implementations.
//! - **`core_waitlist`**: axum router, handlers, error mapping and server.
//! - **`config`**, **`logging`**, **`telemetry`**, **`shutdown`**: process plumbing.

pub mod config;
pub mod core_email;
pub mod core_store;
pub mod core_waitlist;
pub mod logging;
pub mod shutdown;
pub mod telemetry;

pub use core_email::{normalize, Email, EmailRejected};
pub use core_store::{MemoryStore, UpstashStore, WaitlistStore};
pub use core_waitlist::{build_router, AppState, WaitlistError, WaitlistServer};
pub use logging::{init_logging, LogLevel};
