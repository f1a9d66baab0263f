//! Waitlist HTTP service
//!
//! Three stateless handlers over a shared [`WaitlistStore`]:
//!
//! - `POST /waitlist` joins the waitlist (idempotent per canonical email)
//! - `GET /waitlist-count` reports the number of signups
//! - `GET /waitlist-list` returns every signup, sorted; requires the admin key
//!
//! [`WaitlistStore`]: crate::core_store::WaitlistStore

pub mod api;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;
pub mod types;

pub use api::{build_router, ADMIN_KEY_HEADER};
pub use error::{WaitlistError, WaitlistResult};
pub use server::{store_from_config, WaitlistServer};
pub use state::AppState;
