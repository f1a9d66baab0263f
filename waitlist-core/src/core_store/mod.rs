//! Waitlist storage
//!
//! The waitlist lives in an external key-value service under two key
//! families: one set holding every canonical email, and one metadata hash per
//! email. Handlers talk to it only through [`WaitlistStore`], which is
//! constructed once at startup and injected into the router state.

use async_trait::async_trait;
use std::collections::BTreeMap;

pub mod errors;
pub mod memory;
pub mod upstash;

pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use upstash::{UpstashConfig, UpstashStore};

use crate::core_email::Email;

/// Set holding every canonical email on the waitlist
pub const WAITLIST_SET_KEY: &str = "waitlist:emails";

const META_KEY_PREFIX: &str = "waitlist:meta:";

/// Field/value pairs of a metadata hash
pub type MetadataFields = BTreeMap<String, String>;

/// Metadata key for a canonical email
pub fn meta_key(email: &Email) -> String {
    format!("{}{}", META_KEY_PREFIX, email)
}

/// Metadata recorded the first time an email joins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinMetadata {
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
}

impl JoinMetadata {
    pub fn now() -> Self {
        Self {
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    pub fn to_fields(&self) -> MetadataFields {
        let mut fields = MetadataFields::new();
        fields.insert("createdAt".to_string(), self.created_at.to_string());
        fields
    }
}

/// Storage contract required by the waitlist handlers
///
/// Implementations must guarantee:
/// - `add_to_set` is an atomic insert-if-absent: for concurrent calls with the
///   same member exactly one caller observes `true`
/// - `set_cardinality` and `set_members` never observe a partial write
#[async_trait]
pub trait WaitlistStore: Send + Sync {
    /// Insert `member` into the set. Returns `true` iff it was not present.
    async fn add_to_set(&self, set_key: &str, member: &str) -> StoreResult<bool>;

    /// Number of members in the set (0 if the set does not exist)
    async fn set_cardinality(&self, set_key: &str) -> StoreResult<u64>;

    /// Snapshot of all members, in no particular order
    async fn set_members(&self, set_key: &str) -> StoreResult<Vec<String>>;

    /// Upsert fields of a metadata record.
    ///
    /// Write-once semantics are the caller's job: handlers only call this
    /// right after `add_to_set` returned `true`.
    async fn write_metadata(&self, meta_key: &str, fields: &MetadataFields) -> StoreResult<()>;
}
