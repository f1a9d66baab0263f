//! Metrics for the waitlist handlers
//!
//! Everything goes through the `metrics` facade. Without an installed
//! recorder the calls are no-ops, so handlers record unconditionally.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

pub const JOINS_NEW: &str = "waitlist.joins.new";
pub const JOINS_REPEAT: &str = "waitlist.joins.repeat";
pub const JOINS_REJECTED: &str = "waitlist.joins.rejected";
pub const LIST_UNAUTHORIZED: &str = "waitlist.list.unauthorized";
pub const STORE_ERRORS: &str = "waitlist.store.errors";
pub const METADATA_WRITE_FAILURES: &str = "waitlist.metadata.write_failures";
pub const STORE_DURATION_MS: &str = "waitlist.store.duration_ms";

/// Register metric descriptions with the installed recorder
pub fn init_metrics() {
    describe_counter!(JOINS_NEW, "Emails added to the waitlist for the first time");
    describe_counter!(JOINS_REPEAT, "Join requests for emails already on the waitlist");
    describe_counter!(JOINS_REJECTED, "Join requests rejected for malformed input");
    describe_counter!(LIST_UNAUTHORIZED, "List requests without a valid admin key");
    describe_counter!(STORE_ERRORS, "Store operations that failed a request");
    describe_counter!(
        METADATA_WRITE_FAILURES,
        "Metadata writes that failed after a successful join"
    );
    describe_histogram!(STORE_DURATION_MS, "Store operation duration in milliseconds");
}

/// Increment a counter by one
pub fn record_counter(name: &'static str) {
    counter!(name).increment(1);
}

/// Times a single store operation
pub struct OperationTimer {
    operation: &'static str,
    start: Instant,
}

impl OperationTimer {
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    /// Record the elapsed time, labelled by operation
    pub fn stop(self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!(STORE_DURATION_MS, "operation" => self.operation).record(elapsed_ms);
    }
}
