//! Errors raised while installing the log subscriber

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoggingError {
    /// `tracing` refused the subscriber, usually because one is already global
    #[error("cannot install log subscriber: {0}")]
    SubscriberInit(String),

    #[error("unknown log level '{0}'")]
    UnknownLevel(String),
}
