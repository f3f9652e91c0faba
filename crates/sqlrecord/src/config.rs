//! Session configuration.

use sqlrecord_query::Dialect;

/// Configuration for a [`RecordSession`](crate::RecordSession).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Placeholder and quoting style of the target database.
    pub dialect: Dialect,
    /// Parameters printed per logged statement before the rest are elided.
    pub log_param_limit: usize,
    /// Whether executed statements are logged at all.
    pub log_statements: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::Postgres,
            log_param_limit: 10,
            log_statements: true,
        }
    }
}
