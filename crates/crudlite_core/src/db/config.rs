//! Connection settings applied right after the store is opened.

use std::time::Duration;

const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-connection configuration for a [`crate::Database`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout: Duration,
    /// Enables `PRAGMA foreign_keys` on the connection.
    pub foreign_keys: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
            foreign_keys: true,
        }
    }
}

impl DatabaseConfig {
    pub fn with_busy_timeout(mut self, busy_timeout: Duration) -> Self {
        self.busy_timeout = busy_timeout;
        self
    }

    pub fn with_foreign_keys(mut self, enabled: bool) -> Self {
        self.foreign_keys = enabled;
        self
    }
}
