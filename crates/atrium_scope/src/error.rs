//! Error types for scope lifecycle operations.

use crate::session::SessionId;

/// Errors that can occur during scope host operations.
#[derive(Debug, thiserror::Error)]
pub enum ScopeError {
    /// The application scope was already started.
    #[error("application scope already started")]
    AlreadyStarted,

    /// The operation requires a running application scope.
    #[error("application scope not started")]
    NotStarted,

    /// The application scope has been shut down; the host is terminal.
    #[error("application scope terminated")]
    Terminated,

    /// The requested session does not exist (destroyed, expired, or unknown).
    #[error("session not found: {0}")]
    SessionNotFound(SessionId),
}
