//! Error taxonomy shared across the core and the HTTP boundary

use thiserror::Error;

/// Errors surfaced by settlement, aggregation, and the boundary collaborators
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or expired identity token
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// Input violates the request schema or a settlement precondition
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Game type not in the supported set
    #[error("unsupported game type: {0}")]
    UnsupportedGameType(String),

    /// Role not in the supported set
    #[error("unsupported role: {0}")]
    UnsupportedRole(String),

    /// Referenced record does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Record owner does not match the authenticated identity
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// Document-store collaborator failure
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;
