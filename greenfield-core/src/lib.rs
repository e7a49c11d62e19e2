pub mod events;
pub mod repository;
pub mod identity;
pub mod credentials;
pub mod payment;
pub mod memory;

/// Failure taxonomy shared by every service in the workspace. The HTTP layer
/// maps each variant onto one status code and a `{message}` body.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    AuthenticationError(String),
    #[error("{0}")]
    AuthorizationError(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Unconfigured(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

pub use identity::{Account, Role};
