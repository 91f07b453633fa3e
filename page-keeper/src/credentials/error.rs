//! Credential error types.

use thiserror::Error;

/// The authority could not answer: transport failure, timeout, upstream
/// error, refused credential or malformed response.
///
/// This is the only failure of listing and lifetime inspection.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Authority unavailable: {0}")]
pub struct AuthorityUnavailable(pub String);

/// Failures of a proof exchange.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorityError {
    /// The login proof was rejected.
    #[error("Invalid proof: {0}")]
    InvalidProof(String),

    /// Transport failure, timeout, upstream error or malformed response.
    #[error("Authority unavailable: {0}")]
    Unavailable(String),
}

impl AuthorityError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<AuthorityUnavailable> for AuthorityError {
    fn from(err: AuthorityUnavailable) -> Self {
        Self::Unavailable(err.0)
    }
}

/// Errors surfaced by credential lifecycle operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The login proof was rejected - not retried.
    #[error("Invalid proof: {0}")]
    InvalidProof(String),

    #[error("Principal not found: {0}")]
    PrincipalNotFound(String),

    /// The authority no longer lists the resource for this principal - re-sync suggested.
    #[error("Resource {0} is not listed by the authority for this principal")]
    ResourceNotFoundRemotely(String),

    /// Retryable by the caller.
    #[error("Authority unavailable: {0}")]
    AuthorityUnavailable(String),

    #[error("Store error: {0}")]
    Store(#[from] crate::Error),
}

impl SyncError {
    /// Machine-readable error code.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidProof(_) => "INVALID_PROOF",
            Self::PrincipalNotFound(_) => "PRINCIPAL_NOT_FOUND",
            Self::ResourceNotFoundRemotely(_) => "RESOURCE_NOT_FOUND_REMOTELY",
            Self::AuthorityUnavailable(_) => "AUTHORITY_UNAVAILABLE",
            Self::Store(_) => "STORE_ERROR",
        }
    }

    /// Check if this error is transient and may be retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::AuthorityUnavailable(_))
    }
}

impl From<AuthorityError> for SyncError {
    fn from(err: AuthorityError) -> Self {
        match err {
            AuthorityError::InvalidProof(msg) => Self::InvalidProof(msg),
            AuthorityError::Unavailable(msg) => Self::AuthorityUnavailable(msg),
        }
    }
}

impl From<AuthorityUnavailable> for SyncError {
    fn from(err: AuthorityUnavailable) -> Self {
        Self::AuthorityUnavailable(err.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authority_error_mapping() {
        let err: SyncError = AuthorityError::InvalidProof("bad".into()).into();
        assert_eq!(err.kind(), "INVALID_PROOF");
        assert!(!err.is_transient());

        let err: SyncError = AuthorityError::Unavailable("timeout".into()).into();
        assert_eq!(err.kind(), "AUTHORITY_UNAVAILABLE");
        assert!(err.is_transient());

        let err: SyncError = AuthorityUnavailable("token revoked".into()).into();
        assert_eq!(err.kind(), "AUTHORITY_UNAVAILABLE");
    }

    #[test]
    fn test_store_error_kind() {
        let err: SyncError = crate::Error::Other("disk full".into()).into();
        assert_eq!(err.kind(), "STORE_ERROR");
        assert!(!err.is_transient());
    }
}
