use crate::store::StoreError;

#[derive(Debug)]
pub enum ResolverError {
    /// A date-range precondition was violated. Raised before any store access.
    InvalidArgument(String),
    /// Passed through unchanged from a repository.
    Store(StoreError),
}

impl std::fmt::Display for ResolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolverError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            ResolverError::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for ResolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolverError::Store(e) => Some(e),
            ResolverError::InvalidArgument(_) => None,
        }
    }
}

impl From<StoreError> for ResolverError {
    fn from(e: StoreError) -> Self {
        ResolverError::Store(e)
    }
}
