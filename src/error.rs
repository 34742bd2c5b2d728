use thiserror::Error;

/// Failure of a call made through the API layer or one of the user services.
///
/// Cloneable so results can travel inside UI messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (DNS, refused connection, timeout, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// A success response whose body is not the JSON we expected.
    #[error("invalid response body: {0}")]
    Parse(String),

    /// Mutation target missing from the in-memory user list.
    #[error("User not found: {id}")]
    NotFoundLocal { id: u64 },

    /// The local credential store could not be read or written.
    #[error("storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// HTTP status for server-side failures, `None` for everything else.
    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[cfg(test)]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError::Storage(err.to_string())
    }
}
