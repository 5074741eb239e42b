use std::fmt;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, MockError>;

/// Failure taxonomy for every mock operation.
///
/// Each variant maps to one HTTP status via [`MockError::status_code`] and is
/// rendered into the `{ code: 1, data: null, msg }` envelope at the server
/// boundary. None of them are fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    /// Malformed or missing caller input (empty description, bad path, ...)
    Validation(String),
    /// The text-generation backend failed or produced unusable output
    ///
    /// A generation failure discards the whole batch; nothing is persisted.
    Generation(String),
    /// Lookup by id or by path/method found nothing
    NotFound(String),
    /// File read/write/parse failure with no usable backup
    Storage(String),
}

impl MockError {
    pub fn validation<S: Into<String>>(msg: S) -> Self {
        Self::Validation(msg.into())
    }

    pub fn generation<S: Into<String>>(msg: S) -> Self {
        Self::Generation(msg.into())
    }

    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn storage<S: Into<String>>(msg: S) -> Self {
        Self::Storage(msg.into())
    }

    /// HTTP status used when this error reaches the server boundary.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            MockError::Validation(_) => 400,
            MockError::NotFound(_) => 404,
            MockError::Generation(_) | MockError::Storage(_) => 500,
        }
    }

    /// Human-readable message without the category prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            MockError::Validation(msg)
            | MockError::Generation(msg)
            | MockError::NotFound(msg)
            | MockError::Storage(msg) => msg,
        }
    }
}

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MockError::Validation(msg) => write!(f, "validation failed: {msg}"),
            MockError::Generation(msg) => write!(f, "generation failed: {msg}"),
            MockError::NotFound(msg) => write!(f, "not found: {msg}"),
            MockError::Storage(msg) => write!(f, "storage failure: {msg}"),
        }
    }
}

impl std::error::Error for MockError {}
