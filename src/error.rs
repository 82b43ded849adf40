#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Raised while compiling or binding a filter: the value supplied for
    /// `field` does not fit the field's declared kind.
    #[error("Translation error on '{field}': {reason}")]
    Translation { field: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] duckdb::Error),

    /// A thread panicked while holding the root database handle.
    #[error("Storage lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CatalogError {
    pub(crate) fn translation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Translation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
