use thiserror::Error;

/// Failures surfaced by the HTTP helpers, the session store and configuration.
/// Messages are shown to users as transient notices, so they must never carry
/// token material.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    /// HTTP status carried by the error, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend refused the bearer token; views treat this as an
    /// expired session.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Input rejected before any network call is made.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Enter a valid email")]
    InvalidEmail,
    #[error("Enter all 6 digits of the code")]
    IncompleteCode,
    #[error("Select at least one file")]
    NoFiles,
    #[error("You can only upload {max} files")]
    TooManyFiles { max: usize },
    #[error("{name} is not a supported file type (.csv, .xlsx, .xls)")]
    UnsupportedFileType { name: String },
    #[error("{name} is smaller than the minimum of {min_bytes} bytes")]
    FileTooSmall { name: String, min_bytes: u64 },
    #[error("Selected files exceed the total limit of {max_bytes} bytes")]
    TotalSizeExceeded { max_bytes: u64 },
}
