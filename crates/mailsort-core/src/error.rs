//! Error types for mailsort

/// Result type alias using mailsort's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for mailsort operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Uploaded file has an extension we cannot read
    #[error("unsupported format '{0}', use .txt or .pdf")]
    UnsupportedFormat(String),

    /// Nothing left to classify after normalization
    #[error("empty content")]
    EmptyContent,

    /// Document text extraction failed
    #[error("could not extract text from document: {0}")]
    Extraction(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new unsupported-format error
    pub fn unsupported_format(name: impl Into<String>) -> Self {
        Self::UnsupportedFormat(name.into())
    }

    /// Create a new extraction error
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error was caused by the caller's input rather than by us
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat(_) | Self::EmptyContent | Self::Extraction(_)
        )
    }
}
