use std::fmt;
use std::io;
use thiserror::Error;
use async_openai::error::OpenAIError;

/// Custom result type alias for the application
pub type Result<T> = std::result::Result<T, NavigatorError>;

/// Errors that can occur while browsing, analyzing or summarizing a repository
#[derive(Debug, Error)]
pub enum NavigatorError {
    /// The repository or path does not exist on the hosting provider
    #[error("Not found: {0}")]
    NotFound(String),

    /// The provider rejected the credential (or one was required and missing)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-2xx answer from the hosting provider
    #[error("GitHub API error (HTTP {status}): {message}")]
    Provider {
        /// HTTP status returned by the provider
        status: u16,
        /// Provider supplied message, if any
        message: String,
    },

    /// A file was requested but the path resolved to a directory
    #[error("Not a file: {0}")]
    NotAFile(String),

    /// The path does not carry the extension required by the analyzer
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// The source could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// The AI provider call failed
    #[error("AI provider error: {0}")]
    ExternalApi(String),

    /// Missing or invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),

    /// HTTP transport errors talking to the hosting provider
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// YAML serialization errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// OpenAI API errors
    #[error("OpenAI error: {0}")]
    OpenAI(#[from] OpenAIError),

    /// I/O errors
    #[error("IO error: {0}")]
    IO(#[from] io::Error),
}

/// Coarse error category handed to the transport layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Target path or repository absent
    NotFound,
    /// Missing or bad credential
    Unauthorized,
    /// Other hosting provider failure
    ProviderError,
    /// Path resolved to a directory where a file was expected
    NotAFile,
    /// Extension precondition failed
    UnsupportedFileType,
    /// Syntactically invalid source
    ParseError,
    /// AI provider failure, including missing configuration
    ExternalApiError,
    /// Caller supplied malformed input
    ValidationError,
    /// Uncategorized
    InternalError,
}

impl ErrorKind {
    /// Stable name used in error bodies
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::Unauthorized => "Unauthorized",
            Self::ProviderError => "ProviderError",
            Self::NotAFile => "NotAFile",
            Self::UnsupportedFileType => "UnsupportedFileType",
            Self::ParseError => "ParseError",
            Self::ExternalApiError => "ExternalAPIError",
            Self::ValidationError => "ValidationError",
            Self::InternalError => "InternalError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl NavigatorError {
    /// Collapses the error into the category the boundary layer maps to a status code
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Provider { .. } | Self::Http(_) => ErrorKind::ProviderError,
            Self::NotAFile(_) => ErrorKind::NotAFile,
            Self::UnsupportedFileType(_) => ErrorKind::UnsupportedFileType,
            Self::Parse(_) => ErrorKind::ParseError,
            Self::ExternalApi(_) | Self::Config(_) | Self::OpenAI(_) => ErrorKind::ExternalApiError,
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::Internal(_) | Self::Yaml(_) | Self::UrlParse(_) | Self::IO(_) => {
                ErrorKind::InternalError
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapped_errors_are_internal() {
        let err: NavigatorError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, NavigatorError::UrlParse(_)));
        assert_eq!(err.kind(), ErrorKind::InternalError);

        let err: NavigatorError = io::Error::new(io::ErrorKind::AddrInUse, "busy").into();
        assert_eq!(err.kind(), ErrorKind::InternalError);
        assert_eq!(err.to_string(), "IO error: busy");
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(NavigatorError::NotFound("x".into()).kind(), ErrorKind::NotFound);
        assert_eq!(
            NavigatorError::Provider { status: 500, message: "boom".into() }.kind(),
            ErrorKind::ProviderError
        );
        assert_eq!(
            NavigatorError::Config("OpenAI API key not configured.".into()).kind(),
            ErrorKind::ExternalApiError
        );
        assert_eq!(NavigatorError::Parse("bad".into()).kind(), ErrorKind::ParseError);
        assert_eq!(NavigatorError::Internal("oops".into()).kind(), ErrorKind::InternalError);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::ExternalApiError.to_string(), "ExternalAPIError");
        assert_eq!(ErrorKind::UnsupportedFileType.as_str(), "UnsupportedFileType");
    }

    #[test]
    fn test_provider_display() {
        let err = NavigatorError::Provider {
            status: 403,
            message: "API rate limit exceeded".into(),
        };
        assert_eq!(err.to_string(), "GitHub API error (HTTP 403): API rate limit exceeded");
    }
}
