use thiserror::Error;

/// Errors from the external provider traits.
///
/// None of these reach the end user while a fallback tier exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No credential is configured, so the provider must not be called.
    #[error("no provider credential is configured")]
    MissingCredential,

    /// The request carried no coordinates.
    #[error("at least one coordinate is required")]
    EmptyInput,

    /// Network-level failure (DNS, connection refused, TLS, etc.).
    #[error("network error requesting {url}: {message}")]
    Network {
        /// The URL that failed.
        url: String,
        /// Error message.
        message: String,
    },

    /// The request did not complete in time.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// The URL that timed out.
        url: String,
        /// Timeout in seconds.
        timeout_secs: u64,
    },

    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        /// The URL that failed.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The service reported an application-level error code.
    #[error("service error {code}: {message}")]
    Service {
        /// Service status code, e.g. `"NoRoute"`.
        code: String,
        /// Error message from the service.
        message: String,
    },

    /// The response body could not be understood.
    #[error("malformed provider response: {message}")]
    Parse {
        /// Description of the problem.
        message: String,
    },
}

impl ProviderError {
    /// Shorthand for a [`ProviderError::Parse`].
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}
