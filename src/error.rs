//! Errors returned while constructing a client or building a request.

/// Result type used throughout the key service client.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while setting up a [`Client`](crate::Client) or
/// assembling a request with it.
#[derive(Debug)]
pub enum Error {
    /// The configured (or default) base URL could not be parsed.
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    /// The base URL uses a scheme other than http, https, hkp or hkps.
    UnsupportedScheme(String),
    /// The request could not be assembled from the given method, URL,
    /// headers and body.
    RequestConstruction(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn request_construction<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::RequestConstruction(err.into())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidBaseUrl { url, source } => {
                write!(f, "Invalid base URL {:?}: {}", url, source)
            }
            Error::UnsupportedScheme(scheme) => {
                write!(f, "Unsupported protocol scheme {:?}", scheme)
            }
            Error::RequestConstruction(source) => {
                write!(f, "Failed to construct request: {}", source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidBaseUrl { source, .. } => Some(source),
            Error::UnsupportedScheme(_) => None,
            Error::RequestConstruction(source) => Some(&**source),
        }
    }
}
