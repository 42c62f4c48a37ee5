//! Error types for page fetching.
//!
//! Fatal errors (`ClientInit`, `Request`, `InvalidInput`, `Io`) end the
//! invocation with a single diagnostic line. Certificate errors are
//! non-fatal: they only leave the matching report fields as `Unknown`.

use std::error::Error;
use std::fmt;
use std::io;

/// Error type for a single fetch.
#[derive(Debug)]
pub enum FetchError {
    /// The HTTP client could not be constructed
    ClientInit {
        /// Why the client builder failed
        details: String,
    },

    /// Network, TLS or transport failure while performing the request
    Request {
        /// The URL that was requested
        url: String,
        /// The underlying cause, including its source chain
        details: String,
    },

    /// The server presented no certificate, or the client did not expose one
    CertificateUnavailable,

    /// Certificate bytes or one of their fields could not be decoded
    CertificateParse {
        /// Description of what went wrong
        reason: String,
    },

    /// Invalid input provided by the user
    InvalidInput {
        /// Which field/parameter was invalid
        field: String,
        /// Why it was invalid
        reason: String,
    },

    /// Generic I/O error
    Io {
        /// The underlying I/O error
        source: io::Error,
    },
}

impl FetchError {
    /// Builds a `Request` error from any error, flattening its source chain
    /// into one line so the diagnostic keeps the root cause (DNS, TLS, ...).
    pub fn request(url: &str, err: &dyn Error) -> Self {
        Self::Request {
            url: url.to_string(),
            details: describe(err),
        }
    }

    /// Whether this error must abort the invocation.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::CertificateUnavailable | Self::CertificateParse { .. }
        )
    }
}

/// Joins an error and all of its sources with `": "`.
pub(crate) fn describe(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientInit { details } => {
                write!(f, "Failed to initialize HTTP client: {}", details)
            }
            Self::Request { details, .. } => write!(f, "Failed to fetch URL: {}", details),
            Self::CertificateUnavailable => write!(f, "No TLS certificate available"),
            Self::CertificateParse { reason } => write!(f, "Certificate error: {}", reason),
            Self::InvalidInput { field, reason } => {
                write!(f, "Invalid input for '{}': {}", field, reason)
            }
            Self::Io { source } => write!(f, "I/O error: {}", source),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for FetchError {
    fn from(e: io::Error) -> Self {
        Self::Io { source: e }
    }
}

impl From<openssl::error::ErrorStack> for FetchError {
    fn from(e: openssl::error::ErrorStack) -> Self {
        Self::CertificateParse {
            reason: e.to_string(),
        }
    }
}

impl From<&str> for FetchError {
    fn from(s: &str) -> Self {
        Self::CertificateParse {
            reason: s.to_string(),
        }
    }
}

impl From<String> for FetchError {
    fn from(s: String) -> Self {
        Self::CertificateParse { reason: s }
    }
}
