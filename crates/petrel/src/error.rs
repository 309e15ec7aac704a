//! Error types for Petrel.

use std::fmt;

/// Transport-stage errors.
///
/// Everything that can go wrong between building a request and obtaining
/// its raw payload. Decoding the payload has its own error domain,
/// [`ResponseError`].
#[derive(Debug, Clone)]
pub enum HttpError {
    /// HTTP request failed.
    Request(String),
    /// Invalid URL provided.
    InvalidUrl(String),
    /// Request timed out.
    Timeout,
    /// Connection refused or failed.
    Connection(String),
    /// Invalid header name or value.
    InvalidHeader(String),
    /// HTTP status outside the 200-299 success range.
    HttpStatus {
        /// The HTTP status code.
        status: u16,
        /// Optional error message from the response body.
        message: Option<String>,
    },
    /// Redirect limit exceeded.
    TooManyRedirects,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(msg) => write!(f, "HTTP request error: {msg}"),
            Self::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
            Self::Timeout => write!(f, "Request timed out"),
            Self::Connection(msg) => write!(f, "Connection error: {msg}"),
            Self::InvalidHeader(msg) => write!(f, "Invalid header: {msg}"),
            Self::HttpStatus { status, message } => {
                if let Some(msg) = message {
                    write!(f, "HTTP {status}: {msg}")
                } else {
                    write!(f, "HTTP {status}")
                }
            }
            Self::TooManyRedirects => write!(f, "Too many redirects"),
        }
    }
}

impl std::error::Error for HttpError {}

impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_redirect() {
            Self::TooManyRedirects
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for HttpError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// Decoding-stage errors.
///
/// Returned by the [`json_response`](crate::RequestBuilder::json_response)
/// and [`text_response`](crate::RequestBuilder::text_response) terminals.
/// Every failure those terminals encounter, including transport failures
/// from the underlying fetch, collapses into [`ParseFailure`]; the discarded
/// detail is logged at debug level.
///
/// [`ParseFailure`]: ResponseError::ParseFailure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseError {
    /// The payload could not be decoded into the requested form.
    ParseFailure,
    /// The response had an unexpected shape.
    BadResponse,
}

impl fmt::Display for ResponseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseFailure => write!(f, "Failed to parse response payload"),
            Self::BadResponse => write!(f, "Unexpected response shape"),
        }
    }
}

impl std::error::Error for ResponseError {}

/// A specialized Result type for transport operations.
pub type Result<T> = std::result::Result<T, HttpError>;
