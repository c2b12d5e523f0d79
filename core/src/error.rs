//! Error types for the request executor.
//!
//! # Design
//! Every failure that happens after the request was constructed carries the
//! partially populated `Response`, so callers can still inspect the request
//! that was attempted and, once the transport call returned, the status and
//! headers. A failure to close the response body is never returned as the
//! primary error; it is recorded on the `Response` as `BodyCloseError`.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use thiserror::Error;

use crate::http::Response;

/// Errors returned by `execute` and the convenience functions.
#[derive(Debug, Error)]
pub enum Error {
    /// No client was supplied. Raised before any network activity.
    #[error("http client is not set")]
    MissingClient,

    /// The request body could not be encoded as JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    /// The method, URL or a header could not be turned into a request.
    #[error("failed to construct request: {0}")]
    RequestConstruction(#[source] InvalidRequest),

    /// The client failed to perform the call.
    #[error("transport error: {source}")]
    Transport {
        #[source]
        source: TransportError,
        response: Box<Response>,
    },

    /// The server answered with a status above the error threshold.
    #[error("response status {status} > {}", crate::http::STATUS_ERROR_THRESHOLD)]
    Status { status: u16, response: Box<Response> },

    /// The response body could not be read into memory.
    #[error("failed to read response body: {source}")]
    Read {
        #[source]
        source: io::Error,
        response: Box<Response>,
    },

    /// The payload could not be decoded into the result destination.
    #[error("failed to deserialize response body: {source}")]
    Deserialization {
        #[source]
        source: serde_json::Error,
        response: Box<Response>,
    },
}

/// Fieldless discriminant of [`Error`], handy for matching and test vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingClient,
    Serialization,
    RequestConstruction,
    Transport,
    Status,
    Read,
    Deserialization,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingClient => ErrorKind::MissingClient,
            Error::Serialization(_) => ErrorKind::Serialization,
            Error::RequestConstruction(_) => ErrorKind::RequestConstruction,
            Error::Transport { .. } => ErrorKind::Transport,
            Error::Status { .. } => ErrorKind::Status,
            Error::Read { .. } => ErrorKind::Read,
            Error::Deserialization { .. } => ErrorKind::Deserialization,
        }
    }

    /// The partial response gathered before the failure, if the request had
    /// been constructed.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::Transport { response, .. }
            | Error::Status { response, .. }
            | Error::Read { response, .. }
            | Error::Deserialization { response, .. } => Some(&**response),
            Error::MissingClient | Error::Serialization(_) | Error::RequestConstruction(_) => None,
        }
    }

    pub fn into_response(self) -> Option<Response> {
        match self {
            Error::Transport { response, .. }
            | Error::Status { response, .. }
            | Error::Read { response, .. }
            | Error::Deserialization { response, .. } => Some(*response),
            Error::MissingClient | Error::Serialization(_) | Error::RequestConstruction(_) => None,
        }
    }
}

/// Why a request could not be constructed.
#[derive(Debug, Error)]
pub enum InvalidRequest {
    #[error("unsupported method {0:?}")]
    Method(String),

    #[error("invalid url {url:?}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid header name {0:?}")]
    HeaderName(String, #[source] http::header::InvalidHeaderName),

    #[error("invalid value for header {0:?}")]
    HeaderValue(String, #[source] http::header::InvalidHeaderValue),
}

/// Network-level failure reported by an `HttpClient`: DNS, refused
/// connection, TLS, timeout.
#[derive(Debug)]
pub struct TransportError(Box<dyn StdError + Send + Sync>);

impl TransportError {
    pub fn new<E>(source: E) -> Self
    where
        E: Into<Box<dyn StdError + Send + Sync>>,
    {
        Self(source.into())
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl StdError for TransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

/// Failure closing the response body stream.
#[derive(Debug, Error)]
#[error("failed to close response body: {0}")]
pub struct BodyCloseError(#[source] pub io::Error);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, Request};

    fn response() -> Box<Response> {
        let request = Request::new(Method::Get, "http://localhost:3000/", Vec::new()).unwrap();
        Box::new(Response::new(request))
    }

    #[test]
    fn status_error_display_names_threshold() {
        let err = Error::Status {
            status: 404,
            response: response(),
        };
        assert_eq!(err.to_string(), "response status 404 > 399");
        assert_eq!(err.kind(), ErrorKind::Status);
    }

    #[test]
    fn early_errors_carry_no_response() {
        assert!(Error::MissingClient.response().is_none());
        let err = Error::RequestConstruction(InvalidRequest::Method("PATCH".to_string()));
        assert!(err.into_response().is_none());
    }

    #[test]
    fn late_errors_expose_response() {
        let err = Error::Transport {
            source: TransportError::new("connection refused"),
            response: response(),
        };
        assert_eq!(err.to_string(), "transport error: connection refused");
        let resp = err.into_response().unwrap();
        assert_eq!(resp.request.method, Method::Get);
        assert!(resp.raw.is_none());
    }

    #[test]
    fn errors_keep_their_cause() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::Serialization(json_err);
        assert!(StdError::source(&err).is_some());

        let err = BodyCloseError(io::Error::new(io::ErrorKind::Other, "boom"));
        assert_eq!(err.to_string(), "failed to close response body: boom");
    }
}
