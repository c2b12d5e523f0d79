//! HTTP value types shared by the executor and client implementations.
//!
//! # Design
//! `Request` is plain data: it is built and validated by the executor,
//! recorded on the `Response`, and handed to an `HttpClient` by reference.
//! Header maps use `http::HeaderMap` so names compare case-insensitively and
//! `insert` gives overwrite semantics.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::str::FromStr;

use http::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::error::{BodyCloseError, InvalidRequest};

/// Status codes strictly above this value are reported as `Error::Status`.
pub const STATUS_ERROR_THRESHOLD: u16 = 399;

/// Caller-supplied headers. Each pair overwrites any earlier value of the
/// same name on the outgoing request.
pub type Header = HashMap<String, String>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = InvalidRequest;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            other => Err(InvalidRequest::Method(other.to_string())),
        }
    }
}

/// An outgoing HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// Serialized JSON body. Empty when the caller passed no body.
    pub body: Vec<u8>,
}

impl Request {
    /// Build a request, rejecting URLs that do not parse as absolute URLs.
    pub fn new(method: Method, url: &str, body: Vec<u8>) -> Result<Self, InvalidRequest> {
        let url = Url::parse(url).map_err(|source| InvalidRequest::Url {
            url: url.to_string(),
            source,
        })?;
        Ok(Self {
            method,
            url,
            headers: HeaderMap::new(),
            body,
        })
    }

    /// Set `name` to `value`, replacing any value already present.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), InvalidRequest> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| InvalidRequest::HeaderName(name.to_string(), e))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| InvalidRequest::HeaderValue(name.to_string(), e))?;
        self.headers.insert(header_name, header_value);
        Ok(())
    }

    /// Apply every pair of `headers` with [`Request::set_header`].
    pub fn apply_headers(&mut self, headers: &Header) -> Result<(), InvalidRequest> {
        for (name, value) in headers {
            self.set_header(name, value)?;
        }
        Ok(())
    }
}

/// Status line and headers of a received response. The body is consumed
/// into `Response::data`.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    pub status: u16,
    pub headers: HeaderMap,
}

impl ResponseHead {
    /// True when the status is above [`STATUS_ERROR_THRESHOLD`].
    pub fn is_error(&self) -> bool {
        self.status > STATUS_ERROR_THRESHOLD
    }
}

/// Everything gathered during one round trip.
///
/// Returned on success and attached to every error raised after the request
/// was constructed, so callers can inspect what was attempted and received.
#[derive(Debug)]
pub struct Response {
    /// The request as sent.
    pub request: Request,
    /// Present once the transport call returned.
    pub raw: Option<ResponseHead>,
    /// Raw response payload. May be truncated when the status was an error
    /// and reading failed, see `read_error`.
    pub data: Vec<u8>,
    /// Failure reading the payload of an error response. Only set alongside
    /// `Error::Status`; on other statuses a read failure is `Error::Read`.
    pub read_error: Option<io::Error>,
    /// Failure closing the response body stream, if any.
    pub body_close_error: Option<BodyCloseError>,
}

impl Response {
    pub(crate) fn new(request: Request) -> Self {
        Self {
            request,
            raw: None,
            data: Vec::new(),
            read_error: None,
            body_close_error: None,
        }
    }

    /// Status code of the raw response, if one was received.
    pub fn status(&self) -> Option<u16> {
        self.raw.as_ref().map(|head| head.status)
    }

    /// Payload as UTF-8 text, lossily converted.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}
