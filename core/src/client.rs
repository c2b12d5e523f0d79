//! The client capability the executor performs requests through.
//!
//! # Design
//! `HttpClient` has a single operation so tests can script responses and
//! alternative transports can be plugged in without touching the executor.
//! The trait is object safe; the executor takes `Option<&dyn HttpClient>`.
//! Response bodies are streams with an explicit `close` so that a failure to
//! release the stream can be reported instead of lost in `Drop`.

use std::fmt;
use std::io::{self, Read};

use http::HeaderMap;

use crate::error::TransportError;
use crate::http::{Request, ResponseHead};

/// Performs a single HTTP round trip.
pub trait HttpClient {
    fn perform(&self, request: &Request) -> Result<RawResponse, TransportError>;
}

/// Response body stream handed back by an `HttpClient`.
///
/// The executor reads the stream to the end (or until it fails) and then
/// calls `close` exactly once.
pub trait ResponseBody: Read {
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ResponseBody for io::Cursor<Vec<u8>> {}

impl ResponseBody for io::Empty {}

/// A response as returned by the transport, body still unread.
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Box<dyn ResponseBody>,
}

impl RawResponse {
    pub fn new(status: u16, headers: HeaderMap, body: impl ResponseBody + 'static) -> Self {
        Self {
            status,
            headers,
            body: Box::new(body),
        }
    }

    /// Split into the head kept on `Response` and the body stream.
    pub(crate) fn into_parts(self) -> (ResponseHead, Box<dyn ResponseBody>) {
        let head = ResponseHead {
            status: self.status,
            headers: self.headers,
        };
        (head, self.body)
    }
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}
