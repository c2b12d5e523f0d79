//! Default `HttpClient` backed by a blocking `ureq` agent.
//!
//! # Design
//! The agent is configured not to treat 4xx/5xx as errors so every status
//! reaches the executor as data. Bodies are handed over as owned readers;
//! closing one drops the reader, which returns the connection to the
//! agent's pool once fully read.

use std::io::{self, Read};
use std::sync::LazyLock;
use std::time::Duration;

use http::HeaderMap;
use tracing::trace;
use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, BodyReader, RequestBuilder};

use crate::client::{HttpClient, RawResponse, ResponseBody};
use crate::error::TransportError;
use crate::http::{Method, Request};

static DEFAULT_CLIENT: LazyLock<UreqClient> = LazyLock::new(UreqClient::new);

/// Process-wide client used by the convenience functions.
pub fn default_client() -> &'static UreqClient {
    &DEFAULT_CLIENT
}

#[derive(Debug, Clone)]
pub struct UreqClient {
    agent: Agent,
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqClient {
    pub fn new() -> Self {
        let agent = Agent::config_builder().http_status_as_error(false).build().new_agent();
        Self { agent }
    }

    /// Client whose agent aborts any call that takes longer than `timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }

    /// Wrap a caller-configured agent.
    ///
    /// If the agent reports error statuses as `ureq::Error::StatusCode`, the
    /// status is still returned as a response, with an empty body.
    pub fn from_agent(agent: Agent) -> Self {
        Self { agent }
    }
}

impl HttpClient for UreqClient {
    fn perform(&self, request: &Request) -> Result<RawResponse, TransportError> {
        let url = request.url.as_str();
        let headers = &request.headers;
        let sent = match request.method {
            Method::Get => send_without_body(with_headers(self.agent.get(url), headers), request),
            Method::Delete => {
                send_without_body(with_headers(self.agent.delete(url), headers), request)
            }
            Method::Post => send_with_body(with_headers(self.agent.post(url), headers), request),
            Method::Put => send_with_body(with_headers(self.agent.put(url), headers), request),
        };

        match sent {
            Ok(response) => {
                let (parts, body) = response.into_parts();
                trace!(status = parts.status.as_u16(), "ureq response");
                Ok(RawResponse::new(
                    parts.status.as_u16(),
                    parts.headers,
                    UreqBody(Some(body.into_reader())),
                ))
            }
            Err(ureq::Error::StatusCode(status)) => {
                Ok(RawResponse::new(status, HeaderMap::new(), io::empty()))
            }
            Err(e) => Err(TransportError::new(e)),
        }
    }
}

fn with_headers<B>(mut builder: RequestBuilder<B>, headers: &HeaderMap) -> RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.clone(), value.clone());
    }
    builder
}

fn send_without_body(
    builder: RequestBuilder<WithoutBody>,
    request: &Request,
) -> Result<http::Response<ureq::Body>, ureq::Error> {
    if request.body.is_empty() {
        builder.call()
    } else {
        send_with_body(builder.force_send_body(), request)
    }
}

fn send_with_body(
    builder: RequestBuilder<WithBody>,
    request: &Request,
) -> Result<http::Response<ureq::Body>, ureq::Error> {
    if request.body.is_empty() {
        builder.send_empty()
    } else {
        builder.send(&request.body[..])
    }
}

/// Owned ureq body reader. `close` drops it.
struct UreqBody(Option<BodyReader<'static>>);

impl Read for UreqBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.0.as_mut() {
            Some(reader) => reader.read(buf),
            None => Ok(0),
        }
    }
}

impl ResponseBody for UreqBody {
    fn close(&mut self) -> io::Result<()> {
        self.0.take();
        Ok(())
    }
}
