//! The request executor: one synchronous JSON round trip per call.
//!
//! # Design
//! `execute` serializes the body, builds and records the request, performs
//! it through the injected `HttpClient`, reads the whole payload and decodes
//! it into the caller's destination. JSON bodies default to
//! `content-type: application/json`; caller headers may overwrite it.
//!
//! The response body stream is owned by `ClosingBody` for the duration of the
//! call, which closes it exactly once. A close failure lands on
//! `Response::body_close_error` and never replaces the error being returned.
//!
//! The convenience functions bind a method and use [`default_client`].

use std::io::{self, Read};

use http::header::{HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::client::{HttpClient, ResponseBody};
use crate::error::{BodyCloseError, Error};
use crate::http::{Header, Method, Request, Response};
use crate::ureq_client::default_client;

/// Perform `method url` through `client`.
///
/// `body`, when present, is sent as JSON; when absent the request has an
/// empty body. `result`, when present, receives the decoded payload unless
/// the payload is empty. See [`Error`] for what each failure carries.
pub fn execute<B, R>(
    client: Option<&dyn HttpClient>,
    method: Method,
    url: &str,
    headers: Option<&Header>,
    body: Option<&B>,
    result: Option<&mut R>,
) -> Result<Response, Error>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let client = client.ok_or(Error::MissingClient)?;

    let payload = match body {
        Some(body) => Some(serde_json::to_vec(body).map_err(Error::Serialization)?),
        None => None,
    };
    let has_body = payload.is_some();

    let payload = payload.unwrap_or_default();

    let mut request = Request::new(method, url, payload).map_err(Error::RequestConstruction)?;
    if has_body {
        let json = HeaderValue::from_static("application/json");
        request.headers.insert(CONTENT_TYPE, json);
    }
    if let Some(headers) = headers {
        request.apply_headers(headers).map_err(Error::RequestConstruction)?;
    }

    debug!(%method, url = %request.url, body_len = request.body.len(), "sending request");
    let mut response = Response::new(request);

    let raw = match client.perform(&response.request) {
        Ok(raw) => raw,
        Err(source) => {
            debug!(%method, url = %response.request.url, error = %source, "transport failed");
            return Err(Error::Transport {
                source,
                response: Box::new(response),
            });
        }
    };

    let (head, stream) = raw.into_parts();
    let status = head.status;
    let is_error = head.is_error();
    response.raw = Some(head);

    let mut stream = ClosingBody::new(stream);
    let read = stream.read_to_end(&mut response.data);
    if let Err(e) = stream.close() {
        warn!(
            %method,
            url = %response.request.url,
            error = %e,
            "failed to close response body"
        );
        response.body_close_error = Some(BodyCloseError(e));
    }
    trace!(status, data_len = response.data.len(), "response received");

    if is_error {
        if let Err(e) = read {
            debug!(status, error = %e, "failed to read body of error response");
            response.read_error = Some(e);
        }
        return Err(Error::Status {
            status,
            response: Box::new(response),
        });
    }

    if let Err(source) = read {
        return Err(Error::Read {
            source,
            response: Box::new(response),
        });
    }

    if let Some(dest) = result {
        if !response.data.is_empty() {
            match serde_json::from_slice(&response.data) {
                Ok(value) => *dest = value,
                Err(source) => {
                    return Err(Error::Deserialization {
                        source,
                        response: Box::new(response),
                    })
                }
            }
        }
    }

    Ok(response)
}

/// [`execute`] on the default client.
pub fn request<B, R>(
    method: Method,
    url: &str,
    headers: Option<&Header>,
    body: Option<&B>,
    result: Option<&mut R>,
) -> Result<Response, Error>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    execute(Some(default_client()), method, url, headers, body, result)
}

pub fn get<R>(
    url: &str,
    headers: Option<&Header>,
    result: Option<&mut R>,
) -> Result<Response, Error>
where
    R: DeserializeOwned,
{
    request(Method::Get, url, headers, None::<&()>, result)
}

pub fn post<B, R>(
    url: &str,
    headers: Option<&Header>,
    body: Option<&B>,
    result: Option<&mut R>,
) -> Result<Response, Error>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    request(Method::Post, url, headers, body, result)
}

pub fn put<B, R>(
    url: &str,
    headers: Option<&Header>,
    body: Option<&B>,
    result: Option<&mut R>,
) -> Result<Response, Error>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    request(Method::Put, url, headers, body, result)
}

pub fn delete<R>(
    url: &str,
    headers: Option<&Header>,
    result: Option<&mut R>,
) -> Result<Response, Error>
where
    R: DeserializeOwned,
{
    request(Method::Delete, url, headers, None::<&()>, result)
}

/// Owns a response body stream and closes it exactly once: explicitly via
/// `close`, or on drop if unwinding skipped the explicit call.
struct ClosingBody {
    inner: Box<dyn ResponseBody>,
    closed: bool,
}

impl ClosingBody {
    fn new(inner: Box<dyn ResponseBody>) -> Self {
        Self { inner, closed: false }
    }

    fn close(&mut self) -> io::Result<()> {
        self.closed = true;
        self.inner.close()
    }
}

impl Read for ClosingBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Drop for ClosingBody {
    fn drop(&mut self) {
        if !self.closed {
            let _ = self.inner.close();
        }
    }
}
