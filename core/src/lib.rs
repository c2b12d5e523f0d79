//! Synchronous JSON request helper.
//!
//! # Overview
//! One call is one round trip: the body is serialized to JSON, the request is
//! performed through a pluggable [`HttpClient`], the whole payload is read,
//! and, when asked, decoded into a caller-supplied destination.
//!
//! # Design
//! - [`execute`] takes the client explicitly; [`request`], [`get`], [`post`],
//!   [`put`] and [`delete`] use the process-wide [`UreqClient`].
//! - Errors after request construction carry the partial [`Response`], so
//!   the request and, when received, the status and headers can be
//!   inspected on failure.
//! - Status codes above 399 are errors. Their payload is still read into
//!   [`Response::data`] but never decoded.
//! - No retries, no internal timeouts, no logging subscriber. Events are
//!   emitted through `tracing` at debug/trace level.

pub mod client;
pub mod error;
pub mod executor;
pub mod http;
pub mod ureq_client;

pub use client::{HttpClient, RawResponse, ResponseBody};
pub use error::{BodyCloseError, Error, ErrorKind, InvalidRequest, TransportError};
pub use executor::{delete, execute, get, post, put, request};
pub use crate::http::{Header, Method, Request, Response, ResponseHead, STATUS_ERROR_THRESHOLD};
pub use ureq_client::{default_client, UreqClient};
