use std::collections::BTreeMap;

use axum::{
    body::Bytes,
    extract::Path,
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What the server received, as reported by `/inspect`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Inspection {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/inspect", any(inspect))
        .route("/status/{code}", any(status))
        .route("/empty", any(empty))
        .route("/malformed", any(malformed))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(headers: HeaderMap, body: Bytes) -> Response {
    match headers.get(CONTENT_TYPE) {
        Some(content_type) => ([(CONTENT_TYPE, content_type.clone())], body).into_response(),
        None => body.into_response(),
    }
}

async fn inspect(method: Method, headers: HeaderMap, body: String) -> Json<Inspection> {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            (name.as_str().to_string(), value)
        })
        .collect();
    Json(Inspection {
        method: method.as_str().to_string(),
        headers,
        body,
    })
}

async fn status(
    Path(code): Path<u16>,
) -> Result<(StatusCode, Json<serde_json::Value>), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, Json(serde_json::json!({ "status": code }))))
}

async fn empty() -> StatusCode {
    StatusCode::OK
}

async fn malformed() -> (StatusCode, &'static str) {
    (StatusCode::OK, "not json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspection_serializes_to_json() {
        let inspection = Inspection {
            method: "POST".to_string(),
            headers: BTreeMap::from([("x-id".to_string(), "1".to_string())]),
            body: "{}".to_string(),
        };
        let json = serde_json::to_value(&inspection).unwrap();
        assert_eq!(json["method"], "POST");
        assert_eq!(json["headers"]["x-id"], "1");
        assert_eq!(json["body"], "{}");
    }

    #[test]
    fn inspection_roundtrips_through_json() {
        let inspection = Inspection {
            method: "GET".to_string(),
            headers: BTreeMap::new(),
            body: String::new(),
        };
        let json = serde_json::to_string(&inspection).unwrap();
        let back: Inspection = serde_json::from_str(&json).unwrap();
        assert_eq!(back, inspection);
    }
}
