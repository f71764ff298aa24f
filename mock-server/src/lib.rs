//! Fixture HTTP server for exercising the request pipeline end to end.
//!
//! Every route is stateless: it echoes what it received or answers with a
//! canned body, so tests can run in parallel against one instance.

use axum::{
    extract::{Path, Query},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// What `POST /echo/body` saw.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EchoedBody {
    pub content_type: Option<String>,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo/query", get(echo_query))
        .route("/echo/body", post(echo_body))
        .route("/echo/headers", get(echo_headers))
        .route("/status/{code}", get(status).post(status))
        .route("/users/{id}", get(get_user))
        .route("/text", get(text))
        .route("/xml", get(xml))
        .route("/malformed", get(malformed))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo_query(Query(pairs): Query<Vec<(String, String)>>) -> Json<Vec<(String, String)>> {
    Json(pairs)
}

async fn echo_body(headers: HeaderMap, body: String) -> Json<EchoedBody> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(EchoedBody { content_type, body })
}

async fn echo_headers(headers: HeaderMap) -> Json<serde_json::Map<String, serde_json::Value>> {
    let map = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.to_string(), serde_json::Value::String(v.to_string())))
        })
        .collect();
    Json(map)
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST)
}

async fn get_user(Path(id): Path<u64>) -> Result<Json<User>, StatusCode> {
    if id == 0 {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(User {
        id,
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
    }))
}

async fn text() -> &'static str {
    "hello, world"
}

async fn xml() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/xml")],
        "<note><to>Ada</to></note>",
    )
}

async fn malformed() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], "{not json")
}
