use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, RawQuery};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

async fn user(Path(id): Path<u64>) -> Json<Value> {
    Json(json!({
        "code": 200,
        "message": "ok",
        "data": {"id": id, "name": format!("user-{id}")}
    }))
}

async fn business_failure() -> Json<Value> {
    Json(json!({"code": 400, "message": "bad input"}))
}

async fn not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"code": 404, "message": "user not found"})),
    )
}

async fn echo(headers: HeaderMap, body: String) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned()
    };
    Json(json!({
        "code": 200,
        "data": {
            "body": body,
            "content_type": header("content-type"),
            "authorization": header("authorization"),
            "api_key": header("x-api-key"),
        }
    }))
}

async fn search(RawQuery(query): RawQuery) -> String {
    query.unwrap_or_default()
}

async fn events() -> Response {
    let chunks = futures::stream::iter(
        ["event: 1\n", "event: 2\n", "event: 3\n"]
            .into_iter()
            .map(Ok::<_, std::io::Error>),
    );
    Body::from_stream(chunks).into_response()
}

async fn ws(upgrade: WebSocketUpgrade, headers: HeaderMap) -> Response {
    let token = headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    upgrade.on_upgrade(move |socket| echo_socket(socket, token))
}

async fn echo_socket(mut socket: WebSocket, token: String) {
    if socket
        .send(Message::Text(format!("hello {token}").into()))
        .await
        .is_err()
    {
        return;
    }
    while let Some(Ok(message)) = socket.recv().await {
        match message {
            Message::Text(text) => {
                if socket.send(Message::Text(text)).await.is_err() {
                    return;
                }
            }
            Message::Close(_) => return,
            _ => {}
        }
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/users/{id}", get(user))
        .route("/fail", get(business_failure))
        .route("/missing", get(not_found))
        .route("/echo", post(echo))
        .route("/search", get(search))
        .route("/events", get(events))
        .route("/ws", get(ws))
}

/// Serve the test router on an ephemeral port.
pub async fn serve() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router()).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
