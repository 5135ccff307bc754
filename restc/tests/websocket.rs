//! WebSocket dialing against an in-process axum server.

mod common;

use futures::{SinkExt, StreamExt};
use restc::{Client, ClientError, PathParam, Scheme, WsMessage};

#[tokio::test]
async fn websocket_echo_with_default_headers() {
    let addr = common::serve().await;
    let client = Client::builder(format!("http://{addr}"))
        .header("x-api-key", "ws-key")
        .build()
        .unwrap();

    let (mut socket, handshake) = client.get().path("/ws", []).websocket().await.unwrap();
    assert_eq!(handshake.status(), 101);

    let greeting = socket.next().await.unwrap().unwrap();
    assert_eq!(greeting.to_text().unwrap(), "hello ws-key");

    socket.send(WsMessage::text("ping")).await.unwrap();
    let echoed = socket.next().await.unwrap().unwrap();
    assert_eq!(echoed.to_text().unwrap(), "ping");

    socket.close(None).await.unwrap();
}

#[tokio::test]
async fn websocket_upgrade_blocks_later_http_calls() {
    let addr = common::serve().await;
    let client = Client::new(format!("http://{addr}")).unwrap();
    let clone = client.clone();

    let (socket, _) = client.get().path("/ws", []).websocket().await.unwrap();
    drop(socket);

    assert_eq!(client.config().scheme(), Some(Scheme::Ws));
    let result = clone
        .get()
        .path("/users/{id}", [PathParam::new("id", 1)])
        .execute()
        .await;
    match result.error() {
        Some(ClientError::Config(message)) => assert!(message.contains("ws"), "{message}"),
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn websocket_to_closed_port_is_transport_error() {
    let addr = common::closed_addr();
    let client = Client::new(format!("http://{addr}")).unwrap();

    let err = client.get().path("/ws", []).websocket().await.unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn websocket_rejected_handshake_is_protocol_error() {
    let addr = common::serve().await;
    let client = Client::new(format!("http://{addr}")).unwrap();

    let err = client.get().path("/missing", []).websocket().await.unwrap_err();

    match err {
        ClientError::Protocol(message) => assert!(message.contains("404"), "{message}"),
        other => panic!("unexpected error: {other:?}"),
    }
}
