//! WebSocket dialing via `tokio-tungstenite`.

use std::sync::Arc;

use rustls::ClientConfig;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::{self, Error as WsError};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::ClientError;

/// An open, upgraded WebSocket connection.
pub type WebSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// The server's reply to the upgrade request.
pub type HandshakeResponse = tungstenite::handshake::client::Response;

/// Dial a WebSocket endpoint.
///
/// The request's URI must use `ws` or `wss`. Its headers are sent with the
/// upgrade request, next to the handshake headers generated here. For `wss`,
/// `tls` is used when given; otherwise `tokio-tungstenite` builds its own
/// configuration from the enabled root certificate feature.
pub async fn dial_websocket(
    request: http::Request<()>,
    tls: Option<Arc<ClientConfig>>,
) -> Result<(WebSocket, HandshakeResponse), ClientError> {
    let (parts, ()) = request.into_parts();
    let mut upgrade = parts
        .uri
        .to_string()
        .into_client_request()
        .map_err(map_ws_error)?;
    for (name, value) in &parts.headers {
        upgrade.headers_mut().append(name.clone(), value.clone());
    }

    #[cfg(any(feature = "tls-native-roots", feature = "tls-webpki-roots"))]
    let result = tokio_tungstenite::connect_async_tls_with_config(
        upgrade,
        None,
        false,
        tls.map(tokio_tungstenite::Connector::Rustls),
    )
    .await;

    #[cfg(not(any(feature = "tls-native-roots", feature = "tls-webpki-roots")))]
    let result = {
        let _ = tls;
        tokio_tungstenite::connect_async_with_config(upgrade, None, false).await
    };

    result.map_err(map_ws_error)
}

fn map_ws_error(err: WsError) -> ClientError {
    match err {
        WsError::Http(response) => ClientError::Protocol(format!(
            "websocket handshake rejected: {}",
            response.status()
        )),
        WsError::Io(e) => ClientError::Transport(format!("websocket connect failed: {e}")),
        other => ClientError::Protocol(format!("websocket error: {other}")),
    }
}
