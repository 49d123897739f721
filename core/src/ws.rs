//! Live post feed over WebSocket.
//!
//! Only connection setup lives here. Reading, writing and closing the stream
//! is up to the caller; there is no reconnection.

use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::error::ApiError;

/// An open WebSocket to the post feed.
pub type PostSocket = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Perform the WebSocket handshake against `url`.
pub async fn connect(url: &str) -> Result<PostSocket, ApiError> {
    debug!(%url, "opening post websocket");
    let (stream, _response) = connect_async(url).await?;
    Ok(stream)
}
