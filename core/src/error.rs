//! Error types for the post API client.
//!
//! # Design
//! `Server` covers every non-2xx response. Its display is the bare message so
//! callers can surface it to users directly: either the server's own `error`
//! field or the `"<status>: <status text>"` fallback. Transport failures pass
//! through untouched.

use thiserror::Error;

use crate::transport::TransportError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The transport failed before a response arrived.
    #[error("{0}")]
    Transport(#[source] TransportError),

    /// A 2xx body could not be decoded into the expected payload.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// Request arguments could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("websocket connect failed: {0}")]
    WebSocket(Box<tokio_tungstenite::tungstenite::Error>),
}

impl ApiError {
    /// HTTP status of a `Server` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ApiError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        ApiError::WebSocket(Box::new(err))
    }
}
