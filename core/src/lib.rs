//! API client core for the post service.
//!
//! # Overview
//! `PostClient` builds `HttpRequest` values and parses `HttpResponse` values
//! without touching the network (host-does-IO pattern). `Api` pairs it with an
//! `HttpTransport` for callers that want a plain async client, and opens the
//! live post feed over WebSocket.
//!
//! # Design
//! - `PostClient` is stateless; it holds only `base_url`.
//! - All calls funnel through the generic `build_request` / `parse_response`
//!   pair, which owns the `data` / `error` envelope contract.
//! - The base URL comes from an explicit `ClientConfig` resolved at startup.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod query;
pub mod transport;
pub mod types;
pub mod ws;

pub use api::Api;
pub use client::{PostClient, POST_PATH};
pub use config::{ClientConfig, ConfigError, RuntimeMode};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
pub use types::{Post, SubmitPost, SubmitPostResponse};
pub use ws::PostSocket;
