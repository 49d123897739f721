//! Async facade over `PostClient` and an `HttpTransport`.
//!
//! # Design
//! `Api` pairs the stateless request builder with a transport and exposes
//! typed calls. Every call goes through `request`, which builds the request,
//! hands it to the transport, and parses the response. Failures are logged
//! once at this layer and then returned unchanged.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

use crate::client::{PostClient, POST_PATH};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{SubmitPost, SubmitPostResponse};
use crate::ws::{self, PostSocket};

/// Post API client. Build one at startup and pass it to whoever needs it.
#[derive(Debug, Clone)]
pub struct Api<T = ReqwestTransport> {
    client: PostClient,
    transport: T,
}

impl Api<ReqwestTransport> {
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(PostClient::new(&config.base_url), ReqwestTransport::default())
    }
}

impl<T: HttpTransport> Api<T> {
    pub fn new(client: PostClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &PostClient {
        &self.client
    }

    /// Submit a post. The response carries the invoice to pay for it.
    pub async fn submit_post(&self, name: &str, content: &str) -> Result<SubmitPostResponse, ApiError> {
        let input = SubmitPost {
            name: name.to_string(),
            content: content.to_string(),
        };
        self.request(HttpMethod::Post, POST_PATH, Some(&input)).await
    }

    /// Open the live post feed.
    pub async fn post_websocket(&self) -> Result<PostSocket, ApiError> {
        let url = self.client.post_websocket_url()?;
        ws::connect(&url).await
    }

    /// Issue `method` against `path` and return the `data` field of the reply.
    pub async fn request<R, A>(&self, method: HttpMethod, path: &str, args: Option<&A>) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        A: Serialize + ?Sized,
    {
        let result = self.send(method, path, args).await;
        if let Err(err) = &result {
            error!(%method, path, error = %err, "api error calling {method} {path}");
        }
        result
    }

    async fn send<R, A>(&self, method: HttpMethod, path: &str, args: Option<&A>) -> Result<R, ApiError>
    where
        R: DeserializeOwned,
        A: Serialize + ?Sized,
    {
        let request = self.client.build_request(method, path, args)?;
        debug!(%method, url = %request.url, "sending api request");
        let response = self.transport.execute(request).await.map_err(ApiError::Transport)?;
        self.client.parse_response(response)
    }
}
