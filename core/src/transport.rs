//! Transports that execute an `HttpRequest` and hand back an `HttpResponse`.
//!
//! A transport only moves bytes. Status interpretation stays in
//! `PostClient::parse_response`, so 4xx/5xx responses must come back as
//! `Ok(HttpResponse)`, never as `Err`.

use async_trait::async_trait;

use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Error produced when the request never got a response.
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(request.method.into(), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let status_text = reason_phrase(&response);
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text,
            headers,
            body,
        })
    }
}

/// The reason phrase the server actually sent, falling back to the canonical
/// one. hyper only records a phrase when it differs from the canonical text,
/// and HTTP/2 has none at all.
fn reason_phrase(response: &reqwest::Response) -> String {
    status_text(
        response.status(),
        response.extensions().get::<hyper::ext::ReasonPhrase>(),
    )
}

fn status_text(status: reqwest::StatusCode, phrase: Option<&hyper::ext::ReasonPhrase>) -> String {
    match phrase {
        Some(phrase) => String::from_utf8_lossy(phrase.as_bytes()).into_owned(),
        None => status.canonical_reason().unwrap_or_default().to_string(),
    }
}
