//! Stateless HTTP request builder and response parser for the post API.
//!
//! # Design
//! `PostClient` holds only a `base_url` and carries no mutable state between
//! calls. Every call is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`; the
//! generic pair `build_request` / `parse_response` implements the envelope
//! contract and the named calls funnel through it. I/O happens elsewhere.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::to_query_string;
use crate::types::{SubmitPost, SubmitPostResponse};

/// Path of the post resource, both for HTTP and the live WebSocket feed.
pub const POST_PATH: &str = "/post";

const JSON: &str = "application/json";

#[derive(Deserialize)]
struct Envelope<R> {
    data: R,
}

/// Synchronous, stateless client for the post API.
#[derive(Debug, Clone)]
pub struct PostClient {
    base_url: String,
}

impl PostClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Describe a request against `base_url + path`.
    ///
    /// POST and PUT always carry a JSON body, even without `args`, in which
    /// case the body is `null`. GET and DELETE encode `args` as a query string
    /// and omit the `?` entirely when `args` is `None`.
    pub fn build_request<A: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        args: Option<&A>,
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = vec![("accept".to_string(), JSON.to_string())];
        let mut body = None;
        let mut query = String::new();

        if method.has_body() {
            let json = serde_json::to_string(&args).map_err(|e| ApiError::Serialization(e.to_string()))?;
            body = Some(json);
            headers.push(("content-type".to_string(), JSON.to_string()));
        } else if let Some(args) = args {
            query = format!("?{}", to_query_string(args)?);
        }

        Ok(HttpRequest {
            method,
            url: format!("{}{path}{query}", self.base_url),
            headers,
            body,
        })
    }

    /// Unwrap the `data` field of a 2xx response, or turn anything else into
    /// `ApiError::Server`.
    pub fn parse_response<R: DeserializeOwned>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response)?;
        serde_json::from_str::<Envelope<R>>(&response.body)
            .map(|envelope| envelope.data)
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn build_submit_post(&self, input: &SubmitPost) -> Result<HttpRequest, ApiError> {
        self.build_request(HttpMethod::Post, POST_PATH, Some(input))
    }

    pub fn parse_submit_post(&self, response: HttpResponse) -> Result<SubmitPostResponse, ApiError> {
        self.parse_response(response)
    }

    /// WebSocket URL of the live post feed.
    ///
    /// Only the leading scheme changes: `https://` becomes `wss://` and
    /// `http://` becomes `ws://`.
    pub fn post_websocket_url(&self) -> Result<String, ApiError> {
        let base = &self.base_url;
        if let Some(rest) = base.strip_prefix("https://") {
            return Ok(format!("wss://{rest}{POST_PATH}"));
        }
        if let Some(rest) = base.strip_prefix("http://") {
            return Ok(format!("ws://{rest}{POST_PATH}"));
        }
        Err(ApiError::InvalidBaseUrl(base.clone()))
    }
}

/// Map a non-2xx response to `ApiError::Server`.
///
/// The message is the body's `error` field when the body is JSON and that
/// field is set, otherwise `"<status>: <status text>"`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let message = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| body.get("error").and_then(error_message))
        .unwrap_or_else(|| format!("{}: {}", response.status, response.status_text));
    Err(ApiError::Server {
        status: response.status,
        message,
    })
}

/// `null`, `false`, `0` and `""` count as no error message.
fn error_message(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::Post;

    fn client() -> PostClient {
        PostClient::new("http://localhost:3000")
    }

    fn response(status: u16, status_text: &str, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_text: status_text.to_string(),
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_submit_post_produces_correct_request() {
        let input = SubmitPost {
            name: "alice".to_string(),
            content: "hello".to_string(),
        };
        let req = client().build_submit_post(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/post");
        assert_eq!(
            req.headers,
            vec![
                ("accept".to_string(), "application/json".to_string()),
                ("content-type".to_string(), "application/json".to_string()),
            ]
        );
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "alice", "content": "hello"}));
    }

    #[test]
    fn get_without_args_has_no_query() {
        let req = client().build_request(HttpMethod::Get, "/post/1", None::<&Value>).unwrap();
        assert_eq!(req.url, "http://localhost:3000/post/1");
        assert!(req.body.is_none());
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.header("content-type"), None);
    }

    #[test]
    fn get_with_args_encodes_query() {
        let args = json!({"limit": 10, "name": "a b"});
        let req = client().build_request(HttpMethod::Get, "/posts", Some(&args)).unwrap();
        assert_eq!(req.url, "http://localhost:3000/posts?limit=10&name=a%20b");
        assert!(req.body.is_none());
    }

    #[test]
    fn delete_with_empty_args_keeps_lone_question_mark() {
        let req = client().build_request(HttpMethod::Delete, "/post/1", Some(&json!({}))).unwrap();
        assert_eq!(req.url, "http://localhost:3000/post/1?");
        assert!(req.body.is_none());
    }

    #[test]
    fn put_without_args_sends_null_body() {
        let req = client().build_request(HttpMethod::Put, "/post/1", None::<&Value>).unwrap();
        assert_eq!(req.body.as_deref(), Some("null"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert!(!req.url.contains('?'));
    }

    #[test]
    fn post_args_never_touch_the_query() {
        let args = json!({"a": 1});
        let req = client().build_request(HttpMethod::Post, "/post", Some(&args)).unwrap();
        assert_eq!(req.url, "http://localhost:3000/post");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, args);
    }

    #[test]
    fn get_with_non_object_args_fails() {
        let err = client()
            .build_request(HttpMethod::Get, "/post", Some(&json!("nope")))
            .unwrap_err();
        assert!(matches!(err, ApiError::Serialization(_)));
    }

    #[test]
    fn parse_submit_post_success() {
        let resp = response(
            200,
            "OK",
            r#"{"data":{"post":{"id":"1"},"paymentRequest":"lnbc1..."}}"#,
        );
        let result = client().parse_submit_post(resp).unwrap();
        assert_eq!(result.post, Post::with_id("1"));
        assert_eq!(result.payment_request, "lnbc1...");
    }

    #[test]
    fn parse_submit_post_passes_post_through_unchecked() {
        let resp = response(
            200,
            "OK",
            r#"{"data":{"post":{"id":1,"name":"a"},"paymentRequest":"lnbc"}}"#,
        );
        let result = client().parse_submit_post(resp).unwrap();
        assert_eq!(result.post.id(), Some(&json!(1)));

        let resp = response(200, "OK", r#"{"data":{"post":{"name":"a"},"paymentRequest":"lnbc"}}"#);
        let result = client().parse_submit_post(resp).unwrap();
        assert_eq!(result.post.id(), None);
        assert_eq!(result.post.field("name"), Some(&json!("a")));
    }

    #[test]
    fn parse_uses_error_field() {
        let resp = response(404, "Not Found", r#"{"error":"not found"}"#);
        let err = client().parse_response::<Value>(resp).unwrap_err();
        assert_eq!(err.to_string(), "not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn parse_falls_back_to_status_line_for_plain_text() {
        let resp = response(500, "Internal Server Error", "boom");
        let err = client().parse_response::<Value>(resp).unwrap_err();
        assert_eq!(err.to_string(), "500: Internal Server Error");
    }

    #[test]
    fn parse_falls_back_when_error_field_missing_or_empty() {
        for body in [r#"{"message":"x"}"#, r#"{"error":""}"#, r#"{"error":null}"#, "[1]", ""] {
            let resp = response(400, "Bad Request", body);
            let err = client().parse_response::<Value>(resp).unwrap_err();
            assert_eq!(err.to_string(), "400: Bad Request", "body {body:?}");
        }
    }

    #[test]
    fn parse_stringifies_non_string_error() {
        let resp = response(409, "Conflict", r#"{"error":42}"#);
        let err = client().parse_response::<Value>(resp).unwrap_err();
        assert_eq!(err.to_string(), "42");
    }

    #[test]
    fn parse_stringifies_object_error_as_json() {
        let resp = response(422, "Unprocessable Entity", r#"{"error":{"code":1}}"#);
        let err = client().parse_response::<Value>(resp).unwrap_err();
        assert_eq!(err.to_string(), r#"{"code":1}"#);
    }

    #[test]
    fn parse_success_bad_json() {
        let resp = response(200, "OK", "not json");
        let err = client().parse_submit_post(resp).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_success_without_data_fails() {
        let resp = response(200, "OK", r#"{"post":{"id":"1"}}"#);
        let err = client().parse_submit_post(resp).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn websocket_url_swaps_scheme() {
        let secure = PostClient::new("https://example.com/api");
        assert_eq!(secure.post_websocket_url().unwrap(), "wss://example.com/api/post");
        let plain = PostClient::new("http://localhost:3000");
        assert_eq!(plain.post_websocket_url().unwrap(), "ws://localhost:3000/post");
    }

    #[test]
    fn websocket_url_leaves_host_alone() {
        let client = PostClient::new("https://httpbin.org");
        assert_eq!(client.post_websocket_url().unwrap(), "wss://httpbin.org/post");
    }

    #[test]
    fn websocket_url_rejects_unknown_scheme() {
        let err = PostClient::new("ftp://example.com").post_websocket_url().unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = PostClient::new("http://localhost:3000/");
        assert_eq!(client.base_url(), "http://localhost:3000");
        let req = client.build_submit_post(&SubmitPost {
            name: String::new(),
            content: String::new(),
        });
        assert_eq!(req.unwrap().url, "http://localhost:3000/post");
    }
}
