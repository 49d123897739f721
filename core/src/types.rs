//! Domain DTOs for the post API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch schema drift. `Post` is an opaque JSON object: the
//! client never checks its fields, it only carries them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A post as returned by the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Post(pub Map<String, Value>);

impl Post {
    /// A post with only an id.
    pub fn with_id(id: impl Into<Value>) -> Self {
        let mut fields = Map::new();
        fields.insert("id".to_string(), id.into());
        Self(fields)
    }

    /// The server-assigned id, in whatever JSON type the server used.
    pub fn id(&self) -> Option<&Value> {
        self.field("id")
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

/// Request payload for submitting a new post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitPost {
    pub name: String,
    pub content: String,
}

/// Payload returned for a submitted post: the stored post and the invoice
/// that must be paid before it is published.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPostResponse {
    pub post: Post,
    pub payment_request: String,
}
