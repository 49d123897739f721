use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{
    net::TcpListener,
    sync::{
        broadcast::{self, error::RecvError},
        RwLock,
    },
};
use tracing::{debug, info};
use uuid::Uuid;

/// Invoice amount in millisatoshis for every post.
pub const POST_PRICE_MSAT: u64 = 1_000;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub name: String,
    pub content: String,
    pub has_paid: bool,
}

#[derive(Deserialize)]
pub struct SubmitPost {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    posts: Arc<RwLock<HashMap<String, Post>>>,
    feed: broadcast::Sender<Post>,
}

impl AppState {
    fn new() -> Self {
        let (feed, _) = broadcast::channel(64);
        Self {
            posts: Arc::new(RwLock::new(HashMap::new())),
            feed,
        }
    }
}

pub fn app() -> Router {
    Router::new()
        .route("/post", get(post_feed).post(submit_post))
        .route("/post/{id}", get(get_post))
        .with_state(AppState::new())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn data(value: impl Serialize) -> Response {
    Json(json!({ "data": value })).into_response()
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn submit_post(State(state): State<AppState>, Json(input): Json<SubmitPost>) -> Response {
    let content = input.content.unwrap_or_default();
    if content.is_empty() {
        return error(StatusCode::BAD_REQUEST, "Content is required");
    }
    let name = input
        .name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Anonymous".to_string());

    let id = Uuid::new_v4().simple().to_string();
    let payment_request = format!("lnbcrt{POST_PRICE_MSAT}n1p{id}");

    // The mock settles invoices immediately.
    let post = Post {
        id: id.clone(),
        name,
        content,
        has_paid: true,
    };
    state.posts.write().await.insert(id, post.clone());
    info!(id = %post.id, "post submitted");
    // No subscribers is fine.
    let _ = state.feed.send(post.clone());

    data(json!({ "post": post, "paymentRequest": payment_request }))
}

async fn get_post(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.posts.read().await.get(&id) {
        Some(post) => data(post),
        None => error(StatusCode::NOT_FOUND, "Post not found"),
    }
}

async fn post_feed(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    let feed = state.feed.subscribe();
    ws.on_upgrade(move |socket| run_feed(socket, feed))
}

async fn run_feed(mut socket: WebSocket, mut feed: broadcast::Receiver<Post>) {
    debug!("post feed subscriber connected");
    loop {
        tokio::select! {
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
            post = next_post(&mut feed) => {
                let Some(post) = post else { break };
                let frame = json!({ "type": "post", "data": post }).to_string();
                if socket.send(Message::Text(frame.into())).await.is_err() {
                    break;
                }
            }
        }
    }
    debug!("post feed subscriber disconnected");
}

/// Next post from the feed. A subscriber that fell behind skips the posts it
/// missed; `None` once the feed is closed.
async fn next_post(feed: &mut broadcast::Receiver<Post>) -> Option<Post> {
    loop {
        match feed.recv().await {
            Ok(post) => return Some(post),
            Err(RecvError::Lagged(skipped)) => {
                debug!(skipped, "post feed subscriber lagged");
            }
            Err(RecvError::Closed) => return None,
        }
    }
}
