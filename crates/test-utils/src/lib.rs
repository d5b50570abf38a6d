//! Fake indexer for testing resolver backends.
//!
//! [`FakeIndexer`] serves canned Blockfrost-style responses from an axum
//! server bound to an ephemeral local port. Responses are registered per
//! request path (including the `/api/v0` prefix) and per page.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Uri};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;

pub use axum::http::StatusCode;

/// Path prefix of every indexer endpoint.
pub const API_PREFIX: &str = "/api/v0";

/// A canned reply for one page of one path.
#[derive(Clone, Debug)]
pub enum Reply {
    /// `200 OK` with a JSON body.
    Json(Value),

    /// An error status with a Blockfrost error body.
    Status(StatusCode),

    /// `200 OK` with a body that is sent as-is.
    Raw(String),
}

#[derive(Default)]
struct Shared {
    project_id: String,
    routes: HashMap<String, Vec<Reply>>,
    requests: Vec<(String, u32)>,
    delay: Option<Duration>,
}

#[derive(Deserialize)]
struct PageQuery {
    page: Option<u32>,
}

/// In-process indexer serving canned responses.
#[derive(Clone)]
pub struct FakeIndexer {
    addr: SocketAddr,
    shared: Arc<Mutex<Shared>>,
}

impl FakeIndexer {
    /// Start an indexer that only accepts requests carrying `project_id`.
    ///
    /// # Panics
    ///
    /// If the listener cannot be bound.
    pub async fn start(project_id: &str) -> Self {
        let shared = Arc::new(Mutex::new(Shared {
            project_id: project_id.to_string(),
            ..Shared::default()
        }));

        let router = Router::new().fallback(serve).with_state(shared.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("should bind");
        let addr = listener.local_addr().expect("should have addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("server should run");
        });

        Self { addr, shared }
    }

    /// Base URL to configure resolvers with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}{API_PREFIX}", self.addr)
    }

    /// Serve `pages` in order for `path` (relative to [`API_PREFIX`]). Pages
    /// past the last one are empty arrays.
    pub fn pages(&self, path: &str, pages: Vec<Value>) {
        self.replies(path, pages.into_iter().map(Reply::Json).collect());
    }

    /// Serve `replies` in order for `path` (relative to [`API_PREFIX`]).
    pub fn replies(&self, path: &str, replies: Vec<Reply>) {
        self.lock().routes.insert(format!("{API_PREFIX}{path}"), replies);
    }

    /// Hold every response for `delay` before sending it.
    pub fn delay(&self, delay: Duration) {
        self.lock().delay = Some(delay);
    }

    /// Pages requested so far for `path` (relative to [`API_PREFIX`]).
    #[must_use]
    pub fn requests(&self, path: &str) -> Vec<u32> {
        let full = format!("{API_PREFIX}{path}");
        self.lock().requests.iter().filter(|(p, _)| *p == full).map(|(_, page)| *page).collect()
    }

    /// Total number of requests received.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn serve(
    State(shared): State<Arc<Mutex<Shared>>>, headers: HeaderMap, uri: Uri,
    Query(query): Query<PageQuery>,
) -> Response {
    let page = query.page.unwrap_or(1);
    let path = uri.path().to_string();

    let (reply, delay) = {
        let mut shared = shared.lock().unwrap_or_else(PoisonError::into_inner);
        shared.requests.push((path.clone(), page));

        let authorized = headers
            .get("project_id")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == shared.project_id);

        let reply = if !authorized {
            Reply::Status(StatusCode::FORBIDDEN)
        } else if let Some(replies) = shared.routes.get(&path) {
            let index = usize::try_from(page).unwrap_or(usize::MAX).saturating_sub(1);
            replies.get(index).cloned().unwrap_or_else(|| Reply::Json(json!([])))
        } else {
            Reply::Status(StatusCode::NOT_FOUND)
        };
        (reply, shared.delay)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    match reply {
        Reply::Json(body) => axum::Json(body).into_response(),
        Reply::Raw(body) => (StatusCode::OK, body).into_response(),
        Reply::Status(status) => {
            let body = json!({
                "status_code": status.as_u16(),
                "error": status.canonical_reason().unwrap_or("Error"),
                "message": format!("fake indexer returned {status}"),
            });
            (status, axum::Json(body)).into_response()
        }
    }
}
