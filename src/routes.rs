// routes.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, AppState};
use crate::store::PollStore;

/// Builds the poll application under `mount` (`""` for the root, see
/// [`normalize_mount`](crate::config::normalize_mount)).
pub fn create_routes<S: PollStore>(store: Arc<S>, mount: &str) -> Router {
    let state = AppState {
        store,
        mount: Arc::from(mount),
    };

    let poll = Router::new()
        .route("/", get(handlers::index::<S>))
        .route("/detail/{question_id}", get(handlers::detail::<S>))
        .route("/result/{question_id}", get(handlers::result::<S>))
        .route("/vote/{question_id}", post(handlers::vote::<S>));

    // The nested "/" only matches the bare mount, so the index is routed
    // again with its trailing slash.
    let app = if mount.is_empty() {
        poll
    } else {
        Router::new()
            .route(&format!("{mount}/"), get(handlers::index::<S>))
            .nest(mount, poll)
    };

    app.with_state(state).layer(TraceLayer::new_for_http())
}
