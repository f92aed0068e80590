use axum::Router;

use crate::{features::leaderboard, state::AppState};

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", leaderboard::routes::routes())
        .with_state(state)
}
