use axum::{Router, routing::get};

use super::handlers::{get_leaderboard, submit_game};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/leaderboard", get(get_leaderboard).post(submit_game))
}
