use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use storage::{
    dto::leaderboard::{LeaderboardQuery, SubmitGameRequest, SubmitGameResponse},
    models::Leaderboard,
};
use validator::Validate;

use crate::{
    error::{WebError, WebResult},
    state::AppState,
};

use super::services;

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    params(LeaderboardQuery),
    responses(
        (status = 200, description = "Stored player stats when `player` is given, otherwise the stored leaderboard", body = Leaderboard),
        (status = 500, description = "Key missing or key-value store unavailable")
    ),
    tag = "leaderboard"
)]
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> WebResult<Response> {
    match query.player() {
        Some(address) => {
            let stats = services::get_player_stats(state.store.kv(), address).await?;
            Ok(Json(stats).into_response())
        }
        None => {
            let leaderboard = services::get_leaderboard(state.store.kv()).await?;
            Ok(Json(leaderboard).into_response())
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/leaderboard",
    request_body = SubmitGameRequest,
    responses(
        (status = 200, description = "Game recorded and leaderboard updated", body = SubmitGameResponse),
        (status = 400, description = "Malformed body, validation error or unknown gameResult"),
        (status = 500, description = "Key-value store unavailable")
    ),
    tag = "leaderboard"
)]
pub async fn submit_game(
    State(state): State<AppState>,
    payload: Result<Json<SubmitGameRequest>, JsonRejection>,
) -> WebResult<Response> {
    let Json(req) = payload.map_err(|rejection| WebError::BadRequest(rejection.body_text()))?;
    req.validate()?;

    let result = req.game_result().map_err(WebError::BadRequest)?;

    let response = services::submit_game(
        state.store.kv(),
        &state.write_gate,
        &req.player_address,
        &req.username,
        result,
    )
    .await?;

    Ok(Json(response).into_response())
}
