use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{AppState, PlayerParams};
use crate::api::models::{MatchResponse, PaginatedResponse, PlayerResponse};
use crate::database::{
    self,
    models::{PlayerFilter, SortColumn, SortOrder},
};

#[derive(Deserialize)]
pub struct CreatePlayerRequest {
    pub name: String,
    pub main: Option<i64>,
    pub skin: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdatePlayerRequest {
    pub name: Option<String>,
    pub main: Option<i64>,
    pub skin: Option<i64>,
}

pub async fn create_player(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreatePlayerRequest>,
) -> Response {
    if req.name.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "Name is required").into_response();
    }

    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let starter_rating = state.config.rating.starter_rating;
    match database::players::insert_player(&conn, req.name.trim(), starter_rating, req.main, req.skin)
    {
        Ok(player) => (StatusCode::CREATED, Json(PlayerResponse::from(player))).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Insert Error: {}", e)).into_response(),
    }
}

pub async fn list_players(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlayerParams>,
) -> Response {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(100).clamp(1, 1000);
    let offset = (page - 1) * page_size;

    let sort_by = match params.sort_by.as_deref() {
        Some("name") => SortColumn::Name,
        Some("wins") => SortColumn::Wins,
        Some("matchesPlayed") => SortColumn::MatchesPlayed,
        _ => SortColumn::Rating,
    };

    let sort_order = match params.order.as_deref() {
        Some("asc") => SortOrder::Asc,
        _ => SortOrder::Desc,
    };

    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let filter = PlayerFilter {
        name_contains: params.filter,
        sort_by,
        sort_order,
        limit: page_size,
        offset,
    };

    let (rows, total) = match database::players::list_ranked(&conn, &filter) {
        Ok(result) => result,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response(),
    };

    Json(PaginatedResponse {
        items: rows.into_iter().map(PlayerResponse::from).collect::<Vec<_>>(),
        total,
        page,
        page_size,
    })
    .into_response()
}

pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
) -> Response {
    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::players::find_by_id(&conn, player_id) {
        Ok(Some(player)) => Json(PlayerResponse::from(player)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Player not found").into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response(),
    }
}

/// Profile fields only; ratings and records change through the match ledger
pub async fn update_player(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
    Json(req): Json<UpdatePlayerRequest>,
) -> Response {
    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let updated = database::players::update_profile(
        &conn,
        player_id,
        req.name.as_deref(),
        req.main,
        req.skin,
    );

    match updated {
        Ok(Some(player)) => Json(PlayerResponse::from(player)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Player not found").into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Update Error: {}", e)).into_response(),
    }
}

pub async fn delete_player(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
) -> Response {
    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::players::delete_player(&conn, player_id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Player not found").into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Delete Error: {}", e)).into_response(),
    }
}

pub async fn get_player_matches(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<i64>,
) -> Response {
    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::players::find_by_id(&conn, player_id) {
        Ok(Some(_)) => {}
        Ok(None) => return (StatusCode::NOT_FOUND, "Player not found").into_response(),
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response(),
    }

    match database::matches::list_for_player(&conn, player_id) {
        Ok(rows) => Json(
            rows.into_iter()
                .map(MatchResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response(),
    }
}
