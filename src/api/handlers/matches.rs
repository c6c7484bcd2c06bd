use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::auth::authorize;
use super::{AppState, MatchParams};
use crate::api::models::{MatchResponse, PaginatedResponse};
use crate::database::{self, models::MatchFilter};
use crate::errors::LedgerError;
use crate::services::ledger;

const RECENT_MATCH_LIMIT: usize = 10;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcomeRequest {
    pub winner_id: i64,
    pub loser_id: i64,
}

pub async fn report_match(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<MatchOutcomeRequest>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match ledger::report_match(&mut conn, req.winner_id, req.loser_id) {
        Ok(record) => (StatusCode::CREATED, Json(MatchResponse::from(record))).into_response(),
        Err(e) => ledger_error_response(e),
    }
}

pub async fn edit_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
    headers: HeaderMap,
    Json(req): Json<MatchOutcomeRequest>,
) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match ledger::edit_match(&mut conn, match_id, req.winner_id, req.loser_id) {
        Ok(record) => Json(MatchResponse::from(record)).into_response(),
        Err(e) => ledger_error_response(e),
    }
}

pub async fn delete_match(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
    headers: HeaderMap,
) -> Response {
    if let Err(denied) = authorize(&state, &headers) {
        return denied;
    }

    let mut conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match ledger::soft_delete_match(&mut conn, match_id) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => ledger_error_response(e),
    }
}

pub async fn list_matches(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MatchParams>,
) -> Response {
    let page = params.page.unwrap_or(1).max(1);
    let page_size = params.page_size.unwrap_or(50).clamp(1, 500);
    let offset = (page - 1) * page_size;

    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let filter = MatchFilter {
        player_id: params.player_id,
        limit: page_size,
        offset,
    };

    let (rows, total) = match database::matches::list_active(&conn, &filter) {
        Ok(result) => result,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response(),
    };

    Json(PaginatedResponse {
        items: rows.into_iter().map(MatchResponse::from).collect::<Vec<_>>(),
        total,
        page,
        page_size,
    })
    .into_response()
}

pub async fn recent_matches(State(state): State<Arc<AppState>>) -> Response {
    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::matches::list_recent(&conn, RECENT_MATCH_LIMIT) {
        Ok(rows) => Json(
            rows.into_iter()
                .map(MatchResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response(),
    }
}

/// Map the ledger taxonomy onto stable status codes
fn ledger_error_response(err: LedgerError) -> Response {
    match err {
        LedgerError::PlayerNotFound(_) | LedgerError::MatchNotFound(_) => {
            (StatusCode::NOT_FOUND, err.to_string()).into_response()
        }
        LedgerError::SamePlayer => (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
        LedgerError::MatchDeleted(_) => (StatusCode::CONFLICT, err.to_string()).into_response(),
        LedgerError::Storage(e) => {
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Storage Error: {}", e)).into_response()
        }
    }
}
