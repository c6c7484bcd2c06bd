use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::AppState;
use crate::api::models::CharacterResponse;
use crate::database;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCharacterRequest {
    pub name: String,
    pub icon_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCharacterRequest {
    pub name: Option<String>,
    pub icon_name: Option<String>,
}

pub async fn create_character(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCharacterRequest>,
) -> Response {
    if req.name.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "Name is required").into_response();
    }

    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::characters::find_by_name(&conn, req.name.trim()) {
        Ok(Some(_)) => return (StatusCode::CONFLICT, "Character already exists").into_response(),
        Ok(None) => {}
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response(),
    }

    match database::characters::insert_character(&conn, req.name.trim(), &req.icon_name) {
        Ok(character) => {
            (StatusCode::CREATED, Json(CharacterResponse::from(character))).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Insert Error: {}", e)).into_response(),
    }
}

pub async fn list_characters(State(state): State<Arc<AppState>>) -> Response {
    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::characters::list_all(&conn) {
        Ok(rows) => Json(
            rows.into_iter()
                .map(CharacterResponse::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response(),
    }
}

pub async fn get_character(
    State(state): State<Arc<AppState>>,
    Path(character_id): Path<i64>,
) -> Response {
    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::characters::find_by_id(&conn, character_id) {
        Ok(Some(character)) => Json(CharacterResponse::from(character)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Character not found").into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response(),
    }
}

pub async fn update_character(
    State(state): State<Arc<AppState>>,
    Path(character_id): Path<i64>,
    Json(req): Json<UpdateCharacterRequest>,
) -> Response {
    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let updated = database::characters::update_character(
        &conn,
        character_id,
        req.name.as_deref(),
        req.icon_name.as_deref(),
    );

    match updated {
        Ok(Some(character)) => Json(CharacterResponse::from(character)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Character not found").into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Update Error: {}", e)).into_response(),
    }
}

pub async fn delete_character(
    State(state): State<Arc<AppState>>,
    Path(character_id): Path<i64>,
) -> Response {
    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::characters::delete_character(&conn, character_id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (StatusCode::NOT_FOUND, "Character not found").into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Delete Error: {}", e)).into_response(),
    }
}
