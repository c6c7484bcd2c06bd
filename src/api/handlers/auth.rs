use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use super::AppState;
use crate::api::models::{AuthResponse, AuthUser};
use crate::auth::{self, Claims};
use crate::database;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Validate the bearer token on a guarded route.
///
/// Returns the ready-to-send 401 response on failure so callers can bail
/// with a plain `return`.
pub fn authorize(state: &AppState, headers: &HeaderMap) -> Result<Claims, Response> {
    let token = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(auth::bearer_token);

    match token.and_then(|t| auth::decode_token(t, &state.config.auth)) {
        Some(claims) => Ok(claims),
        None => Err(StatusCode::UNAUTHORIZED.into_response()),
    }
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    let user = match database::users::find_by_username(&conn, &req.username) {
        Ok(Some(user)) => user,
        Ok(None) => return (StatusCode::UNAUTHORIZED, "Invalid username or password").into_response(),
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response(),
    };

    if !auth::verify_password(&user.password_hash, &req.password) {
        return (StatusCode::UNAUTHORIZED, "Invalid username or password").into_response();
    }

    let token = match auth::issue_token(&user, &state.config.auth) {
        Ok(token) => token,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, format!("Token Error: {}", e)).into_response(),
    };

    Json(AuthResponse {
        token,
        user: AuthUser::from(user),
    })
    .into_response()
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> impl IntoResponse {
    if req.username.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "Username is required").into_response();
    }
    if req.password.len() < 6 {
        return (StatusCode::BAD_REQUEST, "Password must be at least 6 characters long").into_response();
    }

    let conn = match state.pool.get() {
        Ok(conn) => conn,
        Err(_) => return (StatusCode::INTERNAL_SERVER_ERROR, "DB Connection Error").into_response(),
    };

    match database::users::find_by_username(&conn, &req.username) {
        Ok(Some(_)) => return (StatusCode::CONFLICT, "Username already exists").into_response(),
        Ok(None) => {}
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, format!("Query Error: {}", e)).into_response(),
    }

    let password_hash = match auth::hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, format!("Hash Error: {}", e)).into_response(),
    };

    match database::users::insert_user(&conn, &req.username, &password_hash) {
        Ok(user) => (StatusCode::CREATED, Json(AuthUser::from(user))).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Insert Error: {}", e)).into_response(),
    }
}
