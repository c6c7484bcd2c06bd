use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    auth::{login, register},
    characters::{
        create_character, delete_character, get_character, list_characters, update_character,
    },
    matches::{delete_match, edit_match, list_matches, recent_matches, report_match},
    players::{
        create_player, delete_player, get_player, get_player_matches, list_players, update_player,
    },
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/players", get(list_players).post(create_player))
        .route(
            "/api/players/:id",
            get(get_player).put(update_player).delete(delete_player),
        )
        .route("/api/players/:id/matches", get(get_player_matches))
        .route("/api/matches", get(list_matches).post(report_match))
        .route("/api/matches/recent", get(recent_matches))
        .route("/api/matches/:id", put(edit_match).delete(delete_match))
        .route(
            "/api/characters",
            get(list_characters).post(create_character),
        )
        .route(
            "/api/characters/:id",
            get(get_character)
                .put(update_character)
                .delete(delete_character),
        )
        .with_state(state)
}
