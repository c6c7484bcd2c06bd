use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use serde::Deserialize;

use crate::config::settings::AppConfig;

pub mod auth;
pub mod characters;
pub mod matches;
pub mod players;

pub struct AppState {
    pub pool: Pool<SqliteConnectionManager>,
    pub config: AppConfig,
}

#[derive(Deserialize)]
pub struct PlayerParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub filter: Option<String>,
}

#[derive(Deserialize)]
pub struct MatchParams {
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub player_id: Option<i64>,
}
