use serde::Serialize;

use crate::database::models::{Character, Match, Player, User};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub id: i64,
    pub name: String,
    pub rating: i64,
    pub matches_played: i64,
    pub wins: i64,
    pub losses: i64,
    pub main: Option<i64>,
    pub skin: Option<i64>,
    pub created_at: Option<String>,
}

impl From<Player> for PlayerResponse {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            name: player.name,
            rating: player.rating,
            matches_played: player.matches_played,
            wins: player.wins,
            losses: player.losses,
            main: player.main,
            skin: player.skin,
            created_at: player.created_at.map(|t| t.to_string()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub id: i64,
    pub winner_id: i64,
    pub loser_id: i64,
    pub timestamp: String,
    pub rating_delta: i64,
    pub winner_rating_at_match: i64,
    pub loser_rating_at_match: i64,
    pub is_active: bool,
}

impl From<Match> for MatchResponse {
    fn from(record: Match) -> Self {
        Self {
            id: record.id,
            winner_id: record.winner_id,
            loser_id: record.loser_id,
            timestamp: record.timestamp.to_string(),
            rating_delta: record.rating_delta,
            winner_rating_at_match: record.winner_rating_at_match,
            loser_rating_at_match: record.loser_rating_at_match,
            is_active: record.is_active,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterResponse {
    pub id: i64,
    pub name: String,
    pub icon_name: String,
}

impl From<Character> for CharacterResponse {
    fn from(character: Character) -> Self {
        Self {
            id: character.id,
            name: character.name,
            icon_name: character.icon_name,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}
