use chrono::NaiveDateTime;

#[derive(Debug, Clone)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub rating: i64,
    pub matches_played: i64,
    pub wins: i64,
    pub losses: i64,
    pub main: Option<i64>,
    pub skin: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct Match {
    pub id: i64,
    pub winner_id: i64,
    pub loser_id: i64,
    pub timestamp: NaiveDateTime,
    pub rating_delta: i64,
    pub winner_rating_at_match: i64,
    pub loser_rating_at_match: i64,
    pub is_active: bool,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct Character {
    pub id: i64,
    pub name: String,
    pub icon_name: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub enum SortColumn {
    Name,
    Rating,
    Wins,
    MatchesPlayed,
}

#[derive(Debug, Clone)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone)]
pub struct PlayerFilter {
    pub name_contains: Option<String>,
    pub sort_by: SortColumn,
    pub sort_order: SortOrder,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Clone)]
pub struct MatchFilter {
    pub player_id: Option<i64>,
    pub limit: usize,
    pub offset: usize,
}
