use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Player, PlayerFilter, SortColumn, SortOrder};

const PLAYER_COLUMNS: &str =
    "id, name, rating, matches_played, wins, losses, main, skin, created_at";

pub fn insert_player(
    conn: &Connection,
    name: &str,
    rating: i64,
    main: Option<i64>,
    skin: Option<i64>,
) -> Result<Player> {
    let sql = format!(
        "INSERT INTO players (name, rating, main, skin) VALUES (?1, ?2, ?3, ?4) RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(&sql, params![name, rating, main, skin], parse_player_row)
        .context("Failed to insert new player")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Player>> {
    let sql = format!("SELECT {PLAYER_COLUMNS} FROM players WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_player_row)
        .optional()
        .context("Failed to query player by id")
}

/// Atomic update of the rating/record aggregates. Profile fields are written
/// through `update_profile` only.
pub fn save_record(conn: &Connection, player: &Player) -> Result<()> {
    let sql = "UPDATE players SET rating = ?1, matches_played = ?2, wins = ?3, losses = ?4 WHERE id = ?5";

    let changed = conn
        .execute(
            sql,
            params![
                player.rating,
                player.matches_played,
                player.wins,
                player.losses,
                player.id
            ],
        )
        .context("Failed to save player record")?;

    anyhow::ensure!(changed == 1, "Player {} missing on save", player.id);
    Ok(())
}

pub fn update_profile(
    conn: &Connection,
    id: i64,
    name: Option<&str>,
    main: Option<i64>,
    skin: Option<i64>,
) -> Result<Option<Player>> {
    let sql = format!(
        "UPDATE players SET name = COALESCE(?1, name), main = COALESCE(?2, main), skin = COALESCE(?3, skin) WHERE id = ?4 RETURNING {PLAYER_COLUMNS}"
    );

    conn.query_row(&sql, params![name, main, skin, id], parse_player_row)
        .optional()
        .context("Failed to update player profile")
}

pub fn delete_player(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM players WHERE id = ?1", params![id])
        .context("Failed to delete player")?;

    Ok(deleted > 0)
}

pub fn list_ranked(conn: &Connection, filter: &PlayerFilter) -> Result<(Vec<Player>, usize)> {
    let name_pattern = filter
        .name_contains
        .as_ref()
        .map(|name| format!("%{name}%"));

    let where_clause = match name_pattern {
        Some(_) => "WHERE name LIKE ?1",
        None => "WHERE ?1 IS NULL",
    };

    let total: usize = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM players {where_clause}"),
            params![name_pattern],
            |row| row.get::<_, i64>(0),
        )
        .context("Failed to count players")? as usize;

    let sql = format!(
        "SELECT {PLAYER_COLUMNS} FROM players {where_clause} ORDER BY {} {} LIMIT ?2 OFFSET ?3",
        sort_column_sql(&filter.sort_by),
        sort_order_sql(&filter.sort_order),
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(
            params![name_pattern, filter.limit as i64, filter.offset as i64],
            parse_player_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok((rows, total))
}

fn sort_column_sql(column: &SortColumn) -> &'static str {
    match column {
        SortColumn::Name => "name",
        SortColumn::Rating => "rating",
        SortColumn::Wins => "wins",
        SortColumn::MatchesPlayed => "matches_played",
    }
}

fn sort_order_sql(order: &SortOrder) -> &'static str {
    match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    }
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        rating: row.get(2)?,
        matches_played: row.get(3)?,
        wins: row.get(4)?,
        losses: row.get(5)?,
        main: row.get(6)?,
        skin: row.get(7)?,
        created_at: row.get(8)?,
    })
}
