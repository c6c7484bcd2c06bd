use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};

use super::models::{Match, MatchFilter};

const MATCH_COLUMNS: &str = "id, winner_id, loser_id, timestamp, rating_delta, winner_rating_at_match, loser_rating_at_match, is_active, created_at";

#[allow(clippy::too_many_arguments)]
pub fn insert_match(
    conn: &Connection,
    winner_id: i64,
    loser_id: i64,
    timestamp: NaiveDateTime,
    rating_delta: i64,
    winner_rating_at_match: i64,
    loser_rating_at_match: i64,
) -> Result<Match> {
    let sql = format!(
        "INSERT INTO matches (winner_id, loser_id, timestamp, rating_delta, winner_rating_at_match, loser_rating_at_match) VALUES (?1, ?2, ?3, ?4, ?5, ?6) RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            winner_id,
            loser_id,
            timestamp,
            rating_delta,
            winner_rating_at_match,
            loser_rating_at_match
        ],
        parse_match_row,
    )
    .context("Failed to insert match")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Match>> {
    let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1");

    conn.query_row(&sql, params![id], parse_match_row)
        .optional()
        .context("Failed to query match by id")
}

/// Rewrite participants, delta and both snapshots after an edit
pub fn update_outcome(
    conn: &Connection,
    id: i64,
    winner_id: i64,
    loser_id: i64,
    rating_delta: i64,
    winner_rating_at_match: i64,
    loser_rating_at_match: i64,
) -> Result<Match> {
    let sql = format!(
        "UPDATE matches SET winner_id = ?1, loser_id = ?2, rating_delta = ?3, winner_rating_at_match = ?4, loser_rating_at_match = ?5 WHERE id = ?6 RETURNING {MATCH_COLUMNS}"
    );

    conn.query_row(
        &sql,
        params![
            winner_id,
            loser_id,
            rating_delta,
            winner_rating_at_match,
            loser_rating_at_match,
            id
        ],
        parse_match_row,
    )
    .context("Failed to update match outcome")
}

pub fn deactivate(conn: &Connection, id: i64) -> Result<Match> {
    let sql = format!("UPDATE matches SET is_active = 0 WHERE id = ?1 RETURNING {MATCH_COLUMNS}");

    conn.query_row(&sql, params![id], parse_match_row)
        .context("Failed to deactivate match")
}

/// Active matches only, newest first, with the unpaginated total
pub fn list_active(conn: &Connection, filter: &MatchFilter) -> Result<(Vec<Match>, usize)> {
    let where_clause = match filter.player_id {
        Some(_) => "WHERE is_active = 1 AND (winner_id = ?1 OR loser_id = ?1)",
        None => "WHERE is_active = 1 AND ?1 IS NULL",
    };

    let total: usize = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM matches {where_clause}"),
            params![filter.player_id],
            |row| row.get::<_, i64>(0),
        )
        .context("Failed to count matches")? as usize;

    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches {where_clause} ORDER BY timestamp DESC, id DESC LIMIT ?2 OFFSET ?3"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(
            params![filter.player_id, filter.limit as i64, filter.offset as i64],
            parse_match_row,
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok((rows, total))
}

pub fn list_recent(conn: &Connection, limit: usize) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE is_active = 1 ORDER BY timestamp DESC, id DESC LIMIT ?1"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![limit as i64], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

/// Active match history for one player, newest first
pub fn list_for_player(conn: &Connection, player_id: i64) -> Result<Vec<Match>> {
    let sql = format!(
        "SELECT {MATCH_COLUMNS} FROM matches WHERE is_active = 1 AND (winner_id = ?1 OR loser_id = ?1) ORDER BY timestamp DESC, id DESC"
    );

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        winner_id: row.get(1)?,
        loser_id: row.get(2)?,
        timestamp: row.get(3)?,
        rating_delta: row.get(4)?,
        winner_rating_at_match: row.get(5)?,
        loser_rating_at_match: row.get(6)?,
        is_active: row.get(7)?,
        created_at: row.get(8)?,
    })
}
