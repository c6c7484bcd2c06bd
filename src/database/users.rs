use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::User;

pub fn insert_user(conn: &Connection, username: &str, password_hash: &str) -> Result<User> {
    let sql = "INSERT INTO users (username, password_hash) VALUES (?1, ?2) RETURNING id, username, password_hash, created_at";

    conn.query_row(sql, params![username, password_hash], parse_user_row)
        .context("Failed to insert new user")
}

pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<User>> {
    let sql = "SELECT id, username, password_hash, created_at FROM users WHERE username = ?1";

    conn.query_row(sql, params![username], parse_user_row)
        .optional()
        .context("Failed to query user by username")
}

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        created_at: row.get(3)?,
    })
}
