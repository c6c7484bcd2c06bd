use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::models::Character;

pub fn upsert_character(conn: &Connection, name: &str, icon_name: &str) -> Result<Character> {
    if let Some(existing) = find_by_name(conn, name)? {
        return Ok(existing);
    }

    insert_character(conn, name, icon_name)
}

pub fn insert_character(conn: &Connection, name: &str, icon_name: &str) -> Result<Character> {
    let sql = "INSERT INTO characters (name, icon_name) VALUES (?1, ?2) RETURNING id, name, icon_name, created_at";

    conn.query_row(sql, params![name, icon_name], parse_character_row)
        .context("Failed to insert new character")
}

pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Character>> {
    let sql = "SELECT id, name, icon_name, created_at FROM characters WHERE id = ?1";

    conn.query_row(sql, params![id], parse_character_row)
        .optional()
        .context("Failed to query character by id")
}

pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<Character>> {
    let sql = "SELECT id, name, icon_name, created_at FROM characters WHERE name = ?1";

    conn.query_row(sql, params![name], parse_character_row)
        .optional()
        .context("Failed to query character by name")
}

pub fn list_all(conn: &Connection) -> Result<Vec<Character>> {
    let sql = "SELECT id, name, icon_name, created_at FROM characters ORDER BY name ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map([], parse_character_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

pub fn update_character(
    conn: &Connection,
    id: i64,
    name: Option<&str>,
    icon_name: Option<&str>,
) -> Result<Option<Character>> {
    let sql = "UPDATE characters SET name = COALESCE(?1, name), icon_name = COALESCE(?2, icon_name) WHERE id = ?3 RETURNING id, name, icon_name, created_at";

    conn.query_row(sql, params![name, icon_name, id], parse_character_row)
        .optional()
        .context("Failed to update character")
}

pub fn delete_character(conn: &Connection, id: i64) -> Result<bool> {
    let deleted = conn
        .execute("DELETE FROM characters WHERE id = ?1", params![id])
        .context("Failed to delete character")?;

    Ok(deleted > 0)
}

fn parse_character_row(row: &rusqlite::Row) -> rusqlite::Result<Character> {
    Ok(Character {
        id: row.get(0)?,
        name: row.get(1)?,
        icon_name: row.get(2)?,
        created_at: row.get(3)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{setup, DbPool};
    use r2d2_sqlite::SqliteConnectionManager;

    fn test_pool() -> DbPool {
        let manager = SqliteConnectionManager::memory();
        let pool = r2d2::Pool::builder().max_size(1).build(manager).unwrap();
        let mut conn = pool.get().unwrap();
        setup::reset_database(&mut conn).unwrap();
        pool
    }

    #[test]
    fn upsert_is_idempotent_by_name() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        let first = upsert_character(&conn, "Blaze", "blaze").unwrap();
        let second = upsert_character(&conn, "Blaze", "blaze-alt").unwrap();

        assert_eq!(first.id, second.id);
        // Existing entry wins; icon is not rewritten
        assert_eq!(second.icon_name, "blaze");
        assert_eq!(list_all(&conn).unwrap().len(), 1);
    }

    #[test]
    fn list_is_sorted_by_name() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        insert_character(&conn, "Luna", "luna").unwrap();
        insert_character(&conn, "Akira", "akira").unwrap();

        let names: Vec<String> = list_all(&conn)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Akira", "Luna"]);
    }

    #[test]
    fn seed_roster_loads_every_entry_once() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();

        let seeded = setup::seed_roster(&mut conn).unwrap();
        assert_eq!(seeded.len(), crate::config::get_roster().len());

        // Re-seeding must not duplicate
        setup::seed_roster(&mut conn).unwrap();
        assert_eq!(list_all(&conn).unwrap().len(), seeded.len());
    }
}
