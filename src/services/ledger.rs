//! Match ledger: the single write path for ratings and win/loss records.
//!
//! Every lifecycle transition (report, edit, soft delete) runs inside one
//! IMMEDIATE transaction so the match row and both player rows commit or
//! roll back together. Each match stores the transferred delta and both
//! pre-match rating snapshots, which makes any prior transition exactly
//! reversible before a new one is applied.

use chrono::Utc;
use log::info;
use rusqlite::{Connection, TransactionBehavior};

use crate::database::models::{Match, Player};
use crate::database::{matches, players, DbConn};
use crate::errors::{LedgerError, LedgerResult};
use crate::rating::rating_delta;

/// Record a reported result and transfer rating from loser to winner.
pub fn report_match(conn: &mut DbConn, winner_id: i64, loser_id: i64) -> LedgerResult<Match> {
    if winner_id == loser_id {
        return Err(LedgerError::SamePlayer);
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut winner = require_player(&tx, winner_id)?;
    let mut loser = require_player(&tx, loser_id)?;

    let delta = rating_delta(winner.rating, loser.rating);
    let record = matches::insert_match(
        &tx,
        winner_id,
        loser_id,
        Utc::now().naive_utc(),
        delta,
        winner.rating,
        loser.rating,
    )?;

    apply_outcome(&mut winner, &mut loser, delta);
    save_players(&tx, &winner, &loser)?;

    tx.commit()?;
    info!(
        "Recorded match {}: player {} beat player {} (+/-{})",
        record.id, winner_id, loser_id, delta
    );
    Ok(record)
}

/// Correct a recorded result.
///
/// The stored effect on the original pair is reverted first, even when the
/// new pair is identical, so the new delta is always measured against
/// ratings with this match fully undone. The recomputation uses current
/// ratings, not a replay of the whole history.
pub fn edit_match(
    conn: &mut DbConn,
    match_id: i64,
    winner_id: i64,
    loser_id: i64,
) -> LedgerResult<Match> {
    if winner_id == loser_id {
        return Err(LedgerError::SamePlayer);
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let record = require_active_match(&tx, match_id)?;
    revert_outcome(&tx, &record)?;

    // Re-read both participants after the revert; they may be the same rows.
    let mut winner = require_player(&tx, winner_id)?;
    let mut loser = require_player(&tx, loser_id)?;

    let delta = rating_delta(winner.rating, loser.rating);
    let updated = matches::update_outcome(
        &tx,
        match_id,
        winner_id,
        loser_id,
        delta,
        winner.rating,
        loser.rating,
    )?;

    apply_outcome(&mut winner, &mut loser, delta);
    save_players(&tx, &winner, &loser)?;

    tx.commit()?;
    info!(
        "Edited match {}: player {} beat player {} (+/-{})",
        match_id, winner_id, loser_id, delta
    );
    Ok(updated)
}

/// Revert a match's effect and mark it inactive. The row is kept for audit
/// and is excluded from every aggregate view.
pub fn soft_delete_match(conn: &mut DbConn, match_id: i64) -> LedgerResult<Match> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let record = require_active_match(&tx, match_id)?;
    revert_outcome(&tx, &record)?;
    let deactivated = matches::deactivate(&tx, match_id)?;

    tx.commit()?;
    info!("Soft-deleted match {}", match_id);
    Ok(deactivated)
}

fn require_player(conn: &Connection, id: i64) -> LedgerResult<Player> {
    players::find_by_id(conn, id)?.ok_or(LedgerError::PlayerNotFound(id))
}

fn require_active_match(conn: &Connection, id: i64) -> LedgerResult<Match> {
    let record = matches::find_by_id(conn, id)?.ok_or(LedgerError::MatchNotFound(id))?;
    if !record.is_active {
        return Err(LedgerError::MatchDeleted(id));
    }
    Ok(record)
}

fn apply_outcome(winner: &mut Player, loser: &mut Player, delta: i64) {
    winner.rating += delta;
    winner.wins += 1;
    winner.matches_played += 1;

    loser.rating -= delta;
    loser.losses += 1;
    loser.matches_played += 1;
}

/// Undo the stored effect of `record` on its original participants.
fn revert_outcome(conn: &Connection, record: &Match) -> LedgerResult<()> {
    let mut winner = require_player(conn, record.winner_id)?;
    let mut loser = require_player(conn, record.loser_id)?;

    winner.rating -= record.rating_delta;
    winner.wins -= 1;
    winner.matches_played -= 1;

    loser.rating += record.rating_delta;
    loser.losses -= 1;
    loser.matches_played -= 1;

    save_players(conn, &winner, &loser)
}

fn save_players(conn: &Connection, winner: &Player, loser: &Player) -> LedgerResult<()> {
    check_record(winner)?;
    check_record(loser)?;
    players::save_record(conn, winner)?;
    players::save_record(conn, loser)?;
    Ok(())
}

/// Counter consistency guard: `matches_played == wins + losses` and nothing
/// negative. A violation means the ledger itself is corrupted, so it is
/// surfaced as a storage-class failure and aborts the transaction.
fn check_record(player: &Player) -> LedgerResult<()> {
    let consistent = player.wins >= 0
        && player.losses >= 0
        && player.matches_played == player.wins + player.losses;

    if !consistent {
        return Err(LedgerError::Storage(anyhow::anyhow!(
            "player {} record out of sync: {} played, {} wins, {} losses",
            player.id,
            player.matches_played,
            player.wins,
            player.losses
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::MatchFilter;
    use crate::database::{self, setup, DbPool};
    use r2d2_sqlite::SqliteConnectionManager;

    fn test_pool() -> DbPool {
        let manager = SqliteConnectionManager::memory();
        let pool = r2d2::Pool::builder().max_size(1).build(manager).unwrap();
        let mut conn = pool.get().unwrap();
        setup::reset_database(&mut conn).unwrap();
        pool
    }

    fn add_player(conn: &DbConn, name: &str, rating: i64) -> Player {
        database::players::insert_player(conn, name, rating, None, None).unwrap()
    }

    fn get_player(conn: &DbConn, id: i64) -> Player {
        database::players::find_by_id(conn, id).unwrap().unwrap()
    }

    #[test]
    fn report_transfers_rating_between_equals() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let x = add_player(&conn, "X", 1500);
        let y = add_player(&conn, "Y", 1500);

        let record = report_match(&mut conn, x.id, y.id).unwrap();

        assert_eq!(record.rating_delta, 16);
        assert_eq!(record.winner_rating_at_match, 1500);
        assert_eq!(record.loser_rating_at_match, 1500);
        assert!(record.is_active);

        let x = get_player(&conn, x.id);
        let y = get_player(&conn, y.id);
        assert_eq!((x.rating, x.wins, x.losses, x.matches_played), (1516, 1, 0, 1));
        assert_eq!((y.rating, y.wins, y.losses, y.matches_played), (1484, 0, 1, 1));
    }

    #[test]
    fn favorite_win_transfers_less() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let x = add_player(&conn, "X", 1600);
        let y = add_player(&conn, "Y", 1400);

        let record = report_match(&mut conn, x.id, y.id).unwrap();

        assert_eq!(record.rating_delta, 8);
        assert_eq!(get_player(&conn, x.id).rating, 1608);
        assert_eq!(get_player(&conn, y.id).rating, 1392);
    }

    #[test]
    fn report_rejects_same_player() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let x = add_player(&conn, "X", 1500);

        let err = report_match(&mut conn, x.id, x.id).unwrap_err();
        assert!(matches!(err, LedgerError::SamePlayer));
    }

    #[test]
    fn report_rejects_missing_player() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let x = add_player(&conn, "X", 1500);

        let err = report_match(&mut conn, x.id, 999).unwrap_err();
        assert!(matches!(err, LedgerError::PlayerNotFound(999)));

        // Nothing committed
        let x = get_player(&conn, x.id);
        assert_eq!((x.rating, x.matches_played), (1500, 0));
    }

    #[test]
    fn delete_restores_pre_match_state() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let x = add_player(&conn, "X", 1520);
        let y = add_player(&conn, "Y", 1480);

        let record = report_match(&mut conn, x.id, y.id).unwrap();
        let deleted = soft_delete_match(&mut conn, record.id).unwrap();

        assert!(!deleted.is_active);

        let x = get_player(&conn, x.id);
        let y = get_player(&conn, y.id);
        assert_eq!((x.rating, x.wins, x.losses, x.matches_played), (1520, 0, 0, 0));
        assert_eq!((y.rating, y.wins, y.losses, y.matches_played), (1480, 0, 0, 0));

        // Row retained for audit
        let kept = database::matches::find_by_id(&conn, record.id).unwrap().unwrap();
        assert!(!kept.is_active);
        assert_eq!(kept.rating_delta, record.rating_delta);
    }

    #[test]
    fn delete_twice_conflicts_without_state_change() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let x = add_player(&conn, "X", 1500);
        let y = add_player(&conn, "Y", 1500);

        let record = report_match(&mut conn, x.id, y.id).unwrap();
        soft_delete_match(&mut conn, record.id).unwrap();

        let err = soft_delete_match(&mut conn, record.id).unwrap_err();
        assert!(matches!(err, LedgerError::MatchDeleted(_)));

        let x = get_player(&conn, x.id);
        assert_eq!((x.rating, x.matches_played), (1500, 0));
    }

    #[test]
    fn edit_with_same_pair_is_a_net_noop() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let x = add_player(&conn, "X", 1500);
        let y = add_player(&conn, "Y", 1500);

        let record = report_match(&mut conn, x.id, y.id).unwrap();
        edit_match(&mut conn, record.id, x.id, y.id).unwrap();

        let x = get_player(&conn, x.id);
        let y = get_player(&conn, y.id);
        assert_eq!((x.rating, x.wins, x.losses, x.matches_played), (1516, 1, 0, 1));
        assert_eq!((y.rating, y.wins, y.losses, y.matches_played), (1484, 0, 1, 1));
    }

    #[test]
    fn edit_swapping_outcome_mirrors_ratings() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let x = add_player(&conn, "X", 1500);
        let y = add_player(&conn, "Y", 1500);

        let record = report_match(&mut conn, x.id, y.id).unwrap();
        let updated = edit_match(&mut conn, record.id, y.id, x.id).unwrap();

        assert_eq!(updated.winner_id, y.id);
        assert_eq!(updated.loser_id, x.id);
        assert_eq!(updated.rating_delta, 16);
        // Snapshots reflect post-revert ratings
        assert_eq!(updated.winner_rating_at_match, 1500);
        assert_eq!(updated.loser_rating_at_match, 1500);

        let x = get_player(&conn, x.id);
        let y = get_player(&conn, y.id);
        assert_eq!((x.rating, x.wins, x.losses), (1484, 0, 1));
        assert_eq!((y.rating, y.wins, y.losses), (1516, 1, 0));
    }

    #[test]
    fn edit_replacing_a_participant_moves_the_effect() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let a = add_player(&conn, "A", 1500);
        let b = add_player(&conn, "B", 1500);
        let c = add_player(&conn, "C", 1500);

        let record = report_match(&mut conn, a.id, b.id).unwrap();
        edit_match(&mut conn, record.id, c.id, b.id).unwrap();

        let a = get_player(&conn, a.id);
        let b = get_player(&conn, b.id);
        let c = get_player(&conn, c.id);
        assert_eq!((a.rating, a.wins, a.matches_played), (1500, 0, 0));
        assert_eq!((b.rating, b.losses, b.matches_played), (1484, 1, 1));
        assert_eq!((c.rating, c.wins, c.matches_played), (1516, 1, 1));
    }

    #[test]
    fn edit_rejects_missing_and_deleted_matches() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let x = add_player(&conn, "X", 1500);
        let y = add_player(&conn, "Y", 1500);

        let err = edit_match(&mut conn, 42, x.id, y.id).unwrap_err();
        assert!(matches!(err, LedgerError::MatchNotFound(42)));

        let record = report_match(&mut conn, x.id, y.id).unwrap();
        soft_delete_match(&mut conn, record.id).unwrap();

        let err = edit_match(&mut conn, record.id, y.id, x.id).unwrap_err();
        assert!(matches!(err, LedgerError::MatchDeleted(_)));
    }

    #[test]
    fn edit_rejects_missing_new_participant_atomically() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let x = add_player(&conn, "X", 1500);
        let y = add_player(&conn, "Y", 1500);

        let record = report_match(&mut conn, x.id, y.id).unwrap();
        let err = edit_match(&mut conn, record.id, 999, y.id).unwrap_err();
        assert!(matches!(err, LedgerError::PlayerNotFound(999)));

        // The revert inside the failed edit must not have leaked
        let x = get_player(&conn, x.id);
        let y = get_player(&conn, y.id);
        assert_eq!((x.rating, x.wins), (1516, 1));
        assert_eq!((y.rating, y.losses), (1484, 1));
    }

    #[test]
    fn counters_stay_consistent_across_sequences() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let a = add_player(&conn, "A", 1500);
        let b = add_player(&conn, "B", 1450);
        let c = add_player(&conn, "C", 1550);

        let m1 = report_match(&mut conn, a.id, b.id).unwrap();
        let m2 = report_match(&mut conn, b.id, c.id).unwrap();
        report_match(&mut conn, c.id, a.id).unwrap();
        edit_match(&mut conn, m1.id, b.id, a.id).unwrap();
        soft_delete_match(&mut conn, m2.id).unwrap();

        for id in [a.id, b.id, c.id] {
            let p = get_player(&conn, id);
            assert_eq!(
                p.matches_played,
                p.wins + p.losses,
                "player {} record drifted",
                id
            );
            assert!(p.wins >= 0 && p.losses >= 0);
        }
    }

    #[test]
    fn inactive_matches_are_excluded_from_views() {
        let pool = test_pool();
        let mut conn = pool.get().unwrap();
        let x = add_player(&conn, "X", 1500);
        let y = add_player(&conn, "Y", 1500);

        let keep = report_match(&mut conn, x.id, y.id).unwrap();
        let removed = report_match(&mut conn, y.id, x.id).unwrap();
        soft_delete_match(&mut conn, removed.id).unwrap();

        let filter = MatchFilter {
            player_id: None,
            limit: 50,
            offset: 0,
        };
        let (rows, total) = database::matches::list_active(&conn, &filter).unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, keep.id);

        let history = database::matches::list_for_player(&conn, x.id).unwrap();
        assert_eq!(history.len(), 1);

        let recent = database::matches::list_recent(&conn, 10).unwrap();
        assert_eq!(recent.len(), 1);
    }
}
