//! The chained interest log — marking, discoveries, resolution, pruning, and
//! the trajectory walk.
//!
//! Entries form one doubly linked chain per owner through plain id pointers
//! (`previous_interest_id` / `next_interest_id`). New entries always attach
//! after the chain tail, and `previous_interest_id` is written exactly once,
//! at insert, so the chain cannot acquire a cycle through marking.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::HashSet;

use super::tags::{insert_tags, load_tags};
use super::types::{Discoveries, Interest, NewInterest};
use crate::db::{json_column, new_id, opt_ts_column, ts, ts_column};
use crate::{Error, Result};

/// Column list matching [`interest_from_row`].
pub(crate) const INTEREST_COLUMNS: &str = "id, user_id, interest_type, target_id, target_metadata, \
     moment_text, stance, context_snapshot, previous_interest_id, next_interest_id, salience_score, \
     predicted_value, advantages, disadvantages, realized_value, value_notes, created_at, \
     explored_at, resolved_at, duration_seconds, pruned, prune_reason, pruned_at";

/// Map a row selected with [`INTEREST_COLUMNS`]. Tags are left empty; see
/// [`load_tags`].
pub(crate) fn interest_from_row(row: &Row) -> rusqlite::Result<Interest> {
    Ok(Interest {
        id: row.get(0)?,
        user_id: row.get(1)?,
        interest_type: row.get(2)?,
        target_id: row.get(3)?,
        target_metadata: json_column(row, 4)?,
        moment_text: row.get(5)?,
        stance: json_column(row, 6)?,
        context_snapshot: json_column(row, 7)?,
        previous_id: row.get(8)?,
        next_id: row.get(9)?,
        salience_score: row.get(10)?,
        predicted_value: row.get(11)?,
        advantages: json_column(row, 12)?.unwrap_or_default(),
        disadvantages: json_column(row, 13)?.unwrap_or_default(),
        realized_value: row.get(14)?,
        value_notes: row.get(15)?,
        created_at: ts_column(row, 16)?,
        explored_at: opt_ts_column(row, 17)?,
        resolved_at: opt_ts_column(row, 18)?,
        duration_seconds: row.get(19)?,
        pruned: row.get(20)?,
        prune_reason: row.get(21)?,
        pruned_at: opt_ts_column(row, 22)?,
        tags: Vec::new(),
    })
}

/// Point lookup, including tags.
pub fn get_interest(conn: &Connection, id: &str) -> Result<Option<Interest>> {
    let row = conn
        .query_row(
            &format!("SELECT {INTEREST_COLUMNS} FROM interests WHERE id = ?1"),
            params![id],
            interest_from_row,
        )
        .optional()?;

    match row {
        Some(mut interest) => {
            load_tags(conn, std::slice::from_mut(&mut interest))?;
            Ok(Some(interest))
        }
        None => Ok(None),
    }
}

pub(crate) fn require_interest(conn: &Connection, id: &str) -> Result<Interest> {
    get_interest(conn, id)?.ok_or_else(|| Error::not_found("interest", id))
}

fn check_unit_interval(field: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid(format!("{field} must be between 0.0 and 1.0, got {value}")))
    }
}

/// The newest entry of `owner` with no successor, pruned or not.
fn chain_tail(conn: &Connection, owner: &str) -> Result<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT id FROM interests WHERE user_id = ?1 AND next_interest_id IS NULL \
             ORDER BY created_at DESC, rowid DESC LIMIT 1",
            params![owner],
            |row| row.get(0),
        )
        .optional()?)
}

/// Record a new moment of attention and link it after the owner's chain tail.
///
/// Runs as one `BEGIN IMMEDIATE` transaction so two concurrent marks cannot
/// both attach to the same tail. A pruned tail still receives the new entry
/// as its successor; the chain stays single.
pub fn mark_interesting(conn: &mut Connection, owner: &str, new: NewInterest) -> Result<Interest> {
    check_unit_interval("salience_score", new.salience_score)?;
    if let Some(predicted) = new.predicted_value {
        check_unit_interval("predicted_value", predicted)?;
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let previous = chain_tail(&tx, owner)?;
    let id = new_id();
    let now = ts(&Utc::now());

    let target_metadata = new.target_metadata.as_ref().map(serde_json::to_string).transpose()?;
    let stance = new.stance.as_ref().map(serde_json::to_string).transpose()?;
    let context = new.context.as_ref().map(serde_json::to_string).transpose()?;

    tx.execute(
        "INSERT INTO interests (id, user_id, interest_type, target_id, target_metadata, moment_text, \
         stance, context_snapshot, previous_interest_id, salience_score, predicted_value, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            id,
            owner,
            new.interest_type,
            new.target_id,
            target_metadata,
            new.moment_text,
            stance,
            context,
            previous,
            new.salience_score,
            new.predicted_value,
            now,
        ],
    )?;

    if let Some(ref prev) = previous {
        tx.execute(
            "UPDATE interests SET next_interest_id = ?1 WHERE id = ?2",
            params![id, prev],
        )?;
    }

    let tags = insert_tags(&tx, owner, &id, &new.tags)?;
    tx.commit()?;

    tracing::info!(
        id = %id,
        owner = %owner,
        interest_type = %new.interest_type,
        previous = ?previous,
        tags = tags.len(),
        "interest marked"
    );

    require_interest(conn, &id)
}

/// The owner's "now": the newest unpruned entry without a successor.
///
/// Resolved entries still count; resolution does not advance the cursor.
pub fn get_current(conn: &Connection, owner: &str) -> Result<Option<Interest>> {
    let row = conn
        .query_row(
            &format!(
                "SELECT {INTEREST_COLUMNS} FROM interests \
                 WHERE user_id = ?1 AND next_interest_id IS NULL AND pruned = 0 \
                 ORDER BY created_at DESC, rowid DESC LIMIT 1"
            ),
            params![owner],
            interest_from_row,
        )
        .optional()?;

    match row {
        Some(mut interest) => {
            load_tags(conn, std::slice::from_mut(&mut interest))?;
            Ok(Some(interest))
        }
        None => Ok(None),
    }
}

/// Append advantages/disadvantages and, when a realized value is given,
/// resolve the entry.
pub fn update_with_discoveries(
    conn: &mut Connection,
    id: &str,
    discoveries: Discoveries,
) -> Result<Interest> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    apply_discoveries(&tx, id, &discoveries, Utc::now())?;
    tx.commit()?;
    require_interest(conn, id)
}

/// Shared write path for discoveries and resolution, with an explicit clock.
fn apply_discoveries(
    conn: &Connection,
    id: &str,
    discoveries: &Discoveries,
    now: DateTime<Utc>,
) -> Result<()> {
    if let Some(value) = discoveries.realized_value {
        check_unit_interval("realized_value", value)?;
    }

    let (mut advantages, mut disadvantages, explored_at): (Vec<String>, Vec<String>, Option<DateTime<Utc>>) = conn
        .query_row(
            "SELECT advantages, disadvantages, explored_at FROM interests WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    json_column(row, 0)?.unwrap_or_default(),
                    json_column(row, 1)?.unwrap_or_default(),
                    opt_ts_column(row, 2)?,
                ))
            },
        )
        .optional()?
        .ok_or_else(|| Error::not_found("interest", id))?;

    advantages.extend(discoveries.advantages.iter().cloned());
    disadvantages.extend(discoveries.disadvantages.iter().cloned());

    conn.execute(
        "UPDATE interests SET advantages = ?1, disadvantages = ?2 WHERE id = ?3",
        params![
            serde_json::to_string(&advantages)?,
            serde_json::to_string(&disadvantages)?,
            id
        ],
    )?;

    if let Some(ref notes) = discoveries.value_notes {
        conn.execute(
            "UPDATE interests SET value_notes = ?1 WHERE id = ?2",
            params![notes, id],
        )?;
    }

    if let Some(value) = discoveries.realized_value {
        // Overwrites on repeat; never accumulates.
        let duration = explored_at.map(|explored| (now - explored).num_seconds().max(0));
        conn.execute(
            "UPDATE interests SET realized_value = ?1, resolved_at = ?2, duration_seconds = ?3 \
             WHERE id = ?4",
            params![value, ts(&now), duration, id],
        )?;
        tracing::info!(id = %id, realized_value = value, duration_seconds = ?duration, "interest resolved");
    } else {
        tracing::debug!(
            id = %id,
            advantages = discoveries.advantages.len(),
            disadvantages = discoveries.disadvantages.len(),
            "discoveries recorded"
        );
    }

    Ok(())
}

/// Resolve an entry with its realized value, optionally chaining it to a known
/// successor instead of waiting for the next [`mark_interesting`].
pub fn resolve(
    conn: &mut Connection,
    id: &str,
    realized_value: f64,
    value_notes: Option<&str>,
    next_id: Option<&str>,
) -> Result<Interest> {
    resolve_at(conn, id, realized_value, value_notes, next_id, Utc::now())
}

fn resolve_at(
    conn: &mut Connection,
    id: &str,
    realized_value: f64,
    value_notes: Option<&str>,
    next_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<Interest> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    if let Some(next) = next_id {
        if next == id {
            return Err(Error::invalid("an interest cannot be its own successor"));
        }
        let exists: bool = tx.query_row(
            "SELECT COUNT(*) > 0 FROM interests WHERE id = ?1",
            params![next],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(Error::not_found("interest", next));
        }
    }

    let discoveries = Discoveries {
        realized_value: Some(realized_value),
        value_notes: value_notes.map(str::to_string),
        ..Default::default()
    };
    apply_discoveries(&tx, id, &discoveries, now)?;

    if let Some(next) = next_id {
        tx.execute(
            "UPDATE interests SET next_interest_id = ?1 WHERE id = ?2",
            params![next, id],
        )?;
    }

    tx.commit()?;
    require_interest(conn, id)
}

/// Stamp `explored_at` the first time an entry is actually looked into.
/// Later calls keep the original timestamp.
pub fn mark_explored(conn: &mut Connection, id: &str) -> Result<Interest> {
    let rows = conn.execute(
        "UPDATE interests SET explored_at = COALESCE(explored_at, ?1) WHERE id = ?2",
        params![ts(&Utc::now()), id],
    )?;
    if rows == 0 {
        return Err(Error::not_found("interest", id));
    }
    tracing::debug!(id = %id, "interest explored");
    require_interest(conn, id)
}

/// Logically drop an entry. Chain pointers are left intact.
pub fn prune(conn: &mut Connection, id: &str, prune_reason: &str) -> Result<Interest> {
    let rows = conn.execute(
        "UPDATE interests SET pruned = 1, prune_reason = ?1, pruned_at = ?2 WHERE id = ?3",
        params![prune_reason, ts(&Utc::now()), id],
    )?;
    if rows == 0 {
        return Err(Error::not_found("interest", id));
    }
    tracing::info!(id = %id, reason = %prune_reason, "interest pruned");
    require_interest(conn, id)
}

/// Entries around "now" in chronological order: up to `max_depth`
/// predecessors, the current entry, then every successor.
///
/// Both walks stop at a pruned entry unless `include_pruned` is set. The
/// forward walk has no depth bound.
pub fn get_trajectory(
    conn: &Connection,
    owner: &str,
    max_depth: usize,
    include_pruned: bool,
) -> Result<Vec<Interest>> {
    let Some(current) = get_current(conn, owner)? else {
        return Ok(Vec::new());
    };

    let mut visited = HashSet::from([current.id.clone()]);

    let mut past = Vec::new();
    let mut cursor = current.previous_id.clone();
    while let Some(id) = cursor {
        if past.len() >= max_depth {
            break;
        }
        let Some(entry) = walk_step(conn, owner, &id, include_pruned, &mut visited)? else {
            break;
        };
        cursor = entry.previous_id.clone();
        past.push(entry);
    }

    let mut future = Vec::new();
    let mut cursor = current.next_id.clone();
    while let Some(id) = cursor {
        let Some(entry) = walk_step(conn, owner, &id, include_pruned, &mut visited)? else {
            break;
        };
        cursor = entry.next_id.clone();
        future.push(entry);
    }

    tracing::debug!(owner = %owner, past = past.len(), future = future.len(), "trajectory walked");

    past.reverse();
    past.push(current);
    past.extend(future);
    Ok(past)
}

/// One hop of the trajectory walk. `None` ends the walk.
fn walk_step(
    conn: &Connection,
    owner: &str,
    id: &str,
    include_pruned: bool,
    visited: &mut HashSet<String>,
) -> Result<Option<Interest>> {
    if !visited.insert(id.to_string()) {
        tracing::warn!(id = %id, "interest chain revisits an entry, stopping walk");
        return Ok(None);
    }
    match get_interest(conn, id)? {
        Some(entry) if entry.user_id != owner => Ok(None),
        Some(entry) if entry.pruned && !include_pruned => Ok(None),
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::interest::types::InterestType;

    fn test_db() -> Connection {
        db::open_memory_database().unwrap()
    }

    fn mark(conn: &mut Connection, owner: &str, text: &str) -> Interest {
        mark_interesting(conn, owner, NewInterest::new(InterestType::Concept).moment(text)).unwrap()
    }

    #[test]
    fn first_mark_has_no_predecessor() {
        let mut conn = test_db();
        let first = mark(&mut conn, "ada", "first");
        assert!(first.previous_id.is_none());
        assert!(first.next_id.is_none());
        assert_eq!(first.salience_score, 0.5);
    }

    #[test]
    fn marks_link_both_directions() {
        let mut conn = test_db();
        let a = mark(&mut conn, "ada", "a");
        let b = mark(&mut conn, "ada", "b");

        let a = get_interest(&conn, &a.id).unwrap().unwrap();
        assert_eq!(a.next_id.as_deref(), Some(b.id.as_str()));
        assert_eq!(b.previous_id.as_deref(), Some(a.id.as_str()));
        assert_eq!(get_current(&conn, "ada").unwrap().unwrap().id, b.id);
    }

    #[test]
    fn owners_have_separate_chains() {
        let mut conn = test_db();
        let a = mark(&mut conn, "ada", "a");
        let g = mark(&mut conn, "grace", "g");
        assert!(g.previous_id.is_none());
        assert_eq!(get_current(&conn, "ada").unwrap().unwrap().id, a.id);
    }

    #[test]
    fn out_of_range_salience_is_rejected() {
        let mut conn = test_db();
        let err = mark_interesting(
            &mut conn,
            "ada",
            NewInterest::new(InterestType::Concept).salience(1.5),
        )
        .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn discoveries_concatenate_without_dedup() {
        let mut conn = test_db();
        let a = mark(&mut conn, "ada", "a");

        let d = Discoveries {
            advantages: vec!["fast".into()],
            disadvantages: vec!["shallow".into()],
            ..Default::default()
        };
        update_with_discoveries(&mut conn, &a.id, d.clone()).unwrap();
        let updated = update_with_discoveries(&mut conn, &a.id, d).unwrap();

        assert_eq!(updated.advantages, vec!["fast", "fast"]);
        assert_eq!(updated.disadvantages, vec!["shallow", "shallow"]);
        assert!(updated.resolved_at.is_none());
    }

    #[test]
    fn discoveries_on_unknown_id_is_not_found() {
        let mut conn = test_db();
        let err = update_with_discoveries(&mut conn, "missing", Discoveries::default()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn duration_is_floor_of_explore_to_resolve() {
        let mut conn = test_db();
        let a = mark(&mut conn, "ada", "a");

        let t0 = DateTime::parse_from_rfc3339("2026-01-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let t1 = t0 + chrono::Duration::milliseconds(90_900);
        conn.execute(
            "UPDATE interests SET explored_at = ?1 WHERE id = ?2",
            params![ts(&t0), a.id],
        )
        .unwrap();

        let resolved = resolve_at(&mut conn, &a.id, 0.8, Some("worth it"), None, t1).unwrap();
        assert_eq!(resolved.duration_seconds, Some(90));
        assert_eq!(resolved.resolved_at, Some(t1));
        assert_eq!(resolved.realized_value, Some(0.8));
        assert_eq!(resolved.value_notes.as_deref(), Some("worth it"));
    }

    #[test]
    fn resolving_without_exploration_leaves_duration_empty() {
        let mut conn = test_db();
        let a = mark(&mut conn, "ada", "a");
        let resolved = resolve(&mut conn, &a.id, 0.2, None, None).unwrap();
        assert!(resolved.duration_seconds.is_none());
        assert!(resolved.is_resolved());
    }

    #[test]
    fn re_resolving_overwrites_value() {
        let mut conn = test_db();
        let a = mark(&mut conn, "ada", "a");
        resolve(&mut conn, &a.id, 0.2, None, None).unwrap();
        let again = resolve(&mut conn, &a.id, 0.9, None, None).unwrap();
        assert_eq!(again.realized_value, Some(0.9));
    }

    #[test]
    fn resolve_with_self_as_next_is_rejected() {
        let mut conn = test_db();
        let a = mark(&mut conn, "ada", "a");
        let err = resolve(&mut conn, &a.id, 0.5, None, Some(&a.id)).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn mark_explored_keeps_first_timestamp() {
        let mut conn = test_db();
        let a = mark(&mut conn, "ada", "a");
        let first = mark_explored(&mut conn, &a.id).unwrap().explored_at;
        let second = mark_explored(&mut conn, &a.id).unwrap().explored_at;
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn trajectory_respects_max_depth_backwards() {
        let mut conn = test_db();
        let ids: Vec<String> = (0..5).map(|i| mark(&mut conn, "ada", &format!("m{i}")).id).collect();

        let trajectory = get_trajectory(&conn, "ada", 2, false).unwrap();
        let got: Vec<&str> = trajectory.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(got, vec![ids[2].as_str(), ids[3].as_str(), ids[4].as_str()]);
    }

    #[test]
    fn trajectory_stops_at_pruned_predecessor() {
        let mut conn = test_db();
        let a = mark(&mut conn, "ada", "a");
        let b = mark(&mut conn, "ada", "b");
        let c = mark(&mut conn, "ada", "c");
        prune(&mut conn, &b.id, "dead end").unwrap();

        let default_walk = get_trajectory(&conn, "ada", 50, false).unwrap();
        assert_eq!(default_walk.len(), 1);
        assert_eq!(default_walk[0].id, c.id);

        let full_walk = get_trajectory(&conn, "ada", 50, true).unwrap();
        let got: Vec<&str> = full_walk.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(got, vec![a.id.as_str(), b.id.as_str(), c.id.as_str()]);
    }

    #[test]
    fn pruned_tail_still_receives_successor() {
        let mut conn = test_db();
        let a = mark(&mut conn, "ada", "a");
        prune(&mut conn, &a.id, "noise").unwrap();
        assert!(get_current(&conn, "ada").unwrap().is_none());

        let b = mark(&mut conn, "ada", "b");
        assert_eq!(b.previous_id.as_deref(), Some(a.id.as_str()));
    }

    #[test]
    fn trajectory_survives_explicit_cycle() {
        let mut conn = test_db();
        let a = mark(&mut conn, "ada", "a");
        let b = mark(&mut conn, "ada", "b");
        // b -> a makes a loop; nothing is "current" any more.
        resolve(&mut conn, &b.id, 0.5, None, Some(&a.id)).unwrap();
        assert!(get_trajectory(&conn, "ada", 50, true).unwrap().is_empty());
    }
}
