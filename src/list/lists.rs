//! List lifecycle and cursor navigation.

use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row, TransactionBehavior};

use super::items::get_items;
use super::types::{Direction, InterestList, ListFilter, ListStatus, ListUpdate, NewList};
use crate::db::{json_column, new_id, opt_ts_column, ts, ts_column};
use crate::{Error, Result};

pub(crate) const LIST_COLUMNS: &str = "id, user_id, name, description, list_type, status, \
     custom_metadata, current_position, created_at, updated_at, completed_at, is_public, \
     parent_list_id, branched_at_position";

pub(crate) fn list_from_row(row: &Row) -> rusqlite::Result<InterestList> {
    Ok(InterestList {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        list_type: row.get(4)?,
        status: row.get(5)?,
        custom_metadata: json_column(row, 6)?,
        current_position: row.get(7)?,
        created_at: ts_column(row, 8)?,
        updated_at: ts_column(row, 9)?,
        completed_at: opt_ts_column(row, 10)?,
        is_public: row.get(11)?,
        parent_list_id: row.get(12)?,
        branched_at_position: row.get(13)?,
        items: None,
    })
}

/// Number of items currently in a list.
pub(crate) fn item_count(conn: &Connection, list_id: &str) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM interest_list_items WHERE list_id = ?1",
        params![list_id],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}

/// Bump `updated_at` after any structural change.
pub(crate) fn touch(conn: &Connection, list_id: &str) -> Result<()> {
    conn.execute(
        "UPDATE interest_lists SET updated_at = ?1 WHERE id = ?2",
        params![ts(&Utc::now()), list_id],
    )?;
    Ok(())
}

pub(crate) fn require_list(conn: &Connection, list_id: &str, include_items: bool) -> Result<InterestList> {
    get_list(conn, list_id, include_items)?.ok_or_else(|| Error::not_found("list", list_id))
}

/// Create an empty, active list with the cursor at 0.
pub fn create_list(conn: &mut Connection, owner: &str, new: NewList) -> Result<InterestList> {
    let id = new_id();
    let now = ts(&Utc::now());
    let metadata = new.custom_metadata.as_ref().map(serde_json::to_string).transpose()?;

    conn.execute(
        "INSERT INTO interest_lists (id, user_id, name, description, list_type, status, \
         custom_metadata, current_position, created_at, updated_at, is_public) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8, ?9)",
        params![
            id,
            owner,
            new.name,
            new.description,
            new.list_type,
            ListStatus::Active,
            metadata,
            now,
            new.is_public,
        ],
    )?;

    tracing::info!(id = %id, owner = %owner, name = %new.name, "list created");
    require_list(conn, &id, true)
}

pub fn get_list(conn: &Connection, list_id: &str, include_items: bool) -> Result<Option<InterestList>> {
    let list = conn
        .query_row(
            &format!("SELECT {LIST_COLUMNS} FROM interest_lists WHERE id = ?1"),
            params![list_id],
            list_from_row,
        )
        .optional()?;

    match list {
        Some(mut list) => {
            if include_items {
                list.items = Some(get_items(conn, list_id)?);
            }
            Ok(Some(list))
        }
        None => Ok(None),
    }
}

/// An owner's lists, most recently updated first. Archived lists are hidden
/// unless `include_archived` is set or the status filter asks for them.
pub fn list_lists(conn: &Connection, owner: &str, filter: &ListFilter) -> Result<Vec<InterestList>> {
    let mut clauses = vec!["user_id = ?".to_string()];
    let mut args: Vec<Value> = vec![Value::Text(owner.to_string())];

    if let Some(ref t) = filter.list_type {
        clauses.push("list_type = ?".into());
        args.push(Value::Text(t.as_str().to_string()));
    }
    if let Some(s) = filter.status {
        clauses.push("status = ?".into());
        args.push(Value::Text(s.as_str().to_string()));
    } else if !filter.include_archived {
        clauses.push("status != 'archived'".into());
    }

    args.push(Value::Integer(filter.limit as i64));
    args.push(Value::Integer(filter.offset as i64));

    let sql = format!(
        "SELECT {LIST_COLUMNS} FROM interest_lists WHERE {} \
         ORDER BY updated_at DESC, rowid DESC LIMIT ? OFFSET ?",
        clauses.join(" AND ")
    );
    let mut stmt = conn.prepare(&sql)?;
    let lists = stmt
        .query_map(params_from_iter(args), list_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(lists)
}

/// Apply only the supplied fields. Completing a list stamps `completed_at`.
pub fn update_list(conn: &mut Connection, list_id: &str, update: ListUpdate) -> Result<InterestList> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let exists: bool = tx.query_row(
        "SELECT COUNT(*) > 0 FROM interest_lists WHERE id = ?1",
        params![list_id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(Error::not_found("list", list_id));
    }

    let now = ts(&Utc::now());
    if let Some(ref name) = update.name {
        tx.execute("UPDATE interest_lists SET name = ?1 WHERE id = ?2", params![name, list_id])?;
    }
    if let Some(ref description) = update.description {
        tx.execute(
            "UPDATE interest_lists SET description = ?1 WHERE id = ?2",
            params![description, list_id],
        )?;
    }
    if let Some(status) = update.status {
        tx.execute(
            "UPDATE interest_lists SET status = ?1 WHERE id = ?2",
            params![status, list_id],
        )?;
        if status == ListStatus::Completed {
            tx.execute(
                "UPDATE interest_lists SET completed_at = ?1 WHERE id = ?2",
                params![now, list_id],
            )?;
        }
    }
    if let Some(is_public) = update.is_public {
        tx.execute(
            "UPDATE interest_lists SET is_public = ?1 WHERE id = ?2",
            params![is_public, list_id],
        )?;
    }
    if let Some(ref metadata) = update.custom_metadata {
        tx.execute(
            "UPDATE interest_lists SET custom_metadata = ?1 WHERE id = ?2",
            params![serde_json::to_string(metadata)?, list_id],
        )?;
    }
    touch(&tx, list_id)?;
    tx.commit()?;

    tracing::info!(id = %list_id, status = ?update.status, "list updated");
    require_list(conn, list_id, true)
}

/// Delete a list with its items and outgoing branch records. `false` when the
/// list did not exist.
pub fn delete_list(conn: &mut Connection, list_id: &str) -> Result<bool> {
    let rows = conn.execute("DELETE FROM interest_lists WHERE id = ?1", params![list_id])?;
    if rows > 0 {
        tracing::info!(id = %list_id, "list deleted");
    }
    Ok(rows > 0)
}

/// Move the cursor. `forward` and `back` clamp at the ends; `jump` requires a
/// target inside `[0, item_count)`.
pub fn navigate(
    conn: &mut Connection,
    list_id: &str,
    direction: Direction,
    jump_to_position: Option<i64>,
) -> Result<InterestList> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let current: usize = tx
        .query_row(
            "SELECT current_position FROM interest_lists WHERE id = ?1",
            params![list_id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| Error::not_found("list", list_id))?;
    let count = item_count(&tx, list_id)?;

    let target = match direction {
        Direction::Forward => (current + 1).min(count.saturating_sub(1)),
        Direction::Back => current.saturating_sub(1),
        Direction::Jump => {
            let to = jump_to_position
                .ok_or_else(|| Error::invalid("jump requires jump_to_position"))?;
            if to < 0 || to as usize >= count {
                return Err(Error::invalid(format!(
                    "jump target {to} outside [0, {count})"
                )));
            }
            to as usize
        }
    };

    tx.execute(
        "UPDATE interest_lists SET current_position = ?1, updated_at = ?2 WHERE id = ?3",
        params![target, ts(&Utc::now()), list_id],
    )?;
    tx.commit()?;

    tracing::debug!(id = %list_id, direction = %direction, from = current, to = target, "list navigated");
    require_list(conn, list_id, true)
}
