//! Forking a list into an independent copy, with provenance.
//!
//! A branch copies the source's type, visibility, and metadata, and
//! optionally every item. Copied items restart as `pending` with a fresh
//! `added_at`: exploration begins again in the branch.

use chrono::Utc;
use rusqlite::{params, Connection, Row, TransactionBehavior};

use super::items::get_items;
use super::lists::{item_count, require_list};
use super::types::{InterestList, InterestListBranch, ItemStatus, ListStatus};
use crate::db::{json_column, new_id, ts, ts_column};
use crate::{Error, Result};

fn branch_from_row(row: &Row) -> rusqlite::Result<InterestListBranch> {
    Ok(InterestListBranch {
        id: row.get(0)?,
        user_id: row.get(1)?,
        source_list_id: row.get(2)?,
        branch_list_id: row.get(3)?,
        branch_position: row.get(4)?,
        branch_reason: row.get(5)?,
        created_at: ts_column(row, 6)?,
        custom_metadata: json_column(row, 7)?,
    })
}

/// Fork `source_list_id` into a new list named `branch_name`.
///
/// `branch_position` defaults to the source's cursor and must lie inside the
/// source's items (only 0 for an empty source). The new list, its
/// copied items, and the provenance record are written in one transaction.
pub fn branch_list(
    conn: &mut Connection,
    source_list_id: &str,
    owner: &str,
    branch_name: &str,
    branch_position: Option<usize>,
    branch_reason: Option<&str>,
    include_items: bool,
) -> Result<InterestList> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let source = require_list(&tx, source_list_id, false)?;
    let position = branch_position.unwrap_or(source.current_position);
    let count = item_count(&tx, source_list_id)?;
    if position >= count.max(1) {
        return Err(Error::invalid(format!(
            "branch position {position} outside [0, {count})"
        )));
    }
    let id = new_id();
    let now = ts(&Utc::now());

    // Written from the in-memory value, so the branch owns its own copy.
    let metadata = source
        .custom_metadata
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    tx.execute(
        "INSERT INTO interest_lists (id, user_id, name, description, list_type, status, \
         custom_metadata, current_position, created_at, updated_at, is_public, parent_list_id, \
         branched_at_position) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8, ?9, ?10, ?11)",
        params![
            id,
            owner,
            branch_name,
            source.description,
            source.list_type,
            ListStatus::Active,
            metadata,
            now,
            source.is_public,
            source.id,
            position,
        ],
    )?;

    let mut copied = 0usize;
    if include_items {
        let mut stmt = tx.prepare_cached(
            "INSERT INTO interest_list_items (id, list_id, user_id, position, item_type, item_id, \
             item_metadata, notes, status, added_at, custom_metadata) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )?;
        for item in get_items(&tx, source_list_id)? {
            let item_metadata = item.item_metadata.as_ref().map(serde_json::to_string).transpose()?;
            let custom_metadata = item.custom_metadata.as_ref().map(serde_json::to_string).transpose()?;
            stmt.execute(params![
                new_id(),
                id,
                owner,
                item.position,
                item.item_type,
                item.item_id,
                item_metadata,
                item.notes,
                ItemStatus::Pending,
                now,
                custom_metadata,
            ])?;
            copied += 1;
        }
    }

    tx.execute(
        "INSERT INTO interest_list_branches (id, user_id, source_list_id, branch_list_id, \
         branch_position, branch_reason, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![new_id(), owner, source_list_id, id, position, branch_reason, now],
    )?;
    tx.commit()?;

    tracing::info!(
        source = %source_list_id,
        branch = %id,
        position,
        items = copied,
        reason = ?branch_reason,
        "list branched"
    );
    require_list(conn, &id, true)
}

/// Branch records whose source is `list_id`, newest first.
pub fn get_branches(conn: &Connection, list_id: &str) -> Result<Vec<InterestListBranch>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, source_list_id, branch_list_id, branch_position, branch_reason, \
         created_at, custom_metadata FROM interest_list_branches WHERE source_list_id = ?1 \
         ORDER BY created_at DESC, rowid DESC",
    )?;
    let branches = stmt
        .query_map(params![list_id], branch_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(branches)
}
