//! Item slots: insertion with shift, removal with gap closing, and reordering.
//!
//! Every operation here keeps the positions of a list's items exactly
//! `{0, 1, ..., N-1}`. Mutations run under `BEGIN IMMEDIATE`, so the
//! read-count / compute-shift / write sequence cannot interleave with another
//! writer on the same database.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::collections::{HashMap, HashSet};

use super::lists::{item_count, require_list, touch};
use super::types::{InterestList, InterestListItem, ItemStatus, ItemUpdate, NewItem};
use crate::db::{json_column, new_id, opt_ts_column, ts, ts_column};
use crate::{Error, Result};

pub(crate) const ITEM_COLUMNS: &str = "id, list_id, user_id, position, item_type, item_id, \
     item_metadata, notes, status, completed_at, added_at, custom_metadata";

pub(crate) fn item_from_row(row: &Row) -> rusqlite::Result<InterestListItem> {
    Ok(InterestListItem {
        id: row.get(0)?,
        list_id: row.get(1)?,
        user_id: row.get(2)?,
        position: row.get(3)?,
        item_type: row.get(4)?,
        item_id: row.get(5)?,
        item_metadata: json_column(row, 6)?,
        notes: row.get(7)?,
        status: row.get(8)?,
        completed_at: opt_ts_column(row, 9)?,
        added_at: ts_column(row, 10)?,
        custom_metadata: json_column(row, 11)?,
    })
}

/// Items of a list ordered by position.
pub fn get_items(conn: &Connection, list_id: &str) -> Result<Vec<InterestListItem>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {ITEM_COLUMNS} FROM interest_list_items WHERE list_id = ?1 ORDER BY position, rowid"
    ))?;
    let items = stmt
        .query_map(params![list_id], item_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(items)
}

pub fn get_item(conn: &Connection, item_id: &str) -> Result<Option<InterestListItem>> {
    Ok(conn
        .query_row(
            &format!("SELECT {ITEM_COLUMNS} FROM interest_list_items WHERE id = ?1"),
            params![item_id],
            item_from_row,
        )
        .optional()?)
}

fn require_item(conn: &Connection, item_id: &str) -> Result<InterestListItem> {
    get_item(conn, item_id)?.ok_or_else(|| Error::not_found("list item", item_id))
}

/// Add an item. Without a position it is appended; with one, every item at or
/// after that position moves up by one first. Positions past the end append.
pub fn add_item(
    conn: &mut Connection,
    list_id: &str,
    owner: &str,
    new: NewItem,
) -> Result<InterestListItem> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let exists: bool = tx.query_row(
        "SELECT COUNT(*) > 0 FROM interest_lists WHERE id = ?1",
        params![list_id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(Error::not_found("list", list_id));
    }

    let count = item_count(&tx, list_id)?;
    let position = match new.position {
        Some(p) if p < count => {
            tx.execute(
                "UPDATE interest_list_items SET position = position + 1 \
                 WHERE list_id = ?1 AND position >= ?2",
                params![list_id, p],
            )?;
            p
        }
        _ => count,
    };

    let id = new_id();
    let item_metadata = new.item_metadata.as_ref().map(serde_json::to_string).transpose()?;
    let custom_metadata = new.custom_metadata.as_ref().map(serde_json::to_string).transpose()?;
    tx.execute(
        "INSERT INTO interest_list_items (id, list_id, user_id, position, item_type, item_id, \
         item_metadata, notes, status, added_at, custom_metadata) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            id,
            list_id,
            owner,
            position,
            new.item_type,
            new.item_id,
            item_metadata,
            new.notes,
            ItemStatus::Pending,
            ts(&Utc::now()),
            custom_metadata,
        ],
    )?;
    touch(&tx, list_id)?;
    tx.commit()?;

    tracing::info!(id = %id, list = %list_id, position, item_type = %new.item_type, "list item added");
    require_item(conn, &id)
}

/// Partial item update. Completing an item stamps `completed_at`.
pub fn update_item(conn: &mut Connection, item_id: &str, update: ItemUpdate) -> Result<InterestListItem> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let list_id: String = tx
        .query_row(
            "SELECT list_id FROM interest_list_items WHERE id = ?1",
            params![item_id],
            |row| row.get(0),
        )
        .optional()?
        .ok_or_else(|| Error::not_found("list item", item_id))?;

    if let Some(ref notes) = update.notes {
        tx.execute(
            "UPDATE interest_list_items SET notes = ?1 WHERE id = ?2",
            params![notes, item_id],
        )?;
    }
    if let Some(status) = update.status {
        let completed_at = (status == ItemStatus::Completed).then(|| ts(&Utc::now()));
        tx.execute(
            "UPDATE interest_list_items SET status = ?1, \
             completed_at = COALESCE(?2, completed_at) WHERE id = ?3",
            params![status, completed_at, item_id],
        )?;
    }
    if let Some(ref metadata) = update.custom_metadata {
        tx.execute(
            "UPDATE interest_list_items SET custom_metadata = ?1 WHERE id = ?2",
            params![serde_json::to_string(metadata)?, item_id],
        )?;
    }
    touch(&tx, &list_id)?;
    tx.commit()?;

    tracing::debug!(id = %item_id, status = ?update.status, "list item updated");
    require_item(conn, item_id)
}

/// Remove an item and close the gap it leaves. The list cursor is clamped to
/// the shorter list. `false` when the item did not exist.
pub fn remove_item(conn: &mut Connection, item_id: &str) -> Result<bool> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let Some((list_id, position)) = tx
        .query_row(
            "SELECT list_id, position FROM interest_list_items WHERE id = ?1",
            params![item_id],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, usize>(1)?)),
        )
        .optional()?
    else {
        return Ok(false);
    };

    tx.execute("DELETE FROM interest_list_items WHERE id = ?1", params![item_id])?;
    tx.execute(
        "UPDATE interest_list_items SET position = position - 1 \
         WHERE list_id = ?1 AND position > ?2",
        params![list_id, position],
    )?;

    let last = item_count(&tx, &list_id)?.saturating_sub(1);
    tx.execute(
        "UPDATE interest_lists SET current_position = MIN(current_position, ?1) WHERE id = ?2",
        params![last, list_id],
    )?;
    touch(&tx, &list_id)?;
    tx.commit()?;

    tracing::info!(id = %item_id, list = %list_id, position, "list item removed");
    Ok(true)
}

/// Move items to new positions in one transaction.
///
/// Target positions must be distinct and inside `[0, item_count)`. Items not
/// named in `new_positions` keep their relative order and fill the remaining
/// slots from the lowest up.
pub fn reorder_items(
    conn: &mut Connection,
    list_id: &str,
    new_positions: &HashMap<String, usize>,
) -> Result<InterestList> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let items = get_items(&tx, list_id)?;
    if items.is_empty() {
        // Distinguish "no such list" from "empty list".
        require_list(&tx, list_id, false)?;
    }
    let count = items.len();

    let mut taken = HashSet::new();
    for (item_id, &position) in new_positions {
        if position >= count {
            return Err(Error::invalid(format!(
                "position {position} for item {item_id} outside [0, {count})"
            )));
        }
        if !taken.insert(position) {
            return Err(Error::invalid(format!("duplicate target position {position}")));
        }
        if !items.iter().any(|item| &item.id == item_id) {
            return Err(Error::invalid(format!("item {item_id} is not in list {list_id}")));
        }
    }

    let mut free_slots = (0..count).filter(|p| !taken.contains(p));
    let mut placed = Vec::with_capacity(count);
    for item in &items {
        let position = match new_positions.get(&item.id) {
            Some(&p) => p,
            None => free_slots
                .next()
                .ok_or_else(|| Error::invalid("reorder left no slot for an unmoved item"))?,
        };
        placed.push((item.id.as_str(), position));
    }

    {
        let mut stmt =
            tx.prepare_cached("UPDATE interest_list_items SET position = ?1 WHERE id = ?2")?;
        for (id, position) in &placed {
            stmt.execute(params![position, id])?;
        }
    }
    touch(&tx, list_id)?;
    tx.commit()?;

    tracing::info!(id = %list_id, moved = new_positions.len(), "list reordered");
    require_list(conn, list_id, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::list::lists::{create_list, get_list};
    use crate::list::types::{ItemType, NewList};

    fn positions(conn: &Connection, list_id: &str) -> Vec<(String, usize)> {
        get_items(conn, list_id)
            .unwrap()
            .into_iter()
            .map(|item| (item.item_id.unwrap_or_default(), item.position))
            .collect()
    }

    fn setup(n: usize) -> (Connection, String, Vec<InterestListItem>) {
        let mut conn = db::open_memory_database().unwrap();
        let list = create_list(&mut conn, "ada", NewList::named("Queue")).unwrap();
        let items = (0..n)
            .map(|i| {
                add_item(&mut conn, &list.id, "ada", NewItem::new(ItemType::Chunk, Some(&format!("c{i}"))))
                    .unwrap()
            })
            .collect();
        (conn, list.id, items)
    }

    #[test]
    fn append_assigns_next_position() {
        let (_conn, _list, items) = setup(3);
        let got: Vec<usize> = items.iter().map(|i| i.position).collect();
        assert_eq!(got, vec![0, 1, 2]);
        assert!(items.iter().all(|i| i.status == ItemStatus::Pending));
    }

    #[test]
    fn insert_shifts_later_items_up() {
        let (mut conn, list, _) = setup(3);
        add_item(&mut conn, &list, "ada", NewItem::new(ItemType::Chunk, Some("new")).at(1)).unwrap();
        assert_eq!(
            positions(&conn, &list),
            vec![
                ("c0".to_string(), 0),
                ("new".to_string(), 1),
                ("c1".to_string(), 2),
                ("c2".to_string(), 3),
            ]
        );
    }

    #[test]
    fn insert_past_end_appends() {
        let (mut conn, list, _) = setup(2);
        let item = add_item(&mut conn, &list, "ada", NewItem::new(ItemType::Chunk, None).at(10)).unwrap();
        assert_eq!(item.position, 2);
    }

    #[test]
    fn add_to_missing_list_is_not_found() {
        let mut conn = db::open_memory_database().unwrap();
        let err = add_item(&mut conn, "nope", "ada", NewItem::new(ItemType::Book, None)).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn remove_closes_gap_and_clamps_cursor() {
        let (mut conn, list, items) = setup(3);
        conn.execute(
            "UPDATE interest_lists SET current_position = 2 WHERE id = ?1",
            params![list],
        )
        .unwrap();

        assert!(remove_item(&mut conn, &items[0].id).unwrap());
        assert_eq!(
            positions(&conn, &list),
            vec![("c1".to_string(), 0), ("c2".to_string(), 1)]
        );
        assert_eq!(get_list(&conn, &list, false).unwrap().unwrap().current_position, 1);

        assert!(!remove_item(&mut conn, &items[0].id).unwrap());
    }

    #[test]
    fn completing_item_stamps_completed_at() {
        let (mut conn, _list, items) = setup(1);
        let done = update_item(
            &mut conn,
            &items[0].id,
            ItemUpdate {
                status: Some(ItemStatus::Completed),
                notes: Some("finished".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(done.status, ItemStatus::Completed);
        assert!(done.completed_at.is_some());
        assert_eq!(done.notes.as_deref(), Some("finished"));

        assert!(update_item(&mut conn, "nope", ItemUpdate::default()).unwrap_err().is_not_found());
    }

    #[test]
    fn reorder_reverses_list() {
        let (mut conn, list, items) = setup(3);
        let mapping = HashMap::from([
            (items[0].id.clone(), 2),
            (items[1].id.clone(), 1),
            (items[2].id.clone(), 0),
        ]);
        reorder_items(&mut conn, &list, &mapping).unwrap();
        assert_eq!(
            positions(&conn, &list),
            vec![("c2".to_string(), 0), ("c1".to_string(), 1), ("c0".to_string(), 2)]
        );
    }

    #[test]
    fn partial_reorder_fills_remaining_slots_in_order() {
        let (mut conn, list, items) = setup(4);
        let mapping = HashMap::from([(items[3].id.clone(), 0)]);
        reorder_items(&mut conn, &list, &mapping).unwrap();
        assert_eq!(
            positions(&conn, &list),
            vec![
                ("c3".to_string(), 0),
                ("c0".to_string(), 1),
                ("c1".to_string(), 2),
                ("c2".to_string(), 3),
            ]
        );
    }

    #[test]
    fn reorder_rejects_bad_mappings_without_writing() {
        let (mut conn, list, items) = setup(3);
        let before = positions(&conn, &list);

        let duplicate = HashMap::from([(items[0].id.clone(), 1), (items[1].id.clone(), 1)]);
        let out_of_range = HashMap::from([(items[0].id.clone(), 3)]);
        let foreign = HashMap::from([("stranger".to_string(), 0)]);

        for mapping in [duplicate, out_of_range, foreign] {
            let err = reorder_items(&mut conn, &list, &mapping).unwrap_err();
            assert!(err.is_invalid_argument());
        }
        assert_eq!(positions(&conn, &list), before);
    }

    #[test]
    fn reorder_missing_list_is_not_found() {
        let mut conn = db::open_memory_database().unwrap();
        let err = reorder_items(&mut conn, "nope", &HashMap::new()).unwrap_err();
        assert!(err.is_not_found());
    }
}
