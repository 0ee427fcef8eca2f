#![allow(dead_code)]

use attention_tape::interest::{self, Interest, InterestType, NewInterest};
use attention_tape::list::{self, InterestList, InterestListItem, ItemType, NewItem, NewList};
use rusqlite::Connection;

pub const OWNER: &str = "tester";

/// Open a fresh in-memory database with schema and migrations applied.
pub fn test_db() -> Connection {
    attention_tape::db::open_memory_database().unwrap()
}

/// Record a reading interest with the given moment text.
pub fn mark(conn: &mut Connection, owner: &str, text: &str) -> Interest {
    interest::mark_interesting(
        conn,
        owner,
        NewInterest::new(InterestType::Reading).moment(text),
    )
    .unwrap()
}

/// Create a custom list owned by [`OWNER`].
pub fn create_list(conn: &mut Connection, name: &str) -> InterestList {
    list::create_list(conn, OWNER, NewList::named(name)).unwrap()
}

/// Append `n` reading items, referencing `item-0`, `item-1`, ...
pub fn fill_list(conn: &mut Connection, list_id: &str, n: usize) -> Vec<InterestListItem> {
    (0..n)
        .map(|i| {
            let ref_id = format!("item-{i}");
            list::add_item(conn, list_id, OWNER, NewItem::new(ItemType::Reading, Some(&ref_id)))
                .unwrap()
        })
        .collect()
}

/// Positions of a list's items in read order.
pub fn positions(conn: &Connection, list_id: &str) -> Vec<usize> {
    list::get_items(conn, list_id)
        .unwrap()
        .into_iter()
        .map(|i| i.position)
        .collect()
}

/// Referenced ids of a list's items in position order.
pub fn item_refs(conn: &Connection, list_id: &str) -> Vec<String> {
    list::get_items(conn, list_id)
        .unwrap()
        .into_iter()
        .map(|i| i.item_id.unwrap_or_default())
        .collect()
}
