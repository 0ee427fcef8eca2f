//! Tag attachment on interest entries.
//!
//! Tags are trimmed and lowercased before storage. The `(interest_id, tag)`
//! pair is unique; inserting an existing pair is a silent skip.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::Serialize;

use super::types::{Interest, InterestTag};
use crate::db::{new_id, ts, ts_column};
use crate::{Error, Result};

/// Normalize raw tags: trim, lowercase, drop empties, dedupe keeping first
/// occurrence order.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for raw in tags {
        let tag = raw.as_ref().trim().to_lowercase();
        if !tag.is_empty() && !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// Insert tags inside the caller's transaction. Returns only the rows that
/// were actually created.
pub(crate) fn insert_tags<S: AsRef<str>>(
    conn: &Connection,
    owner: &str,
    interest_id: &str,
    tags: &[S],
) -> Result<Vec<InterestTag>> {
    let mut created = Vec::new();
    let mut stmt = conn.prepare_cached(
        "INSERT OR IGNORE INTO interest_tags (id, user_id, interest_id, tag, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;

    for tag in normalize_tags(tags) {
        let now = Utc::now();
        let id = new_id();
        let inserted = stmt.execute(params![id, owner, interest_id, tag, ts(&now)])?;
        if inserted == 1 {
            created.push(InterestTag {
                id,
                user_id: owner.to_string(),
                interest_id: interest_id.to_string(),
                tag,
                created_at: now,
                tag_salience: None,
            });
        }
    }

    Ok(created)
}

/// Fill in `tags` for each interest.
pub(crate) fn load_tags(conn: &Connection, interests: &mut [Interest]) -> Result<()> {
    let mut stmt = conn.prepare_cached(
        "SELECT tag FROM interest_tags WHERE interest_id = ?1 ORDER BY created_at, rowid",
    )?;
    for interest in interests.iter_mut() {
        interest.tags = stmt
            .query_map(params![interest.id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
    }
    Ok(())
}

/// Attach tags to an entry owned by `owner`. Tags already present
/// (case-insensitively) are skipped; only new rows are returned.
pub fn add_tags<S: AsRef<str>>(
    conn: &mut Connection,
    id: &str,
    owner: &str,
    tags: &[S],
) -> Result<Vec<InterestTag>> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let exists: Option<String> = tx
        .query_row(
            "SELECT id FROM interests WHERE id = ?1 AND user_id = ?2",
            params![id, owner],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(Error::not_found("interest", id));
    }

    let created = insert_tags(&tx, owner, id, tags)?;
    tx.commit()?;

    tracing::debug!(id = %id, added = created.len(), "tags added");
    Ok(created)
}

/// Tags on one entry, in creation order.
pub fn get_tags(conn: &Connection, interest_id: &str) -> Result<Vec<InterestTag>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, interest_id, tag, created_at, tag_salience FROM interest_tags \
         WHERE interest_id = ?1 ORDER BY created_at, rowid",
    )?;
    let tags = stmt
        .query_map(params![interest_id], |row| {
            Ok(InterestTag {
                id: row.get(0)?,
                user_id: row.get(1)?,
                interest_id: row.get(2)?,
                tag: row.get(3)?,
                created_at: ts_column(row, 4)?,
                tag_salience: row.get(5)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tags)
}

/// One row of [`tag_cloud`].
#[derive(Debug, Clone, Serialize)]
pub struct TagUsage {
    pub tag: String,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_salience: Option<f64>,
}

/// Most used tags of an owner, busiest first.
pub fn tag_cloud(conn: &Connection, owner: &str, limit: usize) -> Result<Vec<TagUsage>> {
    let mut stmt = conn.prepare(
        "SELECT tag, COUNT(*), MAX(tag_salience) FROM interest_tags WHERE user_id = ?1 \
         GROUP BY tag ORDER BY COUNT(*) DESC, tag ASC LIMIT ?2",
    )?;
    let rows = stmt
        .query_map(params![owner, limit as i64], |row| {
            Ok(TagUsage {
                tag: row.get(0)?,
                count: row.get::<_, i64>(1)? as u64,
                tag_salience: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// Recompute `tag_salience` for every tag of `owner` as the mean salience of
/// the unpruned entries carrying it. Returns the number of tag rows touched.
pub fn refresh_tag_salience(conn: &mut Connection, owner: &str) -> Result<usize> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let updated = tx.execute(
        "UPDATE interest_tags SET tag_salience = ( \
             SELECT AVG(i.salience_score) FROM interest_tags t \
             JOIN interests i ON i.id = t.interest_id \
             WHERE t.user_id = interest_tags.user_id AND t.tag = interest_tags.tag AND i.pruned = 0 \
         ) WHERE user_id = ?1",
        params![owner],
    )?;
    tx.commit()?;
    tracing::info!(owner = %owner, rows = updated, "tag salience refreshed");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::interest::log::{mark_interesting, prune};
    use crate::interest::types::{InterestType, NewInterest};

    fn seeded() -> (Connection, String) {
        let mut conn = db::open_memory_database().unwrap();
        let id = mark_interesting(&mut conn, "ada", NewInterest::new(InterestType::Reading))
            .unwrap()
            .id;
        (conn, id)
    }

    #[test]
    fn normalize_lowercases_and_dedupes() {
        assert_eq!(
            normalize_tags(&["Foo", " foo ", "FOO", "", "Bar"]),
            vec!["foo", "bar"]
        );
    }

    #[test]
    fn add_tags_is_idempotent() {
        let (mut conn, id) = seeded();

        let first = add_tags(&mut conn, &id, "ada", &["Foo", "foo", "FOO"]).unwrap();
        assert_eq!(first.len(), 1);
        let second = add_tags(&mut conn, &id, "ada", &["Foo", "foo", "FOO"]).unwrap();
        assert!(second.is_empty());

        let tags = get_tags(&conn, &id).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].tag, "foo");
    }

    #[test]
    fn add_tags_for_other_owner_is_not_found() {
        let (mut conn, id) = seeded();
        let err = add_tags(&mut conn, &id, "grace", &["x"]).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn salience_refresh_ignores_pruned_entries() {
        let mut conn = db::open_memory_database().unwrap();
        let low = NewInterest::new(InterestType::Concept).salience(0.2).tags(["rust"]);
        let high = NewInterest::new(InterestType::Concept).salience(0.8).tags(["rust"]);
        let noisy = NewInterest::new(InterestType::Concept).salience(0.0).tags(["rust"]);
        mark_interesting(&mut conn, "ada", low).unwrap();
        mark_interesting(&mut conn, "ada", high).unwrap();
        let noisy = mark_interesting(&mut conn, "ada", noisy).unwrap();
        prune(&mut conn, &noisy.id, "noise").unwrap();

        assert_eq!(refresh_tag_salience(&mut conn, "ada").unwrap(), 3);

        let cloud = tag_cloud(&conn, "ada", 10).unwrap();
        assert_eq!(cloud.len(), 1);
        assert_eq!(cloud[0].count, 3);
        let salience = cloud[0].tag_salience.unwrap();
        assert!((salience - 0.5).abs() < 1e-9);
    }
}
