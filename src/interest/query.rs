//! Filtered listing and text search over the interest log. Newest first.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

use super::log::{interest_from_row, INTEREST_COLUMNS};
use super::tags::{load_tags, normalize_tags};
use super::types::{Interest, InterestFilter};
use crate::db::like_pattern;
use crate::Result;

/// Filter and paginate an owner's entries, ordered by creation time
/// descending. The tag filter matches entries carrying any listed tag.
pub fn list_interests(conn: &Connection, owner: &str, filter: &InterestFilter) -> Result<Vec<Interest>> {
    let mut clauses = vec!["user_id = ?".to_string()];
    let mut args: Vec<Value> = vec![Value::Text(owner.to_string())];

    if let Some(ref t) = filter.interest_type {
        clauses.push("interest_type = ?".into());
        args.push(Value::Text(t.as_str().to_string()));
    }
    if !filter.include_pruned {
        clauses.push("pruned = 0".into());
    }
    if let Some(min) = filter.min_realized_value {
        clauses.push("realized_value >= ?".into());
        args.push(Value::Real(min));
    }

    let tags = normalize_tags(&filter.tags);
    if !tags.is_empty() {
        let placeholders = vec!["?"; tags.len()].join(", ");
        clauses.push(format!(
            "EXISTS (SELECT 1 FROM interest_tags t WHERE t.interest_id = interests.id \
             AND t.tag IN ({placeholders}))"
        ));
        args.extend(tags.into_iter().map(Value::Text));
    }

    args.push(Value::Integer(filter.limit as i64));
    args.push(Value::Integer(filter.offset as i64));

    let sql = format!(
        "SELECT {INTEREST_COLUMNS} FROM interests WHERE {} \
         ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
        clauses.join(" AND ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let mut interests = stmt
        .query_map(params_from_iter(args), interest_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    load_tags(conn, &mut interests)?;

    tracing::debug!(owner = %owner, results = interests.len(), "interests listed");
    Ok(interests)
}

/// Case-insensitive substring search over `moment_text` and `value_notes`.
pub fn search(conn: &Connection, owner: &str, query: &str, limit: usize) -> Result<Vec<Interest>> {
    let pattern = like_pattern(query);
    let mut stmt = conn.prepare(&format!(
        "SELECT {INTEREST_COLUMNS} FROM interests WHERE user_id = ?1 \
         AND (lower(moment_text) LIKE ?2 ESCAPE '\\' OR lower(value_notes) LIKE ?2 ESCAPE '\\') \
         ORDER BY created_at DESC, rowid DESC LIMIT ?3"
    ))?;
    let mut interests = stmt
        .query_map(params![owner, pattern, limit as i64], interest_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    load_tags(conn, &mut interests)?;

    tracing::debug!(owner = %owner, query = %query, results = interests.len(), "interests searched");
    Ok(interests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::interest::log::{mark_interesting, prune, resolve};
    use crate::interest::types::{InterestType, NewInterest};

    fn seed(conn: &mut Connection) -> Vec<Interest> {
        let specs = [
            (InterestType::Reading, "Reading about B-trees", vec!["Databases"]),
            (InterestType::Question, "Why is WAL faster?", vec!["databases", "perf"]),
            (InterestType::Reading, "Essay on 100% coverage", vec![]),
        ];
        specs
            .into_iter()
            .map(|(t, text, tags)| {
                mark_interesting(conn, "ada", NewInterest::new(t).moment(text).tags(tags)).unwrap()
            })
            .collect()
    }

    #[test]
    fn list_is_newest_first_and_paginates() {
        let mut conn = db::open_memory_database().unwrap();
        let seeded = seed(&mut conn);

        let all = list_interests(&conn, "ada", &InterestFilter::default()).unwrap();
        let ids: Vec<&str> = all.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec![seeded[2].id.as_str(), seeded[1].id.as_str(), seeded[0].id.as_str()]);

        let page = list_interests(
            &conn,
            "ada",
            &InterestFilter {
                limit: 1,
                offset: 1,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, seeded[1].id);
    }

    #[test]
    fn filters_by_type_tags_value_and_pruning() {
        let mut conn = db::open_memory_database().unwrap();
        let seeded = seed(&mut conn);

        let readings = list_interests(
            &conn,
            "ada",
            &InterestFilter {
                interest_type: Some(InterestType::Reading),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(readings.len(), 2);

        let tagged = list_interests(
            &conn,
            "ada",
            &InterestFilter {
                tags: vec!["PERF".into(), "nothing".into()],
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].id, seeded[1].id);
        assert_eq!(tagged[0].tags, vec!["databases", "perf"]);

        resolve(&mut conn, &seeded[0].id, 0.9, None, None).unwrap();
        let valuable = list_interests(
            &conn,
            "ada",
            &InterestFilter {
                min_realized_value: Some(0.5),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(valuable.len(), 1);

        prune(&mut conn, &seeded[2].id, "off topic").unwrap();
        let visible = list_interests(&conn, "ada", &InterestFilter::default()).unwrap();
        assert_eq!(visible.len(), 2);
        let everything = list_interests(
            &conn,
            "ada",
            &InterestFilter {
                include_pruned: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(everything.len(), 3);
    }

    #[test]
    fn search_matches_notes_and_text_case_insensitively() {
        let mut conn = db::open_memory_database().unwrap();
        let seeded = seed(&mut conn);
        resolve(&mut conn, &seeded[0].id, 0.7, Some("Great primer on WAL too"), None).unwrap();

        let hits = search(&conn, "ada", "wal", 50).unwrap();
        let ids: Vec<&str> = hits.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec![seeded[1].id.as_str(), seeded[0].id.as_str()]);

        let literal = search(&conn, "ada", "100%", 50).unwrap();
        assert_eq!(literal.len(), 1);

        assert!(search(&conn, "grace", "wal", 50).unwrap().is_empty());
    }
}
