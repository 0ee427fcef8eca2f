//! SQL DDL for all tape tables.
//!
//! Defines `interests`, `interest_tags`, `interest_lists`,
//! `interest_list_items`, `interest_list_branches`, and `schema_meta`. All DDL
//! uses `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

/// Base (version 1) schema.
const SCHEMA_SQL: &str = r#"
-- Interest log: one row per moment of attention, chained per owner
CREATE TABLE IF NOT EXISTS interests (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    interest_type TEXT NOT NULL,
    target_id TEXT,
    target_metadata TEXT,
    moment_text TEXT,
    stance TEXT,
    context_snapshot TEXT,
    previous_interest_id TEXT,
    next_interest_id TEXT,
    salience_score REAL NOT NULL DEFAULT 0.5 CHECK(salience_score >= 0.0 AND salience_score <= 1.0),
    predicted_value REAL CHECK(predicted_value >= 0.0 AND predicted_value <= 1.0),
    advantages TEXT NOT NULL DEFAULT '[]',
    disadvantages TEXT NOT NULL DEFAULT '[]',
    realized_value REAL CHECK(realized_value >= 0.0 AND realized_value <= 1.0),
    value_notes TEXT,
    created_at TEXT NOT NULL,
    explored_at TEXT,
    resolved_at TEXT,
    duration_seconds INTEGER,
    pruned INTEGER NOT NULL DEFAULT 0,
    prune_reason TEXT,
    pruned_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_interests_user_created ON interests(user_id, created_at);
CREATE INDEX IF NOT EXISTS idx_interests_next ON interests(user_id, next_interest_id);
CREATE INDEX IF NOT EXISTS idx_interests_type ON interests(interest_type);

CREATE TABLE IF NOT EXISTS interest_tags (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    interest_id TEXT NOT NULL REFERENCES interests(id) ON DELETE CASCADE,
    tag TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE(interest_id, tag)
);

-- Interest lists: curated, reorderable plans
CREATE TABLE IF NOT EXISTS interest_lists (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    name TEXT NOT NULL,
    description TEXT,
    list_type TEXT NOT NULL DEFAULT 'custom',
    status TEXT NOT NULL DEFAULT 'active' CHECK(status IN ('active','archived','completed')),
    custom_metadata TEXT,
    current_position INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    completed_at TEXT,
    is_public INTEGER NOT NULL DEFAULT 0,
    parent_list_id TEXT REFERENCES interest_lists(id) ON DELETE SET NULL,
    branched_at_position INTEGER
);

CREATE INDEX IF NOT EXISTS idx_lists_user_updated ON interest_lists(user_id, updated_at);

-- No UNIQUE on (list_id, position): shifts update rows one at a time
CREATE TABLE IF NOT EXISTS interest_list_items (
    id TEXT PRIMARY KEY,
    list_id TEXT NOT NULL REFERENCES interest_lists(id) ON DELETE CASCADE,
    user_id TEXT NOT NULL,
    position INTEGER NOT NULL CHECK(position >= 0),
    item_type TEXT NOT NULL,
    item_id TEXT,
    item_metadata TEXT,
    notes TEXT,
    status TEXT NOT NULL DEFAULT 'pending' CHECK(status IN ('pending','current','completed','skipped')),
    completed_at TEXT,
    added_at TEXT NOT NULL,
    custom_metadata TEXT
);

CREATE INDEX IF NOT EXISTS idx_items_list_position ON interest_list_items(list_id, position);

-- Branch provenance. branch_list_id is deliberately not a foreign key.
CREATE TABLE IF NOT EXISTS interest_list_branches (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    source_list_id TEXT NOT NULL REFERENCES interest_lists(id) ON DELETE CASCADE,
    branch_list_id TEXT NOT NULL,
    branch_position INTEGER NOT NULL,
    branch_reason TEXT,
    created_at TEXT NOT NULL,
    custom_metadata TEXT
);

CREATE INDEX IF NOT EXISTS idx_branches_source ON interest_list_branches(source_list_id);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        for table in [
            "interests",
            "interest_tags",
            "interest_lists",
            "interest_list_items",
            "interest_list_branches",
            "schema_meta",
        ] {
            assert!(tables.contains(&table.to_string()), "missing table {table}");
        }
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap(); // second call should not error
    }
}
