mod helpers;

use attention_tape::interest;
use chrono::{Duration, SecondsFormat, Utc};
use helpers::{mark, test_db, OWNER};

#[test]
fn resolution_records_whole_seconds_since_exploring() {
    let mut conn = test_db();
    let entry = mark(&mut conn, OWNER, "long read");

    let explored = Utc::now() - Duration::milliseconds(90_500);
    conn.execute(
        "UPDATE interests SET explored_at = ?1 WHERE id = ?2",
        rusqlite::params![explored.to_rfc3339_opts(SecondsFormat::Micros, true), entry.id],
    )
    .unwrap();

    let resolved = interest::resolve(&mut conn, &entry.id, 0.8, Some("worth it"), None).unwrap();
    let resolved_at = resolved.resolved_at.unwrap();
    let explored_at = resolved.explored_at.unwrap();

    assert_eq!(
        resolved.duration_seconds,
        Some((resolved_at - explored_at).num_seconds())
    );
    assert!(resolved.duration_seconds.unwrap() >= 90);
    assert_eq!(resolved.realized_value, Some(0.8));
}

#[test]
fn resolution_without_exploring_has_no_duration() {
    let mut conn = test_db();
    let entry = mark(&mut conn, OWNER, "glance");

    let resolved = interest::resolve(&mut conn, &entry.id, 0.2, None, None).unwrap();
    assert!(resolved.is_resolved());
    assert!(resolved.duration_seconds.is_none());
}

#[test]
fn realized_value_outside_unit_interval_is_rejected() {
    let mut conn = test_db();
    let entry = mark(&mut conn, OWNER, "bad value");

    let err = interest::resolve(&mut conn, &entry.id, 1.5, None, None).unwrap_err();
    assert!(err.is_invalid_argument());

    let unchanged = interest::get_interest(&conn, &entry.id).unwrap().unwrap();
    assert!(!unchanged.is_resolved());
}
