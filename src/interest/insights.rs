//! Per-category learning over the interest log: what kinds of attention
//! paid off, and how long they took.

use rusqlite::{params, Connection};
use serde::Serialize;
use std::collections::BTreeMap;

use super::types::InterestType;
use crate::Result;

/// How many categories to surface at each end of the value ranking.
const RANKED_TYPES: usize = 3;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TypeInsight {
    pub count: u64,
    pub resolved: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_duration_seconds: Option<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedType {
    pub interest_type: InterestType,
    pub average_value: f64,
}

/// Aggregate report over an owner's unpruned entries.
#[derive(Debug, Clone, Serialize, Default)]
pub struct InsightsReport {
    pub total_interests: u64,
    pub total_resolved: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_realized_value: Option<f64>,
    pub by_type: BTreeMap<InterestType, TypeInsight>,
    /// Highest average realized value first.
    pub most_valuable_types: Vec<RankedType>,
    /// Lowest average realized value first.
    pub least_valuable_types: Vec<RankedType>,
}

/// Group unpruned entries by type and rank types by realized value.
/// Returns the zero report when the owner has no entries.
pub fn get_insights(conn: &Connection, owner: &str) -> Result<InsightsReport> {
    let mut stmt = conn.prepare(
        "SELECT interest_type, COUNT(*), COUNT(resolved_at), \
                AVG(CASE WHEN resolved_at IS NOT NULL THEN realized_value END), \
                AVG(duration_seconds) \
         FROM interests WHERE user_id = ?1 AND pruned = 0 GROUP BY interest_type",
    )?;
    let rows = stmt
        .query_map(params![owner], |row| {
            Ok((
                row.get::<_, InterestType>(0)?,
                TypeInsight {
                    count: row.get::<_, i64>(1)? as u64,
                    resolved: row.get::<_, i64>(2)? as u64,
                    average_value: row.get(3)?,
                    average_duration_seconds: row.get(4)?,
                },
            ))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    if rows.is_empty() {
        return Ok(InsightsReport::default());
    }

    let mut report = InsightsReport::default();
    let mut value_sum = 0.0;
    let mut valued = 0u64;

    for (interest_type, insight) in rows {
        report.total_interests += insight.count;
        report.total_resolved += insight.resolved;
        if let Some(avg) = insight.average_value {
            value_sum += avg * insight.resolved as f64;
            valued += insight.resolved;
        }
        report.by_type.insert(interest_type, insight);
    }

    if valued > 0 {
        report.average_realized_value = Some(value_sum / valued as f64);
    }

    let mut ranked: Vec<RankedType> = report
        .by_type
        .iter()
        .filter_map(|(t, i)| {
            i.average_value.map(|v| RankedType {
                interest_type: t.clone(),
                average_value: v,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.average_value.total_cmp(&a.average_value));

    report.most_valuable_types = ranked.iter().take(RANKED_TYPES).cloned().collect();
    report.least_valuable_types = ranked.iter().rev().take(RANKED_TYPES).cloned().collect();

    tracing::debug!(owner = %owner, total = report.total_interests, "insights computed");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::interest::log::{mark_interesting, prune, resolve};
    use crate::interest::types::NewInterest;

    #[test]
    fn empty_owner_gets_zero_report() {
        let conn = db::open_memory_database().unwrap();
        let report = get_insights(&conn, "nobody").unwrap();
        assert_eq!(report.total_interests, 0);
        assert!(report.by_type.is_empty());
        assert!(report.most_valuable_types.is_empty());
    }

    #[test]
    fn ranks_types_by_average_value() {
        let mut conn = db::open_memory_database().unwrap();
        let values = [
            (InterestType::Reading, Some(0.9)),
            (InterestType::Reading, Some(0.7)),
            (InterestType::Question, Some(0.2)),
            (InterestType::Media, None),
            (InterestType::Pattern, Some(0.5)),
        ];
        for (t, value) in values {
            let id = mark_interesting(&mut conn, "ada", NewInterest::new(t)).unwrap().id;
            if let Some(v) = value {
                resolve(&mut conn, &id, v, None, None).unwrap();
            }
        }
        let noise = mark_interesting(&mut conn, "ada", NewInterest::new(InterestType::Question))
            .unwrap()
            .id;
        resolve(&mut conn, &noise, 1.0, None, None).unwrap();
        prune(&mut conn, &noise, "noise").unwrap();

        let report = get_insights(&conn, "ada").unwrap();
        assert_eq!(report.total_interests, 5);
        assert_eq!(report.total_resolved, 4);

        let reading = &report.by_type[&InterestType::Reading];
        assert_eq!(reading.count, 2);
        assert!((reading.average_value.unwrap() - 0.8).abs() < 1e-9);
        assert!(report.by_type[&InterestType::Media].average_value.is_none());

        let best: Vec<InterestType> = report.most_valuable_types.iter().map(|r| r.interest_type.clone()).collect();
        assert_eq!(best, vec![InterestType::Reading, InterestType::Pattern, InterestType::Question]);
        assert_eq!(report.least_valuable_types[0].interest_type, InterestType::Question);

        let overall = report.average_realized_value.unwrap();
        assert!((overall - (0.9 + 0.7 + 0.2 + 0.5) / 4.0).abs() < 1e-9);
    }
}
