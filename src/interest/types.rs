//! Interest log type definitions.
//!
//! Defines [`InterestType`], [`Interest`] (one moment of attention with its
//! chain pointers), [`InterestTag`], and the argument structs for the log's
//! write and filter operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What kind of thing caught attention. Labels outside the named set are
/// kept as [`InterestType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InterestType {
    Conversation,
    Message,
    Reading,
    Concept,
    Question,
    Transformation,
    Pattern,
    Connection,
    Media,
    Custom,
    Other(String),
}

text_enum!(open InterestType, "interest type" {
    Conversation => "conversation",
    Message => "message",
    Reading => "reading",
    Concept => "concept",
    Question => "question",
    Transformation => "transformation",
    Pattern => "pattern",
    Connection => "connection",
    Media => "media",
    Custom => "custom",
});

/// One moment of attention, matching the `interests` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interest {
    /// UUID v7 primary key.
    pub id: String,
    pub user_id: String,
    pub interest_type: InterestType,
    /// Id of the thing attended to, opaque to the log.
    pub target_id: Option<String>,
    /// Cached display data for the target.
    pub target_metadata: Option<serde_json::Value>,
    /// Why this was interesting.
    pub moment_text: Option<String>,
    pub stance: Option<serde_json::Value>,
    pub context_snapshot: Option<serde_json::Value>,
    pub previous_id: Option<String>,
    pub next_id: Option<String>,
    /// How important it seemed at creation, in `[0.0, 1.0]`.
    pub salience_score: f64,
    pub predicted_value: Option<f64>,
    /// Append-only until the entry is deleted.
    pub advantages: Vec<String>,
    /// Append-only until the entry is deleted.
    pub disadvantages: Vec<String>,
    /// Retrospective worth in `[0.0, 1.0]`, set at resolution.
    pub realized_value: Option<f64>,
    pub value_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub explored_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    /// `resolved_at - explored_at`, floored to whole seconds.
    pub duration_seconds: Option<i64>,
    pub pruned: bool,
    pub prune_reason: Option<String>,
    pub pruned_at: Option<DateTime<Utc>>,
    /// Normalized tags, in creation order.
    pub tags: Vec<String>,
}

impl Interest {
    pub fn is_resolved(&self) -> bool {
        self.resolved_at.is_some()
    }
}

/// A label on one interest. Unique per `(interest_id, tag)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestTag {
    pub id: String,
    pub user_id: String,
    pub interest_id: String,
    /// Lowercased, trimmed tag text.
    pub tag: String,
    pub created_at: DateTime<Utc>,
    /// Mean salience of the entries carrying this tag, as of the last refresh.
    pub tag_salience: Option<f64>,
}

/// Arguments for [`mark_interesting`](super::log::mark_interesting).
#[derive(Debug, Clone)]
pub struct NewInterest {
    pub interest_type: InterestType,
    pub target_id: Option<String>,
    pub moment_text: Option<String>,
    pub salience_score: f64,
    pub target_metadata: Option<serde_json::Value>,
    pub context: Option<serde_json::Value>,
    pub stance: Option<serde_json::Value>,
    pub predicted_value: Option<f64>,
    pub tags: Vec<String>,
}

impl NewInterest {
    /// A bare entry of the given type with default salience (0.5).
    pub fn new(interest_type: InterestType) -> Self {
        Self {
            interest_type,
            target_id: None,
            moment_text: None,
            salience_score: 0.5,
            target_metadata: None,
            context: None,
            stance: None,
            predicted_value: None,
            tags: Vec::new(),
        }
    }

    pub fn moment(mut self, text: impl Into<String>) -> Self {
        self.moment_text = Some(text.into());
        self
    }

    pub fn target(mut self, id: impl Into<String>) -> Self {
        self.target_id = Some(id.into());
        self
    }

    pub fn salience(mut self, score: f64) -> Self {
        self.salience_score = score;
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Arguments for [`update_with_discoveries`](super::log::update_with_discoveries).
/// Unset fields leave the entry untouched.
#[derive(Debug, Clone, Default)]
pub struct Discoveries {
    pub advantages: Vec<String>,
    pub disadvantages: Vec<String>,
    pub realized_value: Option<f64>,
    pub value_notes: Option<String>,
}

/// Filters for [`list_interests`](super::query::list_interests).
#[derive(Debug, Clone)]
pub struct InterestFilter {
    pub interest_type: Option<InterestType>,
    pub include_pruned: bool,
    pub min_realized_value: Option<f64>,
    /// Matches entries carrying any of these tags.
    pub tags: Vec<String>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for InterestFilter {
    fn default() -> Self {
        Self {
            interest_type: None,
            include_pruned: false,
            min_realized_value: None,
            tags: Vec::new(),
            limit: 50,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interest_type_round_trips_through_text() {
        for t in InterestType::ALL {
            assert_eq!(&t.as_str().parse::<InterestType>().unwrap(), t);
        }
    }

    #[test]
    fn unlisted_interest_type_is_kept_verbatim() {
        let t: InterestType = "podcast".parse().unwrap();
        assert_eq!(t, InterestType::Other("podcast".into()));
        assert_eq!(t.as_str(), "podcast");
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"podcast\"");
        assert!("  ".parse::<InterestType>().unwrap_err().is_invalid_argument());
    }

    #[test]
    fn serde_uses_snake_case_text() {
        let json = serde_json::to_string(&InterestType::Transformation).unwrap();
        assert_eq!(json, "\"transformation\"");
    }
}
