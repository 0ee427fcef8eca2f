//! Interest list type definitions.
//!
//! Defines [`InterestList`] (a named, ordered plan with a cursor),
//! [`InterestListItem`] (one slot referencing some external entity by
//! `(item_type, item_id)`), [`InterestListBranch`] (fork provenance), and the
//! argument structs for list operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of plan. Labels outside the named set are kept as
/// [`ListType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListType {
    Reading,
    Research,
    Media,
    Transformation,
    Custom,
    Other(String),
}

text_enum!(open ListType, "list type" {
    Reading => "reading",
    Research => "research",
    Media => "media",
    Transformation => "transformation",
    Custom => "custom",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStatus {
    Active,
    Archived,
    Completed,
}

text_enum!(ListStatus, "list status" {
    Active => "active",
    Archived => "archived",
    Completed => "completed",
});

/// Kind of entity an item points at. The list never checks that the
/// referenced entity exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ItemType {
    Conversation,
    Message,
    Reading,
    Media,
    Transformation,
    Book,
    Chunk,
    Interest,
    Custom,
    Other(String),
}

text_enum!(open ItemType, "item type" {
    Conversation => "conversation",
    Message => "message",
    Reading => "reading",
    Media => "media",
    Transformation => "transformation",
    Book => "book",
    Chunk => "chunk",
    Interest => "interest",
    Custom => "custom",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Pending,
    Current,
    Completed,
    Skipped,
}

text_enum!(ItemStatus, "item status" {
    Pending => "pending",
    Current => "current",
    Completed => "completed",
    Skipped => "skipped",
});

/// Cursor movement for [`navigate`](super::lists::navigate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Back,
    Jump,
}

text_enum!(Direction, "direction" {
    Forward => "forward",
    Back => "back",
    Jump => "jump",
});

/// A named, ordered plan, matching the `interest_lists` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestList {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub list_type: ListType,
    pub status: ListStatus,
    pub custom_metadata: Option<serde_json::Value>,
    /// 0-based cursor; always a valid index, or 0 when the list is empty.
    pub current_position: usize,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Set when this list was created by branching another.
    pub parent_list_id: Option<String>,
    pub branched_at_position: Option<usize>,
    /// Items ordered by position; `None` when not loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<InterestListItem>>,
}

impl InterestList {
    /// The item under the cursor, if items were loaded and the list is not empty.
    pub fn current_item(&self) -> Option<&InterestListItem> {
        self.items
            .as_ref()?
            .iter()
            .find(|item| item.position == self.current_position)
    }
}

/// One slot in a list, matching the `interest_list_items` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestListItem {
    pub id: String,
    pub list_id: String,
    pub user_id: String,
    pub position: usize,
    pub item_type: ItemType,
    pub item_id: Option<String>,
    /// Cached display snapshot of the referenced entity.
    pub item_metadata: Option<serde_json::Value>,
    pub notes: Option<String>,
    pub status: ItemStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub added_at: DateTime<Utc>,
    pub custom_metadata: Option<serde_json::Value>,
}

/// Fork provenance between two lists. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestListBranch {
    pub id: String,
    pub user_id: String,
    pub source_list_id: String,
    pub branch_list_id: String,
    pub branch_position: usize,
    pub branch_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub custom_metadata: Option<serde_json::Value>,
}

/// Arguments for [`create_list`](super::lists::create_list).
#[derive(Debug, Clone)]
pub struct NewList {
    pub name: String,
    pub description: Option<String>,
    pub list_type: ListType,
    pub is_public: bool,
    pub custom_metadata: Option<serde_json::Value>,
}

impl NewList {
    /// A private, custom-typed list with no description.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            list_type: ListType::Custom,
            is_public: false,
            custom_metadata: None,
        }
    }
}

/// Partial update for [`update_list`](super::lists::update_list).
#[derive(Debug, Clone, Default)]
pub struct ListUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ListStatus>,
    pub is_public: Option<bool>,
    pub custom_metadata: Option<serde_json::Value>,
}

/// Filters for [`list_lists`](super::lists::list_lists).
#[derive(Debug, Clone)]
pub struct ListFilter {
    pub list_type: Option<ListType>,
    pub status: Option<ListStatus>,
    pub include_archived: bool,
    pub limit: usize,
    pub offset: usize,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            list_type: None,
            status: None,
            include_archived: false,
            limit: 50,
            offset: 0,
        }
    }
}

/// Arguments for [`add_item`](super::items::add_item).
#[derive(Debug, Clone)]
pub struct NewItem {
    pub item_type: ItemType,
    pub item_id: Option<String>,
    pub item_metadata: Option<serde_json::Value>,
    pub notes: Option<String>,
    /// Insert here, shifting later items; append when `None`.
    pub position: Option<usize>,
    pub custom_metadata: Option<serde_json::Value>,
}

impl NewItem {
    pub fn new(item_type: ItemType, item_id: Option<&str>) -> Self {
        Self {
            item_type,
            item_id: item_id.map(str::to_string),
            item_metadata: None,
            notes: None,
            position: None,
            custom_metadata: None,
        }
    }

    pub fn at(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }
}

/// Partial update for [`update_item`](super::items::update_item).
#[derive(Debug, Clone, Default)]
pub struct ItemUpdate {
    pub notes: Option<String>,
    pub status: Option<ItemStatus>,
    pub custom_metadata: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_round_trip_through_text() {
        for t in ListType::ALL {
            assert_eq!(&t.as_str().parse::<ListType>().unwrap(), t);
        }
        for s in ItemStatus::ALL {
            assert_eq!(s.as_str().parse::<ItemStatus>().unwrap(), *s);
        }
        for t in ItemType::ALL {
            assert_eq!(&t.as_str().parse::<ItemType>().unwrap(), t);
        }
    }

    #[test]
    fn unlisted_list_and_item_types_are_kept() {
        let list_type: ListType = "podcasts".parse().unwrap();
        assert_eq!(list_type, ListType::Other("podcasts".into()));
        assert_eq!(list_type.to_string(), "podcasts");

        let item_type: ItemType = serde_json::from_str("\"episode\"").unwrap();
        assert_eq!(item_type, ItemType::Other("episode".into()));
        assert_eq!("book".parse::<ItemType>().unwrap(), ItemType::Book);
    }

    #[test]
    fn unknown_direction_is_invalid_argument() {
        assert!("sideways".parse::<Direction>().unwrap_err().is_invalid_argument());
        assert_eq!("back".parse::<Direction>().unwrap(), Direction::Back);
    }
}
