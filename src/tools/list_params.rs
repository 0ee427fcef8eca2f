//! MCP parameter definitions for the interest list tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateListParams {
    #[schemars(description = "Owner of the list. Defaults to the configured owner.")]
    pub owner: Option<String>,

    #[schemars(description = "Name of the list")]
    pub name: String,

    #[schemars(description = "Optional description")]
    pub description: Option<String>,

    #[schemars(
        description = "List type: 'reading', 'research', 'media', 'transformation', 'custom'. Defaults to 'custom'."
    )]
    pub list_type: Option<String>,

    #[schemars(description = "Whether the list is public (default: false)")]
    pub is_public: Option<bool>,

    #[schemars(description = "Optional JSON metadata blob")]
    pub custom_metadata: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetListParams {
    #[schemars(description = "Id of the list")]
    pub list_id: String,

    #[schemars(description = "Include the items (default: true)")]
    pub include_items: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddListItemParams {
    #[schemars(description = "Id of the list to add to")]
    pub list_id: String,

    #[schemars(description = "Owner of the item. Defaults to the configured owner.")]
    pub owner: Option<String>,

    #[schemars(
        description = "Item type: 'conversation', 'message', 'reading', 'media', 'transformation', 'book', 'chunk', 'interest', 'custom'"
    )]
    pub item_type: String,

    #[schemars(description = "Id of the referenced entity")]
    pub item_id: Option<String>,

    #[schemars(description = "Cached display data for the referenced entity")]
    pub item_metadata: Option<serde_json::Value>,

    #[schemars(description = "Free-form notes")]
    pub notes: Option<String>,

    #[schemars(description = "0-based position to insert at; later items shift up. Appends when omitted.")]
    pub position: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct RemoveListItemParams {
    #[schemars(description = "Id of the item to remove")]
    pub item_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ReorderListParams {
    #[schemars(description = "Id of the list")]
    pub list_id: String,

    #[schemars(description = "Map of item id to new 0-based position. Positions must be distinct.")]
    pub new_positions: HashMap<String, usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct NavigateListParams {
    #[schemars(description = "Id of the list")]
    pub list_id: String,

    #[schemars(description = "Direction: 'forward', 'back', or 'jump'")]
    pub direction: String,

    #[schemars(description = "Target position, required for 'jump'")]
    pub jump_to_position: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct BranchListParams {
    #[schemars(description = "Id of the list to branch from")]
    pub list_id: String,

    #[schemars(description = "Owner of the new branch. Defaults to the configured owner.")]
    pub owner: Option<String>,

    #[schemars(description = "Name of the new branch list")]
    pub branch_name: String,

    #[schemars(description = "Position in the source where the fork happens. Defaults to the source's cursor.")]
    pub branch_position: Option<usize>,

    #[schemars(description = "Why the branch was made")]
    pub branch_reason: Option<String>,

    #[schemars(description = "Copy the source's items (default: true)")]
    pub include_items: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListListsParams {
    #[schemars(description = "Owner of the lists. Defaults to the configured owner.")]
    pub owner: Option<String>,

    #[schemars(description = "Only lists of this type")]
    pub list_type: Option<String>,

    #[schemars(description = "Only lists with this status: 'active', 'archived', 'completed'")]
    pub status: Option<String>,

    #[schemars(description = "Include archived lists (default: false)")]
    pub include_archived: Option<bool>,

    #[schemars(description = "Maximum number of lists. Defaults to 50.")]
    pub limit: Option<usize>,

    #[schemars(description = "Number of lists to skip")]
    pub offset: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateListParams {
    #[schemars(description = "Id of the list")]
    pub list_id: String,

    #[schemars(description = "New name")]
    pub name: Option<String>,

    #[schemars(description = "New description")]
    pub description: Option<String>,

    #[schemars(description = "New status: 'active', 'archived', 'completed'")]
    pub status: Option<String>,

    #[schemars(description = "Whether the list is public")]
    pub is_public: Option<bool>,

    #[schemars(description = "Replacement JSON metadata blob")]
    pub custom_metadata: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct DeleteListParams {
    #[schemars(description = "Id of the list to delete, with its items")]
    pub list_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateListItemParams {
    #[schemars(description = "Id of the item")]
    pub item_id: String,

    #[schemars(description = "New notes")]
    pub notes: Option<String>,

    #[schemars(description = "New status: 'pending', 'current', 'completed', 'skipped'")]
    pub status: Option<String>,

    #[schemars(description = "Replacement JSON metadata blob")]
    pub custom_metadata: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetBranchesParams {
    #[schemars(description = "Id of the source list")]
    pub list_id: String,
}
