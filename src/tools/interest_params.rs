//! MCP parameter definitions for the interest log tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `mark_interesting` MCP tool.
///
/// The new entry is linked after the owner's current tail automatically.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct MarkInterestingParams {
    #[schemars(description = "Owner of the log. Defaults to the configured owner.")]
    pub owner: Option<String>,

    #[schemars(
        description = "What caught attention: 'conversation', 'message', 'reading', 'concept', 'question', 'transformation', 'pattern', 'connection', 'media', 'custom'"
    )]
    pub interest_type: String,

    #[schemars(description = "Id of the thing attended to")]
    pub target_id: Option<String>,

    #[schemars(description = "Why this moment is interesting")]
    pub moment_text: Option<String>,

    #[schemars(description = "How important it seems right now, 0.0-1.0. Defaults to 0.5.")]
    pub salience_score: Option<f64>,

    #[schemars(description = "Cached display data for the target")]
    pub target_metadata: Option<serde_json::Value>,

    #[schemars(description = "Snapshot of the surrounding context")]
    pub context: Option<serde_json::Value>,

    #[schemars(description = "Expected worth of following this up, 0.0-1.0")]
    pub predicted_value: Option<f64>,

    #[schemars(description = "Tags; normalized to lowercase and deduplicated")]
    pub tags: Option<Vec<String>>,
}

/// Parameters for the `update_interest` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct UpdateInterestParams {
    #[schemars(description = "Id of the interest to update")]
    pub id: String,

    #[schemars(description = "Advantages discovered; appended to the existing list")]
    pub advantages: Option<Vec<String>>,

    #[schemars(description = "Disadvantages discovered; appended to the existing list")]
    pub disadvantages: Option<Vec<String>>,

    #[schemars(description = "Realized value 0.0-1.0. Setting it resolves the interest.")]
    pub realized_value: Option<f64>,

    #[schemars(description = "Notes on why it was or wasn't worth it")]
    pub value_notes: Option<String>,
}

/// Parameters for the `resolve_interest` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ResolveInterestParams {
    #[schemars(description = "Id of the interest to resolve")]
    pub id: String,

    #[schemars(description = "Retrospective worth, 0.0-1.0")]
    pub realized_value: f64,

    #[schemars(description = "Notes on the outcome")]
    pub value_notes: Option<String>,

    #[schemars(description = "Id of an existing interest to chain as the successor")]
    pub next_id: Option<String>,
}

/// Parameters for the `prune_interest` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct PruneInterestParams {
    #[schemars(description = "Id of the interest to prune")]
    pub id: String,

    #[schemars(description = "Why it is no longer worth tracking")]
    pub reason: String,
}

/// Parameters for the `get_trajectory` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TrajectoryParams {
    #[schemars(description = "Owner of the log. Defaults to the configured owner.")]
    pub owner: Option<String>,

    #[schemars(description = "How many entries to walk back from now. Defaults to 50.")]
    pub max_depth: Option<usize>,

    #[schemars(description = "Walk through pruned entries instead of stopping (default: false)")]
    pub include_pruned: Option<bool>,
}

/// Parameters for the `search_interests` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct SearchInterestsParams {
    #[schemars(description = "Owner of the log. Defaults to the configured owner.")]
    pub owner: Option<String>,

    #[schemars(description = "Case-insensitive text matched against moment text and value notes")]
    pub query: String,

    #[schemars(description = "Maximum number of results. Defaults to 50.")]
    pub limit: Option<usize>,
}

/// Parameters for the `interest_insights` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct InsightsParams {
    #[schemars(description = "Owner of the log. Defaults to the configured owner.")]
    pub owner: Option<String>,
}

/// Parameters for the `explore_interest` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ExploreInterestParams {
    #[schemars(description = "Id of the interest being looked into. The first call starts its clock.")]
    pub id: String,
}

/// Parameters for the `tag_interest` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct TagInterestParams {
    #[schemars(description = "Owner of the interest. Defaults to the configured owner.")]
    pub owner: Option<String>,

    #[schemars(description = "Id of the interest to tag")]
    pub id: String,

    #[schemars(description = "Tags to attach; normalized to lowercase, existing ones are skipped")]
    pub tags: Vec<String>,
}

/// Parameters for the `list_interests` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct ListInterestsParams {
    #[schemars(description = "Owner of the log. Defaults to the configured owner.")]
    pub owner: Option<String>,

    #[schemars(description = "Only entries of this interest type")]
    pub interest_type: Option<String>,

    #[schemars(description = "Include pruned entries (default: false)")]
    pub include_pruned: Option<bool>,

    #[schemars(description = "Only entries resolved with at least this value, 0.0-1.0")]
    pub min_realized_value: Option<f64>,

    #[schemars(description = "Only entries carrying any of these tags")]
    pub tags: Option<Vec<String>>,

    #[schemars(description = "Maximum number of results. Defaults to 50.")]
    pub limit: Option<usize>,

    #[schemars(description = "Number of results to skip")]
    pub offset: Option<usize>,
}
