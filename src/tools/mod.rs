pub mod interest_params;
pub mod list_params;

use interest_params::{
    ExploreInterestParams, InsightsParams, ListInterestsParams, MarkInterestingParams,
    PruneInterestParams, ResolveInterestParams, SearchInterestsParams, TagInterestParams,
    TrajectoryParams, UpdateInterestParams,
};
use list_params::{
    AddListItemParams, BranchListParams, CreateListParams, DeleteListParams, GetBranchesParams,
    GetListParams, ListListsParams, NavigateListParams, RemoveListItemParams, ReorderListParams,
    UpdateListItemParams, UpdateListParams,
};
use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use rusqlite::Connection;
use serde::Serialize;
use std::sync::{Arc, Mutex};

use attention_tape::config::TapeConfig;
use attention_tape::interest::{self, Discoveries, InterestFilter, InterestType, NewInterest};
use attention_tape::list::{
    self, Direction, ItemStatus, ItemType, ItemUpdate, ListFilter, ListStatus, ListType,
    ListUpdate, NewItem, NewList,
};
use attention_tape::Error;

/// The tape MCP tool handler. Holds the shared connection and config and
/// exposes every log and list operation via the `#[tool_router]` macro.
#[derive(Clone)]
pub struct TapeTools {
    tool_router: ToolRouter<Self>,
    db: Arc<Mutex<Connection>>,
    config: Arc<TapeConfig>,
}

impl TapeTools {
    fn owner(&self, owner: Option<String>) -> String {
        owner.unwrap_or_else(|| self.config.storage.default_owner.clone())
    }

    /// Run a core operation on the blocking pool and serialize its result.
    async fn run<T, F>(&self, op: &'static str, f: F) -> Result<String, String>
    where
        T: Serialize + Send + 'static,
        F: FnOnce(&mut Connection) -> attention_tape::Result<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let result = tokio::task::spawn_blocking(move || {
            let mut conn = db.lock().map_err(|e| format!("db lock poisoned: {e}"))?;
            f(&mut *conn).map_err(|e| format!("{op} failed: {e}"))
        })
        .await
        .map_err(|e| format!("db task failed: {e}"))??;

        serde_json::to_string(&result).map_err(|e| format!("serialization failed: {e}"))
    }
}

#[tool_router]
impl TapeTools {
    pub fn new(db: Arc<Mutex<Connection>>, config: Arc<TapeConfig>) -> Self {
        Self {
            tool_router: Self::tool_router(),
            db,
            config,
        }
    }

    #[tool(description = "Record a moment of attention. It is chained after the current moment and becomes the new 'now'.")]
    async fn mark_interesting(
        &self,
        Parameters(params): Parameters<MarkInterestingParams>,
    ) -> Result<String, String> {
        let interest_type: InterestType =
            params.interest_type.parse().map_err(|e: Error| e.to_string())?;
        let owner = self.owner(params.owner);

        let new = NewInterest {
            interest_type,
            target_id: params.target_id,
            moment_text: params.moment_text,
            salience_score: params.salience_score.unwrap_or(0.5),
            target_metadata: params.target_metadata,
            context: params.context,
            stance: None,
            predicted_value: params.predicted_value,
            tags: params.tags.unwrap_or_default(),
        };

        tracing::info!(owner = %owner, interest_type = %new.interest_type, "mark_interesting called");
        self.run("mark_interesting", move |conn| {
            interest::mark_interesting(conn, &owner, new)
        })
        .await
    }

    #[tool(description = "Append discovered advantages/disadvantages to an interest. Supplying realized_value resolves it.")]
    async fn update_interest(
        &self,
        Parameters(params): Parameters<UpdateInterestParams>,
    ) -> Result<String, String> {
        tracing::info!(id = %params.id, "update_interest called");
        let discoveries = Discoveries {
            advantages: params.advantages.unwrap_or_default(),
            disadvantages: params.disadvantages.unwrap_or_default(),
            realized_value: params.realized_value,
            value_notes: params.value_notes,
        };
        let id = params.id;
        self.run("update_interest", move |conn| {
            interest::update_with_discoveries(conn, &id, discoveries)
        })
        .await
    }

    #[tool(description = "Resolve an interest with its realized value (0.0-1.0), optionally chaining a known successor.")]
    async fn resolve_interest(
        &self,
        Parameters(params): Parameters<ResolveInterestParams>,
    ) -> Result<String, String> {
        tracing::info!(id = %params.id, realized_value = params.realized_value, "resolve_interest called");
        self.run("resolve_interest", move |conn| {
            interest::resolve(
                conn,
                &params.id,
                params.realized_value,
                params.value_notes.as_deref(),
                params.next_id.as_deref(),
            )
        })
        .await
    }

    #[tool(description = "Mark an interest as not worth tracking. History is kept; trajectory walks stop at it.")]
    async fn prune_interest(
        &self,
        Parameters(params): Parameters<PruneInterestParams>,
    ) -> Result<String, String> {
        tracing::info!(id = %params.id, "prune_interest called");
        self.run("prune_interest", move |conn| {
            interest::prune(conn, &params.id, &params.reason)
        })
        .await
    }

    #[tool(description = "Mark an interest as being explored. The first call starts the clock used for duration_seconds on resolution.")]
    async fn explore_interest(
        &self,
        Parameters(params): Parameters<ExploreInterestParams>,
    ) -> Result<String, String> {
        tracing::info!(id = %params.id, "explore_interest called");
        self.run("explore_interest", move |conn| interest::mark_explored(conn, &params.id))
            .await
    }

    #[tool(description = "Attach tags to an interest. Tags are lowercased; ones already present are skipped.")]
    async fn tag_interest(
        &self,
        Parameters(params): Parameters<TagInterestParams>,
    ) -> Result<String, String> {
        let owner = self.owner(params.owner);
        tracing::info!(id = %params.id, tags = params.tags.len(), "tag_interest called");
        self.run("tag_interest", move |conn| {
            interest::add_tags(conn, &params.id, &owner, &params.tags)
        })
        .await
    }

    #[tool(description = "List interests newest first, filtered by type, tags, minimum realized value, or pruned state.")]
    async fn list_interests(
        &self,
        Parameters(params): Parameters<ListInterestsParams>,
    ) -> Result<String, String> {
        let interest_type = match params.interest_type.as_deref() {
            Some(t) => Some(t.parse::<InterestType>().map_err(|e| e.to_string())?),
            None => None,
        };
        let owner = self.owner(params.owner);
        let filter = InterestFilter {
            interest_type,
            include_pruned: params.include_pruned.unwrap_or(false),
            min_realized_value: params.min_realized_value,
            tags: params.tags.unwrap_or_default(),
            limit: params.limit.unwrap_or(self.config.tape.page_size),
            offset: params.offset.unwrap_or(0),
        };
        tracing::info!(owner = %owner, "list_interests called");
        self.run("list_interests", move |conn| {
            interest::list_interests(conn, &owner, &filter)
        })
        .await
    }

    #[tool(description = "Get the chronological trajectory of interests around now.")]
    async fn get_trajectory(
        &self,
        Parameters(params): Parameters<TrajectoryParams>,
    ) -> Result<String, String> {
        let owner = self.owner(params.owner);
        let depth = params
            .max_depth
            .unwrap_or(self.config.tape.trajectory_max_depth);
        let include_pruned = params.include_pruned.unwrap_or(false);
        tracing::info!(owner = %owner, depth, "get_trajectory called");
        self.run("get_trajectory", move |conn| {
            interest::get_trajectory(conn, &owner, depth, include_pruned)
        })
        .await
    }

    #[tool(description = "Search interests by text in their moment or value notes, newest first.")]
    async fn search_interests(
        &self,
        Parameters(params): Parameters<SearchInterestsParams>,
    ) -> Result<String, String> {
        if params.query.trim().is_empty() {
            return Err("query must not be empty".into());
        }
        let owner = self.owner(params.owner);
        let limit = params.limit.unwrap_or(self.config.tape.page_size);
        tracing::info!(owner = %owner, query = %params.query, "search_interests called");
        self.run("search_interests", move |conn| {
            interest::search(conn, &owner, &params.query, limit)
        })
        .await
    }

    #[tool(description = "Summarize which kinds of interest paid off: counts, average realized value and duration per type.")]
    async fn interest_insights(
        &self,
        Parameters(params): Parameters<InsightsParams>,
    ) -> Result<String, String> {
        let owner = self.owner(params.owner);
        tracing::info!(owner = %owner, "interest_insights called");
        self.run("interest_insights", move |conn| interest::get_insights(conn, &owner))
            .await
    }

    #[tool(description = "Create a new, empty interest list.")]
    async fn create_list(
        &self,
        Parameters(params): Parameters<CreateListParams>,
    ) -> Result<String, String> {
        if params.name.trim().is_empty() {
            return Err("name must not be empty".into());
        }
        let list_type = match params.list_type.as_deref() {
            Some(t) => t.parse::<ListType>().map_err(|e| e.to_string())?,
            None => ListType::Custom,
        };
        let owner = self.owner(params.owner);
        let new = NewList {
            name: params.name,
            description: params.description,
            list_type,
            is_public: params.is_public.unwrap_or(false),
            custom_metadata: params.custom_metadata,
        };
        tracing::info!(owner = %owner, name = %new.name, "create_list called");
        self.run("create_list", move |conn| list::create_list(conn, &owner, new))
            .await
    }

    #[tool(description = "Get an interest list, with its items by default.")]
    async fn get_list(
        &self,
        Parameters(params): Parameters<GetListParams>,
    ) -> Result<String, String> {
        let include_items = params.include_items.unwrap_or(true);
        tracing::info!(id = %params.list_id, "get_list called");
        self.run("get_list", move |conn| {
            list::get_list(conn, &params.list_id, include_items)?
                .ok_or_else(|| Error::NotFound {
                    kind: "list",
                    id: params.list_id.clone(),
                })
        })
        .await
    }

    #[tool(description = "List an owner's interest lists, most recently updated first. Archived lists are hidden by default.")]
    async fn list_lists(
        &self,
        Parameters(params): Parameters<ListListsParams>,
    ) -> Result<String, String> {
        let list_type = match params.list_type.as_deref() {
            Some(t) => Some(t.parse::<ListType>().map_err(|e| e.to_string())?),
            None => None,
        };
        let status = match params.status.as_deref() {
            Some(s) => Some(s.parse::<ListStatus>().map_err(|e| e.to_string())?),
            None => None,
        };
        let owner = self.owner(params.owner);
        let filter = ListFilter {
            list_type,
            status,
            include_archived: params.include_archived.unwrap_or(false),
            limit: params.limit.unwrap_or(self.config.tape.page_size),
            offset: params.offset.unwrap_or(0),
        };
        tracing::info!(owner = %owner, "list_lists called");
        self.run("list_lists", move |conn| list::list_lists(conn, &owner, &filter))
            .await
    }

    #[tool(description = "Update a list's name, description, status, visibility, or metadata. Only supplied fields change.")]
    async fn update_list(
        &self,
        Parameters(params): Parameters<UpdateListParams>,
    ) -> Result<String, String> {
        let status = match params.status.as_deref() {
            Some(s) => Some(s.parse::<ListStatus>().map_err(|e| e.to_string())?),
            None => None,
        };
        let update = ListUpdate {
            name: params.name,
            description: params.description,
            status,
            is_public: params.is_public,
            custom_metadata: params.custom_metadata,
        };
        let list_id = params.list_id;
        tracing::info!(id = %list_id, "update_list called");
        self.run("update_list", move |conn| list::update_list(conn, &list_id, update))
            .await
    }

    #[tool(description = "Delete a list together with its items and outgoing branch records.")]
    async fn delete_list(
        &self,
        Parameters(params): Parameters<DeleteListParams>,
    ) -> Result<String, String> {
        tracing::info!(id = %params.list_id, "delete_list called");
        self.run("delete_list", move |conn| {
            let deleted = list::delete_list(conn, &params.list_id)?;
            Ok(serde_json::json!({ "id": params.list_id, "deleted": deleted }))
        })
        .await
    }

    #[tool(description = "Add an item to a list, appending or inserting at a position.")]
    async fn add_list_item(
        &self,
        Parameters(params): Parameters<AddListItemParams>,
    ) -> Result<String, String> {
        let item_type: ItemType = params.item_type.parse().map_err(|e: Error| e.to_string())?;
        let owner = self.owner(params.owner);
        let new = NewItem {
            item_type,
            item_id: params.item_id,
            item_metadata: params.item_metadata,
            notes: params.notes,
            position: params.position,
            custom_metadata: None,
        };
        let list_id = params.list_id;
        tracing::info!(list = %list_id, item_type = %new.item_type, position = ?new.position, "add_list_item called");
        self.run("add_list_item", move |conn| {
            list::add_item(conn, &list_id, &owner, new)
        })
        .await
    }

    #[tool(description = "Update a list item's notes, status, or metadata. Completing an item stamps completed_at.")]
    async fn update_list_item(
        &self,
        Parameters(params): Parameters<UpdateListItemParams>,
    ) -> Result<String, String> {
        let status = match params.status.as_deref() {
            Some(s) => Some(s.parse::<ItemStatus>().map_err(|e| e.to_string())?),
            None => None,
        };
        let update = ItemUpdate {
            notes: params.notes,
            status,
            custom_metadata: params.custom_metadata,
        };
        let item_id = params.item_id;
        tracing::info!(id = %item_id, status = ?update.status, "update_list_item called");
        self.run("update_list_item", move |conn| list::update_item(conn, &item_id, update))
            .await
    }

    #[tool(description = "Remove an item from its list; later items move up to close the gap.")]
    async fn remove_list_item(
        &self,
        Parameters(params): Parameters<RemoveListItemParams>,
    ) -> Result<String, String> {
        tracing::info!(id = %params.item_id, "remove_list_item called");
        self.run("remove_list_item", move |conn| {
            let removed = list::remove_item(conn, &params.item_id)?;
            Ok(serde_json::json!({ "id": params.item_id, "removed": removed }))
        })
        .await
    }

    #[tool(description = "Move items to new positions atomically. Unmentioned items keep their relative order.")]
    async fn reorder_list(
        &self,
        Parameters(params): Parameters<ReorderListParams>,
    ) -> Result<String, String> {
        tracing::info!(list = %params.list_id, moved = params.new_positions.len(), "reorder_list called");
        self.run("reorder_list", move |conn| {
            list::reorder_items(conn, &params.list_id, &params.new_positions)
        })
        .await
    }

    #[tool(description = "Move a list's cursor forward, back, or jump to a position.")]
    async fn navigate_list(
        &self,
        Parameters(params): Parameters<NavigateListParams>,
    ) -> Result<String, String> {
        let direction: Direction = params.direction.parse().map_err(|e: Error| e.to_string())?;
        tracing::info!(list = %params.list_id, direction = %direction, "navigate_list called");
        self.run("navigate_list", move |conn| {
            list::navigate(conn, &params.list_id, direction, params.jump_to_position)
        })
        .await
    }

    #[tool(description = "Fork a list into a new list to explore an alternative; copied items restart as pending.")]
    async fn branch_list(
        &self,
        Parameters(params): Parameters<BranchListParams>,
    ) -> Result<String, String> {
        let owner = self.owner(params.owner);
        let include_items = params.include_items.unwrap_or(true);
        tracing::info!(source = %params.list_id, name = %params.branch_name, "branch_list called");
        self.run("branch_list", move |conn| {
            list::branch_list(
                conn,
                &params.list_id,
                &owner,
                &params.branch_name,
                params.branch_position,
                params.branch_reason.as_deref(),
                include_items,
            )
        })
        .await
    }

    #[tool(description = "List the branches forked from a list, newest first.")]
    async fn get_branches(
        &self,
        Parameters(params): Parameters<GetBranchesParams>,
    ) -> Result<String, String> {
        tracing::info!(id = %params.list_id, "get_branches called");
        self.run("get_branches", move |conn| list::get_branches(conn, &params.list_id))
            .await
    }
}

#[tool_handler]
impl ServerHandler for TapeTools {
    fn get_info(&self) -> rmcp::model::ServerInfo {
        rmcp::model::ServerInfo {
            instructions: Some(
                "Attention tape records what you pay attention to. Use mark_interesting to log a \
                 moment, explore_interest when you start digging into it, resolve_interest once you \
                 know whether it was worth it, and the list tools to plan, reorder, navigate, and branch what to look at next."
                    .into(),
            ),
            capabilities: rmcp::model::ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
