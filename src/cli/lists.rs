//! CLI `lists` and `show` commands — browse interest lists.

use anyhow::{anyhow, Result};
use attention_tape::config::TapeConfig;
use attention_tape::list::{self, ListFilter};

/// Print an owner's lists, most recently updated first.
pub fn lists(config: &TapeConfig, owner: Option<&str>, include_archived: bool) -> Result<()> {
    let conn = super::open_db(config)?;
    let owner = config.owner_or_default(owner);

    let filter = ListFilter {
        include_archived,
        limit: config.tape.page_size,
        ..Default::default()
    };
    let lists = list::list_lists(&conn, owner, &filter)?;
    if lists.is_empty() {
        println!("No lists for {owner}.");
        return Ok(());
    }

    for l in &lists {
        let branched = l
            .parent_list_id
            .as_deref()
            .map(|p| format!(" (branch of {p})"))
            .unwrap_or_default();
        println!("  {} [{} / {}] {}{}", l.id, l.list_type, l.status, l.name, branched);
    }

    Ok(())
}

/// Print one list with its items, cursor, and outgoing branches.
pub fn show(config: &TapeConfig, list_id: &str) -> Result<()> {
    let conn = super::open_db(config)?;

    let l = list::get_list(&conn, list_id, true)?
        .ok_or_else(|| anyhow!("list not found: {list_id}"))?;

    println!("List: {}", l.name);
    println!("{}", "=".repeat(50));
    println!("  Id:         {}", l.id);
    println!("  Type:       {}", l.list_type);
    println!("  Status:     {}", l.status);
    println!("  Updated:    {}", l.updated_at);
    if let Some(ref d) = l.description {
        println!("  About:      {d}");
    }
    if let Some(ref parent) = l.parent_list_id {
        println!(
            "  Branched:   from {parent} at position {}",
            l.branched_at_position.unwrap_or_default()
        );
    }
    println!();

    let items = l.items.as_deref().unwrap_or_default();
    if items.is_empty() {
        println!("  (no items)");
    }
    for item in items {
        let cursor = if item.position == l.current_position { ">" } else { " " };
        let reference = item.item_id.as_deref().unwrap_or("-");
        println!(
            "{} {:>3}. [{}] {} ({})",
            cursor, item.position, item.item_type, reference, item.status
        );
        if let Some(ref notes) = item.notes {
            println!("        {}", super::preview(notes, 100));
        }
    }

    let branches = list::get_branches(&conn, list_id)?;
    if !branches.is_empty() {
        println!();
        println!("Branches:");
        for b in branches {
            let reason = b.branch_reason.unwrap_or_default();
            println!("  --[{}]--> {} {}", b.branch_position, b.branch_list_id, reason);
        }
    }

    Ok(())
}
