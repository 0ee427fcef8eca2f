//! CLI `trajectory` command — print the chain of interests around now.

use anyhow::Result;
use attention_tape::config::TapeConfig;
use attention_tape::interest;

pub fn trajectory(
    config: &TapeConfig,
    owner: Option<&str>,
    depth: Option<usize>,
    include_pruned: bool,
) -> Result<()> {
    let conn = super::open_db(config)?;
    let owner = config.owner_or_default(owner);
    let depth = depth.unwrap_or(config.tape.trajectory_max_depth);

    let entries = interest::get_trajectory(&conn, owner, depth, include_pruned)?;
    if entries.is_empty() {
        println!("No current interest for {owner}.");
        return Ok(());
    }

    let current = interest::get_current(&conn, owner)?.map(|c| c.id);

    println!("Trajectory for {owner} ({} entries)", entries.len());
    println!("{}", "=".repeat(40));
    for (i, entry) in entries.iter().enumerate() {
        super::print_interest(i + 1, entry);
        if current.as_deref() == Some(entry.id.as_str()) {
            println!("     <- now");
        }
    }

    Ok(())
}
