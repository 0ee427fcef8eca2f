use anyhow::Result;
use attention_tape::config::TapeConfig;
use attention_tape::interest;

/// Run a text search over the interest log from the terminal.
pub fn search(
    config: &TapeConfig,
    owner: Option<&str>,
    query: &str,
    limit: Option<usize>,
) -> Result<()> {
    let conn = super::open_db(config)?;
    let owner = config.owner_or_default(owner);
    let limit = limit.unwrap_or(config.tape.page_size);

    let results = interest::search(&conn, owner, query, limit)?;
    if results.is_empty() {
        println!("No results found.");
        return Ok(());
    }

    println!("Found {} result(s)\n", results.len());
    for (i, result) in results.iter().enumerate() {
        super::print_interest(i + 1, result);
        if let Some(ref notes) = result.value_notes {
            println!("     notes: {}", super::preview(notes, 120));
        }
        println!();
    }

    Ok(())
}
