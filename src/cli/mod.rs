pub mod insights;
pub mod lists;
pub mod search;
pub mod trajectory;

use anyhow::{Context, Result};
use attention_tape::config::TapeConfig;
use attention_tape::interest::Interest;
use rusqlite::Connection;
use std::time::Duration;

/// Open the configured database for a one-shot CLI command.
fn open_db(config: &TapeConfig) -> Result<Connection> {
    let db_path = config.resolved_db_path();
    attention_tape::db::open_database(
        &db_path,
        Duration::from_millis(config.storage.busy_timeout_ms),
    )
    .with_context(|| format!("failed to open database at {}", db_path.display()))
}

/// First `max` characters of `text`, with an ellipsis when cut.
fn preview(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// One-line rendering of an interest shared by the log commands.
fn print_interest(index: usize, interest: &Interest) {
    let value = interest
        .realized_value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "-".into());
    let marker = if interest.pruned { " (pruned)" } else { "" };
    println!(
        "  {}. [{}] {} salience {:.2}, value {}{}",
        index,
        interest.interest_type,
        interest.created_at.format("%Y-%m-%d %H:%M"),
        interest.salience_score,
        value,
        marker,
    );
    if let Some(ref text) = interest.moment_text {
        println!("     {}", preview(text, 120));
    }
    if !interest.tags.is_empty() {
        println!("     tags: {}", interest.tags.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_cuts_on_char_boundaries() {
        assert_eq!(preview("héllo wörld", 5), "héllo...");
        assert_eq!(preview("short", 10), "short");
    }
}
