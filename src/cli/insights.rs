use anyhow::Result;
use attention_tape::config::TapeConfig;
use attention_tape::interest;

/// Display per-type value insights in the terminal.
pub fn insights(config: &TapeConfig, owner: Option<&str>) -> Result<()> {
    let conn = super::open_db(config)?;
    let owner = config.owner_or_default(owner);

    let report = interest::get_insights(&conn, owner)?;

    println!("Interest Insights");
    println!("{}", "=".repeat(40));
    println!("  Total interests:     {}", report.total_interests);
    println!("  Resolved:            {}", report.total_resolved);
    if let Some(avg) = report.average_realized_value {
        println!("  Avg realized value:  {avg:.2}");
    }
    if report.total_interests == 0 {
        return Ok(());
    }
    println!();

    println!("By Type:");
    for (t, insight) in &report.by_type {
        let value = insight
            .average_value
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "-".into());
        let duration = insight
            .average_duration_seconds
            .map(|d| format!("{d:.0}s"))
            .unwrap_or_else(|| "-".into());
        println!(
            "  {:<15} {:>4} total {:>4} resolved  value {:>5}  time {:>6}",
            t.as_str(),
            insight.count,
            insight.resolved,
            value,
            duration
        );
    }

    if !report.most_valuable_types.is_empty() {
        println!();
        println!("Most valuable:");
        for r in &report.most_valuable_types {
            println!("  {:<15} {:.2}", r.interest_type.as_str(), r.average_value);
        }
        println!("Least valuable:");
        for r in &report.least_valuable_types {
            println!("  {:<15} {:.2}", r.interest_type.as_str(), r.average_value);
        }
    }

    Ok(())
}
