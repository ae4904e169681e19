//! System status dashboard command.

use anyhow::Result;
use console::style;

use crate::state::AppState;

/// Display system status dashboard.
///
/// Shows message/session counts, filter activity, and storage info.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let stats = state.message_service.store_stats().await?;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "messages": {
                "total": stats.total_messages,
                "flagged": stats.flagged_messages,
            },
            "sessions": stats.total_sessions,
            "denylist_terms": state.config.denylist.len(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Palaver v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();

    // Store counts
    println!("  {}", style("── Messages ──").dim());
    println!(
        "  Total:    {}",
        style(stats.total_messages).bold()
    );
    println!(
        "  Sessions: {}",
        stats.total_sessions
    );
    if stats.flagged_messages > 0 {
        println!(
            "  Flagged:  {}",
            style(stats.flagged_messages).yellow()
        );
    }
    println!();

    // Content filter
    println!("  {}", style("── Filter ──").dim());
    println!(
        "  Denylist terms: {}",
        style(state.config.denylist.len()).bold()
    );
    println!();

    // System
    println!("  {}", style("── System ──").dim());
    println!(
        "  Data dir: {}",
        style(state.data_dir.display()).dim()
    );
    println!(
        "  Database: {}",
        style("SQLite (WAL mode)").dim()
    );
    println!();

    Ok(())
}
