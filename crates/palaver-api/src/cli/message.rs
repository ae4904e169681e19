//! Message inspection commands: content search and session browsing.

use anyhow::Result;
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;

use palaver_types::message::{MessageFilter, MessagePage, Sender};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Search stored message content for a case-insensitive substring.
pub async fn search(
    state: &AppState,
    query: &str,
    limit: i64,
    offset: i64,
    json: bool,
) -> Result<()> {
    let result = state
        .message_service
        .search_messages(query, limit, offset)
        .await?;

    if json {
        println!("{}", page_json(&result.message, &result.page)?);
        return Ok(());
    }

    if result.page.messages.is_empty() {
        println!();
        println!("  No messages matched '{}'.", style(query).cyan());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Time").fg(Color::Cyan),
            Cell::new("Session"),
            Cell::new("Sender"),
            Cell::new("Content"),
        ]);

    for m in &result.page.messages {
        table.add_row(vec![
            Cell::new(m.timestamp.format("%Y-%m-%d %H:%M").to_string()),
            Cell::new(&m.session_id),
            Cell::new(m.sender.to_string()),
            Cell::new(truncate_content(&m.content, 50)),
        ]);
    }

    println!();
    println!(
        "  Matches for '{}' (most recent first)",
        style(query).cyan()
    );
    println!();
    println!("{table}");
    print_page_footer(&result.page);

    Ok(())
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Browse a session's messages, newest first.
pub async fn session(
    state: &AppState,
    session_id: &str,
    sender: Option<&str>,
    limit: i64,
    offset: i64,
    json: bool,
) -> Result<()> {
    let sender = match sender {
        Some(s) => Some(s.parse::<Sender>().map_err(|e| anyhow::anyhow!(e))?),
        None => None,
    };

    let filter = MessageFilter {
        sender,
        limit,
        offset,
    };

    let result = state
        .message_service
        .messages_by_session(session_id, filter)
        .await?;

    if json {
        println!("{}", page_json(&result.message, &result.page)?);
        return Ok(());
    }

    if result.page.messages.is_empty() {
        println!();
        println!(
            "  No messages found for session '{}'.",
            style(session_id).cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Time").fg(Color::Cyan),
            Cell::new("Sender"),
            Cell::new("Content"),
        ]);

    for m in &result.page.messages {
        let content = if m.has_inappropriate_content {
            Cell::new(truncate_content(&m.content, 60)).fg(Color::Yellow)
        } else {
            Cell::new(truncate_content(&m.content, 60))
        };
        table.add_row(vec![
            Cell::new(m.timestamp.format("%Y-%m-%d %H:%M").to_string()),
            Cell::new(m.sender.to_string()),
            content,
        ]);
    }

    println!();
    println!(
        "  Messages in session '{}' (most recent first)",
        style(session_id).cyan()
    );
    println!();
    println!("{table}");
    print_page_footer(&result.page);

    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Render a result page as pretty JSON with its status line.
fn page_json(message: &str, page: &MessagePage) -> Result<String> {
    let out = serde_json::json!({
        "message": message,
        "data": page.messages,
        "pagination": {
            "total": page.total,
            "limit": page.limit,
            "offset": page.offset,
            "has_more": page.has_more,
        },
    });
    Ok(serde_json::to_string_pretty(&out)?)
}

/// Print the showing-N-of-M footer, with a hint when more pages remain.
fn print_page_footer(page: &MessagePage) {
    println!(
        "  Showing {} of {} message{}",
        page.messages.len(),
        page.total,
        if page.total == 1 { "" } else { "s" }
    );
    if page.has_more {
        println!(
            "  {}",
            style(format!("Use --offset {} for the next page", page.offset + page.limit)).dim()
        );
    }
    println!();
}

/// Truncate content to a preview width, counting characters.
fn truncate_content(content: &str, max_chars: usize) -> String {
    if content.chars().count() > max_chars {
        let preview: String = content.chars().take(max_chars).collect();
        format!("{preview}...")
    } else {
        content.to_string()
    }
}
