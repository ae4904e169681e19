//! CLI command definitions and dispatch for the `plvr` binary.
//!
//! Uses clap derive macros for argument parsing. Commands are flat verbs
//! (e.g., `plvr status`, `plvr search`, `plvr session`).

pub mod message;
pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Ingest, inspect, and serve chat messages.
#[derive(Parser)]
#[command(name = "plvr", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on.
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Export spans through the OpenTelemetry stdout exporter.
        #[arg(long)]
        otel: bool,
    },

    /// System status dashboard.
    Status,

    /// Search stored message content.
    Search {
        /// Text to look for (case-insensitive substring).
        query: String,

        /// Maximum matches to display.
        #[arg(short, long, default_value = "50")]
        limit: i64,

        /// Number of matches to skip.
        #[arg(long, default_value = "0")]
        offset: i64,
    },

    /// Browse messages in a session.
    Session {
        /// Session identifier.
        session_id: String,

        /// Filter by sender (user, system).
        #[arg(long)]
        sender: Option<String>,

        /// Maximum messages to display.
        #[arg(short, long, default_value = "50")]
        limit: i64,

        /// Number of messages to skip.
        #[arg(long, default_value = "0")]
        offset: i64,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_and_session_share_default_limit() {
        let cli = Cli::try_parse_from(["plvr", "search", "hello"]).unwrap();
        let Commands::Search { limit, offset, .. } = cli.command else {
            panic!("expected search command");
        };
        assert_eq!(limit, 50);
        assert_eq!(offset, 0);

        let cli = Cli::try_parse_from(["plvr", "session", "session_1"]).unwrap();
        let Commands::Session { limit, .. } = cli.command else {
            panic!("expected session command");
        };
        assert_eq!(limit, 50);
    }
}
