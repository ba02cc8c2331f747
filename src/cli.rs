//! CLI - command line interface for iptvtui
//!
//! Run without arguments for the interactive TUI. Subcommands expose the
//! backend for scripting; all output is JSON-parseable with `--json`.
//!
//! # Examples
//!
//! ```bash
//! iptvtui login -u user -p pass -s http://provider.example
//! iptvtui streams vod --category 5 --json
//! iptvtui search "news"
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;

use crate::models::ContentType;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// iptvtui - terminal client for an IPTV catalog backend
///
/// Run without arguments to launch the interactive TUI.
/// Use subcommands for automation and scripting.
#[derive(Parser, Debug)]
#[command(
    name = "iptvtui",
    version,
    about = "Terminal client for browsing and playing IPTV content",
    after_help = "EXAMPLES:\n\
                  iptvtui                          Launch interactive TUI\n\
                  iptvtui login -u me -p pw -s http://provider.example\n\
                  iptvtui categories live          List live categories\n\
                  iptvtui streams vod --category 5 List movies in category 5\n\
                  iptvtui search \"news\" --json     Search everything"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Backend base URL (overrides config and IPTV_BACKEND_URL)
    #[arg(long, short = 'b', global = true)]
    pub backend: Option<String>,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Save provider credentials and register them with the backend
    Login(LoginCmd),

    /// Remove the stored credential
    Logout,

    /// Test the backend's provider connection
    #[command(visible_alias = "t")]
    Test,

    /// Check backend liveness
    Health,

    /// Show playlist metadata
    #[command(visible_alias = "i")]
    Info,

    /// List categories for a content type
    #[command(visible_alias = "cat")]
    Categories(CategoriesCmd),

    /// List streams for a content type
    #[command(visible_alias = "st")]
    Streams(StreamsCmd),

    /// Search across live, VOD, and series
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Show the short EPG for a live channel
    Epg(EpgCmd),
}

/// Content type argument for categories/streams
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentTypeArg {
    Live,
    Vod,
    Series,
}

impl From<ContentTypeArg> for ContentType {
    fn from(arg: ContentTypeArg) -> ContentType {
        match arg {
            ContentTypeArg::Live => ContentType::Live,
            ContentTypeArg::Vod => ContentType::Vod,
            ContentTypeArg::Series => ContentType::Series,
        }
    }
}

/// Save provider credentials
#[derive(Args, Debug)]
pub struct LoginCmd {
    /// Provider username
    #[arg(long, short = 'u', required = true)]
    pub username: String,

    /// Provider password
    #[arg(long, short = 'p', required = true)]
    pub password: String,

    /// Provider server URL (http:// or https://)
    #[arg(long, short = 's', required = true)]
    pub server_url: String,

    /// Display name for the playlist
    #[arg(long, short = 'n')]
    pub name: Option<String>,
}

/// List categories for one content type
#[derive(Args, Debug)]
pub struct CategoriesCmd {
    /// Content type
    #[arg(value_enum)]
    pub content_type: ContentTypeArg,
}

/// List streams for one content type
#[derive(Args, Debug)]
pub struct StreamsCmd {
    /// Content type
    #[arg(value_enum)]
    pub content_type: ContentTypeArg,

    /// Filter by category id (omit for all)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Maximum number of results (0 = unlimited)
    #[arg(long, short = 'l', default_value = "0")]
    pub limit: usize,
}

/// Search across all content types
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query
    #[arg(required = true)]
    pub query: String,
}

/// Show EPG entries for a live channel
#[derive(Args, Debug)]
pub struct EpgCmd {
    /// Live stream id
    pub stream_id: u64,

    /// Maximum number of entries
    #[arg(long, short = 'l', default_value = "10")]
    pub limit: u32,
}

// =============================================================================
// Output Handling
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Output writer honoring `--json` and `--quiet`
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet/JSON mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
