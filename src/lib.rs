//! iptvtui - terminal client for an IPTV catalog backend
//!
//! Browse live channels, movies, and series from a catalog backend,
//! search across all three, and hand a selected stream to an external
//! player.
//!
//! # Modules
//!
//! - `models` - shared data structures (tabs, items, categories, credentials)
//! - `api` - catalog backend client
//! - `cache` - per-tab content cache
//! - `store` - credential persistence
//! - `app` - browse state machine and key handling
//! - `player` - external player launcher
//! - `ui` - TUI theme
//! - `cli` / `commands` - scriptable command-line mode
//! - `config` - backend URL and player configuration

pub mod api;
pub mod app;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod player;
pub mod store;
pub mod ui;

// Re-export commonly used types
pub use api::{ApiStatus, CatalogClient, CatalogError, ConnectionCheck, PlaylistInfo};
pub use app::{App, Command, Msg, Screen};
pub use cache::ContentCache;
pub use models::{
    Category, ConnectionStatus, ContentItem, ContentType, Credential, SearchResults,
};
pub use store::CredentialStore;
