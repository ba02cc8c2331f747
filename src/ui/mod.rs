//! TUI components
//!
//! - `theme` - color palette and style helpers

pub mod theme;

pub use theme::Theme;
