//! API clients for external services
//!
//! - `catalog` - the IPTV catalog backend (categories, streams, search)

pub mod catalog;

pub use catalog::{ApiStatus, CatalogClient, CatalogError, ConnectionCheck, PlaylistInfo};
