//! CLI command handlers
//!
//! Implements the scriptable subcommands by calling the catalog backend
//! directly. Each handler takes CLI args and Output, returns ExitCode.

use crate::api::{ApiStatus, CatalogClient};
use crate::cli::{CategoriesCmd, EpgCmd, ExitCode, LoginCmd, Output, SearchCmd, StreamsCmd};
use crate::config::Config;
use crate::models::Credential;
use crate::store::CredentialStore;

fn client(backend: Option<&str>) -> CatalogClient {
    let base_url = match backend {
        Some(url) => url.to_string(),
        None => Config::load().backend_url(),
    };
    CatalogClient::new(base_url)
}

// =============================================================================
// Session Commands
// =============================================================================

pub async fn login_cmd(cmd: LoginCmd, backend: Option<&str>, output: &Output) -> ExitCode {
    let credential = Credential {
        playlist_name: cmd.name,
        username: cmd.username,
        password: cmd.password,
        server_url: cmd.server_url,
    };
    if let Err(e) = credential.validate() {
        return output.error(e, ExitCode::InvalidArgs);
    }

    let Some(store) = CredentialStore::open_default() else {
        return output.error("Could not determine config directory", ExitCode::Error);
    };
    if let Err(e) = store.save(&credential) {
        return output.error(format!("Failed to save credential: {}", e), ExitCode::Error);
    }

    output.info("Credential saved, registering with backend...");
    match client(backend).setup(&credential).await {
        Ok(check) => {
            let code = match check.status {
                ApiStatus::Success | ApiStatus::DemoMode => ExitCode::Success,
                ApiStatus::Failure => ExitCode::NetworkError,
            };
            if let Err(e) = output.print(serde_json::json!({
                "status": match check.status {
                    ApiStatus::Success => "success",
                    ApiStatus::DemoMode => "demo_mode",
                    ApiStatus::Failure => "error",
                },
                "message": check.message,
            })) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            code
        }
        Err(e) => output.error(format!("Setup failed: {}", e), ExitCode::NetworkError),
    }
}

pub fn logout_cmd(output: &Output) -> ExitCode {
    match CredentialStore::open_default() {
        Some(store) => {
            store.clear();
            output.info("Credential removed");
            ExitCode::Success
        }
        None => output.error("Could not determine config directory", ExitCode::Error),
    }
}

// =============================================================================
// Backend Commands
// =============================================================================

pub async fn test_cmd(backend: Option<&str>, output: &Output) -> ExitCode {
    match client(backend).test_connection().await {
        Ok(check) => {
            let status = match check.status {
                ApiStatus::Success => "success",
                ApiStatus::DemoMode => "demo_mode",
                ApiStatus::Failure => "error",
            };
            if let Err(e) = output.print(serde_json::json!({
                "status": status,
                "message": check.message,
                "categories_count": check.categories_count,
            })) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            match check.status {
                ApiStatus::Failure => ExitCode::NetworkError,
                _ => ExitCode::Success,
            }
        }
        Err(e) => output.error(format!("Connection test failed: {}", e), ExitCode::NetworkError),
    }
}

pub async fn health_cmd(backend: Option<&str>, output: &Output) -> ExitCode {
    match client(backend).health().await {
        Ok(health) => {
            if let Err(e) = output.print(serde_json::json!({
                "status": health.status,
                "iptv_configured": health.iptv_configured,
            })) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Health check failed: {}", e), ExitCode::NetworkError),
    }
}

pub async fn info_cmd(backend: Option<&str>, output: &Output) -> ExitCode {
    match client(backend).playlist_info().await {
        Ok(info) => {
            if let Err(e) = output.print(serde_json::json!({
                "name": info.name,
                "server": info.server,
                "status": info.status,
            })) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Playlist info failed: {}", e), ExitCode::NetworkError),
    }
}

pub async fn categories_cmd(
    cmd: CategoriesCmd,
    backend: Option<&str>,
    output: &Output,
) -> ExitCode {
    let content_type = cmd.content_type.into();
    match client(backend).categories(content_type).await {
        Ok(categories) => {
            if let Err(e) = output.print(&categories) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(
            format!("Categories fetch failed: {}", e),
            ExitCode::NetworkError,
        ),
    }
}

pub async fn streams_cmd(cmd: StreamsCmd, backend: Option<&str>, output: &Output) -> ExitCode {
    let content_type = cmd.content_type.into();
    output.info(format!("Fetching {} streams...", content_type));

    match client(backend)
        .streams(content_type, cmd.category.as_deref())
        .await
    {
        Ok(mut streams) => {
            if cmd.limit > 0 {
                streams.truncate(cmd.limit);
            }
            if let Err(e) = output.print(&streams) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(
            format!("Streams fetch failed: {}", e),
            ExitCode::NetworkError,
        ),
    }
}

pub async fn search_cmd(cmd: SearchCmd, backend: Option<&str>, output: &Output) -> ExitCode {
    if cmd.query.trim().is_empty() {
        return output.error("Search query must not be empty", ExitCode::InvalidArgs);
    }

    output.info(format!("Searching for: {}", cmd.query));
    match client(backend).search(cmd.query.trim()).await {
        Ok(results) => {
            if let Err(e) = output.print(&results) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("Search failed: {}", e), ExitCode::NetworkError),
    }
}

pub async fn epg_cmd(cmd: EpgCmd, backend: Option<&str>, output: &Output) -> ExitCode {
    match client(backend).epg(cmd.stream_id, cmd.limit).await {
        Ok(epg) => {
            if let Err(e) = output.print(&epg) {
                return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
            }
            ExitCode::Success
        }
        Err(e) => output.error(format!("EPG fetch failed: {}", e), ExitCode::NetworkError),
    }
}
