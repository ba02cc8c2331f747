//! External player playback
//!
//! Opens a stream URL in mpv or VLC. The client never decodes video; it
//! points the player at a URL and reacts to the process lifecycle, which
//! stands in for the load/ready/error events of an embedded video element.

use std::process::Stdio;
use thiserror::Error;
use tokio::process::{Child, Command};

/// Supported external players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayerType {
    /// mpv media player (default)
    #[default]
    Mpv,
    /// VLC media player
    Vlc,
}

impl PlayerType {
    /// Get the command name for this player
    pub fn command(&self) -> &'static str {
        match self {
            PlayerType::Mpv => "mpv",
            PlayerType::Vlc => {
                // On macOS, VLC is an app bundle - check for it
                #[cfg(target_os = "macos")]
                if std::path::Path::new("/Applications/VLC.app").exists() {
                    return "/Applications/VLC.app/Contents/MacOS/VLC";
                }
                "vlc"
            }
        }
    }

    /// Get a display name for this player
    pub fn display_name(&self) -> &'static str {
        match self {
            PlayerType::Mpv => "mpv",
            PlayerType::Vlc => "VLC",
        }
    }

    /// Parse a configured player name; unknown values fall back to mpv
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "vlc" => PlayerType::Vlc,
            _ => PlayerType::Mpv,
        }
    }
}

impl std::fmt::Display for PlayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Errors from player operations
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Player '{0}' not found. Install it first.")]
    NotFound(String),
    #[error("Failed to start player: {0}")]
    StartFailed(#[from] std::io::Error),
}

/// Playback lifecycle events, reported back to the state machine.
/// Playback failure never touches browse state; it only raises a
/// dismissible banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// The player process started loading the stream
    Started,
    /// The player exited; `clean` is false on a non-zero exit
    Exited { clean: bool },
    /// The player could not be started
    Failed(String),
}

/// Launcher for an external player process
pub struct Player {
    player_type: PlayerType,
}

impl Player {
    pub fn new(player_type: PlayerType) -> Self {
        Self { player_type }
    }

    pub fn player_type(&self) -> PlayerType {
        self.player_type
    }

    /// Check if the player is available on the system
    pub async fn is_available(&self) -> bool {
        let cmd = self.player_type.command();

        // Full path (macOS app bundle) is checked directly
        if cmd.starts_with('/') {
            return std::path::Path::new(cmd).exists();
        }

        Command::new("which")
            .arg(cmd)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|s| s.success())
            .unwrap_or(false)
    }

    /// Spawn the player pointed at a stream URL
    pub fn play(&self, stream_url: &str) -> Result<Child, PlayerError> {
        let mut cmd = Command::new(self.player_type.command());
        cmd.arg(stream_url);

        match self.player_type {
            PlayerType::Mpv => {
                cmd.arg("--force-window=immediate");
            }
            PlayerType::Vlc => {
                cmd.arg("--no-video-title-show");
                cmd.arg("--play-and-exit");
            }
        }

        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PlayerError::NotFound(self.player_type.command().to_string())
            } else {
                PlayerError::StartFailed(e)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_type_command() {
        assert_eq!(PlayerType::Mpv.command(), "mpv");
        let vlc_cmd = PlayerType::Vlc.command();
        assert!(vlc_cmd == "vlc" || vlc_cmd == "/Applications/VLC.app/Contents/MacOS/VLC");
    }

    #[test]
    fn test_player_from_name() {
        assert_eq!(PlayerType::from_name("vlc"), PlayerType::Vlc);
        assert_eq!(PlayerType::from_name("VLC"), PlayerType::Vlc);
        assert_eq!(PlayerType::from_name("mpv"), PlayerType::Mpv);
        assert_eq!(PlayerType::from_name("something"), PlayerType::Mpv);
    }

    #[test]
    fn test_default_player() {
        assert_eq!(PlayerType::default(), PlayerType::Mpv);
    }
}
