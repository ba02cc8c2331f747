//! Credential persistence
//!
//! Persists a single provider credential as a JSON blob under the app's
//! config directory. The store performs no validation; that is the setup
//! form's job. Malformed data on disk is treated as absent and purged so
//! a corrupt file can never wedge startup.

use std::fs;
use std::path::PathBuf;

use anyhow::Result;

use crate::models::Credential;

/// Fixed file name for the single credential record
const CREDENTIAL_FILE: &str = "credentials.json";

/// File-backed store for the provider credential
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    /// Store rooted at an explicit directory (tests use a temp dir)
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the platform config directory
    /// (`~/.config/iptvtui` on Linux)
    pub fn open_default() -> Option<Self> {
        dirs::config_dir().map(|p| Self::new(p.join("iptvtui")))
    }

    fn path(&self) -> PathBuf {
        self.dir.join(CREDENTIAL_FILE)
    }

    /// Write the credential to disk, creating the directory if needed
    pub fn save(&self, credential: &Credential) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(credential)?;
        fs::write(self.path(), json)?;
        Ok(())
    }

    /// Read the stored credential. Malformed or unreadable data purges the
    /// entry and returns `None`; this never errors to the caller.
    pub fn load(&self) -> Option<Credential> {
        let path = self.path();
        let raw = fs::read_to_string(&path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(credential) => Some(credential),
            Err(e) => {
                log::warn!("purging malformed credential file {}: {}", path.display(), e);
                let _ = fs::remove_file(&path);
                None
            }
        }
    }

    /// Remove the stored credential, if any
    pub fn clear(&self) {
        let _ = fs::remove_file(self.path());
    }
}
