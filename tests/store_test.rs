//! Credential store tests
//!
//! Round-trips credentials through a temp directory and verifies the
//! malformed-data purge behavior.

use iptvtui::models::Credential;
use iptvtui::store::CredentialStore;

fn credential() -> Credential {
    Credential {
        playlist_name: Some("Home".into()),
        username: "user".into(),
        password: "pass".into(),
        server_url: "http://provider.example".into(),
    }
}

#[test]
fn test_save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path());

    store.save(&credential()).unwrap();
    let loaded = store.load().expect("credential should load");

    assert_eq!(loaded.username, "user");
    assert_eq!(loaded.server_url, "http://provider.example");
    assert_eq!(loaded.playlist_name.as_deref(), Some("Home"));
}

#[test]
fn test_load_missing_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path());

    assert!(store.load().is_none());
}

#[test]
fn test_save_creates_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("does").join("not").join("exist");
    let store = CredentialStore::new(&nested);

    store.save(&credential()).unwrap();
    assert!(store.load().is_some());
}

#[test]
fn test_malformed_data_is_purged() {
    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path());

    let path = dir.path().join("credentials.json");
    std::fs::write(&path, "{ this is not json").unwrap();

    assert!(store.load().is_none());
    // The corrupt file is gone; the next load does not retry parsing it
    assert!(!path.exists());
}

#[test]
fn test_clear_removes_credential() {
    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path());

    store.save(&credential()).unwrap();
    store.clear();

    assert!(store.load().is_none());
}

#[test]
fn test_clear_on_empty_store_is_silent() {
    let dir = tempfile::tempdir().unwrap();
    let store = CredentialStore::new(dir.path());
    store.clear();
}
