//! Configuration and client construction tests.

use zotero_client::config::{Config, LibraryType};
use zotero_client::ZoteroClient;

// =============================================================================
// Config Behavior Tests
// =============================================================================

#[test]
fn test_config_web_mode_defaults() {
    let config = Config::new(Some("key".to_string()), "12345", LibraryType::User);
    assert!(config.has_api_key());
    assert!(!config.local);
    assert_eq!(config.min_request_interval, std::time::Duration::from_millis(1000));
    assert!(config.data_dir.is_none());
}

#[test]
fn test_config_local_mode() {
    let config = Config::local();
    assert!(config.local);
    assert!(!config.has_api_key());
    assert_eq!(config.library_id, "0");
}

#[test]
fn test_config_clone_preserves_api_key() {
    let config = Config::new(Some("secret".to_string()), "1", LibraryType::Group);
    let cloned = config.clone();
    assert_eq!(config.api_key, cloned.api_key);
    assert_eq!(cloned.library_type, LibraryType::Group);
}

// =============================================================================
// Client Behavior Tests
// =============================================================================

#[test]
fn test_client_creation_succeeds() {
    let config = Config::new(None, "12345", LibraryType::User);
    assert!(ZoteroClient::new(config).is_ok());
}

#[test]
fn test_client_reports_api_key_status() {
    let client =
        ZoteroClient::new(Config::new(Some("key".to_string()), "1", LibraryType::User)).unwrap();
    assert!(client.has_api_key());

    let client_no_key = ZoteroClient::new(Config::local()).unwrap();
    assert!(!client_no_key.has_api_key());
}

#[test]
fn test_client_debug_hides_api_key() {
    let config = Config::new(Some("super-secret-key".to_string()), "12345", LibraryType::User);
    let client = ZoteroClient::new(config).unwrap();
    let debug = format!("{client:?}");
    // API key must NOT appear in debug output
    assert!(!debug.contains("super-secret-key"));
    assert!(debug.contains("has_api_key"));
}
