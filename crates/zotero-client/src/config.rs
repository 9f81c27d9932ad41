//! Configuration for the Zotero API client.

use std::path::PathBuf;
use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the Zotero Web API.
    pub const BASE_URL: &str = "https://api.zotero.org";

    /// Base URL for the local Zotero HTTP API (desktop app).
    pub const LOCAL_API_URL: &str = "http://localhost:23119/api";

    /// Protocol version sent with every request.
    pub const API_VERSION: &str = "3";

    /// Minimum spacing between two outbound requests.
    pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(1000);

    /// Wait before the single retry when a 429 carries no Retry-After.
    pub const DEFAULT_RETRY_WAIT: Duration = Duration::from_millis(5000);

    /// Default page size for list operations.
    pub const DEFAULT_PAGE_LIMIT: u32 = 25;

    /// Maximum page size the API accepts.
    pub const MAX_PAGE_LIMIT: u32 = 100;

    /// Fixed name of the extracted-text cache file inside a storage directory.
    pub const FULLTEXT_CACHE_FILE: &str = ".zotero-ft-cache";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
}

/// Whether the configured library is a personal or a group library.
///
/// The two kinds live under distinct URL prefixes (`/users/<id>` vs
/// `/groups/<id>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibraryType {
    /// Personal library (`/users/<id>`).
    #[default]
    User,
    /// Group library (`/groups/<id>`).
    Group,
}

impl LibraryType {
    /// URL path segment for this library kind.
    #[must_use]
    pub const fn path_segment(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Group => "groups",
        }
    }
}

impl std::str::FromStr for LibraryType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "group" => Ok(Self::Group),
            other => anyhow::bail!("invalid library type {other:?}, expected \"user\" or \"group\""),
        }
    }
}

/// Client configuration. Immutable once the client is constructed.
#[derive(Debug, Clone)]
pub struct Config {
    /// Zotero API key. May be `None` in local mode.
    pub api_key: Option<String>,

    /// Library identifier (user ID or group ID).
    pub library_id: String,

    /// Library kind, selects the URL prefix.
    pub library_type: LibraryType,

    /// Service base URL (overridable for mock servers).
    pub base_url: String,

    /// Talk to the local Zotero HTTP API instead of the web service.
    /// The API key header is omitted entirely in this mode.
    pub local: bool,

    /// Zotero data directory for local content resolution
    /// (`<data_dir>/storage/<KEY>/...`). `None` disables local-first
    /// resolution.
    pub data_dir: Option<PathBuf>,

    /// Minimum spacing between outbound requests.
    pub min_request_interval: Duration,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl Config {
    /// Create a configuration for the Zotero web service.
    #[must_use]
    pub fn new(
        api_key: Option<String>,
        library_id: impl Into<String>,
        library_type: LibraryType,
    ) -> Self {
        Self {
            api_key,
            library_id: library_id.into(),
            library_type,
            base_url: api::BASE_URL.to_string(),
            local: false,
            data_dir: None,
            min_request_interval: api::MIN_REQUEST_INTERVAL,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
        }
    }

    /// Create a configuration for the local Zotero HTTP API.
    ///
    /// The local API serves the current user's library under user ID 0
    /// and requires no API key.
    #[must_use]
    pub fn local() -> Self {
        Self {
            api_key: None,
            library_id: "0".to_string(),
            library_type: LibraryType::User,
            base_url: api::LOCAL_API_URL.to_string(),
            local: true,
            data_dir: None,
            min_request_interval: api::MIN_REQUEST_INTERVAL,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
        }
    }

    /// Create a test configuration pointed at a mock server.
    ///
    /// The request interval is zeroed so tests are not paced; rate
    /// governor tests set `min_request_interval` explicitly.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: Some("test-key".to_string()),
            library_id: "12345".to_string(),
            library_type: LibraryType::User,
            base_url: base_url.to_string(),
            local: false,
            data_dir: None,
            min_request_interval: Duration::ZERO,
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `ZOTERO_API_KEY`, `ZOTERO_LIBRARY_ID`, `ZOTERO_LIBRARY_TYPE`
    /// (`user`/`group`, default `user`), `ZOTERO_LOCAL` (`1`/`true`) and
    /// `ZOTERO_DATA_DIR`. A `.env` file is honored if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the library ID is missing in web mode or the
    /// library type is unrecognized.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let local = std::env::var("ZOTERO_LOCAL")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let mut config = if local {
            Self::local()
        } else {
            let library_id = std::env::var("ZOTERO_LIBRARY_ID")
                .map_err(|_| anyhow::anyhow!("ZOTERO_LIBRARY_ID must be set"))?;
            let library_type = std::env::var("ZOTERO_LIBRARY_TYPE")
                .map_or(Ok(LibraryType::User), |v| v.parse())?;
            Self::new(std::env::var("ZOTERO_API_KEY").ok(), library_id, library_type)
        };

        config.data_dir = std::env::var("ZOTERO_DATA_DIR").ok().map(PathBuf::from);
        Ok(config)
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// URL prefix for the configured library, e.g.
    /// `https://api.zotero.org/users/12345`.
    #[must_use]
    pub fn library_base(&self) -> String {
        format!("{}/{}/{}", self.base_url, self.library_type.path_segment(), self.library_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_base_user() {
        let config = Config::new(None, "12345", LibraryType::User);
        assert_eq!(config.library_base(), "https://api.zotero.org/users/12345");
    }

    #[test]
    fn test_library_base_group() {
        let config = Config::new(None, "67890", LibraryType::Group);
        assert_eq!(config.library_base(), "https://api.zotero.org/groups/67890");
    }

    #[test]
    fn test_local_config_omits_key() {
        let config = Config::local();
        assert!(config.local);
        assert!(!config.has_api_key());
        assert_eq!(config.library_base(), "http://localhost:23119/api/users/0");
    }

    #[test]
    fn test_library_type_parse() {
        assert_eq!("user".parse::<LibraryType>().unwrap(), LibraryType::User);
        assert_eq!("group".parse::<LibraryType>().unwrap(), LibraryType::Group);
        assert!("shared".parse::<LibraryType>().is_err());
    }

    #[test]
    fn test_config_with_api_key() {
        let config = Config::new(Some("k".to_string()), "1", LibraryType::User);
        assert!(config.has_api_key());
    }
}
