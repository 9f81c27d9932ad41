//! Zotero Web API v3 client
//!
//! A rate-governed async client for the Zotero bibliographic service,
//! built for tool-calling agents. Callers get typed results or typed
//! failures for every operation; protocol concerns stay inside.
//!
//! # Features
//!
//! - **Rate-governed**: minimum request spacing, server `Backoff`
//!   directives honored, one bounded retry on throttling
//! - **Optimistic concurrency**: version-preconditioned patches with
//!   explicit conflict surfacing
//! - **Local-first content**: attachment files and extracted text are
//!   resolved from the Zotero data directory before any network call
//! - **Paginated**: bounded pages with server-reported totals
//!
//! # Example
//!
//! ```no_run
//! use zotero_client::{Config, ZoteroClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = ZoteroClient::new(config)?;
//!
//!     let page = client.list_collections(None, None).await?;
//!     println!("{} of {} collections", page.items.len(), page.total_results);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod storage;

pub use client::{PatchOutcome, ZoteroClient};
pub use config::{Config, LibraryType};
pub use error::{ClientError, ClientResult};
pub use pagination::Page;
