//! Zotero API client.
//!
//! The public surface of the crate: domain operations over collections,
//! items, attachments and full text, each returning a typed result or a
//! typed [`ClientError`]. Every network exchange funnels through the
//! rate governor; content-retrieval operations consult the local
//! storage layout first unless remote resolution is forced.

mod gateway;
mod rate;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::client::gateway::{Gateway, disposition_filename, total_results};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    AttachmentContent, AttachmentDescriptor, CollectionData, Envelope, Fulltext, ItemData,
    SearchParams, WriteOutcome,
};
use crate::pagination::{Page, PageRequest};
use crate::storage::LocalStore;

/// Result of a conditional add-to-collection patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The item was patched into the collection.
    Added,
    /// The relation already held; no write was sent.
    AlreadyPresent,
}

/// Rate-governed client for one Zotero library.
///
/// Owns its pacing state exclusively; share one instance (e.g. behind
/// an `Arc`) rather than constructing several, since separate instances
/// are not mutually rate-coordinated.
pub struct ZoteroClient {
    config: Config,
    gateway: Gateway,
    storage: Option<LocalStore>,
}

impl ZoteroClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let gateway = Gateway::new(&config)?;
        let storage = config.data_dir.clone().map(LocalStore::new);
        Ok(Self { config, gateway, storage })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.config.has_api_key()
    }

    /// The configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ----- list operations --------------------------------------------------

    /// List collections in the library.
    pub async fn list_collections(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> ClientResult<Page<Envelope<CollectionData>>> {
        self.list_envelopes("list_collections", "collections", limit, offset).await
    }

    /// List items in the library.
    pub async fn list_items(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> ClientResult<Page<Envelope<ItemData>>> {
        self.list_envelopes("list_items", "items", limit, offset).await
    }

    async fn list_envelopes<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> ClientResult<Page<Envelope<T>>> {
        let page = PageRequest::new(limit, offset);
        let url = format!("{}/{}", self.config.library_base(), path);
        let request = self.gateway.get(&url).query(&page.query());
        let response = self.gateway.execute(operation, request).await?;
        let total = total_results(&response);
        let items: Vec<Envelope<T>> = response.json().await.map_err(ClientError::Http)?;
        Ok(Page::new(items, page, total))
    }

    // ----- write operations -------------------------------------------------

    /// Create a collection, optionally under a parent collection.
    ///
    /// Submitted as a single-element batch with a fresh idempotency
    /// token. A non-empty failure map in the response is surfaced as
    /// [`ClientError::WriteRejected`] even though the HTTP exchange
    /// succeeded.
    pub async fn create_collection(
        &self,
        name: &str,
        parent: Option<&str>,
    ) -> ClientResult<WriteOutcome> {
        let mut object = serde_json::json!({ "name": name });
        if let Some(parent) = parent {
            object["parentCollection"] = serde_json::json!(parent);
        }
        let url = format!("{}/collections", self.config.library_base());
        self.submit_write("create_collection", &url, &serde_json::json!([object])).await
    }

    /// Create a note item, optionally attached to a parent item.
    pub async fn create_note(
        &self,
        parent_item: Option<&str>,
        html: &str,
        tags: &[String],
    ) -> ClientResult<WriteOutcome> {
        let tags: Vec<serde_json::Value> =
            tags.iter().map(|t| serde_json::json!({ "tag": t })).collect();
        let mut object = serde_json::json!({
            "itemType": "note",
            "note": html,
            "tags": tags,
        });
        if let Some(parent) = parent_item {
            object["parentItem"] = serde_json::json!(parent);
        }
        let url = format!("{}/items", self.config.library_base());
        self.submit_write("create_note", &url, &serde_json::json!([object])).await
    }

    async fn submit_write(
        &self,
        operation: &'static str,
        url: &str,
        body: &serde_json::Value,
    ) -> ClientResult<WriteOutcome> {
        let request = self.gateway.post(url).json(body);
        let response = self.gateway.execute(operation, request).await?;
        let outcome: WriteOutcome = response.json().await.map_err(ClientError::Http)?;
        if outcome.is_success() {
            Ok(outcome)
        } else {
            Err(ClientError::WriteRejected { operation, failures: outcome.failure_lines() })
        }
    }

    // ----- single-object operations -----------------------------------------

    /// Fetch a single item by key.
    pub async fn get_item(&self, key: &str) -> ClientResult<Envelope<ItemData>> {
        let url = format!("{}/items/{}", self.config.library_base(), key);
        let response = self.gateway.execute("get_item", self.gateway.get(&url)).await?;
        response.json().await.map_err(ClientError::Http)
    }

    /// Add an item to a collection with optimistic concurrency.
    ///
    /// Fetches the item first; if the collection already holds it the
    /// call short-circuits with [`PatchOutcome::AlreadyPresent`] and no
    /// write is sent. Otherwise the patch carries the fetched version
    /// as a precondition; a server-side version mismatch surfaces as
    /// [`ClientError::PreconditionFailed`] and is not retried here;
    /// the caller re-fetches and retries.
    pub async fn add_item_to_collection(
        &self,
        item_key: &str,
        collection_key: &str,
    ) -> ClientResult<PatchOutcome> {
        let item = self.get_item(item_key).await?;
        if item.data.collections.iter().any(|k| k == collection_key) {
            debug!(item_key, collection_key, "item already in collection, skipping write");
            return Ok(PatchOutcome::AlreadyPresent);
        }

        let mut collections = item.data.collections;
        collections.push(collection_key.to_string());

        let url = format!("{}/items/{}", self.config.library_base(), item_key);
        let request = self
            .gateway
            .patch(&url, item.version)
            .json(&serde_json::json!({ "collections": collections }));
        self.gateway.execute("add_item_to_collection", request).await?;
        Ok(PatchOutcome::Added)
    }

    // ----- search and children ----------------------------------------------

    /// Search items in the library.
    pub async fn search_items(
        &self,
        params: &SearchParams,
    ) -> ClientResult<Page<Envelope<ItemData>>> {
        let page = PageRequest::new(params.limit, params.offset);
        let mut query: Vec<(&str, String)> = vec![
            ("q", params.query.clone()),
            ("qmode", params.query_mode.as_str().to_string()),
            ("sort", params.sort.as_str().to_string()),
            ("direction", params.direction.as_str().to_string()),
        ];
        if let Some(ref item_type) = params.item_type {
            query.push(("itemType", item_type.clone()));
        }
        if let Some(ref tag) = params.tag {
            // Boolean tag syntax is the server's; passed through verbatim.
            query.push(("tag", tag.clone()));
        }
        query.extend(page.query());

        let url = format!("{}/items", self.config.library_base());
        let request = self.gateway.get(&url).query(&query);
        let response = self.gateway.execute("search_items", request).await?;
        let total = total_results(&response);
        let items: Vec<Envelope<ItemData>> = response.json().await.map_err(ClientError::Http)?;
        Ok(Page::new(items, page, total))
    }

    /// List the children of an item, optionally restricted to
    /// attachment items.
    pub async fn get_item_children(
        &self,
        key: &str,
        attachments_only: bool,
    ) -> ClientResult<Vec<Envelope<ItemData>>> {
        let url = format!("{}/items/{}/children", self.config.library_base(), key);
        let mut request = self.gateway.get(&url).query(&[("limit", "100")]);
        if attachments_only {
            request = request.query(&[("itemType", "attachment")]);
        }
        let response = self.gateway.execute("get_item_children", request).await?;
        response.json().await.map_err(ClientError::Http)
    }

    /// List an item's attachments, decorated with local path and size
    /// where the data directory holds a matching file. Stat failures
    /// are ignored; they never fail the listing.
    pub async fn list_attachments(
        &self,
        parent_key: &str,
    ) -> ClientResult<Vec<AttachmentDescriptor>> {
        let children = self.get_item_children(parent_key, true).await?;
        let mut descriptors: Vec<AttachmentDescriptor> =
            children.iter().map(AttachmentDescriptor::from_envelope).collect();

        if let Some(ref store) = self.storage {
            for descriptor in &mut descriptors {
                if let Some(local) =
                    store.find_file(&descriptor.key, descriptor.filename.as_deref()).await
                {
                    descriptor.local_path = Some(local.path);
                    descriptor.size = local.size;
                }
            }
        }
        Ok(descriptors)
    }

    // ----- content retrieval ------------------------------------------------

    /// Fetch extracted full text for an attachment from the service.
    ///
    /// A 404 means the attachment has not been indexed yet and returns
    /// `Ok(None)`; any other non-success status is a typed failure.
    pub async fn get_fulltext(&self, key: &str) -> ClientResult<Option<Fulltext>> {
        let url = format!("{}/items/{}/fulltext", self.config.library_base(), key);
        match self.gateway.execute("get_fulltext", self.gateway.get(&url)).await {
            Ok(response) => {
                let fulltext: Fulltext = response.json().await.map_err(ClientError::Http)?;
                Ok(Some(fulltext))
            }
            Err(ClientError::NotFound { .. }) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Download an attachment's file from the service.
    ///
    /// The filename comes from the `Content-Disposition` header,
    /// falling back to `<key>.bin`; bytes are base64-encoded.
    pub async fn download_attachment(&self, key: &str) -> ClientResult<AttachmentContent> {
        let url = format!("{}/items/{}/file", self.config.library_base(), key);
        let response = self.gateway.execute("download_attachment", self.gateway.get(&url)).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let filename = disposition_filename(&response).unwrap_or_else(|| format!("{key}.bin"));
        let bytes = response.bytes().await.map_err(ClientError::Http)?;

        Ok(AttachmentContent { content_type, filename, data: BASE64.encode(&bytes) })
    }

    /// Fetch full text for an item or attachment, local cache first.
    ///
    /// The cache file name is fixed, so the local probe happens before
    /// any network call; a hit on the caller's key costs zero requests.
    /// A container key is resolved to a leaf attachment (preferring a
    /// PDF child), whose cache is then probed in turn. `force_remote`
    /// bypasses the local cache even when a cache file exists.
    pub async fn fetch_fulltext(
        &self,
        key: &str,
        force_remote: bool,
    ) -> ClientResult<Option<Fulltext>> {
        if !force_remote {
            if let Some(ref store) = self.storage {
                if let Some(content) = store.read_fulltext_cache(key).await {
                    return Ok(Some(Fulltext::from_local(content)));
                }
            }
        }

        let attachment = self.resolve_attachment(key).await?;
        if !force_remote && attachment.key != key {
            if let Some(ref store) = self.storage {
                if let Some(content) = store.read_fulltext_cache(&attachment.key).await {
                    return Ok(Some(Fulltext::from_local(content)));
                }
            }
        }
        self.get_fulltext(&attachment.key).await
    }

    /// Fetch an attachment's content, local file first.
    ///
    /// Same container resolution and `force_remote` semantics as
    /// [`Self::fetch_fulltext`].
    pub async fn fetch_attachment(
        &self,
        key: &str,
        force_remote: bool,
    ) -> ClientResult<AttachmentContent> {
        let attachment = self.resolve_attachment(key).await?;
        if !force_remote {
            if let Some(ref store) = self.storage {
                if let Some((_, bytes)) =
                    store.read_file(&attachment.key, attachment.data.filename.as_deref()).await
                {
                    let filename = attachment
                        .data
                        .filename
                        .clone()
                        .unwrap_or_else(|| format!("{}.bin", attachment.key));
                    let content_type = attachment
                        .data
                        .content_type
                        .clone()
                        .unwrap_or_else(|| "application/octet-stream".to_string());
                    return Ok(AttachmentContent {
                        content_type,
                        filename,
                        data: BASE64.encode(&bytes),
                    });
                }
            }
        }
        self.download_attachment(&attachment.key).await
    }

    /// Resolve a key to a leaf attachment. Container items resolve to
    /// a PDF child when one exists, otherwise the first child.
    async fn resolve_attachment(&self, key: &str) -> ClientResult<Envelope<ItemData>> {
        let item = self.get_item(key).await?;
        if item.data.is_attachment() {
            return Ok(item);
        }

        let children = self.get_item_children(&item.key, true).await?;
        let chosen = children.iter().position(|c| c.data.is_pdf()).unwrap_or(0);
        children.into_iter().nth(chosen).ok_or_else(|| ClientError::NotFound {
            operation: "resolve_attachment",
            detail: format!("item {key} has no attachments"),
        })
    }
}

impl std::fmt::Debug for ZoteroClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoteroClient")
            .field("library", &self.config.library_base())
            .field("has_api_key", &self.has_api_key())
            .field("local", &self.config.local)
            .finish()
    }
}
