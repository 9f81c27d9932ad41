//! Item and attachment data models matching the Zotero API schema.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A versioned object fetched from the API: identifier key, version
/// integer used for optimistic concurrency, and the typed payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Object key (8-character identifier).
    pub key: String,

    /// Monotonically increasing library version of the object.
    #[serde(default)]
    pub version: u32,

    /// Typed object payload.
    pub data: T,
}

/// A creator (author, editor, ...) on an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    /// Creator role, e.g. "author".
    #[serde(default)]
    pub creator_type: Option<String>,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    /// Single-field name, used instead of first/last for institutions.
    #[serde(default)]
    pub name: Option<String>,
}

/// A tag attached to an item.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tag {
    pub tag: String,
}

/// How an attachment item refers to its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkMode {
    ImportedFile,
    LinkedFile,
    LinkedUrl,
    ImportedUrl,
}

/// Item payload (the `data` half of an item envelope).
///
/// Only the fields the client operates on are typed; unknown fields are
/// ignored on deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemData {
    /// Item type, e.g. "journalArticle", "note", "attachment".
    #[serde(default)]
    pub item_type: String,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub creators: Vec<Creator>,

    #[serde(default)]
    pub date: Option<String>,

    /// Keys of the collections this item belongs to.
    #[serde(default)]
    pub collections: Vec<String>,

    #[serde(default)]
    pub tags: Vec<Tag>,

    /// Parent item key, for notes and attachments.
    #[serde(default)]
    pub parent_item: Option<String>,

    /// Note HTML, for note items.
    #[serde(default)]
    pub note: Option<String>,

    /// Declared MIME type, for attachment items.
    #[serde(default)]
    pub content_type: Option<String>,

    /// Stored filename, for attachment items.
    #[serde(default)]
    pub filename: Option<String>,

    /// Link mode, for attachment items.
    #[serde(default)]
    pub link_mode: Option<LinkMode>,

    #[serde(default)]
    pub date_modified: Option<String>,
}

impl ItemData {
    /// True if this item is an attachment.
    #[must_use]
    pub fn is_attachment(&self) -> bool {
        self.item_type == "attachment"
    }

    /// True if the declared content type indicates a PDF.
    #[must_use]
    pub fn is_pdf(&self) -> bool {
        self.content_type.as_deref().is_some_and(|ct| ct.contains("pdf"))
    }
}

/// An attachment child, decorated with local resolution results when a
/// matching file was found under the data directory.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDescriptor {
    pub key: String,
    pub title: Option<String>,
    pub content_type: Option<String>,
    pub filename: Option<String>,
    pub link_mode: Option<LinkMode>,

    /// Path of the locally resolved file, if one exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,

    /// Size of the local file in bytes. Absent when the stat failed;
    /// a stat failure never fails the listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

impl AttachmentDescriptor {
    /// Build a descriptor from an attachment envelope, without local
    /// resolution applied.
    #[must_use]
    pub fn from_envelope(item: &Envelope<ItemData>) -> Self {
        Self {
            key: item.key.clone(),
            title: item.data.title.clone(),
            content_type: item.data.content_type.clone(),
            filename: item.data.filename.clone(),
            link_mode: item.data.link_mode,
            local_path: None,
            size: None,
        }
    }
}

/// Where a full-text payload was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FulltextSource {
    Local,
    Remote,
}

/// Extracted text for an attachment, as produced by Zotero's indexer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fulltext {
    pub content: String,

    #[serde(default)]
    pub indexed_pages: Option<u32>,

    #[serde(default)]
    pub total_pages: Option<u32>,

    #[serde(default)]
    pub indexed_chars: Option<u32>,

    #[serde(default)]
    pub total_chars: Option<u32>,

    /// Provenance of the content.
    #[serde(skip_deserializing, default = "FulltextSource::remote")]
    pub source: FulltextSource,
}

impl FulltextSource {
    const fn remote() -> Self {
        Self::Remote
    }
}

impl Fulltext {
    /// Wrap text read from the local cache file.
    #[must_use]
    pub fn from_local(content: String) -> Self {
        Self {
            content,
            indexed_pages: None,
            total_pages: None,
            indexed_chars: None,
            total_chars: None,
            source: FulltextSource::Local,
        }
    }
}

/// A downloaded attachment, bytes base64-encoded for transport.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentContent {
    pub content_type: String,
    pub filename: String,
    /// Base64-encoded raw bytes.
    pub data: String,
}
