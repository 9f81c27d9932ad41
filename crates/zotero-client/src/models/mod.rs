//! Data models for Zotero API entities.
//!
//! All models use `#[serde(default)]` for optional fields and explicit
//! renames / `rename_all = "camelCase"` to match the wire schema.

mod collection;
mod item;
mod search;
mod write;

pub use collection::CollectionData;
pub use item::{
    AttachmentContent, AttachmentDescriptor, Creator, Envelope, Fulltext, FulltextSource, ItemData,
    LinkMode, Tag,
};
pub use search::{QueryMode, SearchParams, SortDirection, SortField};
pub use write::{WriteFailure, WriteOutcome};
