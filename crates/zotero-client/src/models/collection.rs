//! Collection data model.

use serde::{Deserialize, Deserializer, Serialize};

/// Collection payload (the `data` half of a collection envelope).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionData {
    pub name: String,

    /// Parent collection key. The API encodes "no parent" as the JSON
    /// literal `false`, which deserializes here to `None`.
    #[serde(default, deserialize_with = "key_or_false")]
    pub parent_collection: Option<String>,
}

/// Deserialize a field that is either an object key string or `false`.
fn key_or_false<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum KeyOrFalse {
        Key(String),
        Absent(bool),
    }

    match KeyOrFalse::deserialize(deserializer)? {
        KeyOrFalse::Key(key) => Ok(Some(key)),
        KeyOrFalse::Absent(_) => Ok(None),
    }
}
