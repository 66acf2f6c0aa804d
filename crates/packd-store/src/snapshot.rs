// ABOUTME: Codec for the combined store state as a single JSON exchange document.
// ABOUTME: Decode validates both top-level sections and hands back a fresh pair to swap in.

use packd_core::{NamedStore, UnnamedStore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A snapshot document that cannot be decoded: either the text is not valid
/// JSON for the exchange shape, or a required section is missing or empty.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid json: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("snapshot is missing or has an empty `{0}` section")]
    MissingSection(&'static str),
}

/// The exchange document: both stores under fixed top-level keys.
///
/// `named_storage` maps entry names to their values; `unnamed_storage` is
/// the packet sequence as an array of `{source, timestamp, data}` objects,
/// in insertion order.
#[derive(Debug, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub named_storage: NamedStore,
    #[serde(default)]
    pub unnamed_storage: UnnamedStore,
}

impl Snapshot {
    /// Serialize the combined state. Encoding accepts empty stores; only
    /// decode enforces non-empty sections.
    pub fn encode(named: &NamedStore, unnamed: &UnnamedStore) -> Result<String, SnapshotError> {
        #[derive(Serialize)]
        struct Document<'a> {
            named_storage: &'a NamedStore,
            unnamed_storage: &'a UnnamedStore,
        }

        Ok(serde_json::to_string(&Document {
            named_storage: named,
            unnamed_storage: unnamed,
        })?)
    }

    /// Parse a snapshot document and return the decoded pair. Fails when the
    /// text is not valid JSON for the exchange shape, or when either
    /// top-level section is missing or empty. The pair wholesale replaces
    /// existing state at the caller, and only after decode succeeds, so a
    /// failed decode never disturbs what was loaded before.
    pub fn decode(text: &str) -> Result<(NamedStore, UnnamedStore), SnapshotError> {
        let document: Self = serde_json::from_str(text)?;
        if document.named_storage.is_empty() {
            return Err(SnapshotError::MissingSection("named_storage"));
        }
        if document.unnamed_storage.is_empty() {
            return Err(SnapshotError::MissingSection("unnamed_storage"));
        }
        Ok((document.named_storage, document.unnamed_storage))
    }
}
