//! Document-store seam
//!
//! Persistence is delegated to a collaborator behind `DocumentStore`. The
//! in-process `MemoryStore` is the backend for tests and local runs; a
//! managed-store client would implement the same trait. All failures
//! surface as `StorageUnavailable`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::types::{ApiError, Result};

// =============================================================================
// COLLECTIONS
// =============================================================================

pub const COLLECTION_PUBLIC_GOODS: &str = "public_goods_game";
pub const COLLECTION_TRUST_GAME: &str = "trust_game";
pub const COLLECTION_MATCHES: &str = "game_matches";
pub const COLLECTION_MESSAGES: &str = "llm_messages";
pub const COLLECTION_FEEDBACK: &str = "message_feedback";
pub const COLLECTION_BASIC_INFO: &str = "basic_info";

/// A stored document with its id
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

/// Equality filter on a top-level field
pub type Filter<'a> = (&'a str, Value);

/// Persistence collaborator
pub trait DocumentStore: Send + Sync {
    /// Create a document, returning its id
    fn add(&self, collection: &str, doc: Value) -> Result<String>;

    /// All documents in a collection matching every filter
    fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>>;

    /// One document by id, if present
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Merge top-level fields of `patch` into an existing document
    fn update(&self, collection: &str, id: &str, patch: Value) -> Result<()>;

    /// Remove a document
    fn delete(&self, collection: &str, id: &str) -> Result<()>;
}

/// In-process document store
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    sequence: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive a document id from the collection name and an insertion
    /// sequence number
    fn generate_id(&self, collection: &str) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let mut hasher = Sha256::new();
        hasher.update(collection.as_bytes());
        hasher.update(seq.to_le_bytes());
        let digest = hasher.finalize();
        digest[..10].iter().map(|b| format!("{:02x}", b)).collect()
    }
}

fn matches(doc: &Document, filters: &[Filter]) -> bool {
    filters
        .iter()
        .all(|(field, expected)| doc.data.get(field) == Some(expected))
}

impl DocumentStore for MemoryStore {
    fn add(&self, collection: &str, doc: Value) -> Result<String> {
        let id = self.generate_id(collection);
        let mut collections = self
            .collections
            .write()
            .map_err(|e| ApiError::StorageUnavailable(e.to_string()))?;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                data: doc,
            });
        Ok(id)
    }

    fn query(&self, collection: &str, filters: &[Filter]) -> Result<Vec<Document>> {
        let collections = self
            .collections
            .read()
            .map_err(|e| ApiError::StorageUnavailable(e.to_string()))?;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| matches(doc, filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self
            .collections
            .read()
            .map_err(|e| ApiError::StorageUnavailable(e.to_string()))?;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id).cloned()))
    }

    fn update(&self, collection: &str, id: &str, patch: Value) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| ApiError::StorageUnavailable(e.to_string()))?;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| ApiError::NotFound(format!("document {} in {}", id, collection)))?;

        if let (Value::Object(data), Value::Object(patch)) = (&mut doc.data, patch) {
            for (key, value) in patch {
                data.insert(key, value);
            }
            Ok(())
        } else {
            Err(ApiError::StorageUnavailable(
                "documents must be JSON objects".to_string(),
            ))
        }
    }

    fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self
            .collections
            .write()
            .map_err(|e| ApiError::StorageUnavailable(e.to_string()))?;
        let docs = collections
            .get_mut(collection)
            .ok_or_else(|| ApiError::NotFound(format!("document {} in {}", id, collection)))?;
        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        if docs.len() == before {
            return Err(ApiError::NotFound(format!("document {} in {}", id, collection)));
        }
        Ok(())
    }
}
