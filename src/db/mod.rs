//! Storage accessor: a generic insert/find interface over named document
//! collections, plus the MongoDB and in-process implementations.

pub mod memory;
pub mod models;
pub mod mongo;

use async_trait::async_trait;
use bson::{DateTime, Document};
use serde::Serialize;
use thiserror::Error;

pub use memory::MemoryStore;
pub use models::DocumentId;
pub use mongo::MongoStore;

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub name: String,
    pub connect_timeout_secs: u64,
    pub max_pool_size: u32,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database not available")]
    Unavailable,

    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),

    #[error("failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),

    #[error("failed to decode document: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("document has no _id field")]
    MissingId,
}

/// The operations the request layer needs from a document store.
///
/// Implementations must be safe to share across concurrently served
/// requests; the process holds exactly one for its whole lifetime.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn database_name(&self) -> &str;

    /// Insert one document and return the identifier the store assigned.
    async fn insert_one(
        &self,
        collection: &str,
        document: Document,
    ) -> Result<DocumentId, StoreError>;

    /// Documents matching every key of `filter`, in natural order, at most
    /// `limit` of them. A filter value matches an array field when the array
    /// contains it.
    async fn find(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, StoreError>;

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError>;
}

/// Serialize `payload`, stamp its timestamps and insert it into `collection`.
pub async fn create_document<T: Serialize>(
    store: &dyn DocumentStore,
    collection: &str,
    payload: &T,
) -> Result<DocumentId, StoreError> {
    let mut document = bson::to_document(payload)?;
    let now = DateTime::now();
    document.insert("created_at", now);
    document.insert("updated_at", now);

    let id = store.insert_one(collection, document).await?;
    tracing::debug!(collection = %collection, id = %id, "document created");
    Ok(id)
}

/// Up to `limit` documents of `collection` matching `filter` exactly.
/// A non-positive limit yields nothing without touching the store.
pub async fn get_documents(
    store: &dyn DocumentStore,
    collection: &str,
    filter: Document,
    limit: i64,
) -> Result<Vec<Document>, StoreError> {
    if limit <= 0 {
        return Ok(Vec::new());
    }
    store.find(collection, filter, limit).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, Bson};

    #[derive(Serialize)]
    struct Note {
        text: String,
    }

    #[tokio::test]
    async fn test_create_document_stamps_timestamps() {
        let store = MemoryStore::new("test");
        let id = create_document(&store, "notes", &Note { text: "hi".into() })
            .await
            .unwrap();

        let docs = get_documents(&store, "notes", doc! {}, 10).await.unwrap();
        assert_eq!(docs.len(), 1);
        let stored = &docs[0];
        assert_eq!(stored.get_str("text").unwrap(), "hi");
        assert!(matches!(stored.get("created_at"), Some(Bson::DateTime(_))));
        assert_eq!(stored.get("created_at"), stored.get("updated_at"));
        assert_eq!(stored.get("_id"), Some(id.as_bson()));
    }

    #[tokio::test]
    async fn test_get_documents_zero_limit_is_empty() {
        let store = MemoryStore::new("test");
        create_document(&store, "notes", &Note { text: "a".into() })
            .await
            .unwrap();
        let docs = get_documents(&store, "notes", doc! {}, 0).await.unwrap();
        assert!(docs.is_empty());
    }

    #[tokio::test]
    async fn test_create_document_returns_fresh_ids() {
        let store = MemoryStore::new("test");
        let a = create_document(&store, "notes", &Note { text: "a".into() })
            .await
            .unwrap();
        let b = create_document(&store, "notes", &Note { text: "a".into() })
            .await
            .unwrap();
        assert_ne!(a, b);
    }
}
