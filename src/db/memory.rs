//! In-process document store with the same matching rules as MongoDB's
//! exact-match filters. Used by the test suite in place of a live server.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use tokio::sync::RwLock;

use super::{DocumentId, DocumentStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    name: String,
    collections: RwLock<BTreeMap<String, Vec<Document>>>,
}

impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            collections: RwLock::new(BTreeMap::new()),
        }
    }
}

/// A document matches when every filter key equals its field, or names an
/// array field that contains the filter value. No type coercion is applied,
/// so a string never equals an ObjectId.
fn filter_matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| match document.get(key) {
        Some(Bson::Array(items)) if !matches!(expected, Bson::Array(_)) => {
            items.contains(expected)
        }
        Some(actual) => actual == expected,
        None => false,
    })
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn database_name(&self) -> &str {
        &self.name
    }

    async fn insert_one(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<DocumentId, StoreError> {
        let id = match document.get("_id") {
            Some(existing) => existing.clone(),
            None => {
                let generated = Bson::ObjectId(ObjectId::new());
                document.insert("_id", generated.clone());
                generated
            }
        };

        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);

        Ok(DocumentId::new(id))
    }

    async fn find(
        &self,
        collection: &str,
        filter: Document,
        limit: i64,
    ) -> Result<Vec<Document>, StoreError> {
        let limit = usize::try_from(limit).unwrap_or(0);
        let collections = self.collections.read().await;

        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|d| filter_matches(d, &filter))
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn list_collection_names(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.collections.read().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn test_insert_generates_object_id() {
        let store = MemoryStore::new("test");
        let id = store
            .insert_one("posts", doc! { "slug": "hello" })
            .await
            .unwrap();
        assert!(matches!(id.as_bson(), Bson::ObjectId(_)));
    }

    #[tokio::test]
    async fn test_filter_matches_array_membership() {
        let store = MemoryStore::new("test");
        store
            .insert_one("posts", doc! { "tags": ["rust", "web"] })
            .await
            .unwrap();
        store
            .insert_one("posts", doc! { "tags": ["cooking"] })
            .await
            .unwrap();

        let found = store
            .find("posts", doc! { "tags": "rust" }, 10)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_string_does_not_match_object_id() {
        let store = MemoryStore::new("test");
        let id = store.insert_one("posts", doc! { "n": 1 }).await.unwrap();

        let by_string = store
            .find("posts", doc! { "_id": id.to_string() }, 1)
            .await
            .unwrap();
        assert!(by_string.is_empty());

        let by_oid = store
            .find("posts", doc! { "_id": id.as_bson().clone() }, 1)
            .await
            .unwrap();
        assert_eq!(by_oid.len(), 1);
    }

    #[tokio::test]
    async fn test_find_respects_limit_and_order() {
        let store = MemoryStore::new("test");
        for n in 0..5 {
            store.insert_one("posts", doc! { "n": n }).await.unwrap();
        }
        let found = store.find("posts", doc! {}, 3).await.unwrap();
        let ns: Vec<i32> = found.iter().map(|d| d.get_i32("n").unwrap()).collect();
        assert_eq!(ns, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_list_collection_names() {
        let store = MemoryStore::new("test");
        assert!(store.list_collection_names().await.unwrap().is_empty());
        store.insert_one("blogpost", doc! {}).await.unwrap();
        store.insert_one("contactmessage", doc! {}).await.unwrap();
        assert_eq!(
            store.list_collection_names().await.unwrap(),
            vec!["blogpost".to_string(), "contactmessage".to_string()]
        );
    }
}
