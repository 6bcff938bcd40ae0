//! Document store abstraction behind the Remote backend
//!
//! The Remote backend only needs a handful of primitives from a hosted
//! document database: keyed JSON documents grouped in named collections, an
//! equality filter for listing, and atomic array union/remove on a single
//! field. Any provider exposing those can sit behind `DocumentStore`.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{LedgerError, LedgerResult};

/// A JSON object stored under a key
pub type Document = Map<String, Value>;

/// A document together with its store-assigned key
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub key: String,
    pub data: Document,
}

/// Field equality filter for `DocumentStore::list`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub equals: Value,
}

impl FieldFilter {
    /// Match documents whose `field` equals `value`
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            equals: value.into(),
        }
    }

    fn matches(&self, doc: &Document) -> bool {
        doc.get(&self.field) == Some(&self.equals)
    }
}

/// Durable keyed-document storage
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert `doc` under a freshly generated key and return the key
    async fn create(&self, collection: &str, doc: Document) -> LedgerResult<String>;

    /// Fetch one document
    async fn get(&self, collection: &str, key: &str) -> LedgerResult<Option<Document>>;

    /// Every document in `collection`, optionally filtered
    async fn list(
        &self,
        collection: &str,
        filter: Option<&FieldFilter>,
    ) -> LedgerResult<Vec<StoredDocument>>;

    /// Create or replace the document under `key`
    async fn set(&self, collection: &str, key: &str, doc: Document) -> LedgerResult<()>;

    /// Delete a document; deleting a missing key succeeds
    async fn delete(&self, collection: &str, key: &str) -> LedgerResult<()>;

    /// Atomically append `value` to the array `field` unless already present
    ///
    /// Fails if the document does not exist.
    async fn array_union(
        &self,
        collection: &str,
        key: &str,
        field: &str,
        value: Value,
    ) -> LedgerResult<()>;

    /// Atomically remove every occurrence of `value` from the array `field`
    ///
    /// Fails if the document does not exist.
    async fn array_remove(
        &self,
        collection: &str,
        key: &str,
        field: &str,
        value: Value,
    ) -> LedgerResult<()>;
}

type Collections = HashMap<String, BTreeMap<String, Document>>;

/// Document store held in process memory
#[derive(Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<Collections>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in `collection`
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    async fn update_array<F>(
        &self,
        collection: &str,
        key: &str,
        field: &str,
        edit: F,
    ) -> LedgerResult<()>
    where
        F: FnOnce(&mut Vec<Value>) + Send,
    {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(key))
            .ok_or_else(|| {
                LedgerError::Remote(format!("No document {collection}/{key} to update"))
            })?;

        let entry = doc
            .entry(field.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if !entry.is_array() {
            *entry = Value::Array(Vec::new());
        }
        if let Value::Array(items) = entry {
            edit(items);
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn create(&self, collection: &str, doc: Document) -> LedgerResult<String> {
        let key = Uuid::new_v4().simple().to_string();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(key.clone(), doc);
        Ok(key)
    }

    async fn get(&self, collection: &str, key: &str) -> LedgerResult<Option<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    async fn list(
        &self,
        collection: &str,
        filter: Option<&FieldFilter>,
    ) -> LedgerResult<Vec<StoredDocument>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .iter()
            .filter(|(_, doc)| filter.map_or(true, |f| f.matches(doc)))
            .map(|(key, doc)| StoredDocument {
                key: key.clone(),
                data: doc.clone(),
            })
            .collect())
    }

    async fn set(&self, collection: &str, key: &str, doc: Document) -> LedgerResult<()> {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), doc);
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> LedgerResult<()> {
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.remove(key);
        }
        Ok(())
    }

    async fn array_union(
        &self,
        collection: &str,
        key: &str,
        field: &str,
        value: Value,
    ) -> LedgerResult<()> {
        self.update_array(collection, key, field, |items| {
            if !items.contains(&value) {
                items.push(value);
            }
        })
        .await
    }

    async fn array_remove(
        &self,
        collection: &str,
        key: &str,
        field: &str,
        value: Value,
    ) -> LedgerResult<()> {
        self.update_array(collection, key, field, |items| {
            items.retain(|item| item != &value);
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[tokio::test]
    async fn test_create_get_delete() {
        let store = InMemoryDocumentStore::new();
        let key = store.create("groups", doc(json!({"name": "Lisbon"}))).await.unwrap();

        let fetched = store.get("groups", &key).await.unwrap().unwrap();
        assert_eq!(fetched["name"], "Lisbon");

        store.delete("groups", &key).await.unwrap();
        store.delete("groups", &key).await.unwrap();
        assert!(store.get("groups", &key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_with_filter() {
        let store = InMemoryDocumentStore::new();
        store.create("expenses", doc(json!({"groupId": "g1"}))).await.unwrap();
        store.create("expenses", doc(json!({"groupId": "g2"}))).await.unwrap();
        store.create("expenses", doc(json!({"groupId": "g1"}))).await.unwrap();

        let filter = FieldFilter::new("groupId", "g1");
        assert_eq!(store.list("expenses", Some(&filter)).await.unwrap().len(), 2);
        assert_eq!(store.list("expenses", None).await.unwrap().len(), 3);
        assert!(store.list("missing", None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_array_union_and_remove() {
        let store = InMemoryDocumentStore::new();
        store.set("groups", "g1", doc(json!({"members": ["Ana"]}))).await.unwrap();

        store.array_union("groups", "g1", "members", json!("Luis")).await.unwrap();
        store.array_union("groups", "g1", "members", json!("Ana")).await.unwrap();
        let members = store.get("groups", "g1").await.unwrap().unwrap()["members"].clone();
        assert_eq!(members, json!(["Ana", "Luis"]));

        store.array_remove("groups", "g1", "members", json!("Ana")).await.unwrap();
        let members = store.get("groups", "g1").await.unwrap().unwrap()["members"].clone();
        assert_eq!(members, json!(["Luis"]));
    }

    #[tokio::test]
    async fn test_array_ops_on_missing_document_fail() {
        let store = InMemoryDocumentStore::new();
        let err = store
            .array_union("groups", "nope", "members", json!("Ana"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Remote(_)));
    }

    #[tokio::test]
    async fn test_array_union_replaces_non_array_field() {
        let store = InMemoryDocumentStore::new();
        store.set("groups", "g1", doc(json!({"members": "broken"}))).await.unwrap();
        store.array_union("groups", "g1", "members", json!("Ana")).await.unwrap();
        let members = store.get("groups", "g1").await.unwrap().unwrap()["members"].clone();
        assert_eq!(members, json!(["Ana"]));
    }
}
