//! Backend en memoria del almacén de documentos
//!
//! Implementa el mismo contrato que el backend PostgreSQL sobre un mapa
//! protegido por `RwLock`. Se usa en tests y con `STORE_BACKEND=memory`.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::record_store::{
    document_id, unique_key_of, Collection, Document, Filter, RecordStore, StoreError,
    StoreResult, Update,
};

#[derive(Default)]
pub struct MemoryRecordStore {
    collections: RwLock<HashMap<Collection, HashMap<String, Document>>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, collection: Collection, document: Document) -> StoreResult<()> {
        let id = document_id(&document)?.to_string();
        let mut collections = self.collections.write().await;
        let documents = collections.entry(collection).or_default();

        if documents.contains_key(&id) {
            return Err(StoreError::Duplicate {
                collection: collection.as_str(),
                key: id,
            });
        }

        if let Some(key) = unique_key_of(collection, &document) {
            let taken = documents
                .values()
                .any(|existing| unique_key_of(collection, existing).as_ref() == Some(&key));
            if taken {
                return Err(StoreError::Duplicate {
                    collection: collection.as_str(),
                    key: Value::Array(key).to_string(),
                });
            }
        }

        documents.insert(id, document);
        Ok(())
    }

    async fn find_one(
        &self,
        collection: Collection,
        filter: &Filter,
    ) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|documents| documents.values().find(|doc| filter.matches(doc)).cloned()))
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: usize,
    ) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let mut matching: Vec<&Document> = collections
            .get(&collection)
            .map(|documents| documents.values().filter(|doc| filter.matches(doc)).collect())
            .unwrap_or_default();

        // mismo orden que el backend PostgreSQL: creación y después id
        matching.sort_by(|a, b| {
            let key = |doc: &Document| {
                (
                    doc.get("created_at").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                    doc.get("id").and_then(|v| v.as_str()).unwrap_or("").to_string(),
                )
            };
            key(a).cmp(&key(b))
        });

        Ok(matching.into_iter().take(limit).cloned().collect())
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> StoreResult<u64> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|documents| documents.values().filter(|doc| filter.matches(doc)).count() as u64)
            .unwrap_or(0))
    }

    async fn update_one(
        &self,
        collection: Collection,
        id: &str,
        update: Update,
    ) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;
        match collections
            .get_mut(&collection)
            .and_then(|documents| documents.get_mut(id))
        {
            Some(document) => {
                update.apply_to(document)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn close(&self) {
        self.collections.write().await.clear();
    }
}
