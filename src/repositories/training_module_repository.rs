use std::sync::Arc;

use super::record_store::{
    decode, decode_all, encode, Collection, Filter, RecordStore, StoreResult, MAX_PAGE_SIZE,
};
use crate::models::TrainingModule;

#[derive(Clone)]
pub struct TrainingModuleRepository {
    store: Arc<dyn RecordStore>,
}

impl TrainingModuleRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, module: &TrainingModule) -> StoreResult<()> {
        self.store
            .insert(Collection::TrainingModules, encode(module)?)
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<TrainingModule>> {
        self.store
            .find_one(Collection::TrainingModules, &Filter::by_id(id))
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn name_exists(&self, name: &str) -> StoreResult<bool> {
        let existing = self
            .store
            .find_one(Collection::TrainingModules, &Filter::new().eq("name", name))
            .await?;
        Ok(existing.is_some())
    }

    pub async fn find_all(&self) -> StoreResult<Vec<TrainingModule>> {
        let documents = self
            .store
            .find(Collection::TrainingModules, &Filter::new(), MAX_PAGE_SIZE)
            .await?;
        decode_all(documents)
    }

    pub async fn find_by_ids(&self, ids: Vec<String>) -> StoreResult<Vec<TrainingModule>> {
        let documents = self
            .store
            .find(
                Collection::TrainingModules,
                &Filter::new().one_of("id", ids),
                MAX_PAGE_SIZE,
            )
            .await?;
        decode_all(documents)
    }

    pub async fn find_mandatory(&self) -> StoreResult<Vec<TrainingModule>> {
        let documents = self
            .store
            .find(
                Collection::TrainingModules,
                &Filter::new().eq("is_mandatory", true),
                MAX_PAGE_SIZE,
            )
            .await?;
        decode_all(documents)
    }

    pub async fn count(&self) -> StoreResult<u64> {
        self.store
            .count(Collection::TrainingModules, &Filter::new())
            .await
    }
}
