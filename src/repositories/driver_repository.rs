use serde_json::{Map, Value};
use std::sync::Arc;

use super::record_store::{
    decode, decode_all, encode, Collection, Filter, RecordStore, StoreResult, Update,
    MAX_PAGE_SIZE,
};
use crate::models::Driver;

#[derive(Clone)]
pub struct DriverRepository {
    store: Arc<dyn RecordStore>,
}

impl DriverRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    fn active() -> Filter {
        Filter::new().eq("is_active", true)
    }

    pub async fn create(&self, driver: &Driver) -> StoreResult<()> {
        self.store.insert(Collection::Drivers, encode(driver)?).await
    }

    /// Busca sin importar el borrado lógico
    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<Driver>> {
        self.store
            .find_one(Collection::Drivers, &Filter::by_id(id))
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn find_active_by_id(&self, id: &str) -> StoreResult<Option<Driver>> {
        self.store
            .find_one(Collection::Drivers, &Self::active().eq("id", id))
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn find_active(&self) -> StoreResult<Vec<Driver>> {
        let documents = self
            .store
            .find(Collection::Drivers, &Self::active(), MAX_PAGE_SIZE)
            .await?;
        decode_all(documents)
    }

    pub async fn find_by_ids(&self, ids: Vec<String>) -> StoreResult<Vec<Driver>> {
        let documents = self
            .store
            .find(Collection::Drivers, &Filter::new().one_of("id", ids), MAX_PAGE_SIZE)
            .await?;
        decode_all(documents)
    }

    pub async fn count_active(&self) -> StoreResult<u64> {
        self.store.count(Collection::Drivers, &Self::active()).await
    }

    pub async fn update(&self, id: &str, fields: Map<String, Value>) -> StoreResult<bool> {
        self.store
            .update_one(Collection::Drivers, id, Update::set(fields))
            .await
    }
}
