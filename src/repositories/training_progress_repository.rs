use chrono::NaiveDate;
use serde_json::{Map, Value};
use std::sync::Arc;

use super::record_store::{
    decode, decode_all, encode, Collection, Filter, RecordStore, StoreResult, Update,
    MAX_PAGE_SIZE,
};
use crate::models::{TrainingProgress, TrainingStatus};

fn status_value(status: TrainingStatus) -> Value {
    serde_json::to_value(status).unwrap_or(Value::Null)
}

#[derive(Clone)]
pub struct TrainingProgressRepository {
    store: Arc<dyn RecordStore>,
}

impl TrainingProgressRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, progress: &TrainingProgress) -> StoreResult<()> {
        self.store
            .insert(Collection::TrainingProgress, encode(progress)?)
            .await
    }

    pub async fn find_by_id(&self, id: &str) -> StoreResult<Option<TrainingProgress>> {
        self.store
            .find_one(Collection::TrainingProgress, &Filter::by_id(id))
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn pair_exists(&self, driver_id: &str, module_id: &str) -> StoreResult<bool> {
        let existing = self
            .store
            .find_one(
                Collection::TrainingProgress,
                &Filter::new()
                    .eq("driver_id", driver_id)
                    .eq("module_id", module_id),
            )
            .await?;
        Ok(existing.is_some())
    }

    pub async fn find(
        &self,
        driver_id: Option<&str>,
        module_id: Option<&str>,
    ) -> StoreResult<Vec<TrainingProgress>> {
        let filter = Filter::new()
            .eq_opt("driver_id", driver_id)
            .eq_opt("module_id", module_id);
        let documents = self
            .store
            .find(Collection::TrainingProgress, &filter, MAX_PAGE_SIZE)
            .await?;
        decode_all(documents)
    }

    pub async fn find_by_driver(&self, driver_id: &str) -> StoreResult<Vec<TrainingProgress>> {
        self.find(Some(driver_id), None).await
    }

    pub async fn find_by_module(&self, module_id: &str) -> StoreResult<Vec<TrainingProgress>> {
        self.find(None, Some(module_id)).await
    }

    pub async fn count(&self) -> StoreResult<u64> {
        self.store
            .count(Collection::TrainingProgress, &Filter::new())
            .await
    }

    pub async fn count_completed(&self) -> StoreResult<u64> {
        self.store
            .count(
                Collection::TrainingProgress,
                &Filter::new().eq("status", status_value(TrainingStatus::Completed)),
            )
            .await
    }

    pub async fn count_completed_since(&self, since: NaiveDate) -> StoreResult<u64> {
        self.store
            .count(
                Collection::TrainingProgress,
                &Filter::new()
                    .eq("status", status_value(TrainingStatus::Completed))
                    .gte("completion_date", since.to_string()),
            )
            .await
    }

    /// `increment_attempts` suma 1 al contador en la misma escritura
    pub async fn update(
        &self,
        id: &str,
        fields: Map<String, Value>,
        increment_attempts: bool,
    ) -> StoreResult<bool> {
        let mut update = Update::set(fields);
        if increment_attempts {
            update = update.with_inc("attempts", 1);
        }
        self.store
            .update_one(Collection::TrainingProgress, id, update)
            .await
    }
}
