use chrono::NaiveDate;
use std::sync::Arc;

use super::record_store::{
    decode_all, encode, Collection, Filter, RecordStore, StoreResult, MAX_PAGE_SIZE,
};
use crate::models::Certification;

#[derive(Clone)]
pub struct CertificationRepository {
    store: Arc<dyn RecordStore>,
}

impl CertificationRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, certification: &Certification) -> StoreResult<()> {
        self.store
            .insert(Collection::Certifications, encode(certification)?)
            .await
    }

    pub async fn find(&self, driver_id: Option<&str>) -> StoreResult<Vec<Certification>> {
        let documents = self
            .store
            .find(
                Collection::Certifications,
                &Filter::new().eq_opt("driver_id", driver_id),
                MAX_PAGE_SIZE,
            )
            .await?;
        decode_all(documents)
    }

    /// Certificaciones con vencimiento hasta `until` (incluye las ya vencidas)
    pub async fn find_expiring_until(&self, until: NaiveDate) -> StoreResult<Vec<Certification>> {
        let documents = self
            .store
            .find(
                Collection::Certifications,
                &Filter::new().lte("expiry_date", until.to_string()),
                MAX_PAGE_SIZE,
            )
            .await?;
        decode_all(documents)
    }

    pub async fn count_expired(&self, today: NaiveDate) -> StoreResult<u64> {
        self.store
            .count(
                Collection::Certifications,
                &Filter::new().lt("expiry_date", today.to_string()),
            )
            .await
    }

    pub async fn count_expiring_between(
        &self,
        from: NaiveDate,
        until: NaiveDate,
    ) -> StoreResult<u64> {
        self.store
            .count(
                Collection::Certifications,
                &Filter::new()
                    .gte("expiry_date", from.to_string())
                    .lte("expiry_date", until.to_string()),
            )
            .await
    }
}
