use chrono::{Duration, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::certification_dto::{CertificationFilters, CreateCertificationRequest};
use crate::models::certification::EXPIRING_SOON_DAYS;
use crate::models::{Certification, CertificationStatus, ExpiringCertification};
use crate::repositories::{CertificationRepository, DriverRepository, RecordStore};
use crate::utils::errors::AppResult;

pub struct CertificationController {
    repository: CertificationRepository,
    drivers: DriverRepository,
}

impl CertificationController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repository: CertificationRepository::new(store.clone()),
            drivers: DriverRepository::new(store),
        }
    }

    pub async fn create(&self, request: CreateCertificationRequest) -> AppResult<Certification> {
        request.validate()?;

        let now = Utc::now();
        let certification = Certification {
            id: Uuid::new_v4().to_string(),
            driver_id: request.driver_id,
            certification_name: request.certification_name,
            certification_type: request.certification_type,
            issue_date: request.issue_date,
            expiry_date: request.expiry_date,
            issuing_authority: request.issuing_authority,
            certificate_number: request.certificate_number,
            status: CertificationStatus::derive(request.expiry_date, now.date_naive()),
            created_at: now,
            updated_at: now,
        };

        self.repository.create(&certification).await?;
        info!(
            "📜 Certificación {} registrada para el conductor {}",
            certification.certification_name, certification.driver_id
        );
        Ok(certification)
    }

    pub async fn list(&self, filters: CertificationFilters) -> AppResult<Vec<Certification>> {
        let today = Utc::now().date_naive();
        let certifications = self.repository.find(filters.driver_id.as_deref()).await?;
        Ok(certifications
            .into_iter()
            .map(|c| c.with_current_status(today))
            .collect())
    }

    /// Vencidas o por vencer en 30 días, con el nombre del conductor.
    /// Se omiten las certificaciones cuyo conductor ya no existe.
    pub async fn list_expiring(&self) -> AppResult<Vec<ExpiringCertification>> {
        let today = Utc::now().date_naive();
        let certifications = self
            .repository
            .find_expiring_until(today + Duration::days(EXPIRING_SOON_DAYS))
            .await?;

        let driver_ids: Vec<String> = certifications
            .iter()
            .map(|c| c.driver_id.clone())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let driver_names: HashMap<String, String> = if driver_ids.is_empty() {
            HashMap::new()
        } else {
            self.drivers
                .find_by_ids(driver_ids)
                .await?
                .into_iter()
                .map(|d| (d.id.clone(), d.full_name()))
                .collect()
        };

        Ok(certifications
            .into_iter()
            .filter_map(|certification| {
                let driver_name = driver_names.get(&certification.driver_id)?.clone();
                Some(ExpiringCertification {
                    certification: certification.with_current_status(today),
                    driver_name,
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::driver_controller::DriverController;
    use crate::dto::driver_dto::CreateDriverRequest;
    use crate::models::LicenseClass;
    use crate::repositories::MemoryRecordStore;
    use chrono::NaiveDate;

    fn certification_for(driver_id: &str, expiry_offset_days: i64) -> CreateCertificationRequest {
        let today = Utc::now().date_naive();
        CreateCertificationRequest {
            driver_id: driver_id.to_string(),
            certification_name: "DOT Physical".to_string(),
            certification_type: "Medical".to_string(),
            issue_date: today - Duration::days(365),
            expiry_date: today + Duration::days(expiry_offset_days),
            issuing_authority: "DOT Medical Examiner".to_string(),
            certificate_number: format!("DOT-{}", expiry_offset_days),
        }
    }

    async fn create_driver(store: Arc<dyn RecordStore>) -> String {
        let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        DriverController::new(store)
            .create(CreateDriverRequest {
                employee_id: "EMP042".to_string(),
                first_name: "Maria".to_string(),
                last_name: "Lopez".to_string(),
                email: "maria@test.com".to_string(),
                phone: "555-0100".to_string(),
                hire_date: date(2023, 3, 1),
                license_number: "DL42".to_string(),
                license_class: LicenseClass::CdlClassB,
                license_expiry: date(2099, 1, 1),
                date_of_birth: date(1990, 7, 7),
                address: "42 Road".to_string(),
                emergency_contact_name: "Luis Lopez".to_string(),
                emergency_contact_phone: "555-0101".to_string(),
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_status_is_derived_on_create_and_list() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let controller = CertificationController::new(store);

        let soon = controller.create(certification_for("d1", 10)).await.unwrap();
        assert_eq!(soon.status, CertificationStatus::ExpiringSoon);

        let expired = controller.create(certification_for("d1", -5)).await.unwrap();
        assert_eq!(expired.status, CertificationStatus::Expired);

        let active = controller.create(certification_for("d1", 90)).await.unwrap();
        assert_eq!(active.status, CertificationStatus::Active);

        let listed = controller.list(CertificationFilters::default()).await.unwrap();
        assert_eq!(listed.len(), 3);
        for certification in listed {
            let expected = if certification.id == soon.id {
                CertificationStatus::ExpiringSoon
            } else if certification.id == expired.id {
                CertificationStatus::Expired
            } else {
                CertificationStatus::Active
            };
            assert_eq!(certification.status, expected);
        }
    }

    #[tokio::test]
    async fn test_expiring_list_joins_driver_names() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let driver_id = create_driver(store.clone()).await;
        let controller = CertificationController::new(store);

        let soon = controller.create(certification_for(&driver_id, 10)).await.unwrap();
        controller.create(certification_for(&driver_id, 90)).await.unwrap();
        controller.create(certification_for("ghost-driver", 3)).await.unwrap();

        let expiring = controller.list_expiring().await.unwrap();
        assert_eq!(expiring.len(), 1);
        assert_eq!(expiring[0].certification.id, soon.id);
        assert_eq!(expiring[0].driver_name, "Maria Lopez");
        assert_eq!(expiring[0].certification.status, CertificationStatus::ExpiringSoon);
    }

    #[tokio::test]
    async fn test_list_by_driver() {
        let store: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
        let controller = CertificationController::new(store);
        controller.create(certification_for("d1", 10)).await.unwrap();
        controller.create(certification_for("d2", 10)).await.unwrap();

        let only_d1 = controller
            .list(CertificationFilters {
                driver_id: Some("d1".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(only_d1.len(), 1);
        assert_eq!(only_d1[0].driver_id, "d1");
    }
}
