use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::driver_dto::{CreateDriverRequest, UpdateDriverRequest};
use crate::models::{timestamp, Driver};
use crate::repositories::{DriverRepository, RecordStore};
use crate::utils::errors::{not_found_error, AppResult};
use crate::utils::patch::changed_fields_stamped;

pub struct DriverController {
    repository: DriverRepository,
}

impl DriverController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repository: DriverRepository::new(store),
        }
    }

    pub async fn create(&self, request: CreateDriverRequest) -> AppResult<Driver> {
        request.validate()?;

        let now = Utc::now();
        let driver = Driver {
            id: Uuid::new_v4().to_string(),
            employee_id: request.employee_id,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            hire_date: request.hire_date,
            license_number: request.license_number,
            license_class: request.license_class,
            license_expiry: request.license_expiry,
            date_of_birth: request.date_of_birth,
            address: request.address,
            emergency_contact_name: request.emergency_contact_name,
            emergency_contact_phone: request.emergency_contact_phone,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.repository.create(&driver).await?;
        info!("👤 Conductor creado: {} ({})", driver.full_name(), driver.id);
        Ok(driver)
    }

    pub async fn list_active(&self) -> AppResult<Vec<Driver>> {
        Ok(self.repository.find_active().await?)
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<Driver> {
        self.repository
            .find_active_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Driver"))
    }

    /// La actualización no filtra por `is_active`: también reactiva conductores
    pub async fn update(&self, id: &str, request: UpdateDriverRequest) -> AppResult<Driver> {
        request.validate()?;

        let fields = changed_fields_stamped(&request)?;
        if !self.repository.update(id, fields).await? {
            return Err(not_found_error("Driver"));
        }

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Driver"))
    }

    /// Borrado lógico
    pub async fn deactivate(&self, id: &str) -> AppResult<()> {
        let mut fields = serde_json::Map::new();
        fields.insert("is_active".to_string(), Value::Bool(false));
        fields.insert("updated_at".to_string(), Value::from(timestamp::format(&Utc::now())));

        if !self.repository.update(id, fields).await? {
            return Err(not_found_error("Driver"));
        }

        info!("🗑️ Conductor desactivado: {}", id);
        Ok(())
    }
}
