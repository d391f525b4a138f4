use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::training_dto::{CreateProgressRequest, ProgressFilters, UpdateProgressRequest};
use crate::models::{TrainingProgress, TrainingStatus};
use crate::repositories::{RecordStore, StoreError, TrainingProgressRepository};
use crate::utils::errors::{conflict_error, not_found_error, AppResult};
use crate::utils::patch::changed_fields_stamped;

const DUPLICATE_PAIR_MESSAGE: &str =
    "Training progress already exists for this driver-module combination";

/// Fechas automáticas al cambiar de estado, solo si el cliente no las envió
pub fn apply_status_side_effects(
    mut request: UpdateProgressRequest,
    today: NaiveDate,
) -> UpdateProgressRequest {
    match request.status {
        Some(TrainingStatus::Completed) if request.completion_date.is_none() => {
            request.completion_date = Some(today);
        }
        Some(TrainingStatus::InProgress) if request.start_date.is_none() => {
            request.start_date = Some(today);
        }
        _ => {}
    }
    request
}

pub struct TrainingProgressController {
    repository: TrainingProgressRepository,
}

impl TrainingProgressController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repository: TrainingProgressRepository::new(store),
        }
    }

    pub async fn create(&self, request: CreateProgressRequest) -> AppResult<TrainingProgress> {
        request.validate()?;

        if self
            .repository
            .pair_exists(&request.driver_id, &request.module_id)
            .await?
        {
            return Err(conflict_error(DUPLICATE_PAIR_MESSAGE));
        }

        let now = Utc::now();
        let progress = TrainingProgress {
            id: Uuid::new_v4().to_string(),
            driver_id: request.driver_id,
            module_id: request.module_id,
            status: request.status,
            start_date: None,
            completion_date: None,
            score: None,
            attempts: 0,
            instructor_notes: None,
            created_at: now,
            updated_at: now,
        };

        // el índice único del store cubre la carrera entre la comprobación y la escritura
        match self.repository.create(&progress).await {
            Ok(()) => {}
            Err(StoreError::Duplicate { .. }) => {
                warn!(
                    "⚠️ Progreso duplicado detectado por el store: {}/{}",
                    progress.driver_id, progress.module_id
                );
                return Err(conflict_error(DUPLICATE_PAIR_MESSAGE));
            }
            Err(e) => return Err(e.into()),
        }

        info!(
            "📝 Módulo {} asignado al conductor {}",
            progress.module_id, progress.driver_id
        );
        Ok(progress)
    }

    pub async fn list(&self, filters: ProgressFilters) -> AppResult<Vec<TrainingProgress>> {
        Ok(self
            .repository
            .find(filters.driver_id.as_deref(), filters.module_id.as_deref())
            .await?)
    }

    /// Cada actualización que trae `status` suma un intento, aunque el estado no cambie
    pub async fn update(
        &self,
        id: &str,
        request: UpdateProgressRequest,
    ) -> AppResult<TrainingProgress> {
        request.validate()?;

        let request = apply_status_side_effects(request, Utc::now().date_naive());
        let increment_attempts = request.status.is_some();
        let fields = changed_fields_stamped(&request)?;

        if !self
            .repository
            .update(id, fields, increment_attempts)
            .await?
        {
            return Err(not_found_error("Training progress"));
        }

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Training progress"))
    }
}
