use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::dto::training_dto::{CreateTrainingModuleRequest, SeedModulesResponse};
use crate::models::TrainingModule;
use crate::repositories::{RecordStore, TrainingModuleRepository};
use crate::services::module_catalog::{CatalogModule, DEFAULT_MODULES};
use crate::utils::errors::{not_found_error, AppResult};

pub struct TrainingModuleController {
    repository: TrainingModuleRepository,
}

impl TrainingModuleController {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            repository: TrainingModuleRepository::new(store),
        }
    }

    /// La unicidad del nombre solo se aplica en `seed_defaults`
    pub async fn create(&self, request: CreateTrainingModuleRequest) -> AppResult<TrainingModule> {
        request.validate()?;

        let now = Utc::now();
        let module = TrainingModule {
            id: Uuid::new_v4().to_string(),
            name: request.name,
            description: request.description,
            module_type: request.module_type,
            duration_hours: request.duration_hours,
            required_score: request.required_score,
            is_mandatory: request.is_mandatory,
            prerequisites: request.prerequisites,
            created_at: now,
            updated_at: now,
        };

        self.repository.create(&module).await?;
        info!("📚 Módulo creado: {} ({})", module.name, module.id);
        Ok(module)
    }

    pub async fn list(&self) -> AppResult<Vec<TrainingModule>> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn get_by_id(&self, id: &str) -> AppResult<TrainingModule> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Training module"))
    }

    /// Inserta los módulos del catálogo cuyo nombre todavía no existe
    pub async fn seed_defaults(&self) -> AppResult<SeedModulesResponse> {
        let mut created = Vec::new();

        for entry in DEFAULT_MODULES.iter() {
            if self.repository.name_exists(entry.name).await? {
                continue;
            }
            let module = catalog_module(entry);
            self.repository.create(&module).await?;
            created.push(module);
        }

        info!("📚 Catálogo inicializado: {} módulos nuevos", created.len());
        Ok(SeedModulesResponse {
            message: format!("Created {} default training modules", created.len()),
            modules: created,
        })
    }
}

fn catalog_module(entry: &CatalogModule) -> TrainingModule {
    let now = Utc::now();
    TrainingModule {
        id: Uuid::new_v4().to_string(),
        name: entry.name.to_string(),
        description: entry.description.to_string(),
        module_type: entry.module_type,
        duration_hours: entry.duration_hours,
        required_score: entry.required_score,
        is_mandatory: entry.is_mandatory,
        prerequisites: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}
