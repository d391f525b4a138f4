use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{TrainingModule, TrainingModuleType, TrainingStatus};

fn default_required_score() -> u8 {
    80
}

fn default_mandatory() -> bool {
    true
}

// Request para crear un módulo de formación
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTrainingModuleRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: String,
    pub module_type: TrainingModuleType,
    #[validate(range(min = 0.0))]
    pub duration_hours: f64,
    #[serde(default = "default_required_score")]
    #[validate(range(min = 0, max = 100))]
    pub required_score: u8,
    #[serde(default = "default_mandatory")]
    pub is_mandatory: bool,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

// Response de la carga del catálogo por defecto
#[derive(Debug, Serialize, Deserialize)]
pub struct SeedModulesResponse {
    pub message: String,
    pub modules: Vec<TrainingModule>,
}

// Request para asignar un módulo a un conductor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProgressRequest {
    #[validate(length(min = 1))]
    pub driver_id: String,
    #[validate(length(min = 1))]
    pub module_id: String,
    #[serde(default)]
    pub status: TrainingStatus,
}

// Request para actualizar un progreso; solo se escriben los campos presentes
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProgressRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TrainingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 100))]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_notes: Option<String>,
}

// Filtros para listar progresos
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProgressFilters {
    pub driver_id: Option<String>,
    pub module_id: Option<String>,
}
