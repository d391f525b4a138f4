//! Modelos de formación
//!
//! Módulos de formación y el progreso de cada conductor en ellos.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Categoría de un módulo de formación
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TrainingModuleType {
    Safety,
    DefensiveDriving,
    VehicleInspection,
    Hazmat,
    BackingManeuvers,
    CargoHandling,
    HoursOfService,
    FatigueManagement,
}

/// Estado del progreso de un conductor en un módulo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrainingStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    Expired,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingModule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub module_type: TrainingModuleType,
    pub duration_hours: f64,
    /// Puntuación mínima para aprobar (sobre 100)
    pub required_score: u8,
    #[serde(default = "default_mandatory")]
    pub is_mandatory: bool,
    /// Ids de módulos previos, en orden
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub updated_at: DateTime<Utc>,
}

fn default_mandatory() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainingProgress {
    pub id: String,
    pub driver_id: String,
    pub module_id: String,
    pub status: TrainingStatus,
    pub start_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
    pub score: Option<u8>,
    #[serde(default)]
    pub attempts: u32,
    pub instructor_notes: Option<String>,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl TrainingProgress {
    pub fn is_completed(&self) -> bool {
        self.status == TrainingStatus::Completed
    }
}
