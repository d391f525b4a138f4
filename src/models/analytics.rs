//! Modelos de Analytics
//!
//! Este módulo contiene los modelos de los reportes: resumen del dashboard,
//! analytics por conductor y por módulo, y el reporte de cumplimiento.

use serde::{Deserialize, Serialize};

use super::{Certification, Driver, TrainingModule, TrainingProgress};

/// Resumen para dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    pub total_drivers: u64,
    pub active_drivers: u64,
    pub total_training_modules: u64,
    /// Certificaciones vencidas (se cuentan certificaciones, no conductores)
    pub drivers_with_expired_certifications: u64,
    /// Certificaciones que vencen en los próximos 30 días
    pub drivers_with_expiring_certifications: u64,
    pub overall_completion_rate: f64,
    pub recent_completions: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrainingStats {
    pub total_assigned: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    pub failed: usize,
    pub completion_rate: f64,
    pub average_score: f64,
}

/// Registro de progreso con el nombre de su módulo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressDetail {
    #[serde(flatten)]
    pub progress: TrainingProgress,
    pub module_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverProgressAnalytics {
    pub driver: Driver,
    pub training_stats: TrainingStats,
    pub progress_details: Vec<ProgressDetail>,
    pub certifications: Vec<Certification>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModuleStats {
    pub total_assigned: usize,
    pub completed: usize,
    pub completion_rate: f64,
    pub average_score: f64,
    pub average_attempts: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulePerformance {
    pub module: TrainingModule,
    pub stats: ModuleStats,
    /// Puntuaciones de los registros completados
    pub performance_distribution: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LicenseStatus {
    Valid,
    Expired,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ComplianceStatus {
    Compliant,
    #[serde(rename = "Non-Compliant")]
    NonCompliant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub driver: Driver,
    /// Formato "completados/total"
    pub mandatory_training_completion: String,
    pub expired_certifications: usize,
    pub license_status: LicenseStatus,
    pub compliance_status: ComplianceStatus,
}
