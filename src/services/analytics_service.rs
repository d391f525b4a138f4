//! Servicio de analytics y reportes
//!
//! Compone lecturas de varias colecciones y calcula las métricas en memoria.
//! Las lecturas independientes se lanzan en paralelo; no hay aislamiento
//! de snapshot entre ellas. Los cálculos son funciones puras sobre los
//! registros ya leídos.

use chrono::{Duration, NaiveDate, Utc};
use futures::future::try_join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::debug;

use crate::models::analytics::{
    ComplianceRecord, ComplianceStatus, DashboardSummary, DriverProgressAnalytics,
    LicenseStatus, ModulePerformance, ModuleStats, ProgressDetail, TrainingStats,
};
use crate::models::certification::EXPIRING_SOON_DAYS;
use crate::models::{Certification, Driver, TrainingModule, TrainingProgress, TrainingStatus};
use crate::repositories::{
    CertificationRepository, DriverRepository, RecordStore, StoreError,
    TrainingModuleRepository, TrainingProgressRepository,
};
use crate::utils::errors::{not_found_error, AppResult};

/// Ventana de "completados recientemente" del dashboard
pub const RECENT_COMPLETION_DAYS: i64 = 30;

pub const UNKNOWN_MODULE_NAME: &str = "Unknown Module";

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / total * 100` redondeado; 0 si no hay total
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round2(part as f64 / total as f64 * 100.0)
    }
}

fn average<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0u64), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        round2(sum / count as f64)
    }
}

fn count_status(progress: &[TrainingProgress], status: TrainingStatus) -> usize {
    progress.iter().filter(|p| p.status == status).count()
}

/// Puntuaciones de los registros completados que tienen nota
fn completed_scores(progress: &[TrainingProgress]) -> Vec<u8> {
    progress
        .iter()
        .filter(|p| p.is_completed())
        .filter_map(|p| p.score)
        .collect()
}

pub fn training_stats(progress: &[TrainingProgress]) -> TrainingStats {
    let total_assigned = progress.len();
    let completed = count_status(progress, TrainingStatus::Completed);

    TrainingStats {
        total_assigned,
        completed,
        in_progress: count_status(progress, TrainingStatus::InProgress),
        not_started: count_status(progress, TrainingStatus::NotStarted),
        failed: count_status(progress, TrainingStatus::Failed),
        completion_rate: percentage(completed as u64, total_assigned as u64),
        average_score: average(completed_scores(progress).into_iter().map(f64::from)),
    }
}

pub fn progress_details(
    progress: Vec<TrainingProgress>,
    modules: &HashMap<String, TrainingModule>,
) -> Vec<ProgressDetail> {
    progress
        .into_iter()
        .map(|p| {
            let module_name = modules
                .get(&p.module_id)
                .map(|m| m.name.clone())
                .unwrap_or_else(|| UNKNOWN_MODULE_NAME.to_string());
            ProgressDetail {
                progress: p,
                module_name,
            }
        })
        .collect()
}

/// Estadísticas de un módulo y la distribución de notas de los completados.
/// Los intentos en 0 cuentan como "sin intentos registrados".
pub fn module_stats(progress: &[TrainingProgress]) -> (ModuleStats, Vec<u8>) {
    if progress.is_empty() {
        return (ModuleStats::default(), Vec::new());
    }

    let total_assigned = progress.len();
    let completed = count_status(progress, TrainingStatus::Completed);
    let scores = completed_scores(progress);

    let stats = ModuleStats {
        total_assigned,
        completed,
        completion_rate: percentage(completed as u64, total_assigned as u64),
        average_score: average(scores.iter().copied().map(f64::from)),
        average_attempts: average(
            progress
                .iter()
                .filter(|p| p.attempts > 0)
                .map(|p| f64::from(p.attempts)),
        ),
    };
    (stats, scores)
}

/// Cumplimiento de un conductor. Los vencimientos se comparan directamente
/// con `today`, sin pasar por el estado derivado de la certificación.
pub fn driver_compliance(
    driver: Driver,
    progress: &[TrainingProgress],
    certifications: &[Certification],
    mandatory_module_ids: &HashSet<String>,
    today: NaiveDate,
) -> ComplianceRecord {
    let completed_mandatory = progress
        .iter()
        .filter(|p| p.is_completed() && mandatory_module_ids.contains(&p.module_id))
        .count();
    let total_mandatory = mandatory_module_ids.len();

    let expired_certifications = certifications
        .iter()
        .filter(|c| c.is_expired(today))
        .count();
    let license_expired = driver.license_expired(today);

    let compliance_status = if expired_certifications > 0
        || license_expired
        || completed_mandatory < total_mandatory
    {
        ComplianceStatus::NonCompliant
    } else {
        ComplianceStatus::Compliant
    };

    ComplianceRecord {
        driver,
        mandatory_training_completion: format!("{}/{}", completed_mandatory, total_mandatory),
        expired_certifications,
        license_status: if license_expired {
            LicenseStatus::Expired
        } else {
            LicenseStatus::Valid
        },
        compliance_status,
    }
}

fn distinct_module_ids(progress: &[TrainingProgress]) -> Vec<String> {
    progress
        .iter()
        .map(|p| p.module_id.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect()
}

pub struct AnalyticsService {
    drivers: DriverRepository,
    modules: TrainingModuleRepository,
    progress: TrainingProgressRepository,
    certifications: CertificationRepository,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            drivers: DriverRepository::new(store.clone()),
            modules: TrainingModuleRepository::new(store.clone()),
            progress: TrainingProgressRepository::new(store.clone()),
            certifications: CertificationRepository::new(store),
        }
    }

    pub async fn dashboard_summary(&self) -> AppResult<DashboardSummary> {
        let today = Utc::now().date_naive();
        let expiring_until = today + Duration::days(EXPIRING_SOON_DAYS);
        let recent_since = today - Duration::days(RECENT_COMPLETION_DAYS);

        let (active_drivers, total_modules, expired, expiring, total_progress, completed, recent) =
            tokio::try_join!(
                self.drivers.count_active(),
                self.modules.count(),
                self.certifications.count_expired(today),
                self.certifications.count_expiring_between(today, expiring_until),
                self.progress.count(),
                self.progress.count_completed(),
                self.progress.count_completed_since(recent_since),
            )?;

        Ok(DashboardSummary {
            total_drivers: active_drivers,
            active_drivers,
            total_training_modules: total_modules,
            drivers_with_expired_certifications: expired,
            drivers_with_expiring_certifications: expiring,
            overall_completion_rate: percentage(completed, total_progress),
            recent_completions: recent,
        })
    }

    pub async fn driver_progress(&self, driver_id: &str) -> AppResult<DriverProgressAnalytics> {
        let today = Utc::now().date_naive();
        let driver = self
            .drivers
            .find_active_by_id(driver_id)
            .await?
            .ok_or_else(|| not_found_error("Driver"))?;

        let (progress, certifications) = tokio::try_join!(
            self.progress.find_by_driver(driver_id),
            self.certifications.find(Some(driver_id)),
        )?;

        let module_ids = distinct_module_ids(&progress);
        let modules: HashMap<String, TrainingModule> = if module_ids.is_empty() {
            HashMap::new()
        } else {
            self.modules
                .find_by_ids(module_ids)
                .await?
                .into_iter()
                .map(|m| (m.id.clone(), m))
                .collect()
        };

        debug!(
            "📊 Analytics del conductor {}: {} registros, {} módulos",
            driver_id,
            progress.len(),
            modules.len()
        );

        Ok(DriverProgressAnalytics {
            driver,
            training_stats: training_stats(&progress),
            progress_details: progress_details(progress, &modules),
            certifications: certifications
                .into_iter()
                .map(|c| c.with_current_status(today))
                .collect(),
        })
    }

    pub async fn module_performance(&self, module_id: &str) -> AppResult<ModulePerformance> {
        let module = self
            .modules
            .find_by_id(module_id)
            .await?
            .ok_or_else(|| not_found_error("Training module"))?;

        let progress = self.progress.find_by_module(module_id).await?;
        let (stats, performance_distribution) = module_stats(&progress);

        Ok(ModulePerformance {
            module,
            stats,
            performance_distribution,
        })
    }

    pub async fn compliance_report(&self) -> AppResult<Vec<ComplianceRecord>> {
        let today = Utc::now().date_naive();
        let (drivers, mandatory) =
            tokio::try_join!(self.drivers.find_active(), self.modules.find_mandatory())?;

        let mandatory_ids: HashSet<String> = mandatory.into_iter().map(|m| m.id).collect();
        let mandatory_ids = &mandatory_ids;
        let progress_repository = &self.progress;
        let certification_repository = &self.certifications;

        let records = try_join_all(drivers.into_iter().map(|driver| async move {
            let (progress, certifications) = tokio::try_join!(
                progress_repository.find_by_driver(&driver.id),
                certification_repository.find(Some(&driver.id)),
            )?;
            Ok::<_, StoreError>(driver_compliance(
                driver,
                &progress,
                &certifications,
                mandatory_ids,
                today,
            ))
        }))
        .await?;

        debug!("📋 Reporte de cumplimiento: {} conductores", records.len());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CertificationStatus, LicenseClass};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn progress(module_id: &str, status: TrainingStatus, score: Option<u8>, attempts: u32) -> TrainingProgress {
        let now = Utc::now();
        TrainingProgress {
            id: format!("p-{}", module_id),
            driver_id: "d1".to_string(),
            module_id: module_id.to_string(),
            status,
            start_date: None,
            completion_date: None,
            score,
            attempts,
            instructor_notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn driver(license_expiry: NaiveDate) -> Driver {
        let now = Utc::now();
        Driver {
            id: "d1".to_string(),
            employee_id: "EMP001".to_string(),
            first_name: "John".to_string(),
            last_name: "Smith".to_string(),
            email: "john@test.com".to_string(),
            phone: "555".to_string(),
            hire_date: today(),
            license_number: "DL1".to_string(),
            license_class: LicenseClass::CdlClassA,
            license_expiry,
            date_of_birth: today(),
            address: "1 Road".to_string(),
            emergency_contact_name: "Jane".to_string(),
            emergency_contact_phone: "556".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn certification(expiry_date: NaiveDate) -> Certification {
        let now = Utc::now();
        Certification {
            id: "c1".to_string(),
            driver_id: "d1".to_string(),
            certification_name: "DOT Physical".to_string(),
            certification_type: "Medical".to_string(),
            issue_date: today(),
            expiry_date,
            issuing_authority: "DOT".to_string(),
            certificate_number: "X1".to_string(),
            status: CertificationStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    fn mandatory(ids: &[&str]) -> HashSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(4, 4), 100.0);
    }

    #[test]
    fn test_training_stats_counts_and_average() {
        let records = vec![
            progress("m1", TrainingStatus::Completed, Some(90), 1),
            progress("m2", TrainingStatus::Completed, Some(85), 2),
            progress("m3", TrainingStatus::Completed, None, 1),
            progress("m4", TrainingStatus::InProgress, Some(40), 1),
            progress("m5", TrainingStatus::NotStarted, None, 0),
            progress("m6", TrainingStatus::Failed, Some(50), 3),
        ];

        let stats = training_stats(&records);
        assert_eq!(stats.total_assigned, 6);
        assert_eq!(stats.completed, 3);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.not_started, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.completion_rate, 50.0);
        assert_eq!(stats.average_score, 87.5);
    }

    #[test]
    fn test_training_stats_empty() {
        assert_eq!(training_stats(&[]), TrainingStats::default());
    }

    #[test]
    fn test_progress_details_fall_back_to_placeholder() {
        let now = Utc::now();
        let mut modules = HashMap::new();
        modules.insert(
            "m1".to_string(),
            TrainingModule {
                id: "m1".to_string(),
                name: "Defensive Driving".to_string(),
                description: String::new(),
                module_type: crate::models::TrainingModuleType::DefensiveDriving,
                duration_hours: 8.0,
                required_score: 85,
                is_mandatory: true,
                prerequisites: vec![],
                created_at: now,
                updated_at: now,
            },
        );

        let details = progress_details(
            vec![
                progress("m1", TrainingStatus::NotStarted, None, 0),
                progress("gone", TrainingStatus::NotStarted, None, 0),
            ],
            &modules,
        );
        assert_eq!(details[0].module_name, "Defensive Driving");
        assert_eq!(details[1].module_name, UNKNOWN_MODULE_NAME);
    }

    #[test]
    fn test_module_stats() {
        let records = vec![
            progress("m1", TrainingStatus::Completed, Some(80), 1),
            progress("m1", TrainingStatus::Completed, Some(100), 3),
            progress("m1", TrainingStatus::Failed, Some(20), 2),
            progress("m1", TrainingStatus::NotStarted, None, 0),
        ];

        let (stats, distribution) = module_stats(&records);
        assert_eq!(stats.total_assigned, 4);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.completion_rate, 50.0);
        assert_eq!(stats.average_score, 90.0);
        assert_eq!(stats.average_attempts, 2.0);
        assert_eq!(distribution, vec![80, 100]);
    }

    #[test]
    fn test_module_stats_without_progress_is_zero_filled() {
        let (stats, distribution) = module_stats(&[]);
        assert_eq!(stats, ModuleStats::default());
        assert!(distribution.is_empty());
    }

    #[test]
    fn test_incomplete_mandatory_training_is_non_compliant() {
        let t = today();
        let record = driver_compliance(
            driver(t + Duration::days(365)),
            &[progress("m1", TrainingStatus::Completed, Some(90), 1)],
            &[],
            &mandatory(&["m1", "m2"]),
            t,
        );
        assert_eq!(record.mandatory_training_completion, "1/2");
        assert_eq!(record.expired_certifications, 0);
        assert_eq!(record.license_status, LicenseStatus::Valid);
        assert_eq!(record.compliance_status, ComplianceStatus::NonCompliant);
    }

    #[test]
    fn test_all_conditions_met_is_compliant() {
        let t = today();
        let record = driver_compliance(
            driver(t + Duration::days(365)),
            &[
                progress("m1", TrainingStatus::Completed, Some(90), 1),
                progress("m2", TrainingStatus::Completed, Some(88), 1),
                progress("optional", TrainingStatus::NotStarted, None, 0),
            ],
            &[certification(t + Duration::days(5))],
            &mandatory(&["m1", "m2"]),
            t,
        );
        assert_eq!(record.mandatory_training_completion, "2/2");
        assert_eq!(record.compliance_status, ComplianceStatus::Compliant);
    }

    #[test]
    fn test_expired_license_or_certification_is_non_compliant() {
        let t = today();
        let expired_license = driver_compliance(
            driver(t - Duration::days(1)),
            &[],
            &[],
            &HashSet::new(),
            t,
        );
        assert_eq!(expired_license.license_status, LicenseStatus::Expired);
        assert_eq!(expired_license.compliance_status, ComplianceStatus::NonCompliant);

        let expired_certification = driver_compliance(
            driver(t + Duration::days(365)),
            &[],
            &[certification(t - Duration::days(1))],
            &HashSet::new(),
            t,
        );
        assert_eq!(expired_certification.expired_certifications, 1);
        assert_eq!(expired_certification.compliance_status, ComplianceStatus::NonCompliant);
    }

    #[test]
    fn test_compliance_wire_format() {
        assert_eq!(
            serde_json::to_value(ComplianceStatus::NonCompliant).unwrap(),
            "Non-Compliant"
        );
        assert_eq!(serde_json::to_value(LicenseStatus::Valid).unwrap(), "Valid");
    }
}
