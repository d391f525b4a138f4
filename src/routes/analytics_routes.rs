use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::models::analytics::{
    ComplianceRecord, DashboardSummary, DriverProgressAnalytics, ModulePerformance,
};
use crate::services::AnalyticsService;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Rutas del dashboard (`/dashboard/...`)
pub fn create_dashboard_router() -> Router<AppState> {
    Router::new().route("/summary", get(dashboard_summary))
}

/// Rutas de analytics (`/analytics/...`)
pub fn create_analytics_router() -> Router<AppState> {
    Router::new()
        .route("/driver-progress/:driver_id", get(driver_progress))
        .route("/module-performance/:module_id", get(module_performance))
        .route("/compliance-report", get(compliance_report))
}

async fn dashboard_summary(
    State(state): State<AppState>,
) -> Result<Json<DashboardSummary>, AppError> {
    let service = AnalyticsService::new(state.store.clone());
    Ok(Json(service.dashboard_summary().await?))
}

async fn driver_progress(
    State(state): State<AppState>,
    Path(driver_id): Path<String>,
) -> Result<Json<DriverProgressAnalytics>, AppError> {
    let service = AnalyticsService::new(state.store.clone());
    Ok(Json(service.driver_progress(&driver_id).await?))
}

async fn module_performance(
    State(state): State<AppState>,
    Path(module_id): Path<String>,
) -> Result<Json<ModulePerformance>, AppError> {
    let service = AnalyticsService::new(state.store.clone());
    Ok(Json(service.module_performance(&module_id).await?))
}

async fn compliance_report(
    State(state): State<AppState>,
) -> Result<Json<Vec<ComplianceRecord>>, AppError> {
    let service = AnalyticsService::new(state.store.clone());
    Ok(Json(service.compliance_report().await?))
}
