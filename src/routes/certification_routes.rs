use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use crate::controllers::CertificationController;
use crate::dto::certification_dto::{CertificationFilters, CreateCertificationRequest};
use crate::models::{Certification, ExpiringCertification};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_certification_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_certifications).post(create_certification))
        .route("/expiring", get(list_expiring))
}

async fn create_certification(
    State(state): State<AppState>,
    Json(request): Json<CreateCertificationRequest>,
) -> Result<Json<Certification>, AppError> {
    let controller = CertificationController::new(state.store.clone());
    Ok(Json(controller.create(request).await?))
}

async fn list_certifications(
    State(state): State<AppState>,
    Query(filters): Query<CertificationFilters>,
) -> Result<Json<Vec<Certification>>, AppError> {
    let controller = CertificationController::new(state.store.clone());
    Ok(Json(controller.list(filters).await?))
}

async fn list_expiring(
    State(state): State<AppState>,
) -> Result<Json<Vec<ExpiringCertification>>, AppError> {
    let controller = CertificationController::new(state.store.clone());
    Ok(Json(controller.list_expiring().await?))
}
