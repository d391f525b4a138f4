use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};

use crate::controllers::TrainingProgressController;
use crate::dto::training_dto::{CreateProgressRequest, ProgressFilters, UpdateProgressRequest};
use crate::models::TrainingProgress;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_training_progress_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_progress).post(create_progress))
        .route("/:id", put(update_progress))
}

async fn create_progress(
    State(state): State<AppState>,
    Json(request): Json<CreateProgressRequest>,
) -> Result<Json<TrainingProgress>, AppError> {
    let controller = TrainingProgressController::new(state.store.clone());
    Ok(Json(controller.create(request).await?))
}

async fn list_progress(
    State(state): State<AppState>,
    Query(filters): Query<ProgressFilters>,
) -> Result<Json<Vec<TrainingProgress>>, AppError> {
    let controller = TrainingProgressController::new(state.store.clone());
    Ok(Json(controller.list(filters).await?))
}

async fn update_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateProgressRequest>,
) -> Result<Json<TrainingProgress>, AppError> {
    let controller = TrainingProgressController::new(state.store.clone());
    Ok(Json(controller.update(&id, request).await?))
}
