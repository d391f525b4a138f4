use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::controllers::TrainingModuleController;
use crate::dto::training_dto::{CreateTrainingModuleRequest, SeedModulesResponse};
use crate::models::TrainingModule;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_training_module_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_modules).post(create_module))
        .route("/initialize-defaults", post(initialize_defaults))
        .route("/:id", get(get_module))
}

async fn create_module(
    State(state): State<AppState>,
    Json(request): Json<CreateTrainingModuleRequest>,
) -> Result<Json<TrainingModule>, AppError> {
    let controller = TrainingModuleController::new(state.store.clone());
    Ok(Json(controller.create(request).await?))
}

async fn list_modules(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrainingModule>>, AppError> {
    let controller = TrainingModuleController::new(state.store.clone());
    Ok(Json(controller.list().await?))
}

async fn get_module(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrainingModule>, AppError> {
    let controller = TrainingModuleController::new(state.store.clone());
    Ok(Json(controller.get_by_id(&id).await?))
}

async fn initialize_defaults(
    State(state): State<AppState>,
) -> Result<Json<SeedModulesResponse>, AppError> {
    let controller = TrainingModuleController::new(state.store.clone());
    Ok(Json(controller.seed_defaults().await?))
}
