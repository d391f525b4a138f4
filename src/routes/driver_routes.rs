use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::controllers::DriverController;
use crate::dto::common_dto::MessageResponse;
use crate::dto::driver_dto::{CreateDriverRequest, UpdateDriverRequest};
use crate::models::Driver;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route(
            "/:id",
            get(get_driver).put(update_driver).delete(delete_driver),
        )
}

async fn create_driver(
    State(state): State<AppState>,
    Json(request): Json<CreateDriverRequest>,
) -> Result<Json<Driver>, AppError> {
    let controller = DriverController::new(state.store.clone());
    let driver = controller.create(request).await?;
    Ok(Json(driver))
}

async fn list_drivers(State(state): State<AppState>) -> Result<Json<Vec<Driver>>, AppError> {
    let controller = DriverController::new(state.store.clone());
    let drivers = controller.list_active().await?;
    Ok(Json(drivers))
}

async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Driver>, AppError> {
    let controller = DriverController::new(state.store.clone());
    let driver = controller.get_by_id(&id).await?;
    Ok(Json(driver))
}

async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateDriverRequest>,
) -> Result<Json<Driver>, AppError> {
    let controller = DriverController::new(state.store.clone());
    let driver = controller.update(&id, request).await?;
    Ok(Json(driver))
}

async fn delete_driver(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let controller = DriverController::new(state.store.clone());
    controller.deactivate(&id).await?;
    Ok(Json(MessageResponse::new("Driver deactivated successfully")))
}
