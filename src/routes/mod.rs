//! Rutas HTTP
//!
//! Cada entidad tiene su router; `create_api_router` los reúne bajo `/api`.

pub mod analytics_routes;
pub mod certification_routes;
pub mod driver_routes;
pub mod training_module_routes;
pub mod training_progress_routes;

use axum::{routing::get, Json, Router};

use crate::dto::common_dto::MessageResponse;
use crate::state::AppState;

pub const API_NAME: &str = "Truck Driver Training Dashboard API";

/// Router completo de la API, con todas las rutas bajo `/api`
pub fn create_api_router() -> Router<AppState> {
    let api = Router::new()
        .nest("/drivers", driver_routes::create_driver_router())
        .nest(
            "/training-modules",
            training_module_routes::create_training_module_router(),
        )
        .nest(
            "/training-progress",
            training_progress_routes::create_training_progress_router(),
        )
        .nest(
            "/certifications",
            certification_routes::create_certification_router(),
        )
        .nest("/dashboard", analytics_routes::create_dashboard_router())
        .nest("/analytics", analytics_routes::create_analytics_router());

    Router::new()
        .route("/api", get(api_root))
        .route("/api/", get(api_root))
        .nest("/api", api)
}

async fn api_root() -> Json<MessageResponse> {
    Json(MessageResponse::new(API_NAME))
}
