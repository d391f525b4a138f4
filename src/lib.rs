//! API de seguimiento de formación y cumplimiento de conductores
//!
//! Conductores, módulos de formación, progreso por conductor y módulo,
//! certificaciones con estado derivado del vencimiento, y reportes
//! agregados sobre un almacén de documentos (PostgreSQL JSONB o memoria).

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::middleware::cors_layer;
use crate::state::AppState;

/// Aplicación completa: rutas de la API, CORS y trazas HTTP
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    routes::create_api_router()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
