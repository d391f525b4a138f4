//! Services module
//!
//! Lógica que cruza varias colecciones: el catálogo de módulos por defecto
//! y los reportes de analytics y cumplimiento.

pub mod analytics_service;
pub mod module_catalog;

pub use analytics_service::AnalyticsService;
