//! Utilidades del sistema
//!
//! Manejo de errores de la API y construcción de actualizaciones parciales.

pub mod errors;
pub mod patch;
