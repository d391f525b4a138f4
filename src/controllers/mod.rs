//! Controladores de entidades
//!
//! Validan la entrada, aplican valores por defecto y hacen el CRUD
//! contra los repositorios.

pub mod certification_controller;
pub mod driver_controller;
pub mod training_module_controller;
pub mod training_progress_controller;

pub use certification_controller::CertificationController;
pub use driver_controller::DriverController;
pub use training_module_controller::TrainingModuleController;
pub use training_progress_controller::TrainingProgressController;
