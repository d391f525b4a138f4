//! Repositorios
//!
//! Acceso tipado a las colecciones sobre el contrato `RecordStore`.

pub mod certification_repository;
pub mod driver_repository;
pub mod memory_store;
pub mod postgres_store;
pub mod record_store;
pub mod training_module_repository;
pub mod training_progress_repository;

pub use certification_repository::CertificationRepository;
pub use driver_repository::DriverRepository;
pub use memory_store::MemoryRecordStore;
pub use postgres_store::PgRecordStore;
pub use record_store::{RecordStore, StoreError};
pub use training_module_repository::TrainingModuleRepository;
pub use training_progress_repository::TrainingProgressRepository;
