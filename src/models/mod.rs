//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos tal como se guardan
//! en el almacén de documentos.

pub mod analytics;
pub mod certification;
pub mod driver;
pub mod timestamp;
pub mod training;

pub use certification::{Certification, CertificationStatus, ExpiringCertification};
pub use driver::{Driver, LicenseClass};
pub use training::{TrainingModule, TrainingModuleType, TrainingProgress, TrainingStatus};
