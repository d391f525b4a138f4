use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

// Request para registrar una certificación
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCertificationRequest {
    #[validate(length(min = 1))]
    pub driver_id: String,
    #[validate(length(min = 1))]
    pub certification_name: String,
    pub certification_type: String,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub issuing_authority: String,
    pub certificate_number: String,
}

// Filtros para listar certificaciones
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificationFilters {
    pub driver_id: Option<String>,
}
