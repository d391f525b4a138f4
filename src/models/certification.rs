//! Modelo de Certification
//!
//! Contiene la certificación de un conductor y el cálculo de su estado a
//! partir de la fecha de vencimiento. El estado nunca es la fuente de verdad:
//! se recalcula en cada lectura.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Días antes del vencimiento en los que una certificación pasa a "por vencer"
pub const EXPIRING_SOON_DAYS: i64 = 30;

/// Estado del ciclo de vida de una certificación
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CertificationStatus {
    Active,
    ExpiringSoon,
    Expired,
}

impl CertificationStatus {
    /// Deriva el estado comparando el vencimiento con la fecha de referencia
    pub fn derive(expiry_date: NaiveDate, today: NaiveDate) -> Self {
        let days_until_expiry = (expiry_date - today).num_days();
        if days_until_expiry < 0 {
            CertificationStatus::Expired
        } else if days_until_expiry <= EXPIRING_SOON_DAYS {
            CertificationStatus::ExpiringSoon
        } else {
            CertificationStatus::Active
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Certification {
    pub id: String,
    pub driver_id: String,
    pub certification_name: String,
    pub certification_type: String,
    pub issue_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub issuing_authority: String,
    pub certificate_number: String,
    pub status: CertificationStatus,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Certification {
    /// Recalcula el estado para la fecha dada
    pub fn with_current_status(mut self, today: NaiveDate) -> Self {
        self.status = CertificationStatus::derive(self.expiry_date, today);
        self
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }
}

/// Certificación anotada con el nombre del conductor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpiringCertification {
    #[serde(flatten)]
    pub certification: Certification,
    pub driver_name: String,
}
