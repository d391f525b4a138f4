//! Modelo de Driver
//!
//! Conductor con sus datos de licencia. `is_active = false` marca el borrado
//! lógico: el documento sigue en el store pero queda fuera de los listados.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Clase de licencia de conducir
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LicenseClass {
    #[serde(rename = "Class A")]
    ClassA,
    #[serde(rename = "Class B")]
    ClassB,
    #[serde(rename = "Class C")]
    ClassC,
    #[serde(rename = "CDL Class A")]
    CdlClassA,
    #[serde(rename = "CDL Class B")]
    CdlClassB,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Driver {
    pub id: String,
    pub employee_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub hire_date: NaiveDate,
    pub license_number: String,
    pub license_class: LicenseClass,
    pub license_expiry: NaiveDate,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(with = "super::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "super::timestamp")]
    pub updated_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Driver {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn license_expired(&self, today: NaiveDate) -> bool {
        self.license_expiry < today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_license_class_wire_names() {
        assert_eq!(serde_json::to_value(LicenseClass::CdlClassA).unwrap(), "CDL Class A");
        let parsed: LicenseClass = serde_json::from_str("\"Class C\"").unwrap();
        assert_eq!(parsed, LicenseClass::ClassC);
        assert!(serde_json::from_str::<LicenseClass>("\"Class Z\"").is_err());
    }
}
