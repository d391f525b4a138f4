use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::LicenseClass;

// Request para crear un conductor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDriverRequest {
    #[validate(length(min = 1))]
    pub employee_id: String,
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    pub hire_date: NaiveDate,
    #[validate(length(min = 1))]
    pub license_number: String,
    pub license_class: LicenseClass,
    pub license_expiry: NaiveDate,
    pub date_of_birth: NaiveDate,
    pub address: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
}

// Request para actualizar un conductor; solo se escriben los campos presentes
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateDriverRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_class: Option<LicenseClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_expiry: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
