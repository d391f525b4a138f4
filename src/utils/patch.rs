//! Actualizaciones parciales
//!
//! Los requests de actualización serializan sus campos `Option` con
//! `skip_serializing_if = "Option::is_none"`, así que el objeto resultante
//! contiene solo los campos que el cliente envió con valor.

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

use super::errors::{internal_error, AppResult};
use crate::models::timestamp;

/// Campos presentes en un request de actualización
pub fn changed_fields<T: Serialize>(request: &T) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(request).map_err(|e| internal_error(&e.to_string()))? {
        Value::Object(fields) => Ok(fields),
        _ => Err(internal_error("update request must serialize to an object")),
    }
}

/// Igual que `changed_fields`, añadiendo la marca `updated_at`
pub fn changed_fields_stamped<T: Serialize>(request: &T) -> AppResult<Map<String, Value>> {
    let mut fields = changed_fields(request)?;
    fields.insert("updated_at".to_string(), Value::from(timestamp::format(&Utc::now())));
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::driver_dto::UpdateDriverRequest;

    #[test]
    fn test_only_supplied_fields_are_kept() {
        let request = UpdateDriverRequest {
            first_name: Some("Ana".to_string()),
            is_active: Some(false),
            ..Default::default()
        };

        let fields = changed_fields(&request).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["first_name"], "Ana");
        assert_eq!(fields["is_active"], false);
    }

    #[test]
    fn test_stamped_adds_updated_at() {
        let fields = changed_fields_stamped(&UpdateDriverRequest::default()).unwrap();
        assert_eq!(fields.len(), 1);
        let stamp = fields["updated_at"].as_str().unwrap();
        assert_eq!(stamp.len(), "2026-10-19T10:00:00.000000000Z".len());
        assert!(stamp.ends_with('Z'));
    }

    #[test]
    fn test_null_fields_from_json_are_dropped() {
        let request: UpdateDriverRequest =
            serde_json::from_str(r#"{ "phone": null, "address": "1 Main St" }"#).unwrap();
        let fields = changed_fields(&request).unwrap();
        assert!(!fields.contains_key("phone"));
        assert_eq!(fields["address"], "1 Main St");
    }
}
