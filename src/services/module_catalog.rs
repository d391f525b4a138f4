//! Catálogo de módulos por defecto
//!
//! Los ocho módulos que se cargan con `initialize-defaults`. El nombre es
//! la clave natural: un módulo del catálogo solo se inserta si no existe
//! otro con el mismo nombre.

use crate::models::TrainingModuleType;

#[derive(Debug, Clone, Copy)]
pub struct CatalogModule {
    pub name: &'static str,
    pub description: &'static str,
    pub module_type: TrainingModuleType,
    pub duration_hours: f64,
    pub required_score: u8,
    pub is_mandatory: bool,
}

pub const DEFAULT_MODULES: [CatalogModule; 8] = [
    CatalogModule {
        name: "Defensive Driving",
        description: "Learn defensive driving techniques to prevent accidents and ensure road safety",
        module_type: TrainingModuleType::DefensiveDriving,
        duration_hours: 8.0,
        required_score: 85,
        is_mandatory: true,
    },
    CatalogModule {
        name: "Vehicle Inspection",
        description: "Pre-trip and post-trip vehicle inspection procedures",
        module_type: TrainingModuleType::VehicleInspection,
        duration_hours: 4.0,
        required_score: 90,
        is_mandatory: true,
    },
    CatalogModule {
        name: "Safety Protocols",
        description: "Comprehensive safety protocols and emergency procedures",
        module_type: TrainingModuleType::Safety,
        duration_hours: 6.0,
        required_score: 85,
        is_mandatory: true,
    },
    CatalogModule {
        name: "Hazmat Handling",
        description: "Hazardous materials handling and transportation safety",
        module_type: TrainingModuleType::Hazmat,
        duration_hours: 12.0,
        required_score: 95,
        is_mandatory: false,
    },
    CatalogModule {
        name: "Backing and Maneuvering",
        description: "Safe backing techniques and tight space maneuvering",
        module_type: TrainingModuleType::BackingManeuvers,
        duration_hours: 4.0,
        required_score: 80,
        is_mandatory: true,
    },
    CatalogModule {
        name: "Cargo Handling",
        description: "Proper cargo loading, securing, and unloading procedures",
        module_type: TrainingModuleType::CargoHandling,
        duration_hours: 6.0,
        required_score: 85,
        is_mandatory: true,
    },
    CatalogModule {
        name: "Hours of Service",
        description: "DOT hours of service regulations and logbook management",
        module_type: TrainingModuleType::HoursOfService,
        duration_hours: 3.0,
        required_score: 90,
        is_mandatory: true,
    },
    CatalogModule {
        name: "Fatigue Management",
        description: "Recognizing and managing driver fatigue for safe operations",
        module_type: TrainingModuleType::FatigueManagement,
        duration_hours: 2.0,
        required_score: 85,
        is_mandatory: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_names_are_unique() {
        let names: HashSet<_> = DEFAULT_MODULES.iter().map(|m| m.name).collect();
        assert_eq!(names.len(), DEFAULT_MODULES.len());
    }

    #[test]
    fn test_only_hazmat_is_optional() {
        let optional: Vec<_> = DEFAULT_MODULES
            .iter()
            .filter(|m| !m.is_mandatory)
            .map(|m| m.name)
            .collect();
        assert_eq!(optional, vec!["Hazmat Handling"]);
    }
}
