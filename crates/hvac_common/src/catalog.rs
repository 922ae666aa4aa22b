//! Reference data catalog.
//!
//! Static lookup tables for equipment types and symptoms. Fixed at compile
//! time, read-only, shared by the classifier, the prompt builders, and the
//! listing endpoints. Lookups never fail: an unknown id falls back to the
//! raw id so a submission with stale frontend data still gets a diagnosis.

use crate::diagnosis::SymptomCategory;
use serde::{Deserialize, Serialize};

/// A supported equipment type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub common_issues: Vec<String>,
}

/// A reportable symptom
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
    pub id: String,
    pub name: String,
    pub category: SymptomCategory,
    pub description: String,
}

fn equipment(id: &str, name: &str, description: &str, common_issues: &[&str]) -> EquipmentType {
    EquipmentType {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        common_issues: common_issues.iter().map(|s| s.to_string()).collect(),
    }
}

fn symptom(id: &str, name: &str, category: SymptomCategory, description: &str) -> Symptom {
    Symptom {
        id: id.to_string(),
        name: name.to_string(),
        category,
        description: description.to_string(),
    }
}

/// All supported equipment types, in display order
pub fn equipment_types() -> Vec<EquipmentType> {
    vec![
        equipment(
            "split_system",
            "Split System",
            "Traditional split air conditioning system with indoor and outdoor units",
            &["refrigerant_leak", "fan_motor_failure", "compressor_issues"],
        ),
        equipment(
            "mini_split",
            "Mini Split",
            "Ductless mini-split heat pump system",
            &["drainage_problems", "remote_control_issues", "filter_blockage"],
        ),
        equipment(
            "package_unit",
            "Package Unit",
            "Self-contained package air conditioning unit",
            &["belt_problems", "control_board_failure", "coil_freezing"],
        ),
        equipment(
            "heat_pump",
            "Heat Pump",
            "Heat pump system for heating and cooling",
            &["defrost_issues", "reversing_valve_problems", "auxiliary_heat_failure"],
        ),
    ]
}

/// All reportable symptoms, three per category, in display order
pub fn symptoms() -> Vec<Symptom> {
    vec![
        symptom(
            "not_cooling",
            "Not Cooling",
            SymptomCategory::Cooling,
            "System runs but does not provide adequate cooling",
        ),
        symptom(
            "insufficient_cooling",
            "Insufficient Cooling",
            SymptomCategory::Cooling,
            "System cools but not to desired temperature",
        ),
        symptom(
            "intermittent_cooling",
            "Intermittent Cooling",
            SymptomCategory::Cooling,
            "System cools inconsistently or cycles on and off",
        ),
        symptom(
            "unit_not_starting",
            "Unit Not Starting",
            SymptomCategory::Electrical,
            "System does not turn on or respond to thermostat",
        ),
        symptom(
            "frequent_breaker_trips",
            "Frequent Breaker Trips",
            SymptomCategory::Electrical,
            "Circuit breaker trips repeatedly when system starts",
        ),
        symptom(
            "display_errors",
            "Display Errors",
            SymptomCategory::Electrical,
            "Error codes or warning lights on control panel",
        ),
        symptom(
            "fan_not_spinning",
            "Fan Not Spinning",
            SymptomCategory::Mechanical,
            "Indoor or outdoor fan motor not operating",
        ),
        symptom(
            "unusual_noise",
            "Unusual Noise",
            SymptomCategory::Mechanical,
            "Grinding, squealing, or other abnormal sounds",
        ),
        symptom(
            "excessive_vibration",
            "Excessive Vibration",
            SymptomCategory::Mechanical,
            "Unit vibrates more than normal during operation",
        ),
        symptom(
            "ice_buildup",
            "Ice Buildup",
            SymptomCategory::Visual,
            "Ice formation on evaporator coil or refrigerant lines",
        ),
        symptom(
            "water_leak",
            "Water Leak",
            SymptomCategory::Visual,
            "Water dripping or pooling around unit",
        ),
        symptom(
            "burning_smell",
            "Burning Smell",
            SymptomCategory::Visual,
            "Electrical or mechanical burning odor",
        ),
    ]
}

/// Display name for an equipment type id, or the raw id if unknown
pub fn equipment_name(id: &str) -> String {
    equipment_types()
        .into_iter()
        .find(|eq| eq.id == id)
        .map(|eq| eq.name)
        .unwrap_or_else(|| id.to_string())
}

/// Display name for a symptom id, or the raw id if unknown
pub fn symptom_name(id: &str) -> String {
    symptoms()
        .into_iter()
        .find(|s| s.id == id)
        .map(|s| s.name)
        .unwrap_or_else(|| id.to_string())
}

/// Resolve a list of symptom ids to display names, unknown ids passed through
pub fn symptom_names(ids: &[String]) -> Vec<String> {
    ids.iter().map(|id| symptom_name(id)).collect()
}
