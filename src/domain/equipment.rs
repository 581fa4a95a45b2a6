use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use validator::Validate;

use super::{CurveId, Entity, EquipmentId, ProjectId, Timestamp};

/// Equipment category
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EquipmentType {
    #[default]
    Transformer,
    Line,
    Generator,
    Motor,
    Capacitor,
    Reactor,
}

/// Electrical equipment belonging to one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: EquipmentId,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: EquipmentType,
    /// kV
    pub nominal_voltage: f64,
    /// A
    pub nominal_current: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection_curve_id: Option<CurveId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for Equipment {
    type Id = EquipmentId;

    fn id(&self) -> &EquipmentId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentDraft {
    pub project_id: ProjectId,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: EquipmentType,
    #[validate(range(exclusive_min = 0.0))]
    pub nominal_voltage: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub nominal_current: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protection_curve_id: Option<CurveId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub equipment_type: Option<EquipmentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0))]
    pub nominal_voltage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0))]
    pub nominal_current: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protection_curve_id: Option<CurveId>,
}
