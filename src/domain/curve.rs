use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use validator::Validate;

use super::{CurveId, Entity, EquipmentId, Timestamp};

/// Protection function a curve describes
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CurveType {
    #[default]
    Overcurrent,
    Differential,
    Distance,
    Undervoltage,
    Overvoltage,
}

/// One sample of a time-current characteristic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct CurvePoint {
    /// Current (A)
    #[validate(range(exclusive_min = 0.0))]
    pub current: f64,
    /// Operating time (s)
    #[validate(range(exclusive_min = 0.0))]
    pub time: f64,
}

impl CurvePoint {
    pub fn new(current: f64, time: f64) -> Self {
        Self { current, time }
    }
}

/// Parameters of the analytic curve family, independent of sampled points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CurveSettings {
    /// Pickup current (A)
    #[validate(range(exclusive_min = 0.0))]
    pub pickup: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0))]
    pub time_dial: Option<f64>,
    /// Instantaneous trip current (A)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0))]
    pub instantaneous: Option<f64>,
    /// Family name as the relay vendor labels it, e.g. "IEC Very Inverse"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionCurve {
    pub id: CurveId,
    pub equipment_id: EquipmentId,
    pub name: String,
    #[serde(rename = "type")]
    pub curve_type: CurveType,
    #[serde(default)]
    pub curve_data: Vec<CurvePoint>,
    pub settings: CurveSettings,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProtectionCurve {
    /// Whether the sampled points strictly increase in current
    pub fn is_monotonic(&self) -> bool {
        first_non_increasing(&self.curve_data).is_none()
    }
}

impl Entity for ProtectionCurve {
    type Id = CurveId;

    fn id(&self) -> &CurveId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Index of the first point whose current does not exceed its predecessor's.
pub fn first_non_increasing(points: &[CurvePoint]) -> Option<usize> {
    points
        .windows(2)
        .position(|pair| pair[1].current <= pair[0].current)
        .map(|i| i + 1)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CurveDraft {
    pub equipment_id: EquipmentId,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(rename = "type")]
    pub curve_type: CurveType,
    pub curve_data: Vec<CurvePoint>,
    #[validate(nested)]
    pub settings: CurveSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CurvePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub curve_type: Option<CurveType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve_data: Option<Vec<CurvePoint>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub settings: Option<CurveSettings>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn curve(points: Vec<CurvePoint>) -> ProtectionCurve {
        serde_json::from_value(json!({
            "id": "c1",
            "equipmentId": "e1",
            "name": "51 phase",
            "type": "overcurrent",
            "curveData": points,
            "settings": { "pickup": 400.0, "timeDial": 0.5 },
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-01T10:00:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_monotonic_curve() {
        let c = curve(vec![
            CurvePoint::new(400.0, 10.0),
            CurvePoint::new(800.0, 2.0),
            CurvePoint::new(4000.0, 0.1),
        ]);
        assert!(c.is_monotonic());
        assert_eq!(c.settings.time_dial, Some(0.5));
        assert_eq!(c.curve_type, CurveType::Overcurrent);
    }

    #[test]
    fn test_non_monotonic_curve_still_deserializes() {
        let c = curve(vec![
            CurvePoint::new(400.0, 10.0),
            CurvePoint::new(400.0, 2.0),
        ]);
        assert!(!c.is_monotonic());
        assert_eq!(first_non_increasing(&c.curve_data), Some(1));
    }

    #[test]
    fn test_empty_and_single_point_are_monotonic() {
        assert_eq!(first_non_increasing(&[]), None);
        assert_eq!(first_non_increasing(&[CurvePoint::new(1.0, 1.0)]), None);
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = CurveSettings {
            pickup: 400.0,
            time_dial: Some(0.5),
            instantaneous: None,
            curve_type: Some("IEC Standard Inverse".to_string()),
        };
        assert!(settings.validate().is_ok());

        settings.time_dial = Some(0.0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_curve_type_wire_names() {
        assert_eq!(serde_json::to_value(CurveType::Undervoltage).unwrap(), json!("undervoltage"));
        assert_eq!("distance".parse::<CurveType>().unwrap(), CurveType::Distance);
    }
}
