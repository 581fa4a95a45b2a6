use validator::Validate;

use super::input::{optional_text, required_text, FormError, PositiveNumber};
use super::EntityForm;
use crate::domain::{
    first_non_increasing, CurveDraft, CurvePatch, CurvePoint, CurveSettings, CurveType, EquipmentId,
    ProtectionCurve,
};
use crate::services::CurveService;

/// One editable row of the point table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointRow {
    pub current: String,
    pub time: String,
}

impl PointRow {
    pub fn new(current: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            current: current.into(),
            time: time.into(),
        }
    }

    fn is_blank(&self) -> bool {
        self.current.trim().is_empty() && self.time.trim().is_empty()
    }
}

/// Protection curve dialog fields as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveForm {
    pub name: String,
    pub curve_type: CurveType,
    pub points: Vec<PointRow>,
    pub pickup: String,
    pub time_dial: String,
    pub instantaneous: String,
    /// Vendor family label, e.g. "IEC Very Inverse"
    pub family: String,
}

impl CurveForm {
    pub fn add_point(&mut self) {
        self.points.push(PointRow::default());
    }

    pub fn remove_point(&mut self, index: usize) {
        if index < self.points.len() {
            self.points.remove(index);
        }
    }

    /// Parsed points; fully blank rows are skipped. Currents must strictly
    /// increase down the table.
    pub fn parse_points(&self) -> Result<Vec<CurvePoint>, FormError> {
        let points = self
            .points
            .iter()
            .filter(|row| !row.is_blank())
            .map(|row| {
                Ok(CurvePoint::new(
                    PositiveNumber::parse("current", &row.current)?.get(),
                    PositiveNumber::parse("time", &row.time)?.get(),
                ))
            })
            .collect::<Result<Vec<_>, FormError>>()?;
        if let Some(index) = first_non_increasing(&points) {
            return Err(FormError::NonMonotonic { index });
        }
        Ok(points)
    }

    pub fn parse_settings(&self) -> Result<CurveSettings, FormError> {
        let settings = CurveSettings {
            pickup: PositiveNumber::parse("pickup", &self.pickup)?.get(),
            time_dial: PositiveNumber::parse_optional("timeDial", &self.time_dial)?.map(PositiveNumber::get),
            instantaneous: PositiveNumber::parse_optional("instantaneous", &self.instantaneous)?
                .map(PositiveNumber::get),
            curve_type: optional_text(&self.family),
        };
        settings.validate()?;
        Ok(settings)
    }
}

fn format_optional(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl EntityForm<CurveService> for CurveForm {
    fn from_entity(curve: &ProtectionCurve) -> Self {
        Self {
            name: curve.name.clone(),
            curve_type: curve.curve_type,
            points: curve
                .curve_data
                .iter()
                .map(|p| PointRow::new(p.current.to_string(), p.time.to_string()))
                .collect(),
            pickup: curve.settings.pickup.to_string(),
            time_dial: format_optional(curve.settings.time_dial),
            instantaneous: format_optional(curve.settings.instantaneous),
            family: curve.settings.curve_type.clone().unwrap_or_default(),
        }
    }

    fn to_draft(&self, equipment_id: &EquipmentId) -> Result<CurveDraft, FormError> {
        let draft = CurveDraft {
            equipment_id: equipment_id.clone(),
            name: required_text("name", &self.name)?,
            curve_type: self.curve_type,
            curve_data: self.parse_points()?,
            settings: self.parse_settings()?,
        };
        draft.validate()?;
        Ok(draft)
    }

    fn to_patch(&self) -> Result<CurvePatch, FormError> {
        Ok(CurvePatch {
            name: Some(required_text("name", &self.name)?),
            curve_type: Some(self.curve_type),
            curve_data: Some(self.parse_points()?),
            settings: Some(self.parse_settings()?),
        })
    }
}
