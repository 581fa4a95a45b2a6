use validator::Validate;

use super::input::{optional_text, required_text, FormError, PositiveNumber};
use super::EntityForm;
use crate::domain::{CurveId, Equipment, EquipmentDraft, EquipmentPatch, EquipmentType, ProjectId};
use crate::services::EquipmentService;

/// Equipment dialog fields as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EquipmentForm {
    pub name: String,
    pub equipment_type: EquipmentType,
    pub nominal_voltage: String,
    pub nominal_current: String,
    /// Blank means not given
    pub manufacturer: String,
    pub model: String,
    pub protection_curve_id: Option<CurveId>,
}

impl EntityForm<EquipmentService> for EquipmentForm {
    fn from_entity(equipment: &Equipment) -> Self {
        Self {
            name: equipment.name.clone(),
            equipment_type: equipment.equipment_type,
            nominal_voltage: equipment.nominal_voltage.to_string(),
            nominal_current: equipment.nominal_current.to_string(),
            manufacturer: equipment.manufacturer.clone().unwrap_or_default(),
            model: equipment.model.clone().unwrap_or_default(),
            protection_curve_id: equipment.protection_curve_id.clone(),
        }
    }

    fn to_draft(&self, project_id: &ProjectId) -> Result<EquipmentDraft, FormError> {
        let draft = EquipmentDraft {
            project_id: project_id.clone(),
            name: required_text("name", &self.name)?,
            equipment_type: self.equipment_type,
            nominal_voltage: PositiveNumber::parse("nominalVoltage", &self.nominal_voltage)?.get(),
            nominal_current: PositiveNumber::parse("nominalCurrent", &self.nominal_current)?.get(),
            manufacturer: optional_text(&self.manufacturer),
            model: optional_text(&self.model),
            protection_curve_id: self.protection_curve_id.clone(),
        };
        draft.validate()?;
        Ok(draft)
    }

    /// Blank manufacturer or model leaves the stored value unchanged.
    fn to_patch(&self) -> Result<EquipmentPatch, FormError> {
        let patch = EquipmentPatch {
            name: Some(required_text("name", &self.name)?),
            equipment_type: Some(self.equipment_type),
            nominal_voltage: Some(PositiveNumber::parse("nominalVoltage", &self.nominal_voltage)?.get()),
            nominal_current: Some(PositiveNumber::parse("nominalCurrent", &self.nominal_current)?.get()),
            manufacturer: optional_text(&self.manufacturer),
            model: optional_text(&self.model),
            protection_curve_id: self.protection_curve_id.clone(),
        };
        patch.validate()?;
        Ok(patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn t1() -> EquipmentForm {
        EquipmentForm {
            name: "T1".to_string(),
            equipment_type: EquipmentType::Transformer,
            nominal_voltage: "13.8".to_string(),
            nominal_current: "1000".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_to_draft_with_blank_optionals() {
        let draft = EntityForm::<EquipmentService>::to_draft(&t1(), &ProjectId::new("p1")).unwrap();
        assert_eq!(draft.project_id, ProjectId::new("p1"));
        assert_eq!(draft.nominal_current, 1000.0);
        assert_eq!(draft.manufacturer, None);
        assert_eq!(draft.model, None);

        let body = serde_json::to_value(&draft).unwrap();
        assert!(body.get("manufacturer").is_none());
        assert_eq!(body["type"], "transformer");
    }

    #[rstest]
    #[case("abc", "1000")]
    #[case("13.8", "-5")]
    #[case("13.8", "")]
    #[case("inf", "1000")]
    fn test_rejects_bad_ratings(#[case] voltage: &str, #[case] current: &str) {
        let form = EquipmentForm {
            nominal_voltage: voltage.to_string(),
            nominal_current: current.to_string(),
            ..t1()
        };
        assert!(EntityForm::<EquipmentService>::to_draft(&form, &ProjectId::new("p1")).is_err());
    }

    #[test]
    fn test_patch_trims_optionals() {
        let form = EquipmentForm {
            manufacturer: " ABB ".to_string(),
            ..t1()
        };
        let patch = EntityForm::<EquipmentService>::to_patch(&form).unwrap();
        assert_eq!(patch.manufacturer.as_deref(), Some("ABB"));
        assert_eq!(patch.model, None);
        assert_eq!(patch.equipment_type, Some(EquipmentType::Transformer));
    }
}
