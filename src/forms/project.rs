use validator::Validate;

use super::input::{required_text, FormError, PositiveNumber};
use super::EntityForm;
use crate::domain::{Project, ProjectDraft, ProjectPatch};
use crate::services::ProjectService;

/// Project dialog fields as typed
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectForm {
    pub name: String,
    pub description: String,
    pub voltage: String,
    pub frequency: String,
}

impl Default for ProjectForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            voltage: String::new(),
            frequency: "60".to_string(),
        }
    }
}

impl ProjectForm {
    fn parse(&self) -> Result<ProjectDraft, FormError> {
        let draft = ProjectDraft {
            name: required_text("name", &self.name)?,
            description: self.description.trim().to_string(),
            voltage: PositiveNumber::parse("voltage", &self.voltage)?.get(),
            frequency: PositiveNumber::parse("frequency", &self.frequency)?.get(),
        };
        draft.validate()?;
        Ok(draft)
    }
}

impl EntityForm<ProjectService> for ProjectForm {
    fn from_entity(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            voltage: project.voltage.to_string(),
            frequency: project.frequency.to_string(),
        }
    }

    fn to_draft(&self, _parent: &()) -> Result<ProjectDraft, FormError> {
        self.parse()
    }

    fn to_patch(&self) -> Result<ProjectPatch, FormError> {
        let draft = self.parse()?;
        Ok(ProjectPatch {
            name: Some(draft.name),
            description: Some(draft.description),
            voltage: Some(draft.voltage),
            frequency: Some(draft.frequency),
        })
    }
}
