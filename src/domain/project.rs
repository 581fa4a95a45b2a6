use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Entity, ProjectId, Timestamp};

/// Protection study project, the root of every other record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// System voltage (kV)
    pub voltage: f64,
    /// System frequency (Hz)
    pub frequency: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for Project {
    type Id = ProjectId;

    fn id(&self) -> &ProjectId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Create payload: a project without server-assigned fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: String,
    #[validate(range(exclusive_min = 0.0))]
    pub voltage: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub frequency: f64,
}

/// Partial update; absent fields are left unchanged by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0))]
    pub voltage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0))]
    pub frequency: Option<f64>,
}
