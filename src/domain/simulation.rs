use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::{Entity, ProjectId, SimulationId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SimulationType {
    ShortCircuit,
    Coordination,
    ArcFlash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SimulationStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl SimulationStatus {
    /// Completed or failed; no further transitions happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResults {
    /// kA
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault_current: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protection_devices: Option<Vec<String>>,
    /// s
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_time: Option<f64>,
    /// Whether the devices coordinate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordination: Option<bool>,
}

/// Asynchronous analysis job run by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Simulation {
    pub id: SimulationId,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(rename = "type")]
    pub simulation_type: SimulationType,
    pub status: SimulationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<SimulationResults>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Entity for Simulation {
    type Id = SimulationId;

    fn id(&self) -> &SimulationId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}
