use serde::{Deserialize, Serialize};

/// Headline counts shown on the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: usize,
    pub total_equipments: usize,
    pub active_simulations: usize,
    pub completed_simulations: usize,
}
