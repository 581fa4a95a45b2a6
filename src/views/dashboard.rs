use tracing::{debug, warn};

use crate::api::ClientError;
use crate::context::AppContext;
use crate::domain::DashboardStats;
use crate::query::{QueryClient, QueryKey};
use crate::selection::SelectionContext;
use crate::services::{CrudService, EquipmentService, ProjectService};

/// Summary counters for the landing screen
pub struct DashboardView {
    projects: ProjectService,
    equipments: EquipmentService,
    queries: QueryClient,
    selection: SelectionContext,
}

impl DashboardView {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            projects: ctx.projects(),
            equipments: ctx.equipments(),
            queries: ctx.queries.clone(),
            selection: ctx.selection.clone(),
        }
    }

    /// Project count plus the selected project's equipment count. Simulation
    /// counters stay at zero until simulations can be listed.
    ///
    /// A remembered project that no longer exists counts as no equipment.
    pub async fn load(&self) -> Result<DashboardStats, ClientError> {
        let projects = self
            .queries
            .fetch(QueryKey::Projects, || self.projects.list(&()))
            .await?;

        let total_equipments = match self.selection.get() {
            Some(project_id) => match self
                .queries
                .fetch(QueryKey::Equipments(project_id.clone()), || {
                    self.equipments.list(&project_id)
                })
                .await
            {
                Ok(equipments) => equipments.len(),
                Err(ClientError::NotFound(path)) => {
                    warn!(%project_id, %path, "selected project is gone, counting no equipment");
                    0
                }
                Err(e) => return Err(e),
            },
            None => 0,
        };

        let stats = DashboardStats {
            total_projects: projects.len(),
            total_equipments,
            ..DashboardStats::default()
        };
        debug!(?stats, "dashboard stats loaded");
        Ok(stats)
    }
}
