use tracing::{info, warn};

use crate::api::{ApiClient, ClientError};
use crate::domain::{NetworkDraft, NetworkModel, ProjectId};

/// Network model access. A project has at most one model, and a project
/// without one is a normal state rather than an error.
#[derive(Debug, Clone)]
pub struct NetworkService {
    client: ApiClient,
}

impl NetworkService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn path(project_id: &ProjectId) -> String {
        format!("/api/projects/{project_id}/network")
    }

    /// Lenient lookup: `None` when the project has no model, and also when
    /// the request failed for any other reason. Callers that must tell an
    /// outage from absence use [`try_get_by_project`](Self::try_get_by_project).
    pub async fn get_by_project(&self, project_id: &ProjectId) -> Option<NetworkModel> {
        match self.try_get_by_project(project_id).await {
            Ok(model) => model,
            Err(e) => {
                warn!(project_id = %project_id, error = %e, "network lookup failed; treating as absent");
                None
            }
        }
    }

    /// `Ok(None)` on 404; every other failure is an error.
    pub async fn try_get_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Option<NetworkModel>, ClientError> {
        match self.client.get(&Self::path(project_id)).await {
            Ok(model) => Ok(Some(model)),
            Err(ClientError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create the project's model on first call, replace it afterwards.
    /// Dangling bus references are rejected before anything is sent.
    pub async fn save(
        &self,
        project_id: &ProjectId,
        draft: &NetworkDraft,
    ) -> Result<NetworkModel, ClientError> {
        draft.topology.validate()?;
        let model: NetworkModel = self.client.post(&Self::path(project_id), draft).await?;
        info!(
            project_id = %project_id,
            network_id = %model.id,
            buses = model.topology.buses.len(),
            elements = model.topology.element_count(),
            "network model saved"
        );
        Ok(model)
    }
}
