use async_trait::async_trait;
use tracing::info;

use super::CrudService;
use crate::api::{ApiClient, ClientError};
use crate::domain::{Project, ProjectDraft, ProjectId, ProjectPatch};
use crate::query::QueryKey;

#[derive(Debug, Clone)]
pub struct ProjectService {
    client: ApiClient,
}

impl ProjectService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CrudService for ProjectService {
    type Entity = Project;
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;
    type Parent = ();

    async fn list(&self, _parent: &()) -> Result<Vec<Project>, ClientError> {
        self.client.get("/api/projects").await
    }

    async fn get(&self, id: &ProjectId) -> Result<Project, ClientError> {
        self.client.get(&format!("/api/projects/{id}")).await
    }

    async fn create(&self, draft: &ProjectDraft) -> Result<Project, ClientError> {
        let project: Project = self.client.post("/api/projects", draft).await?;
        info!(project_id = %project.id, name = %project.name, "project created");
        Ok(project)
    }

    async fn update(&self, id: &ProjectId, patch: &ProjectPatch) -> Result<Project, ClientError> {
        let project = self.client.put(&format!("/api/projects/{id}"), patch).await?;
        info!(project_id = %id, "project updated");
        Ok(project)
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), ClientError> {
        self.client.delete(&format!("/api/projects/{id}")).await?;
        info!(project_id = %id, "project deleted");
        Ok(())
    }

    fn list_key(_parent: &()) -> QueryKey {
        QueryKey::Projects
    }

    fn item_key(id: &ProjectId) -> QueryKey {
        QueryKey::Project(id.clone())
    }

    fn parent_of(_project: &Project) {}

    /// The server cascades the delete to the project's equipment and network.
    fn cascade_keys(id: &ProjectId) -> Vec<QueryKey> {
        vec![
            QueryKey::Equipments(id.clone()),
            QueryKey::Network(id.clone()),
        ]
    }
}
