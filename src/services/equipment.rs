use async_trait::async_trait;
use tracing::info;

use super::CrudService;
use crate::api::{ApiClient, ClientError};
use crate::domain::{Equipment, EquipmentDraft, EquipmentId, EquipmentPatch, ProjectId};
use crate::query::QueryKey;

#[derive(Debug, Clone)]
pub struct EquipmentService {
    client: ApiClient,
}

impl EquipmentService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CrudService for EquipmentService {
    type Entity = Equipment;
    type Draft = EquipmentDraft;
    type Patch = EquipmentPatch;
    type Parent = ProjectId;

    /// Equipment of one project
    async fn list(&self, project_id: &ProjectId) -> Result<Vec<Equipment>, ClientError> {
        self.client
            .get(&format!("/api/projects/{project_id}/equipments"))
            .await
    }

    async fn get(&self, id: &EquipmentId) -> Result<Equipment, ClientError> {
        self.client.get(&format!("/api/equipments/{id}")).await
    }

    async fn create(&self, draft: &EquipmentDraft) -> Result<Equipment, ClientError> {
        let equipment: Equipment = self.client.post("/api/equipments", draft).await?;
        info!(
            equipment_id = %equipment.id,
            project_id = %equipment.project_id,
            equipment_type = %equipment.equipment_type,
            "equipment created"
        );
        Ok(equipment)
    }

    async fn update(
        &self,
        id: &EquipmentId,
        patch: &EquipmentPatch,
    ) -> Result<Equipment, ClientError> {
        let equipment = self.client.put(&format!("/api/equipments/{id}"), patch).await?;
        info!(equipment_id = %id, "equipment updated");
        Ok(equipment)
    }

    async fn delete(&self, id: &EquipmentId) -> Result<(), ClientError> {
        self.client.delete(&format!("/api/equipments/{id}")).await?;
        info!(equipment_id = %id, "equipment deleted");
        Ok(())
    }

    fn list_key(project_id: &ProjectId) -> QueryKey {
        QueryKey::Equipments(project_id.clone())
    }

    fn item_key(id: &EquipmentId) -> QueryKey {
        QueryKey::Equipment(id.clone())
    }

    fn parent_of(equipment: &Equipment) -> ProjectId {
        equipment.project_id.clone()
    }

    fn cascade_keys(id: &EquipmentId) -> Vec<QueryKey> {
        vec![QueryKey::Curves(id.clone())]
    }
}
