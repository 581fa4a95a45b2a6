use async_trait::async_trait;
use tracing::info;

use super::CrudService;
use crate::api::{ApiClient, ClientError};
use crate::domain::{CurveDraft, CurveId, CurvePatch, EquipmentId, ProtectionCurve};
use crate::query::QueryKey;

#[derive(Debug, Clone)]
pub struct CurveService {
    client: ApiClient,
}

impl CurveService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CrudService for CurveService {
    type Entity = ProtectionCurve;
    type Draft = CurveDraft;
    type Patch = CurvePatch;
    type Parent = EquipmentId;

    /// Curves attached to one piece of equipment
    async fn list(&self, equipment_id: &EquipmentId) -> Result<Vec<ProtectionCurve>, ClientError> {
        self.client
            .get(&format!("/api/equipments/{equipment_id}/curves"))
            .await
    }

    async fn get(&self, id: &CurveId) -> Result<ProtectionCurve, ClientError> {
        self.client.get(&format!("/api/curves/{id}")).await
    }

    async fn create(&self, draft: &CurveDraft) -> Result<ProtectionCurve, ClientError> {
        let curve: ProtectionCurve = self.client.post("/api/curves", draft).await?;
        info!(
            curve_id = %curve.id,
            equipment_id = %curve.equipment_id,
            points = curve.curve_data.len(),
            "protection curve created"
        );
        Ok(curve)
    }

    async fn update(&self, id: &CurveId, patch: &CurvePatch) -> Result<ProtectionCurve, ClientError> {
        let curve = self.client.put(&format!("/api/curves/{id}"), patch).await?;
        info!(curve_id = %id, "protection curve updated");
        Ok(curve)
    }

    async fn delete(&self, id: &CurveId) -> Result<(), ClientError> {
        self.client.delete(&format!("/api/curves/{id}")).await?;
        info!(curve_id = %id, "protection curve deleted");
        Ok(())
    }

    fn list_key(equipment_id: &EquipmentId) -> QueryKey {
        QueryKey::Curves(equipment_id.clone())
    }

    fn item_key(id: &CurveId) -> QueryKey {
        QueryKey::Curve(id.clone())
    }

    fn parent_of(curve: &ProtectionCurve) -> EquipmentId {
        curve.equipment_id.clone()
    }
}
