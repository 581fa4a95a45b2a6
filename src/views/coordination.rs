use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use super::equipments::{load_equipment, EquipmentList};
use crate::api::ClientError;
use crate::context::AppContext;
use crate::domain::{EquipmentId, ProjectId, ProtectionCurve, Simulation};
use crate::forms::SelectionSet;
use crate::query::{KeyedQuery, LoadState, QueryClient, QueryKey};
use crate::selection::SelectionContext;
use crate::services::{CrudService, CurveService, EquipmentService};

/// Equipment set handed to a coordination study
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub project_id: ProjectId,
    pub equipment_ids: Vec<EquipmentId>,
}

/// Runs a protection coordination study
#[async_trait]
pub trait CoordinationEngine: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> anyhow::Result<Simulation>;
}

#[derive(Debug, Error)]
pub enum CoordinationError {
    #[error("no project selected")]
    NoProject,

    #[error("no equipment selected")]
    NothingSelected,

    #[error("no coordination engine configured")]
    NoEngine,

    #[error(transparent)]
    Engine(#[from] anyhow::Error),
}

/// Curves of one picked piece of equipment
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSet {
    pub equipment_id: EquipmentId,
    pub curves: Arc<Vec<ProtectionCurve>>,
}

struct Picked {
    /// Project the picks were made in
    project_id: Option<ProjectId>,
    equipment: SelectionSet<EquipmentId>,
}

/// Coordination screen: pick equipment of the selected project, overlay their
/// curves and hand the set to an analysis engine.
pub struct CoordinationView {
    equipments: EquipmentService,
    curves: CurveService,
    queries: QueryClient,
    selection: SelectionContext,
    list: KeyedQuery<ProjectId, EquipmentList>,
    curve_sets: KeyedQuery<Vec<EquipmentId>, Vec<CurveSet>>,
    picked: Mutex<Picked>,
    engine: Option<Arc<dyn CoordinationEngine>>,
}

impl CoordinationView {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            equipments: ctx.equipments(),
            curves: ctx.curves(),
            queries: ctx.queries.clone(),
            selection: ctx.selection.clone(),
            list: KeyedQuery::new(),
            curve_sets: KeyedQuery::new(),
            picked: Mutex::new(Picked {
                project_id: ctx.selection.get(),
                equipment: SelectionSet::new(),
            }),
            engine: None,
        }
    }

    pub fn with_engine(mut self, engine: Arc<dyn CoordinationEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Run `f` on the picks, first dropping them if the project changed.
    fn with_picks<R>(&self, f: impl FnOnce(&mut SelectionSet<EquipmentId>) -> R) -> R {
        let current = self.selection.get();
        let mut picked = self.picked.lock();
        if picked.project_id != current {
            debug!(from = ?picked.project_id, to = ?current, "project changed; clearing picks");
            picked.project_id = current;
            picked.equipment.clear();
        }
        f(&mut picked.equipment)
    }

    pub async fn load(&self) -> LoadState<EquipmentList> {
        let state = load_equipment(&self.equipments, &self.queries, &self.selection, &self.list).await;
        if let Some(list) = state.data() {
            let ids: Vec<EquipmentId> = list.iter().map(|e| e.id.clone()).collect();
            self.with_picks(|picks| picks.retain_known(&ids));
        }
        state
    }

    pub fn state(&self) -> LoadState<EquipmentList> {
        match (self.list.key(), self.selection.get()) {
            (Some(shown), Some(selected)) if shown == selected => self.list.state(),
            _ => LoadState::Idle,
        }
    }

    /// Returns whether the equipment is picked afterwards.
    pub fn toggle(&self, equipment_id: EquipmentId) -> bool {
        self.with_picks(|picks| picks.toggle(equipment_id))
    }

    pub fn is_picked(&self, equipment_id: &EquipmentId) -> bool {
        self.with_picks(|picks| picks.contains(equipment_id))
    }

    /// Picked equipment ids, in pick order
    pub fn picked(&self) -> Vec<EquipmentId> {
        self.with_picks(|picks| picks.to_vec())
    }

    /// Load the curves of every picked piece of equipment.
    pub async fn load_curves(&self) -> LoadState<Vec<CurveSet>> {
        let picked = self.picked();
        if picked.is_empty() {
            self.curve_sets.reset();
            return LoadState::Idle;
        }
        let ticket = self.curve_sets.begin(picked.clone());
        let mut sets = Vec::with_capacity(picked.len());
        let mut failure: Option<ClientError> = None;
        for equipment_id in picked {
            let result = self
                .queries
                .fetch(QueryKey::Curves(equipment_id.clone()), || self.curves.list(&equipment_id))
                .await;
            match result {
                Ok(curves) => sets.push(CurveSet { equipment_id, curves }),
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }
        let result = match failure {
            Some(e) => Err(e),
            None => Ok(sets),
        };
        self.curve_sets.settle(ticket, result);
        self.curve_sets.state()
    }

    pub fn curve_sets(&self) -> LoadState<Vec<CurveSet>> {
        self.curve_sets.state()
    }

    pub fn analysis_request(&self) -> Result<AnalysisRequest, CoordinationError> {
        let project_id = self.selection.get().ok_or(CoordinationError::NoProject)?;
        let equipment_ids = self.picked();
        if equipment_ids.is_empty() {
            return Err(CoordinationError::NothingSelected);
        }
        Ok(AnalysisRequest {
            project_id,
            equipment_ids,
        })
    }

    /// Hand the picked set to the configured engine.
    pub async fn analyze(&self) -> Result<Simulation, CoordinationError> {
        let engine = self.engine.clone().ok_or(CoordinationError::NoEngine)?;
        let request = self.analysis_request()?;
        info!(
            project_id = %request.project_id,
            equipment = request.equipment_ids.len(),
            "starting coordination analysis"
        );
        let simulation = engine.analyze(&request).await?;
        info!(simulation_id = %simulation.id, status = %simulation.status, "coordination analysis submitted");
        Ok(simulation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::domain::{SimulationId, SimulationStatus, SimulationType};
    use serde_json::json;

    struct EchoEngine;

    #[async_trait]
    impl CoordinationEngine for EchoEngine {
        async fn analyze(&self, request: &AnalysisRequest) -> anyhow::Result<Simulation> {
            let ts = chrono::DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")?;
            Ok(Simulation {
                id: SimulationId::new("s1"),
                project_id: request.project_id.clone(),
                name: format!("{} devices", request.equipment_ids.len()),
                simulation_type: SimulationType::Coordination,
                status: SimulationStatus::Pending,
                results: None,
                created_at: ts,
                updated_at: ts,
            })
        }
    }

    fn view() -> (AppContext, CoordinationView) {
        let api = ApiClient::with_base_url("http://127.0.0.1:9").unwrap();
        let ctx = AppContext::new(api, SelectionContext::in_memory());
        let view = CoordinationView::new(&ctx);
        (ctx, view)
    }

    #[test]
    fn test_picks_cleared_on_project_change() {
        let (ctx, view) = view();
        ctx.selection.set(Some(ProjectId::new("p1")));
        view.toggle(EquipmentId::new("e1"));
        view.toggle(EquipmentId::new("e2"));
        assert_eq!(view.picked().len(), 2);

        ctx.selection.set(Some(ProjectId::new("p2")));
        assert!(view.picked().is_empty());
        assert!(!view.is_picked(&EquipmentId::new("e1")));
    }

    #[test]
    fn test_analysis_request() {
        let (ctx, view) = view();
        assert!(matches!(view.analysis_request(), Err(CoordinationError::NoProject)));

        ctx.selection.set(Some(ProjectId::new("p1")));
        assert!(matches!(
            view.analysis_request(),
            Err(CoordinationError::NothingSelected)
        ));

        view.toggle(EquipmentId::new("e2"));
        view.toggle(EquipmentId::new("e1"));
        let request = view.analysis_request().unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "projectId": "p1", "equipmentIds": ["e2", "e1"] })
        );
    }

    #[tokio::test]
    async fn test_analyze_requires_engine() {
        let (ctx, view) = view();
        ctx.selection.set(Some(ProjectId::new("p1")));
        view.toggle(EquipmentId::new("e1"));
        assert!(matches!(view.analyze().await, Err(CoordinationError::NoEngine)));

        let view = view.with_engine(Arc::new(EchoEngine));
        let simulation = view.analyze().await.unwrap();
        assert_eq!(simulation.name, "1 devices");
        assert_eq!(simulation.project_id, ProjectId::new("p1"));
    }

    #[tokio::test]
    async fn test_no_picks_means_idle_curves() {
        let (_ctx, view) = view();
        assert_eq!(view.load_curves().await, LoadState::Idle);
    }
}
