use std::sync::Arc;

use crate::context::AppContext;
use crate::domain::{Equipment, ProjectId};
use crate::forms::{EditorError, EntityEditor, EquipmentForm, FormError};
use crate::query::{KeyedQuery, LoadState, QueryClient, QueryKey};
use crate::selection::SelectionContext;
use crate::services::{CrudService, EquipmentService};

pub type EquipmentList = Arc<Vec<Equipment>>;

/// Load the selected project's equipment into `list`. Shared with the
/// coordination screen.
pub(crate) async fn load_equipment(
    service: &EquipmentService,
    queries: &QueryClient,
    selection: &SelectionContext,
    list: &KeyedQuery<ProjectId, EquipmentList>,
) -> LoadState<EquipmentList> {
    let Some(project_id) = selection.get() else {
        list.reset();
        return LoadState::Idle;
    };
    let ticket = list.begin(project_id.clone());
    let result = queries
        .fetch(QueryKey::Equipments(project_id.clone()), || service.list(&project_id))
        .await;
    list.settle(ticket, result);
    list.state()
}

/// Equipment of the selected project and the equipment dialogs
pub struct EquipmentsView {
    service: EquipmentService,
    queries: QueryClient,
    selection: SelectionContext,
    list: KeyedQuery<ProjectId, EquipmentList>,
    pub editor: EntityEditor<EquipmentService, EquipmentForm>,
}

impl EquipmentsView {
    pub fn new(ctx: &AppContext) -> Self {
        let service = ctx.equipments();
        Self {
            editor: EntityEditor::new(service.clone(), ctx.queries.clone()),
            service,
            queries: ctx.queries.clone(),
            selection: ctx.selection.clone(),
            list: KeyedQuery::new(),
        }
    }

    /// Load the list for the selected project; `Idle` when none is selected.
    pub async fn load(&self) -> LoadState<EquipmentList> {
        load_equipment(&self.service, &self.queries, &self.selection, &self.list).await
    }

    /// State of the list for the currently selected project. A list loaded
    /// for another project reads as `Idle` until reloaded.
    pub fn state(&self) -> LoadState<EquipmentList> {
        match (self.list.key(), self.selection.get()) {
            (Some(shown), Some(selected)) if shown == selected => self.list.state(),
            _ => LoadState::Idle,
        }
    }

    pub fn equipments(&self) -> EquipmentList {
        self.state().data().cloned().unwrap_or_default()
    }

    /// Open the create dialog under the selected project.
    pub fn open_create(&self) -> Result<(), FormError> {
        let project_id = self.selection.get().ok_or(FormError::NoParent)?;
        self.editor.open_create(project_id);
        Ok(())
    }

    pub async fn submit(&self) -> Result<Equipment, EditorError> {
        let equipment = self.editor.submit().await?;
        self.load().await;
        Ok(equipment)
    }
}
