use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::api::ClientError;
use crate::context::AppContext;
use crate::domain::{
    Bus, ElementKind, ExternalGrid, Generator, Line, Load, NetworkDraft, NetworkModel, ProjectId,
    Topology, TopologyError, Transformer,
};
use crate::forms::EditorError;
use crate::query::{KeyedQuery, LoadState, QueryClient, QueryKey};
use crate::selection::SelectionContext;
use crate::services::NetworkService;

/// Network model of the selected project. A project without a model loads as
/// `Ready(None)`, distinct from a failed load.
pub struct NetworkView {
    service: NetworkService,
    queries: QueryClient,
    selection: SelectionContext,
    model: KeyedQuery<ProjectId, Option<NetworkModel>>,
    pub editor: NetworkEditor,
}

impl NetworkView {
    pub fn new(ctx: &AppContext) -> Self {
        let service = ctx.network();
        Self {
            editor: NetworkEditor::new(service.clone(), ctx.queries.clone()),
            service,
            queries: ctx.queries.clone(),
            selection: ctx.selection.clone(),
            model: KeyedQuery::new(),
        }
    }

    /// Load the selected project's model. The editor is reset to the loaded
    /// model unless it holds unsaved changes for the same project.
    pub async fn load(&self) -> LoadState<Option<NetworkModel>> {
        let Some(project_id) = self.selection.get() else {
            self.model.reset();
            return LoadState::Idle;
        };
        let ticket = self.model.begin(project_id.clone());
        let result = self
            .queries
            .fetch(QueryKey::Network(project_id.clone()), || {
                self.service.try_get_by_project(&project_id)
            })
            .await
            .map(|model| (*model).clone());

        let loaded = result.as_ref().ok().cloned();
        if self.model.settle(ticket, result) {
            if let Some(model) = loaded {
                self.editor.load(project_id, model.as_ref());
            }
        }
        self.model.state()
    }

    pub fn state(&self) -> LoadState<Option<NetworkModel>> {
        match (self.model.key(), self.selection.get()) {
            (Some(shown), Some(selected)) if shown == selected => self.model.state(),
            _ => LoadState::Idle,
        }
    }

    /// Dangling or duplicate references in the loaded model
    pub fn topology_issues(&self) -> Vec<TopologyError> {
        match self.state() {
            LoadState::Ready(Some(model)) => model.topology.issues(),
            _ => Vec::new(),
        }
    }

    pub async fn save(&self) -> Result<NetworkModel, EditorError> {
        let model = self.editor.save().await?;
        self.load().await;
        Ok(model)
    }
}

struct EditorState {
    project_id: Option<ProjectId>,
    draft: NetworkDraft,
    dirty: bool,
    pending: bool,
    error: Option<ClientError>,
}

/// Unsaved edits to one project's network model
pub struct NetworkEditor {
    service: NetworkService,
    queries: QueryClient,
    state: Mutex<EditorState>,
}

impl NetworkEditor {
    pub fn new(service: NetworkService, queries: QueryClient) -> Self {
        Self {
            service,
            queries,
            state: Mutex::new(EditorState {
                project_id: None,
                draft: NetworkDraft::default(),
                dirty: false,
                pending: false,
                error: None,
            }),
        }
    }

    /// Start editing `project_id` from `model`, or from an empty topology.
    /// Unsaved changes to the same project are kept.
    pub fn load(&self, project_id: ProjectId, model: Option<&NetworkModel>) {
        let mut state = self.state.lock();
        if state.dirty && state.project_id.as_ref() == Some(&project_id) {
            debug!(project_id = %project_id, "keeping unsaved network edits");
            return;
        }
        state.draft = model.map(NetworkDraft::from).unwrap_or_default();
        state.project_id = Some(project_id);
        state.dirty = false;
        state.error = None;
    }

    pub fn project_id(&self) -> Option<ProjectId> {
        self.state.lock().project_id.clone()
    }

    pub fn draft(&self) -> NetworkDraft {
        self.state.lock().draft.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }

    pub fn is_pending(&self) -> bool {
        self.state.lock().pending
    }

    pub fn error(&self) -> Option<ClientError> {
        self.state.lock().error.clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        let mut state = self.state.lock();
        state.draft.name = name.into();
        state.dirty = true;
    }

    fn edit(
        &self,
        apply: impl FnOnce(&mut Topology) -> Result<(), TopologyError>,
    ) -> Result<(), TopologyError> {
        let mut state = self.state.lock();
        apply(&mut state.draft.topology)?;
        state.dirty = true;
        Ok(())
    }

    pub fn add_bus(&self, bus: Bus) -> Result<(), TopologyError> {
        self.edit(|t| t.add_bus(bus))
    }

    pub fn add_line(&self, line: Line) -> Result<(), TopologyError> {
        self.edit(|t| t.add_line(line))
    }

    pub fn add_transformer(&self, transformer: Transformer) -> Result<(), TopologyError> {
        self.edit(|t| t.add_transformer(transformer))
    }

    pub fn add_load(&self, load: Load) -> Result<(), TopologyError> {
        self.edit(|t| t.add_load(load))
    }

    pub fn add_generator(&self, generator: Generator) -> Result<(), TopologyError> {
        self.edit(|t| t.add_generator(generator))
    }

    pub fn add_external_grid(&self, grid: ExternalGrid) -> Result<(), TopologyError> {
        self.edit(|t| t.add_external_grid(grid))
    }

    pub fn remove(&self, kind: ElementKind, id: &str) -> Result<(), TopologyError> {
        self.edit(|t| t.remove(kind, id))
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.draft.topology.clear();
        state.dirty = true;
    }

    /// Upsert the draft for the project being edited. On failure the edits and
    /// the error are kept.
    pub async fn save(&self) -> Result<NetworkModel, EditorError> {
        let (project_id, draft) = {
            let mut state = self.state.lock();
            if state.pending {
                return Err(EditorError::Pending);
            }
            let project_id = state.project_id.clone().ok_or(EditorError::NotOpen)?;
            state.pending = true;
            state.error = None;
            (project_id, state.draft.clone())
        };

        let result = self.service.save(&project_id, &draft).await;

        let mut state = self.state.lock();
        state.pending = false;
        match result {
            Ok(model) => {
                self.queries.invalidate(&QueryKey::Network(project_id.clone()));
                if state.project_id.as_ref() == Some(&project_id) {
                    state.draft = NetworkDraft::from(&model);
                    state.dirty = false;
                }
                Ok(model)
            }
            Err(e) => {
                warn!(project_id = %project_id, error = %e, "network save failed");
                state.error = Some(e.clone());
                Err(EditorError::Client(e))
            }
        }
    }
}
