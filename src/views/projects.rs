use std::sync::Arc;
use tracing::info;

use crate::context::AppContext;
use crate::domain::{Project, ProjectId};
use crate::forms::{DialogState, EditorError, EntityEditor, ProjectForm};
use crate::query::{KeyedQuery, LoadState, QueryClient, QueryKey};
use crate::selection::SelectionContext;
use crate::services::{CrudService, ProjectService};

pub type ProjectList = Arc<Vec<Project>>;

/// Project list, selector and project dialogs
pub struct ProjectsView {
    service: ProjectService,
    queries: QueryClient,
    selection: SelectionContext,
    list: KeyedQuery<(), ProjectList>,
    pub editor: EntityEditor<ProjectService, ProjectForm>,
}

impl ProjectsView {
    pub fn new(ctx: &AppContext) -> Self {
        let service = ctx.projects();
        Self {
            editor: EntityEditor::new(service.clone(), ctx.queries.clone()),
            service,
            queries: ctx.queries.clone(),
            selection: ctx.selection.clone(),
            list: KeyedQuery::new(),
        }
    }

    pub async fn load(&self) -> LoadState<ProjectList> {
        let ticket = self.list.begin(());
        let result = self
            .queries
            .fetch(QueryKey::Projects, || self.service.list(&()))
            .await;
        self.list.settle(ticket, result);
        self.list.state()
    }

    pub fn state(&self) -> LoadState<ProjectList> {
        self.list.state()
    }

    pub fn projects(&self) -> ProjectList {
        self.list.data().unwrap_or_default()
    }

    pub fn select(&self, project_id: Option<ProjectId>) {
        self.selection.set(project_id);
    }

    /// The selected project, if it is in the loaded list
    pub fn selected_project(&self) -> Option<Project> {
        let selected = self.selection.get()?;
        self.projects().iter().find(|p| p.id == selected).cloned()
    }

    /// Submit the open project dialog, then reload the list. Deleting the
    /// selected project clears the selection.
    pub async fn submit(&self) -> Result<Project, EditorError> {
        let deleting = matches!(self.editor.dialog(), DialogState::ConfirmingDelete { .. });
        let project = self.editor.submit().await?;
        if deleting && self.selection.get().as_ref() == Some(&project.id) {
            info!(project_id = %project.id, "selected project deleted; clearing selection");
            self.selection.clear();
        }
        self.load().await;
        Ok(project)
    }
}
