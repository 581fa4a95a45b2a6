use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

use super::{DialogState, FormError};
use crate::api::ClientError;
use crate::domain::Entity;
use crate::query::QueryClient;
use crate::services::{CrudService, IdOf, Mutation};

/// Text fields of one entity family's create/edit dialog
pub trait EntityForm<S: CrudService>: Default + Clone + Send + Sync + 'static {
    /// Pre-fill the fields from an existing record
    fn from_entity(entity: &S::Entity) -> Self;

    fn to_draft(&self, parent: &S::Parent) -> Result<S::Draft, FormError>;

    fn to_patch(&self) -> Result<S::Patch, FormError>;
}

#[derive(Debug, Clone, Error)]
pub enum EditorError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("no dialog is open")]
    NotOpen,

    #[error("a submission is already in flight")]
    Pending,
}

pub type EditorDialog<S> = DialogState<<S as CrudService>::Entity, EditorError>;

enum Request<S: CrudService> {
    Create(S::Draft),
    Update(IdOf<S>, S::Patch),
    Delete(S::Entity),
}

struct EditorState<S: CrudService, F> {
    dialog: EditorDialog<S>,
    form: F,
    /// Parent a create dialog was opened under
    parent: Option<S::Parent>,
    /// Bumped whenever a dialog is opened or closed
    generation: u64,
}

/// Create/edit/delete workflow for one entity family.
///
/// Holds the open dialog and the form text. A successful submission closes
/// the dialog and invalidates the affected query keys; a failed one leaves the
/// dialog open with the error. Form errors are reported before any request is
/// sent.
pub struct EntityEditor<S: CrudService, F> {
    service: S,
    queries: QueryClient,
    state: Mutex<EditorState<S, F>>,
}

impl<S, F> EntityEditor<S, F>
where
    S: CrudService,
    F: EntityForm<S>,
{
    pub fn new(service: S, queries: QueryClient) -> Self {
        Self {
            service,
            queries,
            state: Mutex::new(EditorState {
                dialog: DialogState::Closed,
                form: F::default(),
                parent: None,
                generation: 0,
            }),
        }
    }

    fn open(&self, dialog: EditorDialog<S>, form: F, parent: Option<S::Parent>) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.dialog = dialog;
        state.form = form;
        state.parent = parent;
    }

    /// Open an empty create dialog for a record under `parent`
    pub fn open_create(&self, parent: S::Parent) {
        self.open(DialogState::creating(), F::default(), Some(parent));
    }

    pub fn open_edit(&self, target: S::Entity) {
        let form = F::from_entity(&target);
        self.open(DialogState::editing(target), form, None);
    }

    pub fn open_delete(&self, target: S::Entity) {
        self.open(DialogState::confirming_delete(target), F::default(), None);
    }

    pub fn close(&self) {
        self.open(DialogState::Closed, F::default(), None);
    }

    pub fn dialog(&self) -> EditorDialog<S> {
        self.state.lock().dialog.clone()
    }

    pub fn form(&self) -> F {
        self.state.lock().form.clone()
    }

    pub fn update_form(&self, edit: impl FnOnce(&mut F)) {
        edit(&mut self.state.lock().form);
    }

    /// Submit the open dialog. Returns the created, updated or deleted record.
    pub async fn submit(&self) -> Result<S::Entity, EditorError> {
        let (request, generation) = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            if state.dialog.is_pending() {
                return Err(EditorError::Pending);
            }
            let request = match &state.dialog {
                DialogState::Closed => return Err(EditorError::NotOpen),
                DialogState::Creating(_) => match &state.parent {
                    Some(parent) => state.form.to_draft(parent).map(Request::<S>::Create),
                    None => Err(FormError::NoParent),
                },
                DialogState::Editing { target, .. } => state
                    .form
                    .to_patch()
                    .map(|patch| Request::Update(target.id().clone(), patch)),
                DialogState::ConfirmingDelete { target, .. } => Ok(Request::Delete(target.clone())),
            };
            match request {
                Ok(request) => {
                    state.dialog.start();
                    (request, state.generation)
                }
                Err(e) => {
                    debug!(error = %e, "form rejected before submission");
                    let err = EditorError::Form(e);
                    state.dialog.fail(err.clone());
                    return Err(err);
                }
            }
        };

        let outcome = match request {
            Request::Create(draft) => self
                .service
                .create(&draft)
                .await
                .map(|entity| (entity, Mutation::Create)),
            Request::Update(id, patch) => self
                .service
                .update(&id, &patch)
                .await
                .map(|entity| (entity, Mutation::Update)),
            Request::Delete(target) => self
                .service
                .delete(target.id())
                .await
                .map(|()| (target, Mutation::Delete)),
        };

        match outcome {
            Ok((entity, mutation)) => {
                self.queries
                    .invalidate_all(&S::invalidation_keys(&entity, mutation));
                let mut state = self.state.lock();
                if state.generation == generation {
                    state.generation += 1;
                    state.dialog.close();
                    state.form = F::default();
                    state.parent = None;
                }
                Ok(entity)
            }
            Err(e) => {
                warn!(error = %e, error_type = e.error_type(), "submission failed");
                let err = EditorError::Client(e);
                let mut state = self.state.lock();
                if state.generation == generation {
                    state.dialog.fail(err.clone());
                }
                Err(err)
            }
        }
    }
}
