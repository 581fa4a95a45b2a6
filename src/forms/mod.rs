//! Form and dialog view-models: unsaved text edits, the single open dialog,
//! and the multi-select used by the coordination workflow.

pub mod curve;
pub mod dialog;
pub mod editor;
pub mod equipment;
pub mod input;
pub mod multiselect;
pub mod project;

pub use curve::{CurveForm, PointRow};
pub use dialog::{DialogState, Submission};
pub use editor::{EditorError, EntityEditor, EntityForm};
pub use equipment::EquipmentForm;
pub use input::{FormError, PositiveNumber};
pub use multiselect::SelectionSet;
pub use project::ProjectForm;
