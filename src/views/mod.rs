//! Per-screen view-models.
//!
//! Each view reads the shared [`SelectionContext`](crate::SelectionContext),
//! loads through the [`QueryClient`](crate::query::QueryClient) and keeps its
//! own keyed loading slot, so a late response for a project the screen no
//! longer shows is dropped.

pub mod coordination;
pub mod dashboard;
pub mod equipments;
pub mod network;
pub mod projects;

pub use coordination::{AnalysisRequest, CoordinationEngine, CoordinationError, CoordinationView, CurveSet};
pub use dashboard::DashboardView;
pub use equipments::EquipmentsView;
pub use network::{NetworkEditor, NetworkView};
pub use projects::ProjectsView;
