//! PowerProtect client library.
//!
//! Typed access to the protection-project backend: projects, equipment,
//! protection curves and network models, plus the selection state and
//! per-screen view-models that drive the front end.

pub mod api;
pub mod config;
pub mod context;
pub mod domain;
pub mod forms;
pub mod query;
pub mod selection;
pub mod services;
pub mod telemetry;
pub mod views;

pub use api::{ApiClient, ClientError};
pub use context::AppContext;
pub use selection::SelectionContext;
