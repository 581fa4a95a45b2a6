pub mod curve;
pub mod equipment;
pub mod network;
pub mod project;
pub mod simulation;
pub mod stats;
pub mod types;

pub use curve::*;
pub use equipment::*;
pub use network::*;
pub use project::*;
pub use simulation::*;
pub use stats::*;
pub use types::*;
