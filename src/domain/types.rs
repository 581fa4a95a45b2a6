use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-owned ISO-8601 timestamp
pub type Timestamp = DateTime<FixedOffset>;

// ============================================================================
// Opaque Identifiers
// ============================================================================

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Identifier of a [`Project`](super::Project)
    ProjectId
);
opaque_id!(
    /// Identifier of an [`Equipment`](super::Equipment)
    EquipmentId
);
opaque_id!(
    /// Identifier of a [`ProtectionCurve`](super::ProtectionCurve)
    CurveId
);
opaque_id!(
    /// Identifier of a [`NetworkModel`](super::NetworkModel)
    NetworkId
);
opaque_id!(
    /// Identifier of a [`Simulation`](super::Simulation)
    SimulationId
);

// ============================================================================
// Entity Trait
// ============================================================================

/// A server-persisted record with an opaque id.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Clone + Eq + fmt::Display + fmt::Debug + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;

    /// Human-readable name, used in confirmation prompts
    fn name(&self) -> &str;
}
