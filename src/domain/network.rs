//! Network topology records.
//!
//! Sub-records reference buses by their local `id` string. Those references are
//! [`BusRef`] values and are checked against the owning [`Topology`]'s bus set
//! whenever a model is loaded, edited or saved.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fmt};
use strum::{Display, EnumString};
use thiserror::Error;

use super::{NetworkId, ProjectId, Timestamp};

/// Reference from a network element to a bus in the same model
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusRef(String);

impl BusRef {
    pub fn new(bus_id: impl Into<String>) -> Self {
        Self(bus_id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BusRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BusRef {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Kind of topology element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ElementKind {
    Bus,
    Line,
    Transformer,
    Load,
    Generator,
    ExternalGrid,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TopologyError {
    #[error("{kind} {element_id}: {field} references unknown bus {bus}")]
    DanglingReference {
        kind: ElementKind,
        element_id: String,
        field: &'static str,
        bus: BusRef,
    },
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: ElementKind, id: String },
    #[error("bus {bus} is still referenced by {kind} {element_id}")]
    BusInUse {
        bus: BusRef,
        kind: ElementKind,
        element_id: String,
    },
    #[error("no {kind} with id {id}")]
    UnknownElement { kind: ElementKind, id: String },
}

// ============================================================================
// Elements
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BusType {
    Slack,
    Pv,
    #[default]
    Pq,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bus {
    pub id: String,
    pub name: String,
    /// kV
    pub nominal_voltage: f64,
    #[serde(rename = "type")]
    pub bus_type: BusType,
    /// Diagram position
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub id: String,
    pub name: String,
    pub from_bus: BusRef,
    pub to_bus: BusRef,
    /// Ohm/km
    pub resistance: f64,
    /// Ohm/km
    pub reactance: f64,
    /// km
    pub length: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionType {
    Yy,
    Yd,
    #[default]
    Dy,
    Dd,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformer {
    pub id: String,
    pub name: String,
    pub primary_bus: BusRef,
    pub secondary_bus: BusRef,
    /// MVA
    pub nominal_power: f64,
    /// kV
    pub primary_voltage: f64,
    /// kV
    pub secondary_voltage: f64,
    /// Percent impedance
    pub impedance: f64,
    pub connection_type: ConnectionType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LoadType {
    #[default]
    ConstantPower,
    ConstantCurrent,
    ConstantImpedance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Load {
    pub id: String,
    pub name: String,
    pub bus: BusRef,
    /// MW
    pub active_power: f64,
    /// Mvar
    pub reactive_power: f64,
    #[serde(rename = "type")]
    pub load_type: LoadType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GeneratorType {
    #[default]
    Synchronous,
    Asynchronous,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Generator {
    pub id: String,
    pub name: String,
    pub bus: BusRef,
    /// MVA
    pub nominal_power: f64,
    /// kV
    pub voltage: f64,
    #[serde(rename = "type")]
    pub generator_type: GeneratorType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalGrid {
    pub id: String,
    pub name: String,
    pub bus: BusRef,
    /// MVA
    pub short_circuit_power: f64,
    /// kV
    pub voltage: f64,
    /// Degrees
    pub angle: f64,
}

// ============================================================================
// Topology
// ============================================================================

/// The element collections of a network model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topology {
    #[serde(default)]
    pub buses: Vec<Bus>,
    #[serde(default)]
    pub lines: Vec<Line>,
    #[serde(default)]
    pub transformers: Vec<Transformer>,
    #[serde(default)]
    pub loads: Vec<Load>,
    #[serde(default)]
    pub generators: Vec<Generator>,
    #[serde(default)]
    pub external_grids: Vec<ExternalGrid>,
}

impl Topology {
    pub fn is_empty(&self) -> bool {
        self.element_count() == 0
    }

    pub fn element_count(&self) -> usize {
        self.buses.len()
            + self.lines.len()
            + self.transformers.len()
            + self.loads.len()
            + self.generators.len()
            + self.external_grids.len()
    }

    pub fn has_bus(&self, bus: &BusRef) -> bool {
        self.buses.iter().any(|b| b.id == bus.as_str())
    }

    /// Every bus reference held by a non-bus element, with its owner
    fn references(&self) -> impl Iterator<Item = (ElementKind, &str, &'static str, &BusRef)> {
        let lines = self.lines.iter().flat_map(|l| {
            [
                (ElementKind::Line, l.id.as_str(), "fromBus", &l.from_bus),
                (ElementKind::Line, l.id.as_str(), "toBus", &l.to_bus),
            ]
        });
        let transformers = self.transformers.iter().flat_map(|t| {
            [
                (ElementKind::Transformer, t.id.as_str(), "primaryBus", &t.primary_bus),
                (ElementKind::Transformer, t.id.as_str(), "secondaryBus", &t.secondary_bus),
            ]
        });
        let loads = self
            .loads
            .iter()
            .map(|l| (ElementKind::Load, l.id.as_str(), "bus", &l.bus));
        let generators = self
            .generators
            .iter()
            .map(|g| (ElementKind::Generator, g.id.as_str(), "bus", &g.bus));
        let grids = self
            .external_grids
            .iter()
            .map(|g| (ElementKind::ExternalGrid, g.id.as_str(), "bus", &g.bus));

        lines.chain(transformers).chain(loads).chain(generators).chain(grids)
    }

    fn ids(&self, kind: ElementKind) -> Vec<&str> {
        match kind {
            ElementKind::Bus => self.buses.iter().map(|e| e.id.as_str()).collect(),
            ElementKind::Line => self.lines.iter().map(|e| e.id.as_str()).collect(),
            ElementKind::Transformer => self.transformers.iter().map(|e| e.id.as_str()).collect(),
            ElementKind::Load => self.loads.iter().map(|e| e.id.as_str()).collect(),
            ElementKind::Generator => self.generators.iter().map(|e| e.id.as_str()).collect(),
            ElementKind::ExternalGrid => self.external_grids.iter().map(|e| e.id.as_str()).collect(),
        }
    }

    /// All reference and id problems in the model, in a stable order.
    pub fn issues(&self) -> Vec<TopologyError> {
        const KINDS: [ElementKind; 6] = [
            ElementKind::Bus,
            ElementKind::Line,
            ElementKind::Transformer,
            ElementKind::Load,
            ElementKind::Generator,
            ElementKind::ExternalGrid,
        ];

        let mut issues: Vec<TopologyError> = KINDS
            .iter()
            .flat_map(|&kind| {
                self.ids(kind)
                    .into_iter()
                    .duplicates()
                    .map(move |id| TopologyError::DuplicateId {
                        kind,
                        id: id.to_string(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        let bus_ids: HashSet<&str> = self.buses.iter().map(|b| b.id.as_str()).collect();
        issues.extend(
            self.references()
                .filter(|(_, _, _, bus)| !bus_ids.contains(bus.as_str()))
                .map(|(kind, element_id, field, bus)| TopologyError::DanglingReference {
                    kind,
                    element_id: element_id.to_string(),
                    field,
                    bus: bus.clone(),
                }),
        );
        issues
    }

    /// Fails with the first problem [`issues`](Self::issues) would report.
    pub fn validate(&self) -> Result<(), TopologyError> {
        match self.issues().into_iter().next() {
            Some(issue) => Err(issue),
            None => Ok(()),
        }
    }

    fn ensure_unique(&self, kind: ElementKind, id: &str) -> Result<(), TopologyError> {
        if self.ids(kind).contains(&id) {
            return Err(TopologyError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
        Ok(())
    }

    fn ensure_bus(
        &self,
        kind: ElementKind,
        element_id: &str,
        field: &'static str,
        bus: &BusRef,
    ) -> Result<(), TopologyError> {
        if !self.has_bus(bus) {
            return Err(TopologyError::DanglingReference {
                kind,
                element_id: element_id.to_string(),
                field,
                bus: bus.clone(),
            });
        }
        Ok(())
    }

    pub fn add_bus(&mut self, bus: Bus) -> Result<(), TopologyError> {
        self.ensure_unique(ElementKind::Bus, &bus.id)?;
        self.buses.push(bus);
        Ok(())
    }

    pub fn add_line(&mut self, line: Line) -> Result<(), TopologyError> {
        self.ensure_unique(ElementKind::Line, &line.id)?;
        self.ensure_bus(ElementKind::Line, &line.id, "fromBus", &line.from_bus)?;
        self.ensure_bus(ElementKind::Line, &line.id, "toBus", &line.to_bus)?;
        self.lines.push(line);
        Ok(())
    }

    pub fn add_transformer(&mut self, transformer: Transformer) -> Result<(), TopologyError> {
        let id = transformer.id.as_str();
        self.ensure_unique(ElementKind::Transformer, id)?;
        self.ensure_bus(ElementKind::Transformer, id, "primaryBus", &transformer.primary_bus)?;
        self.ensure_bus(ElementKind::Transformer, id, "secondaryBus", &transformer.secondary_bus)?;
        self.transformers.push(transformer);
        Ok(())
    }

    pub fn add_load(&mut self, load: Load) -> Result<(), TopologyError> {
        self.ensure_unique(ElementKind::Load, &load.id)?;
        self.ensure_bus(ElementKind::Load, &load.id, "bus", &load.bus)?;
        self.loads.push(load);
        Ok(())
    }

    pub fn add_generator(&mut self, generator: Generator) -> Result<(), TopologyError> {
        self.ensure_unique(ElementKind::Generator, &generator.id)?;
        self.ensure_bus(ElementKind::Generator, &generator.id, "bus", &generator.bus)?;
        self.generators.push(generator);
        Ok(())
    }

    pub fn add_external_grid(&mut self, grid: ExternalGrid) -> Result<(), TopologyError> {
        self.ensure_unique(ElementKind::ExternalGrid, &grid.id)?;
        self.ensure_bus(ElementKind::ExternalGrid, &grid.id, "bus", &grid.bus)?;
        self.external_grids.push(grid);
        Ok(())
    }

    /// Removes an element. A bus can only go once nothing references it.
    pub fn remove(&mut self, kind: ElementKind, id: &str) -> Result<(), TopologyError> {
        if !self.ids(kind).contains(&id) {
            return Err(TopologyError::UnknownElement {
                kind,
                id: id.to_string(),
            });
        }

        if kind == ElementKind::Bus {
            if let Some((owner, owner_id, _, bus)) =
                self.references().find(|(_, _, _, bus)| bus.as_str() == id)
            {
                return Err(TopologyError::BusInUse {
                    bus: bus.clone(),
                    kind: owner,
                    element_id: owner_id.to_string(),
                });
            }
        }

        match kind {
            ElementKind::Bus => self.buses.retain(|e| e.id != id),
            ElementKind::Line => self.lines.retain(|e| e.id != id),
            ElementKind::Transformer => self.transformers.retain(|e| e.id != id),
            ElementKind::Load => self.loads.retain(|e| e.id != id),
            ElementKind::Generator => self.generators.retain(|e| e.id != id),
            ElementKind::ExternalGrid => self.external_grids.retain(|e| e.id != id),
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Network Model
// ============================================================================

/// Network topology of a project; at most one per project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkModel {
    pub id: NetworkId,
    pub project_id: ProjectId,
    pub name: String,
    #[serde(flatten)]
    pub topology: Topology,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Body of the network upsert
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDraft {
    pub name: String,
    #[serde(flatten)]
    pub topology: Topology,
}

impl From<&NetworkModel> for NetworkDraft {
    fn from(model: &NetworkModel) -> Self {
        Self {
            name: model.name.clone(),
            topology: model.topology.clone(),
        }
    }
}
