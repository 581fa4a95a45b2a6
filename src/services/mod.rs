//! Resource services: stateless mappers from domain operations to HTTP calls.

pub mod curve;
pub mod equipment;
pub mod network;
pub mod project;

pub use curve::CurveService;
pub use equipment::EquipmentService;
pub use network::NetworkService;
pub use project::ProjectService;

use async_trait::async_trait;
use serde::Serialize;

use crate::api::ClientError;
use crate::domain::Entity;
use crate::query::QueryKey;

/// Id type of a service's entity
pub type IdOf<S> = <<S as CrudService>::Entity as Entity>::Id;

/// Kind of a successful mutation, for invalidation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
}

/// Uniform list/get/create/update/delete contract of one entity family.
#[async_trait]
pub trait CrudService: Clone + Send + Sync + 'static {
    type Entity: Entity;
    /// Create payload
    type Draft: Serialize + Send + Sync;
    /// Partial update payload
    type Patch: Serialize + Send + Sync;
    /// What `list` is scoped to; `()` for root-level families
    type Parent: Clone + Send + Sync;

    async fn list(&self, parent: &Self::Parent) -> Result<Vec<Self::Entity>, ClientError>;

    async fn get(&self, id: &IdOf<Self>) -> Result<Self::Entity, ClientError>;

    async fn create(&self, draft: &Self::Draft) -> Result<Self::Entity, ClientError>;

    async fn update(&self, id: &IdOf<Self>, patch: &Self::Patch)
        -> Result<Self::Entity, ClientError>;

    async fn delete(&self, id: &IdOf<Self>) -> Result<(), ClientError>;

    fn list_key(parent: &Self::Parent) -> QueryKey;

    fn item_key(id: &IdOf<Self>) -> QueryKey;

    /// Parent the entity is listed under
    fn parent_of(entity: &Self::Entity) -> Self::Parent;

    /// Keys of dependent queries orphaned when the entity is deleted
    fn cascade_keys(_id: &IdOf<Self>) -> Vec<QueryKey> {
        Vec::new()
    }

    /// Every key a successful mutation of `entity` must invalidate
    fn invalidation_keys(entity: &Self::Entity, mutation: Mutation) -> Vec<QueryKey> {
        let mut keys = vec![Self::list_key(&Self::parent_of(entity))];
        if mutation != Mutation::Create {
            keys.push(Self::item_key(entity.id()));
        }
        if mutation == Mutation::Delete {
            keys.extend(Self::cascade_keys(entity.id()));
        }
        keys
    }
}
