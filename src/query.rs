//! Query cache and keyed loading slots.
//!
//! [`QueryClient`] caches fetched resources by [`QueryKey`]; mutations
//! invalidate keys before the dependent view re-fetches, so a view never reads
//! a value cached before its own write. [`KeyedQuery`] holds one view's loading
//! state and drops responses that arrive for a key the view no longer shows.

use parking_lot::{Mutex, RwLock};
use std::{any::Any, collections::HashMap, future::Future, sync::Arc};
use tracing::debug;

use crate::api::ClientError;
use crate::domain::{CurveId, EquipmentId, ProjectId};

/// Cache key of a list or single-record query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Projects,
    Project(ProjectId),
    Equipments(ProjectId),
    Equipment(EquipmentId),
    Curves(EquipmentId),
    Curve(CurveId),
    Network(ProjectId),
}

type CachedValue = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
struct QueryCache {
    entries: HashMap<QueryKey, CachedValue>,
    /// Bumped on every invalidation of a key
    epochs: HashMap<QueryKey, u64>,
}

impl QueryCache {
    fn epoch(&self, key: &QueryKey) -> u64 {
        self.epochs.get(key).copied().unwrap_or(0)
    }
}

/// Shared resource cache
#[derive(Clone, Default)]
pub struct QueryClient {
    inner: Arc<RwLock<QueryCache>>,
}

impl QueryClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, or run `fetcher` and cache its result.
    ///
    /// A result whose key was invalidated while the request was in flight is
    /// handed back to the caller but not cached.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<Arc<T>, ClientError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        if let Some(hit) = self.cached::<T>(&key) {
            debug!(?key, "query cache hit");
            return Ok(hit);
        }

        let epoch = self.inner.read().epoch(&key);
        let value = Arc::new(fetcher().await?);

        let mut cache = self.inner.write();
        if cache.epoch(&key) == epoch {
            cache.entries.insert(key, value.clone() as CachedValue);
        } else {
            debug!(?key, "query invalidated while in flight; not caching");
        }
        Ok(value)
    }

    pub fn cached<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.inner
            .read()
            .entries
            .get(key)
            .cloned()
            .and_then(|value| value.downcast::<T>().ok())
    }

    pub fn is_cached(&self, key: &QueryKey) -> bool {
        self.inner.read().entries.contains_key(key)
    }

    pub fn invalidate(&self, key: &QueryKey) {
        let mut cache = self.inner.write();
        cache.entries.remove(key);
        *cache.epochs.entry(key.clone()).or_insert(0) += 1;
        debug!(?key, "query invalidated");
    }

    pub fn invalidate_all<'a>(&self, keys: impl IntoIterator<Item = &'a QueryKey>) {
        for key in keys {
            self.invalidate(key);
        }
    }
}

impl std::fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryClient")
            .field("cached", &self.inner.read().entries.len())
            .finish()
    }
}

// ============================================================================
// Keyed loading slot
// ============================================================================

/// Loading state of one view query
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    /// Nothing to load, e.g. no project selected
    Idle,
    Loading,
    Ready(T),
    Failed(ClientError),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ClientError> {
        match self {
            LoadState::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Receipt for an issued request: the key it was issued for and its sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket<K> {
    key: K,
    seq: u64,
}

impl<K> Ticket<K> {
    pub fn key(&self) -> &K {
        &self.key
    }
}

struct Slot<K, T> {
    key: Option<K>,
    seq: u64,
    state: LoadState<T>,
}

/// A view's loading state, tagged with the key it currently shows
pub struct KeyedQuery<K, T> {
    slot: Mutex<Slot<K, T>>,
}

impl<K, T> Default for KeyedQuery<K, T> {
    fn default() -> Self {
        Self {
            slot: Mutex::new(Slot {
                key: None,
                seq: 0,
                state: LoadState::Idle,
            }),
        }
    }
}

impl<K, T> KeyedQuery<K, T>
where
    K: Clone + PartialEq,
    T: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a request for `key`. Data already shown for the same key stays
    /// visible until the new result lands; data for another key is dropped.
    pub fn begin(&self, key: K) -> Ticket<K> {
        let mut slot = self.slot.lock();
        slot.seq += 1;
        let same_key = slot.key.as_ref() == Some(&key);
        if !same_key || !matches!(slot.state, LoadState::Ready(_)) {
            slot.state = LoadState::Loading;
        }
        slot.key = Some(key.clone());
        Ticket { key, seq: slot.seq }
    }

    /// Apply a result. Returns `false`, leaving state untouched, when the
    /// ticket is not the latest request for the current key.
    pub fn settle(&self, ticket: Ticket<K>, result: Result<T, ClientError>) -> bool {
        let mut slot = self.slot.lock();
        if slot.seq != ticket.seq || slot.key.as_ref() != Some(&ticket.key) {
            return false;
        }
        slot.state = match result {
            Ok(data) => LoadState::Ready(data),
            Err(err) => LoadState::Failed(err),
        };
        true
    }

    /// Back to idle; any in-flight request becomes stale.
    pub fn reset(&self) {
        let mut slot = self.slot.lock();
        slot.seq += 1;
        slot.key = None;
        slot.state = LoadState::Idle;
    }

    pub fn key(&self) -> Option<K> {
        self.slot.lock().key.clone()
    }

    pub fn state(&self) -> LoadState<T> {
        self.slot.lock().state.clone()
    }

    pub fn data(&self) -> Option<T> {
        self.slot.lock().state.data().cloned()
    }
}
