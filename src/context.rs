use anyhow::{Context, Result};
use tracing::info;

use crate::api::ApiClient;
use crate::config::Config;
use crate::query::QueryClient;
use crate::selection::{FileSelectionStore, SelectionContext};
use crate::services::{CurveService, EquipmentService, NetworkService, ProjectService};

/// Handles shared by every view-model: the HTTP client, the query cache and
/// the selected project.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub api: ApiClient,
    pub queries: QueryClient,
    pub selection: SelectionContext,
}

impl AppContext {
    pub fn new(api: ApiClient, selection: SelectionContext) -> Self {
        Self {
            api,
            queries: QueryClient::new(),
            selection,
        }
    }

    /// Build the client from config and restore the selection from the
    /// configured file, or the platform data directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api = ApiClient::new(&config.api).context("failed to build HTTP client")?;
        let path = match &config.storage.selection_path {
            Some(path) => path.clone(),
            None => FileSelectionStore::default_path()?,
        };
        info!(base_url = %api.base_url(), selection = %path.display(), "app context ready");
        Ok(Self::new(api, SelectionContext::load(FileSelectionStore::new(path))))
    }

    pub fn projects(&self) -> ProjectService {
        ProjectService::new(self.api.clone())
    }

    pub fn equipments(&self) -> EquipmentService {
        EquipmentService::new(self.api.clone())
    }

    pub fn curves(&self) -> CurveService {
        CurveService::new(self.api.clone())
    }

    pub fn network(&self) -> NetworkService {
        NetworkService::new(self.api.clone())
    }
}
