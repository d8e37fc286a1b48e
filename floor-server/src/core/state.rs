//! Server State
//!
//! All engines are explicit instances wired here at startup with their
//! dependencies injected, then passed by reference (via `State`) to
//! handlers. There is no ambient global state anywhere in the service.

use crate::core::{Config, Result};
use crate::floor::{BillingEngine, FloorStorage, OrderWorkflow, TableLedger};
use crate::services::CatalogService;
use std::path::Path;
use std::sync::Arc;

/// Database file name under the work directory
const DB_FILE: &str = "floor.redb";

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub storage: FloorStorage,
    pub catalog: Arc<CatalogService>,
    pub ledger: Arc<TableLedger>,
    pub workflow: Arc<OrderWorkflow>,
    pub billing: Arc<BillingEngine>,
}

impl ServerState {
    /// Open storage under the configured work dir and wire the engines
    pub fn initialize(config: &Config) -> Result<Self> {
        std::fs::create_dir_all(&config.work_dir)?;
        let db_path = Path::new(&config.work_dir).join(DB_FILE);
        tracing::info!(path = %db_path.display(), "Opening floor storage");
        let storage = FloorStorage::open(db_path)?;
        Self::with_storage(config.clone(), storage)
    }

    /// Wire the engines over existing storage
    pub fn with_storage(config: Config, storage: FloorStorage) -> Result<Self> {
        let catalog = Arc::new(CatalogService::new(storage.clone())?);
        let ledger = Arc::new(TableLedger::new(storage.clone()));
        let workflow = Arc::new(OrderWorkflow::new(
            storage.clone(),
            ledger.clone(),
            catalog.clone(),
        ));
        let billing = Arc::new(BillingEngine::new(storage.clone(), ledger.clone()));

        Ok(Self {
            config: Arc::new(config),
            storage,
            catalog,
            ledger,
            workflow,
            billing,
        })
    }
}
