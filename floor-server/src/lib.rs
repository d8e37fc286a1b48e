//! Comanda Floor Server - restaurant order/table/billing coordination
//!
//! # Architecture overview
//!
//! The server keeps three linked entities (dining table, order, bill)
//! mutually consistent while waiter, kitchen and cashier clients mutate
//! them concurrently:
//!
//! - **Floor engine** (`floor`): table ledger, order workflow and billing
//!   engine over transactional embedded storage
//! - **Catalog** (`services`): menu item source of truth with in-memory
//!   caching; the order path reads it through the `MenuCatalog` trait
//! - **HTTP API** (`api`): RESTful surface for the front ends
//!
//! # Module structure
//!
//! ```text
//! floor-server/src/
//! ├── core/          # Config, state wiring, server lifecycle
//! ├── floor/         # Coordination engine (storage, ledger, workflow, billing)
//! ├── services/      # Menu catalog service
//! ├── api/           # HTTP routes and handlers
//! └── utils/         # App errors, logging
//! ```

pub mod api;
pub mod core;
pub mod floor;
pub mod services;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use floor::{
    BillingEngine, FloorError, FloorResult, FloorStorage, OrderWorkflow, TableLedger,
};
pub use services::{CatalogService, MenuCatalog};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ______                                __
  / ____/___  ____ ___  ____ _____  ____/ /___ _
 / /   / __ \/ __ `__ \/ __ `/ __ \/ __  / __ `/
/ /___/ /_/ / / / / / / /_/ / / / / /_/ / /_/ /
\____/\____/_/ /_/ /_/\__,_/_/ /_/\__,_/\__,_/
    "#
    );
}
