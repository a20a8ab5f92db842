pub mod auth;
pub mod inventory_service;
pub use inventory_service::{InventoryService, RowLookup, build_inventory_rows};
pub mod restock_service;
pub use restock_service::{RestockDialog, RestockService};
pub mod tenancy_service;
pub use tenancy_service::TenantService;
