pub mod api_repo;
pub use api_repo::{HttpInventoryApi, InventoryApi};
pub mod session_repo;
pub use session_repo::{FileSessionStore, MemorySessionStore, SessionStore};

#[cfg(test)]
pub(crate) mod fake_api;
