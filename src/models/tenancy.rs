// src/models/tenancy.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Tenant (a "Organização"). Só superusuários podem listar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
}
