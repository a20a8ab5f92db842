// src/models/inventory.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Valores exibidos quando o produto de um item não é encontrado
pub const UNKNOWN_PRODUCT_NAME: &str = "Unknown";
pub const UNKNOWN_PRODUCT_SKU: &str = "—";

// --- 1. Produto (catálogo global, igual para todos os tenants) ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub sku: String,
}

// --- 2. Item de inventário (por tenant) ---
// `product_id` aponta para um Product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub current_stock: i64,
    pub min_stock: i64,
}

// --- 3. Linha da tabela (derivada, só para exibição) ---
// Os campos do item + nome e SKU do produto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryRow {
    #[serde(flatten)]
    pub item: InventoryItem,
    pub product_name: String,
    pub product_sku: String,
}

impl InventoryRow {
    pub fn id(&self) -> Uuid {
        self.item.id
    }

    // Linha para um id que a listagem não trouxe; o backend decide se ele existe
    pub fn unresolved(inventory_id: Uuid) -> Self {
        Self {
            item: InventoryItem {
                id: inventory_id,
                product_id: Uuid::nil(),
                current_stock: 0,
                min_stock: 0,
            },
            product_name: UNKNOWN_PRODUCT_NAME.to_string(),
            product_sku: UNKNOWN_PRODUCT_SKU.to_string(),
        }
    }
}

// --- 4. Pedido de reposição ---
#[derive(Debug, Clone, Serialize, Validate)]
pub struct SupplyRequest {
    #[validate(range(min = 1, message = "Quantity must be at least 1."))]
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyResponse {
    pub status: String,
    pub message: String,
    pub external_reference_id: String,
}

// Paginação opcional do GET /inventory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}
