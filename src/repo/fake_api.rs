// src/repo/fake_api.rs
// InventoryApi em memória para os testes unitários.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{Credential, LoginPayload, MeResponse, TokenResponse},
        inventory::{InventoryItem, PageQuery, Product, SupplyRequest, SupplyResponse},
        tenancy::Tenant,
    },
    repo::InventoryApi,
};

// Resposta programada (AppError não é Clone)
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Unauthorized,
    Fail(&'static str),
}

impl<T: Clone> Reply<T> {
    fn to_result(&self) -> Result<T, AppError> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Unauthorized => Err(AppError::Unauthorized),
            Reply::Fail(message) => Err(AppError::Backend(message.to_string())),
        }
    }
}

pub struct FakeApi {
    pub login: Reply<TokenResponse>,
    pub identity: Reply<MeResponse>,
    pub inventory: Reply<Vec<InventoryItem>>,
    pub tenants: Reply<Vec<Tenant>>,
    pub products: Reply<Vec<Product>>,
    pub resupply: Reply<SupplyResponse>,
    pub(crate) calls: Mutex<HashMap<&'static str, usize>>,
    pub(crate) inventory_pages: Mutex<Vec<PageQuery>>,
    pub(crate) resupply_requests: Mutex<Vec<(Uuid, i64)>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            login: Reply::Ok(TokenResponse {
                access_token: "token-123".into(),
                token_type: "bearer".into(),
            }),
            identity: Reply::Ok(identity(false)),
            inventory: Reply::Ok(vec![]),
            tenants: Reply::Ok(vec![]),
            products: Reply::Ok(vec![]),
            resupply: Reply::Ok(SupplyResponse {
                status: "success".into(),
                message: "Acme requested 10 of product: Laptop (SKU: LAP-001)".into(),
                external_reference_id: "MOCK-REQ-999".into(),
            }),
            calls: Mutex::new(HashMap::new()),
            inventory_pages: Mutex::new(vec![]),
            resupply_requests: Mutex::new(vec![]),
        }
    }
}

impl FakeApi {
    fn record(&self, endpoint: &'static str) {
        *self.calls.lock().unwrap().entry(endpoint).or_default() += 1;
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.calls.lock().unwrap().get(endpoint).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn inventory_pages(&self) -> Vec<PageQuery> {
        self.inventory_pages.lock().unwrap().clone()
    }

    pub fn resupply_requests(&self) -> Vec<(Uuid, i64)> {
        self.resupply_requests.lock().unwrap().clone()
    }
}

pub fn identity(is_superuser: bool) -> MeResponse {
    MeResponse {
        id: Uuid::new_v4(),
        email: "ana@acme.io".into(),
        full_name: "Ana Souza".into(),
        tenant_id: if is_superuser { None } else { Some(Uuid::new_v4()) },
        is_superuser,
    }
}

pub fn product(name: &str, sku: &str) -> Product {
    Product {
        id: Uuid::new_v4(),
        name: name.into(),
        description: None,
        sku: sku.into(),
    }
}

pub fn item_for(product_id: Uuid, current_stock: i64, min_stock: i64) -> InventoryItem {
    InventoryItem {
        id: Uuid::new_v4(),
        product_id,
        current_stock,
        min_stock,
    }
}

#[async_trait]
impl InventoryApi for FakeApi {
    async fn login(&self, _payload: &LoginPayload) -> Result<TokenResponse, AppError> {
        self.record("login");
        self.login.to_result()
    }

    async fn current_identity(&self, _credential: &Credential) -> Result<MeResponse, AppError> {
        self.record("me");
        self.identity.to_result()
    }

    async fn list_inventory(
        &self,
        _credential: &Credential,
        page: PageQuery,
    ) -> Result<Vec<InventoryItem>, AppError> {
        self.record("inventory");
        self.inventory_pages.lock().unwrap().push(page);
        // Pagina como o backend quando skip/limit vêm preenchidos
        let items = self.inventory.to_result()?;
        let skip = page.skip.unwrap_or(0) as usize;
        let limit = page.limit.map_or(usize::MAX, |l| l as usize);
        Ok(items.into_iter().skip(skip).take(limit).collect())
    }

    async fn list_tenants(&self, _credential: &Credential) -> Result<Vec<Tenant>, AppError> {
        self.record("tenants");
        self.tenants.to_result()
    }

    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        self.record("products");
        self.products.to_result()
    }

    async fn request_resupply(
        &self,
        _credential: &Credential,
        inventory_id: Uuid,
        request: &SupplyRequest,
    ) -> Result<SupplyResponse, AppError> {
        self.record("resupply");
        self.resupply_requests
            .lock()
            .unwrap()
            .push((inventory_id, request.quantity));
        self.resupply.to_result()
    }
}
