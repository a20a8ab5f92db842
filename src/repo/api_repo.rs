// src/repo/api_repo.rs

use std::time::Instant;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::{Credential, LoginPayload, MeResponse, TokenResponse},
        inventory::{InventoryItem, PageQuery, Product, SupplyRequest, SupplyResponse},
        tenancy::Tenant,
    },
};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// As chamadas que o cliente faz ao backend de inventário.
#[async_trait]
pub trait InventoryApi: Send + Sync {
    async fn login(&self, payload: &LoginPayload) -> Result<TokenResponse, AppError>;

    async fn current_identity(&self, credential: &Credential) -> Result<MeResponse, AppError>;

    async fn list_inventory(
        &self,
        credential: &Credential,
        page: PageQuery,
    ) -> Result<Vec<InventoryItem>, AppError>;

    async fn list_tenants(&self, credential: &Credential) -> Result<Vec<Tenant>, AppError>;

    // Catálogo público: sem token
    async fn list_products(&self) -> Result<Vec<Product>, AppError>;

    async fn request_resupply(
        &self,
        credential: &Credential,
        inventory_id: Uuid,
        request: &SupplyRequest,
    ) -> Result<SupplyResponse, AppError>;
}

// ---
// Como cada rota traduz uma resposta de erro
// ---
#[derive(Debug, Clone, Copy)]
struct FailurePolicy {
    // 401 vira AppError::Unauthorized (limpa a sessão)
    unauthorized_sentinel: bool,
    // Usa o `detail` do backend quando existir
    prefer_detail: bool,
    fallback: &'static str,
}

const LOGIN_FAILURE: FailurePolicy = FailurePolicy {
    unauthorized_sentinel: false,
    prefer_detail: true,
    fallback: "Login failed",
};
const ME_FAILURE: FailurePolicy = FailurePolicy {
    unauthorized_sentinel: true,
    prefer_detail: false,
    fallback: "Failed to fetch user",
};
const INVENTORY_FAILURE: FailurePolicy = FailurePolicy {
    unauthorized_sentinel: true,
    prefer_detail: false,
    fallback: "Failed to fetch inventory",
};
const TENANTS_FAILURE: FailurePolicy = FailurePolicy {
    unauthorized_sentinel: true,
    prefer_detail: false,
    fallback: "Failed to fetch tenants",
};
const PRODUCTS_FAILURE: FailurePolicy = FailurePolicy {
    unauthorized_sentinel: false,
    prefer_detail: false,
    fallback: "Failed to fetch products",
};
const RESUPPLY_FAILURE: FailurePolicy = FailurePolicy {
    unauthorized_sentinel: true,
    prefer_detail: true,
    fallback: "Resupply request failed",
};

// ---
// Implementação HTTP (reqwest)
// ---
#[derive(Clone)]
pub struct HttpInventoryApi {
    client: Client,
    base_url: String,
}

impl HttpInventoryApi {
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(concat!("inventory-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // Envia a requisição com um id de correlação e loga o round trip
    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response, AppError> {
        let request_id = Uuid::new_v4();
        let started = Instant::now();

        let response = request
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await
            .map_err(|e| {
                warn!(%request_id, path, error = %e, "Falha de conexão com a API");
                AppError::Transport(e)
            })?;

        debug!(
            %request_id,
            path,
            status = response.status().as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Resposta recebida"
        );
        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(
    response: Response,
    policy: FailurePolicy,
) -> Result<T, AppError> {
    let status = response.status();

    if status.is_success() {
        return response.json::<T>().await.map_err(|e| {
            warn!(error = %e, "Resposta do backend em formato inesperado");
            AppError::Backend(policy.fallback.to_string())
        });
    }

    if policy.unauthorized_sentinel && status == StatusCode::UNAUTHORIZED {
        return Err(AppError::Unauthorized);
    }

    if policy.prefer_detail {
        let body = response.bytes().await.ok();
        if let Some(detail) = body.as_deref().and_then(extract_detail) {
            return Err(AppError::Backend(detail));
        }
    }

    Err(AppError::Backend(policy.fallback.to_string()))
}

// O FastAPI devolve `{"detail": "..."}` ou, em erros 422, `{"detail": [{"msg": "..."}]}`
fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Array(entries) => entries
            .first()?
            .get("msg")?
            .as_str()
            .map(str::to_string),
        _ => None,
    }
}

#[async_trait]
impl InventoryApi for HttpInventoryApi {
    async fn login(&self, payload: &LoginPayload) -> Result<TokenResponse, AppError> {
        let request = self.client.post(self.url("/auth/login")).form(payload);
        let response = self.send(request, "/auth/login").await?;
        decode(response, LOGIN_FAILURE).await
    }

    async fn current_identity(&self, credential: &Credential) -> Result<MeResponse, AppError> {
        let request = self
            .client
            .get(self.url("/auth/me"))
            .bearer_auth(credential.as_str());
        let response = self.send(request, "/auth/me").await?;
        decode(response, ME_FAILURE).await
    }

    async fn list_inventory(
        &self,
        credential: &Credential,
        page: PageQuery,
    ) -> Result<Vec<InventoryItem>, AppError> {
        let request = self
            .client
            .get(self.url("/inventory"))
            .bearer_auth(credential.as_str())
            .query(&page);
        let response = self.send(request, "/inventory").await?;
        decode(response, INVENTORY_FAILURE).await
    }

    async fn list_tenants(&self, credential: &Credential) -> Result<Vec<Tenant>, AppError> {
        let request = self
            .client
            .get(self.url("/tenants"))
            .bearer_auth(credential.as_str());
        let response = self.send(request, "/tenants").await?;
        decode(response, TENANTS_FAILURE).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let request = self.client.get(self.url("/products"));
        let response = self.send(request, "/products").await?;
        decode(response, PRODUCTS_FAILURE).await
    }

    async fn request_resupply(
        &self,
        credential: &Credential,
        inventory_id: Uuid,
        request: &SupplyRequest,
    ) -> Result<SupplyResponse, AppError> {
        let path = format!("/inventory/{inventory_id}/resupply");
        let builder = self
            .client
            .post(self.url(&path))
            .bearer_auth(credential.as_str())
            .json(request);
        let response = self.send(builder, &path).await?;
        decode(response, RESUPPLY_FAILURE).await
    }
}
