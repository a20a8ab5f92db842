// src/config.rs

use std::{env, path::PathBuf, sync::Arc};

use anyhow::bail;

use crate::{
    common::error::AppError,
    middleware::auth::SessionContext,
    repo::{FileSessionStore, HttpInventoryApi, InventoryApi},
    services::{
        auth::AuthService, inventory_service::InventoryService,
        restock_service::RestockService, tenancy_service::TenantService,
    },
};

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/v1";

// ---
// Configuração (variáveis de ambiente / .env)
// ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub session_file: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Separado do `from_env` para poder testar sem mexer no ambiente do processo
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_url = non_empty("INVENTORY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let session_file = match non_empty("INVENTORY_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_session_file(non_empty("HOME")),
        };

        Self::new(api_url, session_file)
    }

    pub fn new(api_url: String, session_file: PathBuf) -> anyhow::Result<Self> {
        let api_url = api_url.trim().trim_end_matches('/').to_string();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            bail!("INVENTORY_API_URL must start with http:// or https:// (got '{api_url}')");
        }
        Ok(Self { api_url, session_file })
    }

    // Flags da linha de comando têm prioridade sobre o ambiente
    pub fn with_overrides(
        self,
        api_url: Option<String>,
        session_file: Option<PathBuf>,
    ) -> anyhow::Result<Self> {
        Self::new(
            api_url.unwrap_or(self.api_url),
            session_file.unwrap_or(self.session_file),
        )
    }
}

fn default_session_file(home: Option<String>) -> PathBuf {
    let base = home.map(PathBuf::from).unwrap_or_default();
    base.join(".multi-t").join("session.json")
}

// ---
// Estado da aplicação: a API e os serviços montados em cima dela
// ---
#[derive(Clone)]
pub struct AppState {
    pub config: ClientConfig,
    pub auth_service: AuthService,
    pub inventory_service: InventoryService,
    pub tenant_service: TenantService,
    pub restock_service: RestockService,
}

impl AppState {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let api = HttpInventoryApi::new(&config.api_url)?;
        tracing::debug!(api_url = %api.base_url(), "Cliente HTTP configurado");
        Ok(Self::with_api(config, Arc::new(api)))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_api(config: ClientConfig, api: Arc<dyn InventoryApi>) -> Self {
        Self {
            config,
            auth_service: AuthService::new(api.clone()),
            inventory_service: InventoryService::new(api.clone()),
            tenant_service: TenantService::new(api.clone()),
            restock_service: RestockService::new(api),
        }
    }

    /// Abre a sessão salva no arquivo configurado.
    pub fn open_session(&self) -> Result<SessionContext, AppError> {
        let store = FileSessionStore::new(&self.config.session_file);
        SessionContext::load(Box::new(store))
    }
}
