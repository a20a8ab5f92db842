// src/handlers.rs

pub mod auth;
pub mod inventory;
pub mod render;
pub mod tenancy;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::SessionContext,
    models::{inventory::PageQuery, view::Route},
};
use render::{Output, OutputFormat};

// Limite de redirecionamentos seguidos (evita laço infinito)
pub const MAX_REDIRECTS: usize = 4;

/// O que fazer depois de um comando.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Next {
    Done,
    Redirect(Route),
    // A tela mostrou um erro; o processo deve sair com falha
    Failed,
}

const HOME_TEXT: &str = "\
Multi-T Inventory: multi-tenant inventory management

  Products   (global)         shared product catalog across all tenants
  Inventory  (tenant-scoped)  each tenant manages its own stock levels
  Auth       (JWT)            log in with `inventory-client login --email <email>`";

/// Segue um redirecionamento: renderiza a tela de destino.
pub async fn navigate(
    route: Route,
    state: &AppState,
    session: &mut SessionContext,
    format: OutputFormat,
) -> Result<Next, AppError> {
    tracing::debug!(path = route.path(), "Navegando");
    match route {
        Route::Home => {
            Output::Stdout(HOME_TEXT.to_string()).emit();
            Ok(Next::Done)
        }
        Route::Login => {
            Output::Stderr(
                "Not logged in. Run `inventory-client login --email <email>` first.".to_string(),
            )
            .emit();
            Ok(Next::Failed)
        }
        Route::Inventory => {
            inventory::list_inventory(state, session, PageQuery::default(), format).await
        }
        Route::Tenants => tenancy::list_tenants(state, session, format).await,
    }
}

/// Segue os redirecionamentos de um comando até uma tela final.
///
/// Ex.: tenants -> inventory, qualquer tela -> login.
pub async fn follow(
    mut next: Next,
    state: &AppState,
    session: &mut SessionContext,
    format: OutputFormat,
) -> Result<Next, AppError> {
    for _ in 0..MAX_REDIRECTS {
        match next {
            Next::Redirect(route) => next = navigate(route, state, session, format).await?,
            done => return Ok(done),
        }
    }

    if let Next::Redirect(route) = next {
        tracing::error!(path = route.path(), "🔥 Redirecionamentos demais; abortando");
        return Ok(Next::Failed);
    }
    Ok(next)
}
