// src/middleware/rbac.rs

use tracing::info;

use crate::{
    common::error::AppError,
    middleware::auth::{GuardOutcome, Intercepted, SessionContext, intercept},
    models::{auth::Credential, view::Route},
    repo::InventoryApi,
};

/// Guardião das telas exclusivas de superusuário.
///
/// Roda depois do `ensure_session` e antes de qualquer chamada privilegiada:
/// - sem privilégio: redireciona para o inventário;
/// - 401: limpa a sessão e redireciona para o login;
/// - outras falhas voltam como erro para serem exibidas.
pub async fn require_superuser(
    api: &dyn InventoryApi,
    session: &mut SessionContext,
    credential: Credential,
) -> Result<GuardOutcome, AppError> {
    let me = match api.current_identity(&credential).await {
        Ok(me) => me,
        Err(err) => {
            return match intercept(session, err) {
                Intercepted::Redirect(route) => Ok(GuardOutcome::Redirect(route)),
                Intercepted::Surface(err) => Err(err),
            };
        }
    };

    if !me.is_superuser {
        info!(user = %me.email, "Acesso negado: tela exclusiva de superusuário");
        return Ok(GuardOutcome::Redirect(Route::Inventory));
    }

    Ok(GuardOutcome::Authorized(credential))
}
