// src/services/auth.rs

use std::sync::Arc;

use validator::Validate;

use crate::{
    common::error::AppError,
    middleware::auth::{GuardOutcome, Intercepted, SessionContext, ensure_session, intercept},
    models::{
        auth::{Credential, LoginPayload, MeResponse},
        view::{Route, ViewOutcome, ViewState},
    },
    repo::InventoryApi,
};

#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn InventoryApi>,
}

impl AuthService {
    pub fn new(api: Arc<dyn InventoryApi>) -> Self {
        Self { api }
    }

    /// Faz login e guarda o token. Devolve a tela para onde ir em seguida.
    pub async fn login(
        &self,
        session: &mut SessionContext,
        email: &str,
        password: &str,
    ) -> Result<Route, AppError> {
        let payload = LoginPayload::new(email, password);
        payload.validate()?;

        let token = self.api.login(&payload).await?;
        session.begin(Credential::new(token.access_token))?;

        tracing::info!(user = %payload.username, "✅ Login realizado");
        Ok(Route::Inventory)
    }

    pub fn logout(&self, session: &mut SessionContext) -> Result<Route, AppError> {
        session.end()?;
        Ok(Route::Login)
    }

    // Tela "quem sou eu"
    pub async fn load_identity_view(
        &self,
        session: &mut SessionContext,
    ) -> ViewOutcome<MeResponse> {
        let credential = match ensure_session(session) {
            GuardOutcome::Authorized(credential) => credential,
            GuardOutcome::Redirect(route) => return ViewOutcome::Redirect(route),
        };

        match self.api.current_identity(&credential).await {
            Ok(me) => ViewOutcome::Rendered(ViewState::Populated(me)),
            Err(err) => match intercept(session, err) {
                Intercepted::Redirect(route) => ViewOutcome::Redirect(route),
                Intercepted::Surface(err) => {
                    ViewOutcome::Rendered(ViewState::Error(err.to_string()))
                }
            },
        }
    }
}
