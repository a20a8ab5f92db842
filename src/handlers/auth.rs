// src/handlers/auth.rs

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::{
        Next,
        render::{Output, OutputFormat, render_identity},
    },
    middleware::auth::SessionContext,
    models::view::{ViewOutcome, ViewSlot, ViewState},
};

// Comando: login
pub async fn login(
    state: &AppState,
    session: &mut SessionContext,
    email: &str,
    password: &str,
) -> Result<Next, AppError> {
    let next = state.auth_service.login(session, email, password).await?;
    Output::Stderr("Logged in.".to_string()).emit();
    Ok(Next::Redirect(next))
}

// Comando: logout
pub fn logout(state: &AppState, session: &mut SessionContext) -> Result<Next, AppError> {
    let route = state.auth_service.logout(session)?;
    tracing::debug!(path = route.path(), "Logout");
    Output::Stderr("Logged out.".to_string()).emit();
    Ok(Next::Done)
}

// Comando: me
pub async fn me(
    state: &AppState,
    session: &mut SessionContext,
    format: OutputFormat,
) -> Result<Next, AppError> {
    let mut view = ViewSlot::new();
    let activation = view.activate();

    match state.auth_service.load_identity_view(session).await {
        ViewOutcome::Redirect(route) => {
            view.teardown();
            Ok(Next::Redirect(route))
        }
        ViewOutcome::Rendered(rendered) => {
            view.apply(activation, rendered);
            render_identity(view.state(), format)?.emit();
            Ok(match view.state() {
                ViewState::Error(_) => Next::Failed,
                _ => Next::Done,
            })
        }
    }
}
