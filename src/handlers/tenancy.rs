// src/handlers/tenancy.rs

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::{
        Next,
        render::{OutputFormat, render_tenants},
    },
    middleware::auth::SessionContext,
    models::view::{ViewOutcome, ViewSlot, ViewState},
};

// Comando: tenants (só superusuário)
pub async fn list_tenants(
    state: &AppState,
    session: &mut SessionContext,
    format: OutputFormat,
) -> Result<Next, AppError> {
    let mut view = ViewSlot::new();
    let activation = view.activate();
    if format == OutputFormat::Table {
        render_tenants(view.state(), format)?.emit();
    }

    match state.tenant_service.load_tenants_view(session).await {
        ViewOutcome::Redirect(route) => {
            view.teardown();
            Ok(Next::Redirect(route))
        }
        ViewOutcome::Rendered(rendered) => {
            view.apply(activation, rendered);
            render_tenants(view.state(), format)?.emit();
            Ok(match view.state() {
                ViewState::Error(_) => Next::Failed,
                _ => Next::Done,
            })
        }
    }
}
