// src/services/tenancy_service.rs

use std::sync::Arc;

use crate::{
    middleware::{
        auth::{GuardOutcome, Intercepted, SessionContext, ensure_session, intercept},
        rbac::require_superuser,
    },
    models::{
        tenancy::Tenant,
        view::{ViewOutcome, ViewState},
    },
    repo::InventoryApi,
};

#[derive(Clone)]
pub struct TenantService {
    api: Arc<dyn InventoryApi>,
}

impl TenantService {
    pub fn new(api: Arc<dyn InventoryApi>) -> Self {
        Self { api }
    }

    /// Tela de tenants: só superusuário. Os outros vão para o inventário.
    pub async fn load_tenants_view(
        &self,
        session: &mut SessionContext,
    ) -> ViewOutcome<Vec<Tenant>> {
        // 1. Tem sessão?
        let credential = match ensure_session(session) {
            GuardOutcome::Authorized(credential) => credential,
            GuardOutcome::Redirect(route) => return ViewOutcome::Redirect(route),
        };

        // 2. É superusuário?
        let credential = match require_superuser(self.api.as_ref(), session, credential).await {
            Ok(GuardOutcome::Authorized(credential)) => credential,
            Ok(GuardOutcome::Redirect(route)) => return ViewOutcome::Redirect(route),
            Err(err) => return ViewOutcome::Rendered(ViewState::Error(err.to_string())),
        };

        // 3. Busca privilegiada
        match self.api.list_tenants(&credential).await {
            Ok(tenants) => ViewOutcome::Rendered(ViewState::from_rows(tenants)),
            Err(err) => match intercept(session, err) {
                Intercepted::Redirect(route) => ViewOutcome::Redirect(route),
                Intercepted::Surface(err) => {
                    ViewOutcome::Rendered(ViewState::Error(err.to_string()))
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{auth::Credential, view::Route},
        repo::{
            MemorySessionStore,
            fake_api::{FakeApi, Reply, identity},
        },
    };
    use uuid::Uuid;

    fn logged_in() -> SessionContext {
        let store = MemorySessionStore::with_credential(Credential::new("abc"));
        SessionContext::load(Box::new(store)).unwrap()
    }

    #[tokio::test]
    async fn logged_out_user_never_reaches_the_api() {
        let api = Arc::new(FakeApi::default());
        let service = TenantService::new(api.clone());
        let mut session = SessionContext::load(Box::new(MemorySessionStore::default())).unwrap();

        let outcome = service.load_tenants_view(&mut session).await;

        assert_eq!(outcome, ViewOutcome::Redirect(Route::Login));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn regular_user_is_redirected_before_listing_tenants() {
        let api = Arc::new(FakeApi::default());
        let service = TenantService::new(api.clone());
        let mut session = logged_in();

        let outcome = service.load_tenants_view(&mut session).await;

        assert_eq!(outcome, ViewOutcome::Redirect(Route::Inventory));
        assert_eq!(api.calls("me"), 1);
        assert_eq!(api.calls("tenants"), 0);
    }

    #[tokio::test]
    async fn superuser_sees_the_tenants() {
        let acme = Tenant {
            id: Uuid::new_v4(),
            name: "Acme".into(),
        };
        let api = Arc::new(FakeApi {
            identity: Reply::Ok(identity(true)),
            tenants: Reply::Ok(vec![acme.clone()]),
            ..FakeApi::default()
        });
        let service = TenantService::new(api);
        let mut session = logged_in();

        let outcome = service.load_tenants_view(&mut session).await;

        assert_eq!(outcome, ViewOutcome::Rendered(ViewState::Populated(vec![acme])));
    }

    #[tokio::test]
    async fn no_tenants_renders_empty_state() {
        let api = Arc::new(FakeApi {
            identity: Reply::Ok(identity(true)),
            ..FakeApi::default()
        });
        let service = TenantService::new(api);
        let mut session = logged_in();

        assert_eq!(
            service.load_tenants_view(&mut session).await,
            ViewOutcome::Rendered(ViewState::Empty)
        );
    }

    #[tokio::test]
    async fn tenant_listing_failures_are_shown_inline() {
        let api = Arc::new(FakeApi {
            identity: Reply::Ok(identity(true)),
            tenants: Reply::Fail("Failed to fetch tenants"),
            ..FakeApi::default()
        });
        let service = TenantService::new(api);
        let mut session = logged_in();

        assert_eq!(
            service.load_tenants_view(&mut session).await,
            ViewOutcome::Rendered(ViewState::Error("Failed to fetch tenants".into()))
        );
    }

    #[tokio::test]
    async fn rejected_token_on_tenants_clears_the_session() {
        let api = Arc::new(FakeApi {
            identity: Reply::Ok(identity(true)),
            tenants: Reply::Unauthorized,
            ..FakeApi::default()
        });
        let service = TenantService::new(api);
        let mut session = logged_in();

        assert_eq!(
            service.load_tenants_view(&mut session).await,
            ViewOutcome::Redirect(Route::Login)
        );
        assert!(!session.is_authenticated());
    }
}
