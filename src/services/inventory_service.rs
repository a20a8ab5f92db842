// src/services/inventory_service.rs

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    middleware::auth::{GuardOutcome, Intercepted, SessionContext, ensure_session, intercept},
    models::{
        inventory::{
            InventoryItem, InventoryRow, PageQuery, Product, UNKNOWN_PRODUCT_NAME,
            UNKNOWN_PRODUCT_SKU,
        },
        view::{Route, ViewOutcome, ViewState},
    },
    repo::InventoryApi,
};

// Mesmo tamanho de página padrão do backend
pub const LOOKUP_PAGE_SIZE: u32 = 100;
// Teto de páginas na busca de um item (backend que ignora skip/limit)
const MAX_LOOKUP_PAGES: u32 = 100;

/// Junta os itens do inventário com o catálogo de produtos (left join).
///
/// Uma linha por item, na mesma ordem da entrada. Produto não encontrado
/// vira "Unknown" / "—" em vez de sumir da tabela.
pub fn build_inventory_rows(items: Vec<InventoryItem>, products: &[Product]) -> Vec<InventoryRow> {
    // Em ids repetidos, o último produto vence
    let by_id: HashMap<Uuid, &Product> = products.iter().map(|p| (p.id, p)).collect();

    items
        .into_iter()
        .map(|item| {
            let (product_name, product_sku) = match by_id.get(&item.product_id) {
                Some(product) => (product.name.clone(), product.sku.clone()),
                None => (UNKNOWN_PRODUCT_NAME.to_string(), UNKNOWN_PRODUCT_SKU.to_string()),
            };
            InventoryRow {
                item,
                product_name,
                product_sku,
            }
        })
        .collect()
}

/// Resultado da busca de uma linha pelo id do item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowLookup {
    Found(InventoryRow),
    Missing,
    Redirect(Route),
}

#[derive(Clone)]
pub struct InventoryService {
    api: Arc<dyn InventoryApi>,
}

impl InventoryService {
    pub fn new(api: Arc<dyn InventoryApi>) -> Self {
        Self { api }
    }

    /// Ativa a tela de inventário: guardião, as duas buscas em paralelo e o join.
    pub async fn load_inventory_view(
        &self,
        session: &mut SessionContext,
        page: PageQuery,
    ) -> ViewOutcome<Vec<InventoryRow>> {
        // 1. Guardião
        let credential = match ensure_session(session) {
            GuardOutcome::Authorized(credential) => credential,
            GuardOutcome::Redirect(route) => return ViewOutcome::Redirect(route),
        };

        // 2. Inventário e catálogo ao mesmo tempo; se um falhar, o lote inteiro falha
        let fetched = tokio::try_join!(
            self.api.list_inventory(&credential, page),
            self.api.list_products(),
        );

        // 3. Join (ou erro)
        match fetched {
            Ok((items, products)) => {
                let rows = build_inventory_rows(items, &products);
                tracing::debug!(
                    rows = rows.len(),
                    products = products.len(),
                    "Inventário montado"
                );
                ViewOutcome::Rendered(ViewState::from_rows(rows))
            }
            Err(err) => match intercept(session, err) {
                Intercepted::Redirect(route) => ViewOutcome::Redirect(route),
                Intercepted::Surface(err) => {
                    ViewOutcome::Rendered(ViewState::Error(err.to_string()))
                }
            },
        }
    }

    /// Procura a linha de um item percorrendo o inventário página a página.
    ///
    /// O catálogo é buscado uma vez, junto com a primeira página. Para numa
    /// página incompleta. Falhas que não são 401 voltam como erro.
    pub async fn find_row(
        &self,
        session: &mut SessionContext,
        inventory_id: Uuid,
    ) -> Result<RowLookup, AppError> {
        let credential = match ensure_session(session) {
            GuardOutcome::Authorized(credential) => credential,
            GuardOutcome::Redirect(route) => return Ok(RowLookup::Redirect(route)),
        };

        let mut page = PageQuery {
            skip: Some(0),
            limit: Some(LOOKUP_PAGE_SIZE),
        };
        let fetched = tokio::try_join!(
            self.api.list_inventory(&credential, page),
            self.api.list_products(),
        );
        let (mut items, products) = match fetched {
            Ok(fetched) => fetched,
            Err(err) => return lookup_failure(session, err),
        };

        for _ in 0..MAX_LOOKUP_PAGES {
            let last_page = items.len() < LOOKUP_PAGE_SIZE as usize;
            if let Some(item) = items.into_iter().find(|item| item.id == inventory_id) {
                let row = build_inventory_rows(vec![item], &products).pop();
                return Ok(row.map_or(RowLookup::Missing, RowLookup::Found));
            }
            if last_page {
                return Ok(RowLookup::Missing);
            }

            page.skip = Some(page.skip.unwrap_or(0) + LOOKUP_PAGE_SIZE);
            items = match self.api.list_inventory(&credential, page).await {
                Ok(items) => items,
                Err(err) => return lookup_failure(session, err),
            };
        }

        tracing::warn!(
            %inventory_id,
            pages = MAX_LOOKUP_PAGES,
            "Item não encontrado no limite de páginas"
        );
        Ok(RowLookup::Missing)
    }
}

fn lookup_failure(session: &mut SessionContext, err: AppError) -> Result<RowLookup, AppError> {
    match intercept(session, err) {
        Intercepted::Redirect(route) => Ok(RowLookup::Redirect(route)),
        Intercepted::Surface(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::auth::Credential,
        repo::{
            MemorySessionStore,
            fake_api::{FakeApi, Reply, item_for, product},
        },
    };

    fn logged_in() -> SessionContext {
        let store = MemorySessionStore::with_credential(Credential::new("abc"));
        SessionContext::load(Box::new(store)).unwrap()
    }

    fn logged_out() -> SessionContext {
        SessionContext::load(Box::new(MemorySessionStore::default())).unwrap()
    }

    #[test]
    fn rows_keep_item_count_and_order() {
        let laptop = product("Laptop", "LAP-001");
        let chair = product("Chair", "CHR-002");
        let items = vec![
            item_for(chair.id, 3, 1),
            item_for(Uuid::new_v4(), 0, 4),
            item_for(laptop.id, 5, 2),
            item_for(chair.id, 9, 9),
        ];
        let ids: Vec<Uuid> = items.iter().map(|i| i.id).collect();

        let rows = build_inventory_rows(items, &[laptop, chair]);

        assert_eq!(rows.len(), 4);
        assert_eq!(rows.iter().map(|r| r.id()).collect::<Vec<_>>(), ids);
        assert_eq!(rows[0].product_name, "Chair");
        assert_eq!(rows[2].product_sku, "LAP-001");
        assert_eq!(rows[3].product_name, "Chair");
    }

    #[test]
    fn unmatched_product_uses_sentinels() {
        let item = item_for(Uuid::new_v4(), 5, 2);

        let rows = build_inventory_rows(vec![item.clone()], &[]);

        assert_eq!(
            rows,
            vec![InventoryRow {
                item,
                product_name: "Unknown".into(),
                product_sku: "—".into(),
            }]
        );
    }

    #[test]
    fn no_items_means_no_rows() {
        let rows = build_inventory_rows(vec![], &[product("Laptop", "LAP-001")]);
        assert!(rows.is_empty());
    }

    #[test]
    fn duplicated_product_ids_resolve_to_the_last_one() {
        let first = product("Old name", "OLD");
        let mut second = product("New name", "NEW");
        second.id = first.id;

        let rows = build_inventory_rows(vec![item_for(first.id, 1, 1)], &[first, second]);

        assert_eq!(rows[0].product_name, "New name");
    }

    #[tokio::test]
    async fn logged_out_user_is_redirected_without_fetching() {
        let api = Arc::new(FakeApi::default());
        let service = InventoryService::new(api.clone());
        let mut session = logged_out();

        let outcome = service.load_inventory_view(&mut session, PageQuery::default()).await;

        assert_eq!(outcome, ViewOutcome::Redirect(Route::Login));
        assert_eq!(api.total_calls(), 0);
    }

    #[tokio::test]
    async fn joined_rows_are_rendered() {
        let laptop = product("Laptop", "LAP-001");
        let api = Arc::new(FakeApi {
            inventory: Reply::Ok(vec![item_for(laptop.id, 5, 2)]),
            products: Reply::Ok(vec![laptop]),
            ..FakeApi::default()
        });
        let service = InventoryService::new(api.clone());
        let mut session = logged_in();

        let outcome = service.load_inventory_view(&mut session, PageQuery::default()).await;

        match outcome {
            ViewOutcome::Rendered(ViewState::Populated(rows)) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].product_name, "Laptop");
            }
            other => panic!("expected populated view, got {other:?}"),
        }
        assert_eq!(api.calls("inventory"), 1);
        assert_eq!(api.calls("products"), 1);
    }

    #[tokio::test]
    async fn empty_inventory_renders_empty_state() {
        let api = Arc::new(FakeApi {
            products: Reply::Ok(vec![product("Laptop", "LAP-001")]),
            ..FakeApi::default()
        });
        let service = InventoryService::new(api);
        let mut session = logged_in();

        let outcome = service.load_inventory_view(&mut session, PageQuery::default()).await;

        assert_eq!(outcome, ViewOutcome::Rendered(ViewState::Empty));
    }

    #[tokio::test]
    async fn products_failure_fails_the_whole_view() {
        let api = Arc::new(FakeApi {
            inventory: Reply::Ok(vec![item_for(Uuid::new_v4(), 1, 1)]),
            products: Reply::Fail("Failed to fetch products"),
            ..FakeApi::default()
        });
        let service = InventoryService::new(api);
        let mut session = logged_in();

        let outcome = service.load_inventory_view(&mut session, PageQuery::default()).await;

        assert_eq!(
            outcome,
            ViewOutcome::Rendered(ViewState::Error("Failed to fetch products".into()))
        );
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn rejected_token_clears_session_and_redirects() {
        let api = Arc::new(FakeApi {
            inventory: Reply::Unauthorized,
            ..FakeApi::default()
        });
        let service = InventoryService::new(api);
        let mut session = logged_in();

        let outcome = service.load_inventory_view(&mut session, PageQuery::default()).await;

        assert_eq!(outcome, ViewOutcome::Redirect(Route::Login));
        assert!(!session.is_authenticated());
    }

    fn many_items(count: usize) -> Vec<InventoryItem> {
        (0..count).map(|_| item_for(Uuid::new_v4(), 1, 1)).collect()
    }

    #[tokio::test]
    async fn find_row_walks_past_the_first_page() {
        let items = many_items(150);
        let wanted = items[120].id;
        let api = Arc::new(FakeApi {
            inventory: Reply::Ok(items),
            ..FakeApi::default()
        });
        let service = InventoryService::new(api.clone());
        let mut session = logged_in();

        let lookup = service.find_row(&mut session, wanted).await.unwrap();

        match lookup {
            RowLookup::Found(row) => {
                assert_eq!(row.id(), wanted);
                assert_eq!(row.product_name, UNKNOWN_PRODUCT_NAME);
            }
            other => panic!("expected found row, got {other:?}"),
        }
        assert_eq!(
            api.inventory_pages(),
            vec![
                PageQuery { skip: Some(0), limit: Some(LOOKUP_PAGE_SIZE) },
                PageQuery { skip: Some(100), limit: Some(LOOKUP_PAGE_SIZE) },
            ]
        );
        // Catálogo só uma vez
        assert_eq!(api.calls("products"), 1);
    }

    #[tokio::test]
    async fn find_row_stops_at_a_short_page() {
        let api = Arc::new(FakeApi {
            inventory: Reply::Ok(many_items(30)),
            ..FakeApi::default()
        });
        let service = InventoryService::new(api.clone());
        let mut session = logged_in();

        let lookup = service.find_row(&mut session, Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(lookup, RowLookup::Missing);
        assert_eq!(api.calls("inventory"), 1);
    }

    #[tokio::test]
    async fn find_row_redirects_on_rejected_token() {
        let api = Arc::new(FakeApi {
            inventory: Reply::Unauthorized,
            ..FakeApi::default()
        });
        let service = InventoryService::new(api);
        let mut session = logged_in();

        let lookup = service.find_row(&mut session, Uuid::new_v4())
            .await
            .unwrap();

        assert_eq!(lookup, RowLookup::Redirect(Route::Login));
        assert!(!session.is_authenticated());
    }
}
