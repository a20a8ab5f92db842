// src/handlers/inventory.rs

use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::{
        Next,
        render::{Output, OutputFormat, render_inventory},
    },
    middleware::auth::{GuardOutcome, SessionContext, ensure_session},
    models::{
        inventory::{InventoryRow, PageQuery},
        view::{ViewOutcome, ViewSlot, ViewState},
    },
    services::{
        inventory_service::RowLookup,
        restock_service::{
            RestockDialog, RestockResolution, RestockState, SubmitOutcome, parse_quantity,
        },
    },
};

// ---
// Comando: inventory (a tabela)
// ---
pub async fn list_inventory(
    state: &AppState,
    session: &mut SessionContext,
    page: PageQuery,
    format: OutputFormat,
) -> Result<Next, AppError> {
    let mut view = ViewSlot::new();
    let activation = view.activate();
    if format == OutputFormat::Table {
        render_inventory(view.state(), format)?.emit();
    }

    match state.inventory_service.load_inventory_view(session, page).await {
        ViewOutcome::Redirect(route) => {
            view.teardown();
            return Ok(Next::Redirect(route));
        }
        ViewOutcome::Rendered(rendered) => {
            view.apply(activation, rendered);
        }
    }

    render_inventory(view.state(), format)?.emit();
    Ok(match view.state() {
        ViewState::Error(_) => Next::Failed,
        _ => Next::Done,
    })
}

// ---
// Comando: restock <id> --quantity N
// ---
// Reproduz o diálogo: abre na linha escolhida, envia e mostra o resultado.
pub async fn restock(
    state: &AppState,
    session: &mut SessionContext,
    inventory_id: Uuid,
    quantity: &str,
) -> Result<Next, AppError> {
    // 1. Guardião e quantidade, antes de qualquer chamada de rede
    if let GuardOutcome::Redirect(route) = ensure_session(session) {
        return Ok(Next::Redirect(route));
    }
    parse_quantity(quantity)?;

    // 2. Acha a linha (nome e SKU do produto) percorrendo as páginas
    let row = match state.inventory_service.find_row(session, inventory_id).await? {
        RowLookup::Found(row) => row,
        RowLookup::Redirect(route) => return Ok(Next::Redirect(route)),
        // O backend responde com o motivo (ex.: 404)
        RowLookup::Missing => {
            warn!(%inventory_id, "Item fora da listagem; enviando assim mesmo");
            InventoryRow::unresolved(inventory_id)
        }
    };

    // 3. Abre o diálogo
    let mut dialog = RestockDialog::new();
    Output::Stderr(format!(
        "Request Restock: {} ({})",
        row.product_name, row.product_sku
    ))
    .emit();
    dialog.open(row);
    dialog.set_quantity(quantity);

    // 4. Envia
    let handle = match state.restock_service.submit(&mut dialog, session) {
        SubmitOutcome::Dispatched(handle) => handle,
        SubmitOutcome::Rejected(err) => return Err(err),
        SubmitOutcome::Redirect(route) => return Ok(Next::Redirect(route)),
        SubmitOutcome::NotOpen => return Err(anyhow::anyhow!("restock dialog is not open").into()),
    };
    let ticket = handle.ticket();
    Output::Stderr("Requesting…".to_string()).emit();

    // 5. Resultado
    match state.restock_service.resolve(&mut dialog, session, handle).await {
        RestockResolution::Redirect(route) => Ok(Next::Redirect(route)),
        RestockResolution::Discarded => {
            debug!(
                inventory_id = %ticket.inventory_id,
                quantity = ticket.quantity,
                "Resultado descartado"
            );
            Ok(Next::Done)
        }
        RestockResolution::Applied => match dialog.state() {
            RestockState::Completed { message, .. } => {
                Output::Stdout(message.clone()).emit();
                Ok(Next::Done)
            }
            RestockState::Open {
                error: Some(error), ..
            } => {
                Output::Stderr(error.clone()).emit();
                Ok(Next::Failed)
            }
            _ => Ok(Next::Done),
        },
    }
}
