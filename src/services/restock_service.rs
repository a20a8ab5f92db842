// src/services/restock_service.rs

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    middleware::auth::{GuardOutcome, Intercepted, SessionContext, ensure_session, intercept},
    models::{
        inventory::{InventoryRow, SupplyRequest, SupplyResponse},
        view::Route,
    },
    repo::InventoryApi,
};

/// Converte o texto digitado numa quantidade válida (inteiro >= 1).
pub fn parse_quantity(input: &str) -> Result<SupplyRequest, AppError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AppError::invalid_field("quantity", "required", "Quantity is required."));
    }

    let quantity: i64 = input.parse().map_err(|_| {
        AppError::invalid_field("quantity", "integer", "Quantity must be a whole number.")
    })?;

    let request = SupplyRequest { quantity };
    request.validate()?;
    Ok(request)
}

// ---
// A máquina de estados do diálogo de reposição
// ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestockState {
    Idle,
    Open {
        row: InventoryRow,
        quantity: String,
        error: Option<String>,
    },
    Submitting {
        row: InventoryRow,
        quantity: i64,
    },
    // Mensagem do backend, exibida como veio. Não fecha sozinho.
    Completed {
        row: InventoryRow,
        message: String,
    },
}

/// Identifica um envio. Só é aplicado se o diálogo ainda for o mesmo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    generation: u64,
    pub inventory_id: Uuid,
    pub quantity: i64,
}

#[derive(Debug)]
pub struct RestockDialog {
    state: RestockState,
    // Muda a cada open/close: respostas de um diálogo antigo são descartadas
    generation: u64,
}

impl Default for RestockDialog {
    fn default() -> Self {
        Self::new()
    }
}

impl RestockDialog {
    pub fn new() -> Self {
        Self {
            state: RestockState::Idle,
            generation: 0,
        }
    }

    pub fn state(&self) -> &RestockState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, RestockState::Open { .. })
    }

    pub fn open(&mut self, row: InventoryRow) {
        self.generation += 1;
        self.state = RestockState::Open {
            row,
            quantity: String::new(),
            error: None,
        };
    }

    pub fn set_quantity(&mut self, input: &str) {
        if let RestockState::Open { quantity, .. } = &mut self.state {
            *quantity = input.to_string();
        }
    }

    // Fecha sem cancelar o pedido em andamento; a resposta tardia será ignorada
    pub fn close(&mut self) {
        self.generation += 1;
        self.state = RestockState::Idle;
    }

    pub fn is_current(&self, ticket: &SubmitTicket) -> bool {
        self.generation == ticket.generation
            && matches!(self.state, RestockState::Submitting { .. })
    }

    // Open -> Submitting. Quantidade inválida: continua Open, com o erro, sem rede.
    fn begin_submit(&mut self) -> Result<SubmitTicket, AppError> {
        match std::mem::replace(&mut self.state, RestockState::Idle) {
            RestockState::Open { row, quantity, .. } => match parse_quantity(&quantity) {
                Ok(request) => {
                    let ticket = SubmitTicket {
                        generation: self.generation,
                        inventory_id: row.id(),
                        quantity: request.quantity,
                    };
                    self.state = RestockState::Submitting {
                        row,
                        quantity: request.quantity,
                    };
                    Ok(ticket)
                }
                Err(err) => {
                    self.state = RestockState::Open {
                        row,
                        quantity,
                        error: Some(err.to_string()),
                    };
                    Err(err)
                }
            },
            other => {
                self.state = other;
                Err(anyhow::anyhow!("restock dialog is not open").into())
            }
        }
    }

    // Submitting -> Completed (sucesso) ou Open com o erro (permite tentar de novo)
    fn complete(
        &mut self,
        ticket: &SubmitTicket,
        outcome: Result<SupplyResponse, AppError>,
    ) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        match std::mem::replace(&mut self.state, RestockState::Idle) {
            RestockState::Submitting { row, quantity } => {
                self.state = match outcome {
                    Ok(response) => RestockState::Completed {
                        row,
                        message: response.message,
                    },
                    Err(err) => RestockState::Open {
                        row,
                        quantity: quantity.to_string(),
                        error: Some(err.to_string()),
                    },
                };
                true
            }
            other => {
                self.state = other;
                false
            }
        }
    }
}

// ---
// O pedido em andamento
// ---
#[derive(Debug)]
pub struct RestockHandle {
    ticket: SubmitTicket,
    task: JoinHandle<Result<SupplyResponse, AppError>>,
}

impl RestockHandle {
    pub fn ticket(&self) -> SubmitTicket {
        self.ticket
    }
}

#[derive(Debug)]
pub enum SubmitOutcome {
    Dispatched(RestockHandle),
    // Quantidade inválida; o erro já está no diálogo
    Rejected(AppError),
    Redirect(Route),
    // Diálogo fechado ou já enviando
    NotOpen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestockResolution {
    Applied,
    Discarded,
    Redirect(Route),
}

#[derive(Clone)]
pub struct RestockService {
    api: Arc<dyn InventoryApi>,
}

impl RestockService {
    pub fn new(api: Arc<dyn InventoryApi>) -> Self {
        Self { api }
    }

    /// Envia o pedido do diálogo aberto. No máximo uma chamada de rede, sem retry.
    pub fn submit(&self, dialog: &mut RestockDialog, session: &SessionContext) -> SubmitOutcome {
        if !dialog.is_open() {
            return SubmitOutcome::NotOpen;
        }

        // 1. Guardião
        let credential = match ensure_session(session) {
            GuardOutcome::Authorized(credential) => credential,
            GuardOutcome::Redirect(route) => {
                dialog.close();
                return SubmitOutcome::Redirect(route);
            }
        };

        // 2. Validação antes da rede
        let ticket = match dialog.begin_submit() {
            Ok(ticket) => ticket,
            Err(err) => return SubmitOutcome::Rejected(err),
        };

        // 3. Dispara a chamada
        let api = Arc::clone(&self.api);
        let request = SupplyRequest {
            quantity: ticket.quantity,
        };
        let task = tokio::spawn(async move {
            api.request_resupply(&credential, ticket.inventory_id, &request)
                .await
        });

        info!(
            inventory_id = %ticket.inventory_id,
            quantity = ticket.quantity,
            "Pedido de reposição enviado"
        );
        SubmitOutcome::Dispatched(RestockHandle { ticket, task })
    }

    /// Espera o pedido terminar e aplica o resultado, se o diálogo ainda for o mesmo.
    pub async fn resolve(
        &self,
        dialog: &mut RestockDialog,
        session: &mut SessionContext,
        handle: RestockHandle,
    ) -> RestockResolution {
        let RestockHandle { ticket, task } = handle;

        let outcome = match task.await {
            Ok(outcome) => outcome,
            Err(e) => Err(anyhow::anyhow!("restock task failed: {e}").into()),
        };

        // Token recusado vale para a sessão inteira, mesmo com o diálogo já fechado
        let outcome = match outcome {
            Ok(response) => Ok(response),
            Err(err) => match intercept(session, err) {
                Intercepted::Redirect(route) => {
                    if dialog.is_current(&ticket) {
                        dialog.close();
                    }
                    return RestockResolution::Redirect(route);
                }
                Intercepted::Surface(err) => Err(err),
            },
        };

        if !dialog.is_current(&ticket) {
            debug!(
                inventory_id = %ticket.inventory_id,
                "Resposta de reposição descartada: diálogo fechado"
            );
            return RestockResolution::Discarded;
        }

        if let Ok(response) = &outcome {
            info!(
                reference = %response.external_reference_id,
                status = %response.status,
                "✅ Reposição solicitada"
            );
        }
        dialog.complete(&ticket, outcome);
        RestockResolution::Applied
    }
}
