// src/models/view.rs

use serde::Serialize;

// ---
// Rotas (as "telas" do cliente)
// ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Route {
    Home,
    Login,
    Inventory,
    Tenants,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Inventory => "/inventory",
            Route::Tenants => "/tenants",
        }
    }
}

// ---
// Estado de uma tela: sempre exatamente um destes
// ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState<T> {
    Loading,
    Error(String),
    Empty,
    Populated(T),
}

impl<R> ViewState<Vec<R>> {
    // Lista vazia não é erro: vira a mensagem de "nada encontrado"
    pub fn from_rows(rows: Vec<R>) -> Self {
        if rows.is_empty() {
            ViewState::Empty
        } else {
            ViewState::Populated(rows)
        }
    }
}

/// Resultado de ativar uma tela protegida.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutcome<T> {
    Redirect(Route),
    Rendered(ViewState<T>),
}

// ---
// Guarda contra respostas "velhas"
// ---
// Cada ativação recebe um token; um resultado que chega depois do teardown
// (ou de uma nova ativação) é ignorado.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation(u64);

#[derive(Debug)]
pub struct ViewSlot<T> {
    state: ViewState<T>,
    current: u64,
    mounted: bool,
}

impl<T> Default for ViewSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewSlot<T> {
    pub fn new() -> Self {
        Self {
            state: ViewState::Loading,
            current: 0,
            mounted: false,
        }
    }

    pub fn activate(&mut self) -> Activation {
        self.current += 1;
        self.mounted = true;
        self.state = ViewState::Loading;
        Activation(self.current)
    }

    /// Aplica o estado se a ativação ainda for a atual. Devolve `false` se foi descartado.
    pub fn apply(&mut self, activation: Activation, state: ViewState<T>) -> bool {
        if !self.mounted || activation.0 != self.current {
            tracing::debug!(
                activation = activation.0,
                current = self.current,
                "Resposta descartada: tela já desmontada"
            );
            return false;
        }
        self.state = state;
        true
    }

    pub fn teardown(&mut self) {
        self.mounted = false;
        self.current += 1;
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }
}
