// src/middleware/auth.rs

use tracing::{error, info, warn};

use crate::{
    common::error::AppError,
    models::{auth::Credential, view::Route},
    repo::SessionStore,
};

// ---
// Contexto da sessão
// ---
// Substitui o "localStorage" global: é passado explicitamente para o guardião
// e para toda chamada autenticada. No máximo um token por vez.
pub struct SessionContext {
    store: Box<dyn SessionStore>,
    credential: Option<Credential>,
}

impl SessionContext {
    /// Lê o token salvo (se existir) do armazenamento.
    pub fn load(store: Box<dyn SessionStore>) -> Result<Self, AppError> {
        let credential = store.load()?;
        Ok(Self { store, credential })
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    // Login: substitui qualquer token anterior
    pub fn begin(&mut self, credential: Credential) -> Result<(), AppError> {
        self.store.save(&credential)?;
        self.credential = Some(credential);
        info!("🔐 Sessão iniciada");
        Ok(())
    }

    // Logout ou falha de autorização
    pub fn end(&mut self) -> Result<(), AppError> {
        // O token em memória some mesmo que o disco falhe
        self.credential = None;
        self.store.clear()?;
        info!("Sessão encerrada");
        Ok(())
    }
}

// ---
// O Guardião
// ---
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Authorized(Credential),
    Redirect(Route),
}

/// Sem token = redireciona para o login. Nenhuma chamada deve ser feita nesse caso.
pub fn ensure_session(session: &SessionContext) -> GuardOutcome {
    match session.credential() {
        Some(credential) => GuardOutcome::Authorized(credential.clone()),
        None => GuardOutcome::Redirect(Route::Login),
    }
}

#[derive(Debug)]
pub enum Intercepted {
    Redirect(Route),
    Surface(AppError),
}

// Toda falha de chamada passa por aqui: 401 limpa a sessão e redireciona,
// o resto é mostrado ao usuário como veio.
pub fn intercept(session: &mut SessionContext, err: AppError) -> Intercepted {
    if !err.is_unauthorized() {
        warn!(error = %err, "Falha na chamada à API");
        return Intercepted::Surface(err);
    }

    warn!("Token recusado pelo backend; limpando a sessão");
    if let Err(e) = session.end() {
        error!("🔥 Falha ao apagar a sessão salva: {}", e);
    }
    Intercepted::Redirect(Route::Login)
}
