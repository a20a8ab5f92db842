// src/common/error.rs

use thiserror::Error;
use validator::ValidationErrors;

// Mensagem sentinela: quem recebe este erro deve limpar a sessão e redirecionar.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

// Nosso tipo de erro. O `Display` de cada variante é o texto mostrado ao usuário.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("{}", validation_summary(.0))]
    ValidationError(#[from] ValidationErrors),

    // Falha reportada pelo backend (detalhe do backend ou mensagem genérica)
    #[error("{0}")]
    Backend(String),

    // O backend nem chegou a responder
    #[error("Could not reach the inventory API: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Session storage error: {0}")]
    Session(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Unexpected error: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// `true` quando o erro deve disparar o "limpa sessão e redireciona".
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::Unauthorized)
    }

    /// Erro de validação de um único campo, no mesmo formato do `validator`.
    pub fn invalid_field(field: &'static str, code: &'static str, message: &'static str) -> Self {
        let mut error = validator::ValidationError::new(code);
        error.message = Some(message.into());
        let mut errors = ValidationErrors::new();
        errors.add(field, error);
        AppError::ValidationError(errors)
    }
}

// Junta as mensagens de todos os campos inválidos numa única linha.
fn validation_summary(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(_, field_errors)| field_errors.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .collect();

    if messages.is_empty() {
        return "Invalid input.".to_string();
    }

    // A ordem do HashMap não é estável
    messages.sort();
    messages.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_displays_the_sentinel() {
        assert_eq!(AppError::Unauthorized.to_string(), UNAUTHORIZED_MESSAGE);
        assert!(AppError::Unauthorized.is_unauthorized());
        assert!(!AppError::Backend(UNAUTHORIZED_MESSAGE.into()).is_unauthorized());
    }

    #[test]
    fn validation_errors_show_their_messages() {
        let err = AppError::invalid_field("quantity", "range", "Quantity must be at least 1.");
        assert_eq!(err.to_string(), "Quantity must be at least 1.");
    }

    #[test]
    fn backend_errors_are_shown_verbatim() {
        let err = AppError::Backend("Inventory item not found".into());
        assert_eq!(err.to_string(), "Inventory item not found");
    }
}
