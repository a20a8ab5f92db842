// src/models/auth.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Dados do formulário de login.
// O backend é OAuth2: o e-mail vai no campo `username`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LoginPayload {
    #[validate(length(min = 1, message = "Email is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required."))]
    pub password: String,
}

impl LoginPayload {
    pub fn new(email: &str, password: &str) -> Self {
        Self {
            username: email.trim().to_string(),
            password: password.to_string(),
        }
    }
}

// Resposta do login com o token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

// Identidade atual (GET /auth/me)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub tenant_id: Option<Uuid>,
    // O backend nem sempre envia o campo; ausente = usuário comum
    #[serde(default)]
    pub is_superuser: bool,
}

/// Token de sessão (bearer). Opaco para o cliente.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Nunca imprimir o token em logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}
