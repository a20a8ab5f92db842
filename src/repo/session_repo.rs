// src/repo/session_repo.rs

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{common::error::AppError, models::auth::Credential};

// Onde o token da sessão fica guardado entre execuções
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Credential>, AppError>;
    fn save(&mut self, credential: &Credential) -> Result<(), AppError>;
    fn clear(&mut self) -> Result<(), AppError>;
}

// ---
// Armazenamento em arquivo (JSON)
// ---
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    access_token: String,
    token_type: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Credential>, AppError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| {
            AppError::Session(format!("cannot read '{}': {}", self.path.display(), e))
        })?;

        // Arquivo corrompido = sem sessão; o login grava um novo
        match serde_json::from_str::<StoredSession>(&contents) {
            Ok(stored) => Ok(Some(Credential::new(stored.access_token))),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Sessão salva corrompida; descartando"
                );
                if let Err(e) = fs::remove_file(&self.path) {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Não foi possível apagar a sessão corrompida"
                    );
                }
                Ok(None)
            }
        }
    }

    fn save(&mut self, credential: &Credential) -> Result<(), AppError> {
        // 1. Garante que o diretório existe
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // 2. Grava o arquivo
        let stored = StoredSession {
            access_token: credential.as_str().to_string(),
            token_type: "bearer".to_string(),
            created_at: Utc::now(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;

        // 3. Só o dono pode ler o token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }

    fn clear(&mut self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---
// Armazenamento em memória (testes e uso embutido)
// ---
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    credential: Option<Credential>,
}

impl MemorySessionStore {
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            credential: Some(credential),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Credential>, AppError> {
        Ok(self.credential.clone())
    }

    fn save(&mut self, credential: &Credential) -> Result<(), AppError> {
        self.credential = Some(credential.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), AppError> {
        self.credential = None;
        Ok(())
    }
}
