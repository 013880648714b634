//! Errores del composer.
//! Todo error se produce antes de devolver el árbol: nunca hay salida parcial.

use job_core::CoreError;
use job_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComposeError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid job plan: {0}")]
    InvalidPlan(String),
    #[error("no update instruction for {kind} material '{name}'")]
    UnsupportedMaterial { kind: String, name: String },
    #[error("malformed instruction tree: {0}")]
    MalformedTree(String),
}

impl From<DomainError> for ComposeError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Configuration(msg) => Self::Configuration(msg),
            DomainError::Validation(msg) => Self::InvalidPlan(msg),
        }
    }
}

// el árbol terminado no pasó las validaciones estáticas
impl From<CoreError> for ComposeError {
    fn from(e: CoreError) -> Self {
        Self::MalformedTree(e.to_string())
    }
}
