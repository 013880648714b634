use job_compose::ComposeError;
use job_domain::DomainError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobflowError {
    #[error("Error de entorno: {0}")]
    Environment(#[from] DomainError),
    #[error("Error de composición: {0}")]
    Compose(#[from] ComposeError),
}
