//! Errores del core: invariantes del árbol y de la máquina de estados.
//!
//! Todos representan errores de programación (un árbol mal formado), nunca
//! condiciones recuperables en tiempo de ejecución del job.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::{JobPhase, JobResult};

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum CoreError {
    #[error("phase {to:?} reported after {from:?} (phases must move forward)")]
    PhaseOrder { from: Option<JobPhase>, to: JobPhase },
    #[error("job result already assigned as {0:?}")]
    ResultAlreadyAssigned(JobResult),
    #[error("job result reported before Completing (current phase {0:?})")]
    ResultBeforeCompleting(Option<JobPhase>),
    #[error("malformed tree: {0}")]
    MalformedTree(String),
    #[error("redaction violated: {0}")]
    Redaction(String),
}
