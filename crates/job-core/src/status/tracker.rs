use serde::{Deserialize, Serialize};

use super::{JobPhase, JobResult};
use crate::errors::CoreError;

/// Máquina de estados fase + resultado de una ejecución de job.
///
/// Transiciones válidas: `Preparing -> Building -> Completing -> Completed`
/// (se permite saltar fases hacia delante, nunca volver). El resultado se
/// decide una vez, no antes de `Completing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatusTracker {
    phase: Option<JobPhase>,
    result: Option<JobResult>,
}

impl JobStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Option<JobPhase> {
        self.phase
    }

    pub fn result(&self) -> Option<JobResult> {
        self.result
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Some(JobPhase::Completed)
    }

    pub fn advance(&mut self, to: JobPhase) -> Result<(), CoreError> {
        if let Some(from) = self.phase {
            if to <= from {
                return Err(CoreError::PhaseOrder { from: Some(from), to });
            }
        }
        self.phase = Some(to);
        Ok(())
    }

    pub fn assign_result(&mut self, result: JobResult) -> Result<(), CoreError> {
        if let Some(existing) = self.result {
            return Err(CoreError::ResultAlreadyAssigned(existing));
        }
        match self.phase {
            Some(p) if p >= JobPhase::Completing => {
                self.result = Some(result);
                Ok(())
            }
            other => Err(CoreError::ResultBeforeCompleting(other)),
        }
    }

    /// Cierre de una ruta de cancelación: avanza a `Completed` y, si aún no
    /// hay resultado, lo fija como `Cancelled`.
    pub fn complete_cancelled(&mut self) -> Result<(), CoreError> {
        self.advance(JobPhase::Completed)?;
        if self.result.is_none() {
            self.result = Some(JobResult::Cancelled);
        }
        Ok(())
    }
}
