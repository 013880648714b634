use serde::{Deserialize, Serialize};

use crate::status::{JobPhase, JobResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepOutcome {
    Executed,
    Failed,
    SkippedByRunIf,
    SkippedByGuard,
    /// Empezó y fue interrumpido por la cancelación.
    Abandoned,
}

/// Una entrada por nodo visitado (hojas ejecutadas y nodos omitidos).
/// Sólo se serializa: `name` apunta al nombre estático de la variante.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub name: &'static str,
    pub detail: String,
    pub outcome: StepOutcome,
    /// Ejecutado dentro de un override de cancelación.
    pub in_cancel: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunOutcome {
    pub trace: Vec<TraceEntry>,
    pub console: Vec<String>,
    pub phase: Option<JobPhase>,
    pub result: Option<JobResult>,
    pub cancelled: bool,
}

impl RunOutcome {
    /// Entradas ejecutadas (con éxito o fallo) de la variante `name`.
    pub fn executed(&self, name: &str) -> Vec<&TraceEntry> {
        self.trace
            .iter()
            .filter(|e| e.name == name && matches!(e.outcome, StepOutcome::Executed | StepOutcome::Failed))
            .collect()
    }

    pub fn ran(&self, name: &str, detail_contains: &str) -> bool {
        self.executed(name).iter().any(|e| e.detail.contains(detail_contains))
    }

    pub fn skipped(&self, name: &str, detail_contains: &str) -> bool {
        self.trace.iter().any(|e| {
                             e.name == name
                             && e.detail.contains(detail_contains)
                             && matches!(e.outcome, StepOutcome::SkippedByRunIf | StepOutcome::SkippedByGuard)
                         })
    }

    /// Número de `ReportStatus(Completed)` ejecutados.
    pub fn completed_reports(&self) -> usize {
        self.executed("reportStatus").iter().filter(|e| e.detail == "Completed").count()
    }
}
