//! Eventos del canal de reporte.
//!
//! Rol en el flujo:
//! - Los nodos `ReportStatus`, `ReportResult`, `ReportAction` y las líneas de
//!   consola se traducen, al interpretarse, en eventos append-only.
//! - El canal real (externo) es fiable y ordenado por job; aquí sólo se fija
//!   la forma de los eventos.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::command::ConsoleTag;
use crate::status::{JobPhase, JobResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportKind {
    /// Transición de fase. Invariante: fases estrictamente crecientes por run.
    PhaseChanged { phase: JobPhase },
    /// Resultado decidido (una sola vez por run).
    ResultDecided { result: JobResult },
    /// Línea de acción (`ReportAction`) ya enmascarada.
    ActionLogged { tag: ConsoleTag, message: String },
    /// Línea de consola ya enmascarada.
    ConsoleLine { tag: Option<ConsoleTag>, text: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEvent {
    pub seq: u64, // asignado por el sink (orden append)
    pub run_id: Uuid,
    pub kind: ReportKind,
    pub ts: DateTime<Utc>, // metadato (no entra en fingerprint)
}
