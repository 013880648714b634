use chrono::Utc;
use uuid::Uuid;

use super::{ReportEvent, ReportKind};

/// Canal de reporte append-only. El sink asigna `seq` (contiguo desde 0 por
/// run) y el timestamp; quien reporta sólo aporta el `ReportKind`.
pub trait ReportSink {
    fn append_kind(&mut self, run_id: Uuid, kind: ReportKind) -> ReportEvent;

    /// Eventos de `run_id` en orden de llegada.
    fn list(&self, run_id: Uuid) -> Vec<ReportEvent>;
}

/// Registro en memoria para el intérprete simulado y los tests. Guarda un
/// único log con los eventos de todos los runs intercalados.
#[derive(Debug, Default)]
pub struct InMemoryReportSink {
    log: Vec<ReportEvent>,
}

impl InMemoryReportSink {
    /// Todos los eventos recibidos, de cualquier run.
    pub fn events(&self) -> &[ReportEvent] {
        &self.log
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    fn next_seq(&self, run_id: Uuid) -> u64 {
        self.log.iter().filter(|e| e.run_id == run_id).count() as u64
    }
}

impl ReportSink for InMemoryReportSink {
    fn append_kind(&mut self, run_id: Uuid, kind: ReportKind) -> ReportEvent {
        let event = ReportEvent { seq: self.next_seq(run_id),
                                  run_id,
                                  kind,
                                  ts: Utc::now() };
        self.log.push(event.clone());
        event
    }

    fn list(&self, run_id: Uuid) -> Vec<ReportEvent> {
        self.log.iter().filter(|e| e.run_id == run_id).cloned().collect()
    }
}

impl<S: ReportSink + ?Sized> ReportSink for &mut S {
    fn append_kind(&mut self, run_id: Uuid, kind: ReportKind) -> ReportEvent {
        (**self).append_kind(run_id, kind)
    }

    fn list(&self, run_id: Uuid) -> Vec<ReportEvent> {
        (**self).list(run_id)
    }
}
