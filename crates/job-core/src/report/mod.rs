//! Definiciones de eventos de reporte y trait ReportSink.

mod sink;
mod types;

pub use sink::{InMemoryReportSink, ReportSink};
pub use types::{ReportEvent, ReportKind};
