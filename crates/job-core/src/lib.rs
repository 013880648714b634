//! job-core: modelo de instrucciones del compilador de jobs.
//!
//! - `command`: nodos inmutables del árbol (variantes cerradas + atributos).
//! - `status`: fases/resultado del job y validación de orden de reportes.
//! - `context`: variables de entorno ordenadas con marca de seguridad.
//! - `redact`: política de redacción de secretos.
//! - `hashing`: fingerprint determinista de árboles.
//! - `report` / `interpreter`: canal de reporte e intérprete de referencia.
pub mod command;
pub mod constants;
pub mod context;
pub mod errors;
pub mod hashing;
pub mod interpreter;
pub mod redact;
pub mod report;
pub mod status;

pub use command::{BuildCommand, CommandKind, ConsoleTag, RunIf, TestFlag, TestProbe};
pub use context::{EnvironmentContext, EnvironmentVariable};
pub use errors::CoreError;
pub use hashing::fingerprint;
pub use interpreter::{CancelTrigger, Interpreter, RunOutcome, SimulatedHost, StepOutcome, TraceEntry};
pub use report::{InMemoryReportSink, ReportEvent, ReportKind, ReportSink};
pub use status::{validate_phase_order, JobPhase, JobResult, JobStatusTracker};
