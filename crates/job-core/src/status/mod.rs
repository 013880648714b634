//! Modelo de estado de ejecución: fases, resultado y validación de orden.

mod order;
mod phase;
mod tracker;

pub use order::validate_phase_order;
pub use phase::{JobPhase, JobResult};
pub use tracker::JobStatusTracker;
