use std::fmt;

use serde::{Deserialize, Serialize};

/// Fase del ciclo de vida de un job. El orden de declaración es el orden
/// del ciclo de vida (`Ord` derivado).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JobPhase {
    Preparing,
    Building,
    Completing,
    Completed,
}

/// Resultado final del job; se asigna una sola vez, desde `Completing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobResult {
    Passed,
    Failed,
    Cancelled,
}

impl JobResult {
    pub fn to_lowercase(self) -> &'static str {
        match self {
            JobResult::Passed => "passed",
            JobResult::Failed => "failed",
            JobResult::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl fmt::Display for JobResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
