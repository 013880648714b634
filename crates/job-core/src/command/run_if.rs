use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Política de ejecución condicional de un nodo.
///
/// - `Passed`: sólo si no hubo fallos hasta el momento en el scope.
/// - `Failed`: sólo si ya se registró un fallo.
/// - `Any`: siempre, incluidas las rutas de cancelación.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunIf {
    #[default]
    Passed,
    Failed,
    Any,
}

impl RunIf {
    /// ¿Debe ejecutarse el nodo dado el estado acumulado?
    pub fn matches(self, failed_so_far: bool) -> bool {
        match self {
            RunIf::Passed => !failed_so_far,
            RunIf::Failed => failed_so_far,
            RunIf::Any => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RunIf::Passed => "passed",
            RunIf::Failed => "failed",
            RunIf::Any => "any",
        }
    }
}

impl fmt::Display for RunIf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RunIf {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "passed" => Ok(RunIf::Passed),
            "failed" => Ok(RunIf::Failed),
            "any" => Ok(RunIf::Any),
            other => Err(format!("unknown run-if policy '{other}'")),
        }
    }
}
