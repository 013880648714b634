//! Prefijos de consola: cada línea emitida por el worker lleva uno de estos
//! tags de dos caracteres para que el visor agrupe secciones.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsoleTag {
    Notice,
    Alert,
    Prep,
    PrepErr,
    TaskStart,
    Out,
    Err,
    Pass,
    Fail,
    CancelTaskStart,
    CancelTaskPass,
    CancelTaskFail,
    JobPass,
    JobFail,
    JobCancelled,
    Publish,
    Completed,
}

impl ConsoleTag {
    /// Prefijo de dos caracteres usado en el log de consola.
    pub fn prefix(self) -> &'static str {
        match self {
            ConsoleTag::Notice => "##",
            ConsoleTag::Alert => "@@",
            ConsoleTag::Prep => "pr",
            ConsoleTag::PrepErr => "pe",
            ConsoleTag::TaskStart => "!!",
            ConsoleTag::Out => "&1",
            ConsoleTag::Err => "&2",
            ConsoleTag::Pass => "?0",
            ConsoleTag::Fail => "?1",
            ConsoleTag::CancelTaskStart => "!x",
            ConsoleTag::CancelTaskPass => "x0",
            ConsoleTag::CancelTaskFail => "x1",
            ConsoleTag::JobPass => "j0",
            ConsoleTag::JobFail => "j1",
            ConsoleTag::JobCancelled => "jc",
            ConsoleTag::Publish => "ar",
            ConsoleTag::Completed => "ex",
        }
    }
}
