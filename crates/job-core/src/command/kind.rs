use serde::{Deserialize, Serialize};

use super::node::BuildCommand;
use super::tag::ConsoleTag;
use crate::status::JobPhase;

/// Sonda evaluada por un nodo `Test`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TestFlag {
    /// `-d`: el directorio existe.
    #[serde(rename = "-d")]
    Dir,
    /// `-nd`: el directorio no existe.
    #[serde(rename = "-nd")]
    NotDir,
    /// `-f`: el fichero existe.
    #[serde(rename = "-f")]
    File,
    /// `-nf`: el fichero no existe.
    #[serde(rename = "-nf")]
    NotFile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestProbe {
    pub flag: TestFlag,
    pub path: String,
}

impl TestProbe {
    pub fn new(flag: TestFlag, path: impl Into<String>) -> Self {
        Self { flag, path: path.into() }
    }
}

/// Variantes cerradas de instrucción. Añadir un tipo de nodo es un cambio en
/// tiempo de compilación: el intérprete y los validadores hacen `match`
/// exhaustivo sobre este enum.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CommandKind {
    Echo {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tag: Option<ConsoleTag>,
        text: String,
    },
    Compose { children: Vec<BuildCommand> },
    Task { description: String, body: Box<BuildCommand> },
    Export {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        secure: bool,
    },
    Secret { value: String },
    UploadArtifact { src: String, dest: String, is_test: bool },
    GenerateProperty { name: String, src: String, xpath: String },
    GenerateTestReport { sources: Vec<String>, dest_dir: String },
    ReportStatus { phase: JobPhase },
    ReportAction { tag: ConsoleTag, message: String },
    ReportResult,
    Test { probe: TestProbe },
    Exec { command: String, args: Vec<String> },
    MkDirs { path: String },
    CleanDir {
        path: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        allowed: Vec<String>,
    },
    Noop,
}

impl CommandKind {
    /// Nombre estable de la variante (coincide con el discriminador serde).
    pub fn name(&self) -> &'static str {
        match self {
            CommandKind::Echo { .. } => "echo",
            CommandKind::Compose { .. } => "compose",
            CommandKind::Task { .. } => "task",
            CommandKind::Export { .. } => "export",
            CommandKind::Secret { .. } => "secret",
            CommandKind::UploadArtifact { .. } => "uploadArtifact",
            CommandKind::GenerateProperty { .. } => "generateProperty",
            CommandKind::GenerateTestReport { .. } => "generateTestReport",
            CommandKind::ReportStatus { .. } => "reportStatus",
            CommandKind::ReportAction { .. } => "reportAction",
            CommandKind::ReportResult => "reportResult",
            CommandKind::Test { .. } => "test",
            CommandKind::Exec { .. } => "exec",
            CommandKind::MkDirs { .. } => "mkdirs",
            CommandKind::CleanDir { .. } => "cleandir",
            CommandKind::Noop => "noop",
        }
    }

    /// Un nodo compuesto contiene otros nodos de ejecución (no cuenta la
    /// guarda ni el override de cancelación).
    pub fn is_composite(&self) -> bool {
        matches!(self, CommandKind::Compose { .. } | CommandKind::Task { .. })
    }

    /// Texto que el worker puede mostrar en consola tal cual.
    pub fn displayable_text(&self) -> Option<&str> {
        match self {
            CommandKind::Echo { text, .. } => Some(text),
            CommandKind::ReportAction { message, .. } => Some(message),
            CommandKind::Task { description, .. } => Some(description),
            _ => None,
        }
    }
}
