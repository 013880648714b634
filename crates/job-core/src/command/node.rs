//! `BuildCommand`: nodo inmutable del árbol de instrucciones.
//!
//! Los constructores son funciones puras: con los mismos argumentos devuelven
//! nodos estructuralmente iguales. Los atributos (`run_if`, `on_cancel`,
//! directorio de trabajo, guarda) se fijan con métodos que consumen `self` y
//! devuelven un nodo nuevo, de modo que nunca se modifica un nodo ya
//! entregado a otro constructor.

use serde::{Deserialize, Serialize};

use super::kind::{CommandKind, TestFlag, TestProbe};
use super::run_if::RunIf;
use super::tag::ConsoleTag;
use crate::status::JobPhase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildCommand {
    #[serde(flatten)]
    kind: CommandKind,
    #[serde(default)]
    run_if: RunIf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    on_cancel: Option<Box<BuildCommand>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    working_directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    test: Option<Box<BuildCommand>>,
}

impl BuildCommand {
    fn leaf(kind: CommandKind) -> Self {
        Self { kind,
               run_if: RunIf::default(),
               on_cancel: None,
               working_directory: None,
               test: None }
    }

    // ---------------- accessors ----------------

    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }

    pub fn run_if_policy(&self) -> RunIf {
        self.run_if
    }

    pub fn on_cancel(&self) -> Option<&BuildCommand> {
        self.on_cancel.as_deref()
    }

    pub fn working_directory(&self) -> Option<&str> {
        self.working_directory.as_deref()
    }

    /// Guarda: nodo `Test` evaluado antes de ejecutar este nodo.
    pub fn guard(&self) -> Option<&BuildCommand> {
        self.test.as_deref()
    }

    /// Hijos de ejecución directa (hijos de `Compose`, cuerpo de `Task`).
    pub fn children(&self) -> &[BuildCommand] {
        match &self.kind {
            CommandKind::Compose { children } => children,
            CommandKind::Task { body, .. } => std::slice::from_ref(body.as_ref()),
            _ => &[],
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self.kind, CommandKind::Noop)
    }

    // ---------------- attribute builders ----------------

    pub fn run_if(mut self, policy: RunIf) -> Self {
        self.run_if = policy;
        self
    }

    /// Fuerza `policy` en este nodo y en todos sus descendientes de ejecución.
    /// Los overrides de cancelación y las guardas conservan su política.
    pub fn run_if_recursively(mut self, policy: RunIf) -> Self {
        self.run_if = policy;
        self.kind = match self.kind {
            CommandKind::Compose { children } => {
                CommandKind::Compose { children: children.into_iter()
                                                         .map(|c| c.run_if_recursively(policy))
                                                         .collect() }
            }
            CommandKind::Task { description, body } => {
                CommandKind::Task { description,
                                    body: Box::new(body.run_if_recursively(policy)) }
            }
            other => other,
        };
        self
    }

    /// Reescribe el texto mostrable (echo, acción, descripción de task) en
    /// todo el árbol, overrides de cancelación incluidos. Las guardas no
    /// muestran texto y se conservan tal cual.
    pub fn map_displayable(mut self, f: &impl Fn(&str) -> String) -> Self {
        self.kind = match self.kind {
            CommandKind::Echo { tag, text } => CommandKind::Echo { tag, text: f(&text) },
            CommandKind::ReportAction { tag, message } => CommandKind::ReportAction { tag, message: f(&message) },
            CommandKind::Task { description, body } => {
                CommandKind::Task { description: f(&description),
                                    body: Box::new(body.map_displayable(f)) }
            }
            CommandKind::Compose { children } => {
                CommandKind::Compose { children: children.into_iter().map(|c| c.map_displayable(f)).collect() }
            }
            other => other,
        };
        self.on_cancel = self.on_cancel.map(|c| Box::new(c.map_displayable(f)));
        self
    }

    pub fn with_on_cancel(mut self, on_cancel: BuildCommand) -> Self {
        self.on_cancel = Some(Box::new(on_cancel));
        self
    }

    pub fn with_optional_on_cancel(self, on_cancel: Option<BuildCommand>) -> Self {
        match on_cancel {
            Some(c) => self.with_on_cancel(c),
            None => self,
        }
    }

    pub fn with_working_directory(mut self, dir: impl Into<String>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    /// Adjunta una guarda `Test`; el nodo se omite si la sonda es falsa.
    pub fn with_test(mut self, probe: TestProbe) -> Self {
        self.test = Some(Box::new(test(probe)));
        self
    }

    // ---------------- traversal ----------------

    /// Recorrido pre-orden del árbol principal (sin guardas ni overrides).
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a BuildCommand)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    /// Hojas del árbol principal en orden de ejecución.
    pub fn leaves(&self) -> Vec<&BuildCommand> {
        let mut out = Vec::new();
        self.walk(&mut |n| {
                if !n.kind.is_composite() {
                    out.push(n);
                }
            });
        out
    }

    /// Número de nodos del árbol principal cuyo kind cumple `pred`.
    pub fn count_kind(&self, pred: impl Fn(&CommandKind) -> bool) -> usize {
        let mut n = 0;
        self.walk(&mut |c| {
                if pred(&c.kind) {
                    n += 1;
                }
            });
        n
    }
}

// ---------------- constructors ----------------

pub fn echo(text: impl Into<String>) -> BuildCommand {
    BuildCommand::leaf(CommandKind::Echo { tag: None, text: text.into() })
}

pub fn echo_with_prefix(tag: ConsoleTag, text: impl Into<String>) -> BuildCommand {
    BuildCommand::leaf(CommandKind::Echo { tag: Some(tag), text: text.into() })
}

/// Secuencia. Cero nodos produce `Noop`; un nodo se devuelve sin envolver.
pub fn compose(children: impl IntoIterator<Item = BuildCommand>) -> BuildCommand {
    let mut children: Vec<BuildCommand> = children.into_iter().collect();
    match children.len() {
        0 => noop(),
        1 => children.remove(0),
        _ => BuildCommand::leaf(CommandKind::Compose { children }),
    }
}

pub fn task(description: impl Into<String>, body: BuildCommand) -> BuildCommand {
    BuildCommand::leaf(CommandKind::Task { description: description.into(),
                                           body: Box::new(body) })
}

pub fn export(name: impl Into<String>, value: impl Into<String>, secure: bool) -> BuildCommand {
    BuildCommand::leaf(CommandKind::Export { name: name.into(),
                                             value: Some(value.into()),
                                             secure })
}

/// Exporta una variable ya presente en el entorno del agente.
pub fn export_inherited(name: impl Into<String>) -> BuildCommand {
    BuildCommand::leaf(CommandKind::Export { name: name.into(),
                                             value: None,
                                             secure: false })
}

pub fn secret(value: impl Into<String>) -> BuildCommand {
    BuildCommand::leaf(CommandKind::Secret { value: value.into() })
}

pub fn upload_artifact(src: impl Into<String>, dest: impl Into<String>, is_test: bool) -> BuildCommand {
    BuildCommand::leaf(CommandKind::UploadArtifact { src: src.into(),
                                                     dest: dest.into(),
                                                     is_test })
}

pub fn generate_property(name: impl Into<String>, src: impl Into<String>, xpath: impl Into<String>) -> BuildCommand {
    BuildCommand::leaf(CommandKind::GenerateProperty { name: name.into(),
                                                       src: src.into(),
                                                       xpath: xpath.into() })
}

pub fn generate_test_report(sources: Vec<String>, dest_dir: impl Into<String>) -> BuildCommand {
    BuildCommand::leaf(CommandKind::GenerateTestReport { sources,
                                                         dest_dir: dest_dir.into() })
}

pub fn report_status(phase: JobPhase) -> BuildCommand {
    BuildCommand::leaf(CommandKind::ReportStatus { phase })
}

pub fn report_action(tag: ConsoleTag, message: impl Into<String>) -> BuildCommand {
    BuildCommand::leaf(CommandKind::ReportAction { tag, message: message.into() })
}

pub fn report_result() -> BuildCommand {
    BuildCommand::leaf(CommandKind::ReportResult)
}

pub fn test(probe: TestProbe) -> BuildCommand {
    BuildCommand::leaf(CommandKind::Test { probe })
}

pub fn test_path(flag: TestFlag, path: impl Into<String>) -> TestProbe {
    TestProbe::new(flag, path)
}

pub fn exec<I, S>(command: impl Into<String>, args: I) -> BuildCommand
    where I: IntoIterator<Item = S>,
          S: Into<String>
{
    BuildCommand::leaf(CommandKind::Exec { command: command.into(),
                                           args: args.into_iter().map(Into::into).collect() })
}

pub fn mkdirs(path: impl Into<String>) -> BuildCommand {
    BuildCommand::leaf(CommandKind::MkDirs { path: path.into() })
}

pub fn cleandir(path: impl Into<String>, allowed: Vec<String>) -> BuildCommand {
    BuildCommand::leaf(CommandKind::CleanDir { path: path.into(), allowed })
}

pub fn noop() -> BuildCommand {
    BuildCommand::leaf(CommandKind::Noop)
}
