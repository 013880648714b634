//! Tareas del plan y su traducción a nodos de instrucción.

use job_core::command::{exec, BuildCommand, RunIf};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Conjunto de condiciones declaradas para una tarea.
///
/// Vacío equivale a `passed`; `any`, o `passed` junto a `failed`, se resuelve
/// a `any`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunIfConfig(Vec<RunIf>);

impl RunIfConfig {
    pub fn new(policies: impl IntoIterator<Item = RunIf>) -> Self {
        Self(policies.into_iter().collect())
    }

    pub fn resolved(&self) -> RunIf {
        let has = |p| self.0.contains(&p);
        if has(RunIf::Any) || (has(RunIf::Passed) && has(RunIf::Failed)) {
            RunIf::Any
        } else if has(RunIf::Failed) {
            RunIf::Failed
        } else {
            RunIf::Passed
        }
    }
}

impl From<RunIf> for RunIfConfig {
    fn from(policy: RunIf) -> Self {
        Self(vec![policy])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaskCommand {
    Exec {
        command: String,
        #[serde(default)]
        args: Vec<String>,
        #[serde(default)]
        working_directory: Option<String>,
    },
    Rake {
        #[serde(default)]
        build_file: Option<String>,
        #[serde(default)]
        target: Option<String>,
        #[serde(default)]
        working_directory: Option<String>,
    },
    /// Nodo ya construido (p.ej. tareas de plugin resueltas fuera).
    Command { node: BuildCommand },
}

impl TaskCommand {
    pub fn build_command(&self) -> Result<BuildCommand, DomainError> {
        match self {
            TaskCommand::Exec { command, args, working_directory } => {
                if command.trim().is_empty() {
                    return Err(DomainError::Validation("exec task has an empty command".into()));
                }
                Ok(in_dir(exec(command.clone(), args.iter().cloned()), working_directory))
            }
            TaskCommand::Rake { build_file, target, working_directory } => {
                let mut args = Vec::new();
                if let Some(file) = build_file.as_deref().filter(|f| !f.is_empty()) {
                    args.push("-f".to_string());
                    args.push(file.replace('\\', "/"));
                }
                if let Some(t) = target.as_deref().filter(|t| !t.is_empty()) {
                    args.push(t.to_string());
                }
                Ok(in_dir(exec("rake", args), working_directory))
            }
            TaskCommand::Command { node } => Ok(node.clone()),
        }
    }

    /// Texto corto para la descripción por defecto de la tarea.
    pub fn describe(&self) -> String {
        match self {
            TaskCommand::Exec { command, args, .. } => {
                std::iter::once(command.as_str()).chain(args.iter().map(String::as_str))
                                                 .collect::<Vec<_>>()
                                                 .join(" ")
            }
            TaskCommand::Rake { build_file, target, .. } => {
                let mut out = "rake".to_string();
                if let Some(f) = build_file {
                    out.push_str(&format!(" -f \"{}\"", f.replace('\\', "/")));
                }
                if let Some(t) = target {
                    out.push(' ');
                    out.push_str(t);
                }
                out
            }
            TaskCommand::Command { node } => node.kind().name().to_string(),
        }
    }
}

fn in_dir(cmd: BuildCommand, dir: &Option<String>) -> BuildCommand {
    match dir.as_deref().filter(|d| !d.is_empty()) {
        Some(d) => cmd.with_working_directory(d),
        None => cmd,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancelTaskSpec {
    #[serde(default)]
    pub description: Option<String>,
    pub command: TaskCommand,
}

impl CancelTaskSpec {
    pub fn new(command: TaskCommand) -> Self {
        Self { description: None, command }
    }

    pub fn description(&self) -> String {
        self.description.clone().unwrap_or_else(|| self.command.describe())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub run_if: RunIfConfig,
    pub command: TaskCommand,
    #[serde(default)]
    pub on_cancel: Option<CancelTaskSpec>,
}

impl TaskSpec {
    pub fn new(command: TaskCommand) -> Self {
        Self { description: None,
               run_if: RunIfConfig::default(),
               command,
               on_cancel: None }
    }

    pub fn described(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn run_if(mut self, policy: RunIf) -> Self {
        self.run_if = policy.into();
        self
    }

    pub fn on_cancel(mut self, cancel: CancelTaskSpec) -> Self {
        self.on_cancel = Some(cancel);
        self
    }

    pub fn description(&self) -> String {
        self.description.clone().unwrap_or_else(|| self.command.describe())
    }
}
