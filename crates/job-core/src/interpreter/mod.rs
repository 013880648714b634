//! Intérprete de referencia (simulado) de árboles de instrucciones.
//!
//! El worker real queda fuera de este crate; este intérprete fija la
//! semántica que el worker debe respetar y se usa en tests y en la CLI:
//!
//! - Estado acumulado único por job: un fallo en cualquier hoja cambia qué
//!   ramas `Passed`/`Failed` se ejecutan después; las `Any` siempre corren.
//! - La cancelación se comprueba antes de cada hoja. Al cancelarse, se
//!   abandona la hoja actual y se ejecutan los `on_cancel` de los ancestros,
//!   del más interno a la raíz, cada uno en un scope limpio y sin abrir una
//!   nueva sesión de cancelación.
//! - `ReportStatus(Completed)` sin resultado previo fija `Cancelled` en una
//!   ruta de cancelación y Passed/Failed en la ruta normal.

mod host;
mod outcome;

use log::{debug, info};
use uuid::Uuid;

pub use host::{CancelTrigger, SimulatedHost};
pub use outcome::{RunOutcome, StepOutcome, TraceEntry};

use crate::command::{BuildCommand, CommandKind, ConsoleTag};
use crate::constants::SECRET_MASK;
use crate::errors::CoreError;
use crate::redact::mask;
use crate::report::{ReportKind, ReportSink};
use crate::status::{JobPhase, JobResult, JobStatusTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Cancelled,
}

#[derive(Default)]
struct Session {
    failed: bool,
    failures: usize,
    next_leaf: usize,
    cancelled: bool,
    sweeping: bool,
    secrets: Vec<String>,
    tracker: JobStatusTracker,
    outcome: RunOutcome,
}

pub struct Interpreter<S: ReportSink> {
    host: SimulatedHost,
    sink: S,
}

impl<S: ReportSink> Interpreter<S> {
    pub fn new(host: SimulatedHost, sink: S) -> Self {
        Self { host, sink }
    }

    pub fn host(&self) -> &SimulatedHost {
        &self.host
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Interpreta `tree` completo. Un `Err` indica un árbol mal formado
    /// (p. ej. reportes fuera de orden), nunca el fallo de una task.
    pub fn run(&mut self, run_id: Uuid, tree: &BuildCommand) -> Result<RunOutcome, CoreError> {
        let mut session = Session::default();
        let flow = self.exec_node(run_id, tree, &mut session)?;
        session.outcome.cancelled = flow == Flow::Cancelled;
        session.outcome.phase = session.tracker.phase();
        session.outcome.result = session.tracker.result();
        info!("run {run_id}: phase={:?} result={:?} cancelled={}",
              session.outcome.phase,
              session.outcome.result,
              session.outcome.cancelled);
        Ok(session.outcome)
    }

    fn exec_node(&mut self, run_id: Uuid, node: &BuildCommand, s: &mut Session) -> Result<Flow, CoreError> {
        if !node.run_if_policy().matches(s.failed) {
            self.record(s, node, StepOutcome::SkippedByRunIf);
            return Ok(Flow::Continue);
        }
        if let Some(guard) = node.guard() {
            if !self.guard_holds(guard) {
                self.record(s, node, StepOutcome::SkippedByGuard);
                return Ok(Flow::Continue);
            }
        }

        let flow = match node.kind() {
            CommandKind::Compose { children } => {
                let mut flow = Flow::Continue;
                for child in children {
                    if self.exec_node(run_id, child, s)? == Flow::Cancelled {
                        flow = Flow::Cancelled;
                        break;
                    }
                }
                flow
            }
            CommandKind::Task { description, body } => {
                self.console(run_id, s, Some(ConsoleTag::TaskStart), &format!("Task: {description}"));
                let failures_before = s.failures;
                let flow = self.exec_node(run_id, body, s)?;
                if flow == Flow::Continue {
                    let (tag, status) = if s.failures > failures_before {
                        (ConsoleTag::Fail, "failed")
                    } else {
                        (ConsoleTag::Pass, "passed")
                    };
                    self.console(run_id, s, Some(tag), &format!("Task status: {status}"));
                }
                flow
            }
            _ => self.exec_leaf(run_id, node, s)?,
        };

        if flow == Flow::Cancelled && !s.sweeping {
            if let Some(cancel) = node.on_cancel() {
                self.sweep(run_id, cancel, s)?;
            }
        }
        Ok(flow)
    }

    fn sweep(&mut self, run_id: Uuid, cancel: &BuildCommand, s: &mut Session) -> Result<(), CoreError> {
        debug!("run {run_id}: running cancel override");
        let saved_failed = s.failed;
        s.failed = false;
        s.sweeping = true;
        let res = self.exec_node(run_id, cancel, s);
        s.sweeping = false;
        s.failed = saved_failed;
        res.map(|_| ())
    }

    fn cancellation_due(&self, s: &mut Session, node: &BuildCommand) -> bool {
        if s.sweeping {
            return false;
        }
        if s.cancelled {
            return true;
        }
        let index = s.next_leaf;
        s.next_leaf += 1;
        let due = match self.host.cancel_trigger() {
            Some(CancelTrigger::BeforeLeaf(n)) => *n == index,
            Some(CancelTrigger::DuringExec(needle)) => match node.kind() {
                CommandKind::Exec { .. } => command_line(node).contains(needle.as_str()),
                _ => false,
            },
            None => false,
        };
        if due {
            debug!("cancellation signal observed at leaf {index} ({})", node.kind().name());
            s.cancelled = true;
        }
        due
    }

    fn exec_leaf(&mut self, run_id: Uuid, node: &BuildCommand, s: &mut Session) -> Result<Flow, CoreError> {
        if self.cancellation_due(s, node) {
            // DuringExec: el comando llegó a arrancar antes de la señal
            if matches!(self.host.cancel_trigger(), Some(CancelTrigger::DuringExec(_))) {
                self.record(s, node, StepOutcome::Abandoned);
            }
            return Ok(Flow::Cancelled);
        }

        let mut ok = true;
        match node.kind() {
            CommandKind::Echo { tag, text } => self.console(run_id, s, *tag, text),
            CommandKind::Export { name, value, secure } => {
                if let Some(value) = value {
                    let shown = if *secure { SECRET_MASK.to_string() } else { value.clone() };
                    self.console(run_id,
                                 s,
                                 None,
                                 &format!("setting environment variable '{name}' to value '{shown}'"));
                }
            }
            CommandKind::Secret { value } => {
                if !value.is_empty() && !s.secrets.contains(value) {
                    s.secrets.push(value.clone());
                }
            }
            CommandKind::ReportStatus { phase } => self.report_phase(run_id, *phase, s)?,
            CommandKind::ReportResult => {
                let result = if s.failed { JobResult::Failed } else { JobResult::Passed };
                s.tracker.assign_result(result)?;
                self.sink.append_kind(run_id, ReportKind::ResultDecided { result });
            }
            CommandKind::ReportAction { tag, message } => {
                let message = self.masked(s, message);
                self.sink.append_kind(run_id, ReportKind::ActionLogged { tag: *tag, message: message.clone() });
                s.outcome.console.push(format!("{}|[go] {message}", tag.prefix()));
            }
            CommandKind::Test { probe } => ok = self.host.probe(probe),
            CommandKind::Exec { .. } => {
                let line = command_line(node);
                self.console(run_id, s, Some(ConsoleTag::Out), &line);
                ok = !self.host.should_fail(&line);
            }
            CommandKind::UploadArtifact { src, .. } => ok = !self.host.should_fail(src),
            CommandKind::GenerateProperty { src, .. } => ok = !self.host.should_fail(src),
            CommandKind::GenerateTestReport { .. } => {}
            CommandKind::MkDirs { path } => self.host.mkdirs(path),
            CommandKind::CleanDir { path, allowed } => self.host.cleandir(path, allowed),
            CommandKind::Noop => {}
            CommandKind::Compose { .. } | CommandKind::Task { .. } => {
                return Err(CoreError::MalformedTree("composite reached leaf execution".into()));
            }
        }

        if ok {
            self.record(s, node, StepOutcome::Executed);
        } else {
            s.failed = true;
            s.failures += 1;
            self.record(s, node, StepOutcome::Failed);
        }
        Ok(Flow::Continue)
    }

    fn report_phase(&mut self, run_id: Uuid, phase: JobPhase, s: &mut Session) -> Result<(), CoreError> {
        if phase != JobPhase::Completed {
            s.tracker.advance(phase)?;
            self.sink.append_kind(run_id, ReportKind::PhaseChanged { phase });
            return Ok(());
        }
        let before = s.tracker.result();
        if s.sweeping {
            s.tracker.complete_cancelled()?;
        } else {
            s.tracker.advance(JobPhase::Completed)?;
            if before.is_none() {
                let result = if s.failed { JobResult::Failed } else { JobResult::Passed };
                s.tracker.assign_result(result)?;
            }
        }
        if before.is_none() {
            if let Some(result) = s.tracker.result() {
                self.sink.append_kind(run_id, ReportKind::ResultDecided { result });
            }
        }
        self.sink.append_kind(run_id, ReportKind::PhaseChanged { phase });
        Ok(())
    }

    fn guard_holds(&self, guard: &BuildCommand) -> bool {
        match guard.kind() {
            CommandKind::Test { probe } => self.host.probe(probe),
            _ => true,
        }
    }

    fn console(&mut self, run_id: Uuid, s: &mut Session, tag: Option<ConsoleTag>, text: &str) {
        let text = self.masked(s, text);
        let prefix = tag.map(ConsoleTag::prefix).unwrap_or("&1");
        s.outcome.console.push(format!("{prefix}|{text}"));
        self.sink.append_kind(run_id, ReportKind::ConsoleLine { tag, text });
    }

    fn masked(&self, s: &Session, text: &str) -> String {
        let secrets: Vec<&str> = s.secrets.iter().map(String::as_str).collect();
        mask(text, &secrets)
    }

    fn record(&self, s: &mut Session, node: &BuildCommand, outcome: StepOutcome) {
        let detail = self.masked(s, &describe(node));
        s.outcome.trace.push(TraceEntry { name: node.kind().name(),
                                          detail,
                                          outcome,
                                          in_cancel: s.sweeping });
    }
}

fn command_line(node: &BuildCommand) -> String {
    match node.kind() {
        CommandKind::Exec { command, args } => {
            let mut parts = vec![command.clone()];
            parts.extend(args.iter().cloned());
            parts.join(" ")
        }
        _ => String::new(),
    }
}

fn describe(node: &BuildCommand) -> String {
    match node.kind() {
        CommandKind::Echo { text, .. } => text.clone(),
        CommandKind::Compose { children } => format!("{} children", children.len()),
        CommandKind::Task { description, .. } => description.clone(),
        CommandKind::Export { name, .. } => name.clone(),
        CommandKind::Secret { .. } => SECRET_MASK.to_string(),
        CommandKind::UploadArtifact { src, dest, .. } => format!("{src} -> {dest}"),
        CommandKind::GenerateProperty { name, .. } => name.clone(),
        CommandKind::GenerateTestReport { sources, .. } => sources.join(","),
        CommandKind::ReportStatus { phase } => phase.to_string(),
        CommandKind::ReportAction { message, .. } => message.clone(),
        CommandKind::ReportResult => "result".into(),
        CommandKind::Test { probe } => format!("{:?} {}", probe.flag, probe.path),
        CommandKind::Exec { .. } => command_line(node),
        CommandKind::MkDirs { path } => path.clone(),
        CommandKind::CleanDir { path, .. } => path.clone(),
        CommandKind::Noop => String::new(),
    }
}
