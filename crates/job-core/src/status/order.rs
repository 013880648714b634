//! Validación estática del orden de reportes de un árbol compuesto.

use super::{JobPhase, JobStatusTracker};
use crate::command::{BuildCommand, CommandKind, RunIf};
use crate::errors::CoreError;

#[derive(Default)]
struct OrderCheck {
    tracker: JobStatusTracker,
    result_reported: bool,
    completed: usize,
    completed_unconditional: bool,
}

/// Comprueba que los reportes del árbol respetan la máquina de estados:
///
/// - en el árbol principal las fases avanzan estrictamente, `ReportResult`
///   aparece una vez dentro de `[Completing, Completed)` y hay exactamente un
///   `ReportStatus(Completed)` que se ejecuta siempre (`Any`, sin guarda);
/// - cada override de cancelación avanza sólo hacia delante, nunca calcula
///   resultado; el de la raíz cierra con un único `Completed` y los demás no
///   reportan `Completed` (lo hace la raíz al propagarse la cancelación).
pub fn validate_phase_order(tree: &BuildCommand) -> Result<(), CoreError> {
    let mut main = OrderCheck::default();
    check_main(tree, tree.guard().is_none(), &mut main)?;
    if main.completed != 1 {
        return Err(CoreError::MalformedTree(format!("expected exactly one Completed report, found {}",
                                                    main.completed)));
    }
    if !main.completed_unconditional {
        return Err(CoreError::MalformedTree("Completed report is not guaranteed to run".into()));
    }

    let mut cancel_result = Ok(());
    tree.walk(&mut |node| {
            if cancel_result.is_err() {
                return;
            }
            if let Some(cancel) = node.on_cancel() {
                cancel_result = check_cancel(cancel, std::ptr::eq(node, tree));
            }
        });
    cancel_result?;

    match tree.on_cancel() {
        Some(_) => Ok(()),
        None => Err(CoreError::MalformedTree("root has no cancel override".into())),
    }
}

// `unconditional`: el nodo se ejecuta sea cual sea el estado acumulado.
fn check_main(node: &BuildCommand, unconditional: bool, st: &mut OrderCheck) -> Result<(), CoreError> {
    match node.kind() {
        CommandKind::ReportStatus { phase } => {
            st.tracker
              .advance(*phase)
              .map_err(|e| CoreError::MalformedTree(e.to_string()))?;
            if *phase == JobPhase::Completed {
                st.completed += 1;
                st.completed_unconditional = unconditional;
            }
        }
        CommandKind::ReportResult => {
            if st.result_reported {
                return Err(CoreError::MalformedTree("job result reported twice".into()));
            }
            if st.tracker.phase() != Some(JobPhase::Completing) {
                return Err(CoreError::MalformedTree(format!("job result reported in phase {:?}",
                                                            st.tracker.phase())));
            }
            st.result_reported = true;
        }
        _ => {}
    }
    for child in node.children() {
        let child_unconditional = unconditional && child.run_if_policy() == RunIf::Any && child.guard().is_none();
        check_main(child, child_unconditional, st)?;
    }
    Ok(())
}

fn check_cancel(cancel: &BuildCommand, is_root: bool) -> Result<(), CoreError> {
    let mut tracker = JobStatusTracker::new();
    let mut completed = 0usize;
    let mut failure: Option<CoreError> = None;
    cancel.walk(&mut |n| {
              if failure.is_some() {
                  return;
              }
              match n.kind() {
                  CommandKind::ReportResult => {
                      failure = Some(CoreError::MalformedTree("cancel override computes a job result".into()));
                  }
                  CommandKind::ReportStatus { phase } => {
                      if let Err(e) = tracker.advance(*phase) {
                          failure = Some(CoreError::MalformedTree(format!("cancel override: {e}")));
                      } else if *phase == JobPhase::Completed {
                          completed += 1;
                      }
                  }
                  _ => {}
              }
          });
    if let Some(e) = failure {
        return Err(e);
    }
    let expected = if is_root { 1 } else { 0 };
    if completed != expected {
        return Err(CoreError::MalformedTree(format!("{} cancel override reports Completed {} time(s)",
                                                    if is_root { "root" } else { "nested" },
                                                    completed)));
    }
    Ok(())
}
