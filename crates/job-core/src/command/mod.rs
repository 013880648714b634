//! Modelo de nodos de instrucción.
//!
//! Un árbol de `BuildCommand` es el programa que el worker interpreta para
//! ejecutar un job. Es inmutable y sin estado: fases, resultado y variables
//! en tiempo de ejecución viven en el intérprete.

mod kind;
mod node;
mod run_if;
mod tag;

pub use kind::{CommandKind, TestFlag, TestProbe};
pub use node::{cleandir, compose, echo, echo_with_prefix, exec, export, export_inherited, generate_property,
               generate_test_report, mkdirs, noop, report_action, report_result, report_status, secret, task,
               test, test_path, upload_artifact, BuildCommand};
pub use run_if::RunIf;
pub use tag::ConsoleTag;
