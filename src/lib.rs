//! jobflow: compilador de jobs de CI a árboles de instrucciones.
//!
//! Fachada sobre los crates del workspace:
//! - `job_core`: nodos, estado del job, contexto, redacción, intérprete.
//! - `job_domain`: plan de job y constructor del contexto de entorno.
//! - `job_compose`: el composer.
//!
//! `compile` encadena contexto + composición + fingerprint en una llamada.

pub mod error;

pub use job_compose::{self, Composer, ComposerConfig};
pub use job_core::{self, BuildCommand, EnvironmentContext};
pub use job_domain::{self, JobPlan, TriggerMetadata};

pub use error::JobflowError;

use job_domain::EnvironmentContextBuilder;
use serde::Serialize;

/// Resultado de compilar un plan: contexto usado, árbol y su fingerprint.
#[derive(Debug, Clone, Serialize)]
pub struct CompiledJob {
    pub environment: EnvironmentContext,
    pub tree: BuildCommand,
    pub fingerprint: String,
}

pub fn compile(plan: &JobPlan, trigger: &TriggerMetadata, config: ComposerConfig) -> Result<CompiledJob, JobflowError> {
    let environment = EnvironmentContextBuilder::build_for(plan, trigger)?;
    let tree = Composer::new(config).compose(plan, &environment)?;
    let fingerprint = job_core::fingerprint(&tree);
    Ok(CompiledJob { environment, tree, fingerprint })
}
