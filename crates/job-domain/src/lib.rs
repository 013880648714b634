//! job-domain: modelo de entrada del compilador (plan de job) y el
//! constructor del contexto de entorno.
pub mod artifact;
pub mod env_builder;
pub mod errors;
pub mod identity;
pub mod material;
pub mod plan;
pub mod task;
pub mod trigger;

pub use artifact::{ArtifactKind, ArtifactPlan, PropertyGenerator};
pub use env_builder::EnvironmentContextBuilder;
pub use errors::DomainError;
pub use identity::JobIdentifier;
pub use material::{url_for_display, MaterialConfig, MaterialRevision};
pub use plan::{JobPlan, PlanVariable};
pub use task::{CancelTaskSpec, RunIfConfig, TaskCommand, TaskSpec};
pub use trigger::TriggerMetadata;
