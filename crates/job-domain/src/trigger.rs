use job_core::EnvironmentContext;
use serde::{Deserialize, Serialize};

/// Quién disparó el run y el contexto inicial heredado del stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerMetadata {
    pub approver: String,
    #[serde(default)]
    pub initial_context: EnvironmentContext,
}

impl TriggerMetadata {
    pub fn new(approver: impl Into<String>) -> Self {
        Self { approver: approver.into(),
               initial_context: EnvironmentContext::new() }
    }

    pub fn with_context(mut self, context: EnvironmentContext) -> Self {
        self.initial_context = context;
        self
    }
}
