//! Plan de job: la entrada completa que el composer traduce a un árbol.

use serde::{Deserialize, Serialize};

use crate::artifact::{ArtifactPlan, PropertyGenerator};
use crate::errors::DomainError;
use crate::identity::JobIdentifier;
use crate::material::MaterialRevision;
use crate::task::TaskSpec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanVariable {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub secure: bool,
}

impl PlanVariable {
    pub fn plain(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(),
               value: value.into(),
               secure: false }
    }

    pub fn secure(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(),
               value: value.into(),
               secure: true }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPlan {
    pub identifier: JobIdentifier,
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
    #[serde(default)]
    pub artifact_plans: Vec<ArtifactPlan>,
    #[serde(default)]
    pub property_generators: Vec<PropertyGenerator>,
    #[serde(default)]
    pub variables: Vec<PlanVariable>,
    #[serde(default)]
    pub materials: Vec<MaterialRevision>,
    #[serde(default = "default_true")]
    pub fetch_materials: bool,
    #[serde(default)]
    pub clean_working_dir: bool,
    pub working_directory: String,
}

impl JobPlan {
    pub fn new(identifier: JobIdentifier, working_directory: impl Into<String>) -> Self {
        Self { identifier,
               tasks: Vec::new(),
               artifact_plans: Vec::new(),
               property_generators: Vec::new(),
               variables: Vec::new(),
               materials: Vec::new(),
               fetch_materials: true,
               clean_working_dir: false,
               working_directory: working_directory.into() }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.identifier.validate()?;
        if self.working_directory.trim().is_empty() {
            return Err(DomainError::Configuration("job plan has no working directory".into()));
        }
        if let Some(v) = self.variables.iter().find(|v| v.name.trim().is_empty()) {
            return Err(DomainError::Validation(format!("variable with value of length {} has no name",
                                                       v.value.len())));
        }
        Ok(())
    }

    /// Fuentes de los artefactos de tipo test, en orden del plan.
    pub fn test_sources(&self) -> Vec<String> {
        self.artifact_plans.iter().filter(|a| a.is_test()).map(|a| a.src.clone()).collect()
    }
}
