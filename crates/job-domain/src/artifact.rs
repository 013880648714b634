//! Artefactos a subir y propiedades a generar al completar el job.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    #[default]
    Build,
    /// Resultados de tests: además de subirse alimentan el reporte de tests.
    Test,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPlan {
    pub src: String,
    #[serde(default)]
    pub dest: String,
    #[serde(default)]
    pub kind: ArtifactKind,
}

impl ArtifactPlan {
    pub fn build(src: impl Into<String>, dest: impl Into<String>) -> Self {
        Self { src: src.into(),
               dest: dest.into(),
               kind: ArtifactKind::Build }
    }

    pub fn test(src: impl Into<String>, dest: impl Into<String>) -> Self {
        Self { src: src.into(),
               dest: dest.into(),
               kind: ArtifactKind::Test }
    }

    pub fn is_test(&self) -> bool {
        self.kind == ArtifactKind::Test
    }
}

/// Propiedad extraída de un fichero del workspace vía XPath.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyGenerator {
    pub name: String,
    pub src: String,
    pub xpath: String,
}
