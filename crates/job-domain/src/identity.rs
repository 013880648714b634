//! Identidad de un job dentro de pipeline/stage.

use job_core::EnvironmentContext;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobIdentifier {
    pub pipeline_name: String,
    pub pipeline_counter: Option<u64>,
    #[serde(default)]
    pub pipeline_label: Option<String>,
    pub stage_name: String,
    pub stage_counter: String,
    pub job_name: String,
    #[serde(default)]
    pub build_id: Option<u64>,
}

impl JobIdentifier {
    /// Falla con `Configuration` si falta algún campo obligatorio.
    pub fn validate(&self) -> Result<(), DomainError> {
        let missing = [("pipeline name", self.pipeline_name.trim().is_empty()),
                       ("pipeline counter", self.pipeline_counter.is_none()),
                       ("stage name", self.stage_name.trim().is_empty()),
                       ("stage counter", self.stage_counter.trim().is_empty()),
                       ("job name", self.job_name.trim().is_empty())];
        match missing.iter().find(|(_, absent)| *absent) {
            Some((field, _)) => Err(DomainError::Configuration(format!("job identifier is missing {field}"))),
            None => Ok(()),
        }
    }

    /// Etiqueta del pipeline; por defecto el contador.
    pub fn label(&self) -> String {
        match (&self.pipeline_label, self.pipeline_counter) {
            (Some(l), _) if !l.is_empty() => l.clone(),
            (_, Some(c)) => c.to_string(),
            _ => String::new(),
        }
    }

    /// `pipeline/label/stage/stageCounter/job`
    pub fn build_locator_for_display(&self) -> String {
        format!("{}/{}/{}/{}/{}",
                self.pipeline_name,
                self.label(),
                self.stage_name,
                self.stage_counter,
                self.job_name)
    }

    pub fn populate_environment(&self, context: &mut EnvironmentContext) -> Result<(), DomainError> {
        self.validate()?;
        let counter = self.pipeline_counter.map(|c| c.to_string()).unwrap_or_default();
        context.set("GO_PIPELINE_NAME", self.pipeline_name.clone(), false);
        context.set("GO_PIPELINE_COUNTER", counter, false);
        context.set("GO_PIPELINE_LABEL", self.label(), false);
        context.set("GO_STAGE_NAME", self.stage_name.clone(), false);
        context.set("GO_STAGE_COUNTER", self.stage_counter.clone(), false);
        context.set("GO_JOB_NAME", self.job_name.clone(), false);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> JobIdentifier {
        JobIdentifier { pipeline_name: "up42".into(),
                        pipeline_counter: Some(7),
                        pipeline_label: Some("7-abc".into()),
                        stage_name: "build".into(),
                        stage_counter: "1".into(),
                        job_name: "unit".into(),
                        build_id: Some(99) }
    }

    #[test]
    fn locator_uses_label() {
        assert_eq!(sample().build_locator_for_display(), "up42/7-abc/build/1/unit");
        let no_label = JobIdentifier { pipeline_label: None, ..sample() };
        assert_eq!(no_label.build_locator_for_display(), "up42/7/build/1/unit");
    }

    #[test]
    fn missing_job_name_is_configuration_error() {
        let id = JobIdentifier { job_name: " ".into(), ..sample() };
        assert_eq!(id.validate(),
                   Err(DomainError::Configuration("job identifier is missing job name".into())));
    }
}
