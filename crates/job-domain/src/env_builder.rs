//! Construcción del contexto de entorno de un run.

use job_core::EnvironmentContext;
use log::debug;

use crate::errors::DomainError;
use crate::material::{populate_revisions_environment, MaterialRevision};
use crate::plan::JobPlan;
use crate::trigger::TriggerMetadata;

/// Fusiona, en orden fijo, el contexto inicial del trigger, el usuario que
/// disparó, la identidad del job, las revisiones de materiales y las
/// variables del plan. Una variable posterior con el mismo nombre pisa el
/// valor anterior pero no puede perder la marca de seguridad.
pub struct EnvironmentContextBuilder;

impl EnvironmentContextBuilder {
    pub fn build(plan: &JobPlan,
                 trigger: &TriggerMetadata,
                 revisions: &[MaterialRevision],
                 working_dir: &str)
                 -> Result<EnvironmentContext, DomainError> {
        if working_dir.trim().is_empty() {
            return Err(DomainError::Configuration("working directory is empty".into()));
        }
        let mut context = EnvironmentContext::new();
        context.add_all(&trigger.initial_context);
        context.set("GO_TRIGGER_USER", trigger.approver.clone(), false);
        plan.identifier.populate_environment(&mut context)?;
        populate_revisions_environment(revisions, &mut context);
        for var in &plan.variables {
            if var.secure {
                debug!("plan variable {} merged as secure", var.name);
            }
            context.set(var.name.clone(), var.value.clone(), var.secure);
        }
        debug!("environment for {} has {} variables ({} secure)",
               plan.identifier.build_locator_for_display(),
               context.len(),
               context.secure_values().len());
        Ok(context)
    }

    pub fn build_for(plan: &JobPlan, trigger: &TriggerMetadata) -> Result<EnvironmentContext, DomainError> {
        Self::build(plan, trigger, &plan.materials, &plan.working_directory)
    }
}
