//! Composer: (plan de job, contexto de entorno) → árbol de instrucciones.
//!
//! Estructura fija del árbol raíz:
//!
//! 1. echo de inicio
//! 2. prepare: acción + `Preparing`, refresco del working dir, materiales
//! 3. build: `Building`, secretos, exports, tareas y el bloque de
//!    completing (`Any` recursivo: propiedades y artefactos siempre corren)
//! 4. resultado del job, acción de cierre y `Completed`, todos `Any`
//!
//! La raíz lleva el override de cancelación que reporta el único
//! `Completed` de la ruta cancelada.

use job_core::command::{cleandir, compose as seq, echo_with_prefix, export, export_inherited, generate_property,
                        generate_test_report, mkdirs, noop, report_action, report_result, report_status, secret,
                        task, test_path, upload_artifact, BuildCommand};
use job_core::redact::{self, mask};
use job_core::{fingerprint, validate_phase_order, ConsoleTag, EnvironmentContext, JobPhase, JobResult, RunIf,
               TestFlag};
use job_domain::{CancelTaskSpec, JobPlan, TaskSpec};
use log::{debug, info};

use crate::config::ComposerConfig;
use crate::errors::ComposeError;
use crate::materials;

#[derive(Debug, Clone, Default)]
pub struct Composer {
    config: ComposerConfig,
}

impl Composer {
    pub fn new(config: ComposerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Compone el árbol completo o falla sin devolver nada parcial.
    pub fn compose(&self, plan: &JobPlan, env: &EnvironmentContext) -> Result<BuildCommand, ComposeError> {
        plan.validate()?;
        let assembly = Assembly::new(&self.config, plan, env);
        let tree = redact::mask_tree(assembly.root()?, &assembly.secrets);

        validate_phase_order(&tree)?;
        redact::verify(&tree, &assembly.secrets)?;
        info!("composed job {} ({} tasks) fingerprint={}",
              plan.identifier.build_locator_for_display(),
              plan.tasks.len(),
              fingerprint(&tree));
        Ok(tree)
    }
}

/// Compone con `ComposerConfig::default()`.
pub fn compose(plan: &JobPlan, env: &EnvironmentContext) -> Result<BuildCommand, ComposeError> {
    Composer::default().compose(plan, env)
}

struct Assembly<'a> {
    config: &'a ComposerConfig,
    plan: &'a JobPlan,
    env: &'a EnvironmentContext,
    /// Secretos del entorno más las credenciales de los materiales.
    secrets: Vec<&'a str>,
}

impl<'a> Assembly<'a> {
    fn new(config: &'a ComposerConfig, plan: &'a JobPlan, env: &'a EnvironmentContext) -> Self {
        let mut secrets = env.secure_values();
        for rev in &plan.materials {
            for s in rev.material.secure_values() {
                if !secrets.contains(&s) {
                    secrets.push(s);
                }
            }
        }
        Self { config, plan, env, secrets }
    }

    fn shown(&self, text: &str) -> String {
        mask(text, &self.secrets)
    }

    fn working_dir(&self) -> &'a str {
        let plan: &'a JobPlan = self.plan;
        &plan.working_directory
    }

    fn root(&self) -> Result<BuildCommand, ComposeError> {
        let prepare = self.prepare()?;
        let build = self.build()?;
        let root = seq([echo_with_prefix(ConsoleTag::Notice, "Job Started: ${date}"),
                        prepare,
                        build,
                        self.finish()]);
        Ok(root.with_on_cancel(seq([echo_with_prefix(ConsoleTag::JobCancelled,
                                                     format!("Current job status: {}",
                                                             JobResult::Cancelled.to_lowercase())),
                                    self.action(ConsoleTag::Completed, "Job completed"),
                                    report_status(JobPhase::Completed)])))
    }

    fn action(&self, tag: ConsoleTag, action: &str) -> BuildCommand {
        report_action(tag,
                      self.shown(&format!("{action} {} on ${{agent.hostname}} [${{agent.location}}]",
                                          self.plan.identifier.build_locator_for_display())))
    }

    // ---------------- prepare ----------------

    fn prepare(&self) -> Result<BuildCommand, ComposeError> {
        debug!("composing prepare phase");
        Ok(seq([self.action(ConsoleTag::Prep, "Start to prepare"),
                report_status(JobPhase::Preparing),
                self.refresh_working_dir(),
                self.update_materials()?]))
    }

    fn refresh_working_dir(&self) -> BuildCommand {
        let wd = self.working_dir();
        seq([self.clean_working_dir(),
             mkdirs(wd).with_test(test_path(TestFlag::NotDir, wd))])
    }

    fn clean_working_dir(&self) -> BuildCommand {
        if !self.plan.clean_working_dir {
            return noop();
        }
        let wd = self.working_dir();
        seq([cleandir(wd, Vec::new()),
             echo_with_prefix(ConsoleTag::Prep,
                              self.shown(&format!("Cleaning working directory \"{wd}\" since stage is configured to clean working directory")))])
            .with_test(test_path(TestFlag::Dir, wd))
    }

    fn update_materials(&self) -> Result<BuildCommand, ComposeError> {
        if !self.plan.fetch_materials {
            return Ok(echo_with_prefix(ConsoleTag::Prep,
                                       "Skipping material update since stage is configured not to fetch materials"));
        }
        let revisions = &self.plan.materials;
        Ok(seq([materials::cleanup_command(revisions, self.working_dir()),
                echo_with_prefix(ConsoleTag::Prep, "Start to update materials"),
                materials::update_commands(revisions, self.working_dir(), &self.secrets)?]))
    }

    // ---------------- build ----------------

    fn build(&self) -> Result<BuildCommand, ComposeError> {
        debug!("composing build phase with {} task(s)", self.plan.tasks.len());
        Ok(seq([report_status(JobPhase::Building),
                self.setup_secrets(),
                self.setup_environment(),
                self.action(ConsoleTag::Notice, "Start to build"),
                self.run_tasks()?,
                seq([self.action(ConsoleTag::Notice, "Job completing"),
                     report_status(JobPhase::Completing),
                     self.harvest_properties(),
                     self.upload_artifacts()]).run_if_recursively(RunIf::Any)]))
    }

    fn setup_secrets(&self) -> BuildCommand {
        seq(self.secrets.iter().map(|s| secret(*s)))
    }

    fn setup_environment(&self) -> BuildCommand {
        let mut commands = vec![export_inherited(self.config.server_url_variable.clone())];
        for (name, var) in self.env.iter() {
            commands.push(export(name, var.value.clone(), var.secure));
        }
        seq(commands)
    }

    fn run_tasks(&self) -> Result<BuildCommand, ComposeError> {
        let tasks = self.plan
                        .tasks
                        .iter()
                        .map(|t| self.single_task(t))
                        .collect::<Result<Vec<_>, _>>()?;
        Ok(seq(tasks))
    }

    fn single_task(&self, spec: &TaskSpec) -> Result<BuildCommand, ComposeError> {
        let run_if = spec.run_if.resolved();
        let cancel = spec.on_cancel.as_ref().map(|c| self.cancel_task(c)).transpose()?;
        let body = spec.command.build_command()?.run_if(run_if).with_optional_on_cancel(cancel);
        Ok(task(self.shown(&spec.description()), body).run_if(run_if))
    }

    fn cancel_task(&self, spec: &CancelTaskSpec) -> Result<BuildCommand, ComposeError> {
        Ok(seq([echo_with_prefix(ConsoleTag::CancelTaskStart,
                                 format!("On Cancel Task: {}", self.shown(&spec.description()))),
                spec.command.build_command()?,
                echo_with_prefix(ConsoleTag::CancelTaskPass, "On Cancel Task completed")]))
    }

    // ---------------- completing ----------------

    fn harvest_properties(&self) -> BuildCommand {
        let wd = self.working_dir();
        let generators = self.plan
                             .property_generators
                             .iter()
                             .map(|g| generate_property(g.name.clone(), g.src.clone(), g.xpath.clone()).with_working_directory(wd));
        seq([self.action(ConsoleTag::Publish, "Start to create properties"), seq(generators)])
    }

    fn upload_artifacts(&self) -> BuildCommand {
        let wd = self.working_dir();
        let uploads = self.plan
                          .artifact_plans
                          .iter()
                          .map(|a| upload_artifact(a.src.clone(), a.dest.clone(), a.is_test()).with_working_directory(wd));
        seq([self.action(ConsoleTag::Publish, "Start to upload"), seq(uploads), self.test_report()])
    }

    fn test_report(&self) -> BuildCommand {
        let sources = self.plan.test_sources();
        if sources.is_empty() {
            return noop();
        }
        generate_test_report(sources, self.config.test_report_dir.clone()).with_working_directory(self.working_dir())
    }

    // ---------------- finish ----------------

    fn finish(&self) -> BuildCommand {
        let job_result = seq([report_result().run_if(RunIf::Any),
                              echo_with_prefix(ConsoleTag::JobPass,
                                               format!("Current job status: {}", JobResult::Passed.to_lowercase()))
                                  .run_if(RunIf::Passed),
                              echo_with_prefix(ConsoleTag::JobFail,
                                               format!("Current job status: {}", JobResult::Failed.to_lowercase()))
                                  .run_if(RunIf::Failed)]);
        seq([job_result.run_if(RunIf::Any),
             self.action(ConsoleTag::Completed, "Job completed").run_if(RunIf::Any),
             report_status(JobPhase::Completed).run_if(RunIf::Any)])
            .run_if(RunIf::Any)
    }
}
