// Fixtures compartidos por los tests de integración del composer.
#![allow(dead_code)]


use job_core::{EnvironmentContext, RunIf};
use job_domain::{ArtifactPlan, CancelTaskSpec, EnvironmentContextBuilder, JobIdentifier, JobPlan, MaterialConfig,
                 MaterialRevision, PlanVariable, TaskCommand, TaskSpec, TriggerMetadata};

pub const WD: &str = "pipelines/up42";

pub fn identifier() -> JobIdentifier {
    JobIdentifier { pipeline_name: "up42".into(),
                    pipeline_counter: Some(5),
                    pipeline_label: None,
                    stage_name: "build".into(),
                    stage_counter: "1".into(),
                    job_name: "unit".into(),
                    build_id: Some(77) }
}

pub fn exec_task(command: &str, arg: &str) -> TaskSpec {
    TaskSpec::new(TaskCommand::Exec { command: command.into(),
                                      args: vec![arg.into()],
                                      working_directory: None })
}

pub fn git_revision(name: &str, folder: Option<&str>) -> MaterialRevision {
    MaterialRevision::new(MaterialConfig::Git { url: format!("https://example.com/{name}.git"),
                                                branch: "main".into(),
                                                folder: folder.map(String::from),
                                                name: Some(name.into()),
                                                submodules: false },
                          "c0ffee")
}

/// Plan de dos tasks: A (`passed`) y B (`failed`), working dir limpio.
pub fn two_task_plan() -> JobPlan {
    let mut plan = JobPlan::new(identifier(), WD);
    plan.clean_working_dir = true;
    plan.materials = vec![git_revision("app", None)];
    plan.tasks = vec![exec_task("make", "a").described("task A").run_if(RunIf::Passed),
                      exec_task("make", "b").described("task B").run_if(RunIf::Failed)];
    plan
}

/// Plan con una task larga que tiene task de cancelación.
pub fn server_plan() -> JobPlan {
    let mut plan = JobPlan::new(identifier(), WD);
    plan.materials = vec![git_revision("app", None)];
    plan.tasks = vec![exec_task("./start-server", "--foreground").described("run server")
                                                                  .on_cancel(CancelTaskSpec::new(TaskCommand::Exec {
                                                                      command: "./kill-server".into(),
                                                                      args: vec![],
                                                                      working_directory: None,
                                                                  }))];
    plan.artifact_plans = vec![ArtifactPlan::test("reports/junit", "reports")];
    plan
}

pub fn secure_plan(secret: &str) -> JobPlan {
    let mut plan = two_task_plan();
    plan.variables = vec![PlanVariable::secure("DEPLOY_TOKEN", secret), PlanVariable::plain("LANG", "C")];
    plan.tasks = vec![exec_task("deploy", &format!("--token={secret}")).described(format!("deploy with {secret}"))];
    plan
}

pub fn env_for(plan: &JobPlan) -> EnvironmentContext {
    EnvironmentContextBuilder::build_for(plan, &TriggerMetadata::new("alice")).expect("valid identity")
}
