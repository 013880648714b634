use job_core::command::{compose, echo, exec, mkdirs, report_result, report_status, secret, task, test_path};
use job_core::{CancelTrigger, InMemoryReportSink, Interpreter, JobPhase, JobResult, ReportKind, ReportSink, RunIf,
               SimulatedHost, StepOutcome, TestFlag};
use uuid::Uuid;

fn finish() -> job_core::BuildCommand {
    compose(vec![report_status(JobPhase::Completing), report_result(), report_status(JobPhase::Completed)])
        .run_if_recursively(RunIf::Any)
}

fn with_root_cancel(body: job_core::BuildCommand) -> job_core::BuildCommand {
    body.with_on_cancel(compose(vec![echo("Current job status: cancelled"), report_status(JobPhase::Completed)]))
}

#[test]
fn failed_branch_runs_only_after_failure() {
    let tree = with_root_cancel(compose(vec![report_status(JobPhase::Building),
                                             task("a", exec("make", ["a"])),
                                             task("b", exec("make", ["b"]).run_if(RunIf::Failed)).run_if(RunIf::Failed),
                                             finish()]));

    let mut ok = Interpreter::new(SimulatedHost::new(), InMemoryReportSink::default());
    let out = ok.run(Uuid::new_v4(), &tree).expect("well formed");
    assert!(out.ran("exec", "make a"));
    assert!(out.skipped("task", "b"));
    assert_eq!(out.result, Some(JobResult::Passed));

    let mut failing = Interpreter::new(SimulatedHost::new().failing("make a"), InMemoryReportSink::default());
    let out = failing.run(Uuid::new_v4(), &tree).expect("well formed");
    assert!(out.ran("exec", "make b"));
    assert_eq!(out.result, Some(JobResult::Failed));
    assert_eq!(out.completed_reports(), 1);
}

#[test]
fn guard_skips_node_when_probe_is_false() {
    let tree = with_root_cancel(compose(vec![mkdirs("work").with_test(test_path(TestFlag::NotDir, "work")),
                                             report_status(JobPhase::Building),
                                             finish()]));
    let mut interp = Interpreter::new(SimulatedHost::new().with_dir("work"), InMemoryReportSink::default());
    let out = interp.run(Uuid::new_v4(), &tree).unwrap();
    assert!(out.trace
               .iter()
               .any(|e| e.name == "mkdirs" && e.outcome == StepOutcome::SkippedByGuard));
}

#[test]
fn cancellation_runs_overrides_innermost_first_and_stops() {
    let task_cancel = compose(vec![echo("On Cancel Task: stop"), exec("kill", ["server"])]);
    let tree = with_root_cancel(compose(vec![report_status(JobPhase::Building),
                                             task("serve", exec("server", ["--run"]).with_on_cancel(task_cancel)),
                                             task("after", exec("never", Vec::<String>::new())),
                                             finish()]));
    let host = SimulatedHost::new().cancel_on(CancelTrigger::DuringExec("server --run".into()));
    let mut interp = Interpreter::new(host, InMemoryReportSink::default());
    let run_id = Uuid::new_v4();
    let out = interp.run(run_id, &tree).unwrap();

    assert!(out.cancelled);
    assert!(out.trace.iter().any(|e| e.detail == "server --run" && e.outcome == StepOutcome::Abandoned));
    let cancel_steps: Vec<&str> = out.trace.iter().filter(|e| e.in_cancel).map(|e| e.detail.as_str()).collect();
    assert_eq!(cancel_steps,
               vec!["On Cancel Task: stop", "kill server", "Current job status: cancelled", "Completed"]);
    assert!(!out.ran("exec", "never"));
    assert_eq!(out.completed_reports(), 1);
    assert_eq!(out.result, Some(JobResult::Cancelled));

    let events = interp.sink().list(run_id);
    assert!(events.iter()
                  .any(|e| e.kind == ReportKind::ResultDecided { result: JobResult::Cancelled }));
}

#[test]
fn declared_secrets_are_masked_in_console() {
    let tree = with_root_cancel(compose(vec![report_status(JobPhase::Building),
                                             secret("s3cr3t"),
                                             exec("login", ["--password", "s3cr3t"]),
                                             finish()]));
    let mut interp = Interpreter::new(SimulatedHost::new(), InMemoryReportSink::default());
    let out = interp.run(Uuid::new_v4(), &tree).unwrap();
    assert!(out.console.iter().all(|l| !l.contains("s3cr3t")));
    assert!(out.console.iter().any(|l| l.contains("login --password ******")));
}

#[test]
fn out_of_order_report_is_rejected() {
    let tree = compose(vec![report_status(JobPhase::Building), report_status(JobPhase::Preparing)]);
    let mut interp = Interpreter::new(SimulatedHost::new(), InMemoryReportSink::default());
    assert!(interp.run(Uuid::new_v4(), &tree).is_err());
}

#[test]
fn run_outcome_serializes_to_json() {
    let tree = with_root_cancel(compose(vec![report_status(JobPhase::Building), task("a", exec("make", ["a"])), finish()]));
    let mut interp = Interpreter::new(SimulatedHost::new(), InMemoryReportSink::default());
    let out = interp.run(Uuid::new_v4(), &tree).expect("well formed");
    let json = serde_json::to_value(&out).expect("serializable");
    let names: Vec<&str> = json["trace"].as_array()
                                        .expect("trace array")
                                        .iter()
                                        .filter_map(|e| e["name"].as_str())
                                        .collect();
    assert!(names.contains(&"exec"));
    assert_eq!(json["cancelled"], false);
    assert_eq!(json["console"].as_array().map(Vec::len), Some(out.console.len()));
}
