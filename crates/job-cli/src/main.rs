use job_compose::{Composer, ComposerConfig};
use job_core::{fingerprint, BuildCommand, CancelTrigger, InMemoryReportSink, Interpreter, SimulatedHost};
use job_domain::{EnvironmentContextBuilder, JobPlan, TriggerMetadata};
use uuid::Uuid;

const USAGE: &str = "Uso:\n  job-cli compose --plan <FILE> [--approver <USER>]\n  job-cli simulate --plan <FILE> \
                     [--approver <USER>] [--dir <PATH>]... [--fail <TXT>]... [--cancel-at <N>] [--cancel-during <TXT>]";

#[derive(Default)]
struct Args {
    plan: Option<String>,
    approver: Option<String>,
    dirs: Vec<String>,
    failing: Vec<String>,
    cancel_at: Option<usize>,
    cancel_during: Option<String>,
}

fn parse(args: &[String]) -> Args {
    let mut out = Args::default();
    let mut i = 0;
    while i < args.len() {
        let value = args.get(i + 1).cloned();
        match args[i].as_str() {
            "--plan" => { out.plan = value; i += 1; }
            "--approver" => { out.approver = value; i += 1; }
            "--dir" => { out.dirs.extend(value); i += 1; }
            "--fail" => { out.failing.extend(value); i += 1; }
            "--cancel-at" => { out.cancel_at = value.and_then(|v| v.parse().ok()); i += 1; }
            "--cancel-during" => { out.cancel_during = value; i += 1; }
            other => eprintln!("[job-cli] argumento ignorado: {other}"),
        }
        i += 1;
    }
    out
}

fn load_plan(path: &str) -> Result<JobPlan, String> {
    let raw = std::fs::read_to_string(path).map_err(|e| format!("no se pudo leer {path}: {e}"))?;
    serde_json::from_str(&raw).map_err(|e| format!("plan inválido en {path}: {e}"))
}

fn compose_tree(args: &Args) -> Result<BuildCommand, String> {
    let Some(path) = args.plan.as_deref() else {
        return Err("falta --plan".into());
    };
    let plan = load_plan(path)?;
    let trigger = TriggerMetadata::new(args.approver.clone().unwrap_or_else(|| "anonymous".into()));
    let env = EnvironmentContextBuilder::build_for(&plan, &trigger).map_err(|e| e.to_string())?;
    Composer::new(ComposerConfig::from_env()).compose(&plan, &env).map_err(|e| e.to_string())
}

fn main() {
    // Cargar .env si existe para obtener JOBFLOW_*
    let _ = dotenvy::dotenv();
    let argv: Vec<String> = std::env::args().collect();
    let Some(command) = argv.get(1).map(String::as_str) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };
    let args = parse(&argv[2..]);

    let tree = match command {
        "compose" | "simulate" => match compose_tree(&args) {
            Ok(t) => t,
            Err(e) => { eprintln!("[job-cli {command}] {e}"); std::process::exit(4); }
        },
        _ => { eprintln!("{USAGE}"); std::process::exit(2); }
    };

    if command == "compose" {
        match serde_json::to_string_pretty(&tree) {
            Ok(json) => println!("{json}"),
            Err(e) => { eprintln!("[job-cli compose] serialización: {e}"); std::process::exit(5); }
        }
        println!("fingerprint: {}", fingerprint(&tree));
        return;
    }

    let mut host = args.dirs.iter().fold(SimulatedHost::new(), |h, d| h.with_dir(d.clone()));
    host = args.failing.iter().fold(host, |h, f| h.failing(f.clone()));
    if let Some(n) = args.cancel_at {
        host = host.cancel_on(CancelTrigger::BeforeLeaf(n));
    } else if let Some(needle) = args.cancel_during.clone() {
        host = host.cancel_on(CancelTrigger::DuringExec(needle));
    }
    let mut interp = Interpreter::new(host, InMemoryReportSink::default());
    match interp.run(Uuid::new_v4(), &tree) {
        Ok(outcome) => {
            for line in &outcome.console {
                println!("{line}");
            }
            println!("fase: {:?} resultado: {:?} cancelado: {}", outcome.phase, outcome.result, outcome.cancelled);
        }
        Err(e) => { eprintln!("[job-cli simulate] {e}"); std::process::exit(5); }
    }
}
