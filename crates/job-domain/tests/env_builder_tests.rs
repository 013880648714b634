use job_core::EnvironmentContext;
use job_domain::{DomainError, EnvironmentContextBuilder, JobIdentifier, JobPlan, MaterialConfig, MaterialRevision,
                 PlanVariable, TriggerMetadata};

fn identifier() -> JobIdentifier {
    JobIdentifier { pipeline_name: "up42".into(),
                    pipeline_counter: Some(12),
                    pipeline_label: None,
                    stage_name: "test".into(),
                    stage_counter: "2".into(),
                    job_name: "linux".into(),
                    build_id: None }
}

fn git(name: &str) -> MaterialConfig {
    MaterialConfig::Git { url: format!("https://example.com/{name}.git"),
                          branch: "main".into(),
                          folder: Some(name.into()),
                          name: Some(name.into()),
                          submodules: false }
}

#[test]
fn merges_in_documented_order() {
    let mut initial = EnvironmentContext::new();
    initial.set("GO_TRIGGER_USER", "stale", false);
    initial.set("DEPLOY_KEY", "from-stage", true);
    let trigger = TriggerMetadata::new("alice").with_context(initial);

    let mut plan = JobPlan::new(identifier(), "pipelines/up42");
    plan.materials = vec![MaterialRevision::new(git("app"), "r2").changed("r1")];
    plan.variables = vec![PlanVariable::plain("DEPLOY_KEY", "override"), PlanVariable::plain("LANG", "C")];

    let ctx = EnvironmentContextBuilder::build_for(&plan, &trigger).unwrap();
    let keys: Vec<&str> = ctx.keys().collect();
    assert_eq!(&keys[..2], &["GO_TRIGGER_USER", "DEPLOY_KEY"]);
    assert_eq!(ctx.get("GO_TRIGGER_USER"), Some("alice"));
    assert_eq!(ctx.get("GO_PIPELINE_LABEL"), Some("12"));
    assert_eq!(ctx.get("GO_REVISION"), Some("r2"));
    assert_eq!(ctx.get("GO_FROM_REVISION"), Some("r1"));
    assert_eq!(ctx.get("LANG"), Some("C"));
    // el override conserva la marca de seguridad
    assert_eq!(ctx.get("DEPLOY_KEY"), Some("override"));
    assert!(ctx.is_secure("DEPLOY_KEY"));
    assert_eq!(ctx.secure_values(), vec!["override"]);
}

#[test]
fn multiple_materials_get_name_suffixes() {
    let mut plan = JobPlan::new(identifier(), "w");
    let revisions = vec![MaterialRevision::new(git("app"), "a1"), MaterialRevision::new(git("lib-core"), "b1")];
    plan.materials = revisions.clone();
    let ctx = EnvironmentContextBuilder::build(&plan, &TriggerMetadata::new("bob"), &revisions, "w").unwrap();
    assert_eq!(ctx.get("GO_REVISION_APP"), Some("a1"));
    assert_eq!(ctx.get("GO_REVISION_LIB_CORE"), Some("b1"));
    assert_eq!(ctx.get("GO_MATERIAL_LIB_CORE_HAS_CHANGED"), Some("false"));
    assert!(ctx.get("GO_REVISION").is_none());
}

#[test]
fn missing_identity_is_a_configuration_error() {
    let mut id = identifier();
    id.stage_name.clear();
    let plan = JobPlan::new(id, "w");
    let err = EnvironmentContextBuilder::build_for(&plan, &TriggerMetadata::new("bob")).unwrap_err();
    assert_eq!(err, DomainError::Configuration("job identifier is missing stage name".into()));

    let mut id = identifier();
    id.pipeline_counter = None;
    let err = EnvironmentContextBuilder::build_for(&JobPlan::new(id, "w"), &TriggerMetadata::new("bob")).unwrap_err();
    assert!(matches!(err, DomainError::Configuration(_)));
}

#[test]
fn secure_plan_variable_is_reported_secure() {
    let mut plan = JobPlan::new(identifier(), "w");
    plan.variables = vec![PlanVariable::secure("TOKEN", "s3cr3t")];
    let ctx = EnvironmentContextBuilder::build_for(&plan, &TriggerMetadata::new("bob")).unwrap();
    assert!(ctx.is_secure("TOKEN"));
    assert!(!ctx.is_secure("GO_JOB_NAME"));
}
