//! Traducción de revisiones de material a instrucciones de actualización.

use job_core::command::{cleandir, compose, echo_with_prefix, exec, mkdirs, noop, secret, test_path, BuildCommand};
use job_core::redact;
use job_core::{ConsoleTag, TestFlag};
use job_domain::{MaterialConfig, MaterialRevision};

use crate::errors::ComposeError;

fn join(base: &str, rel: &str) -> String {
    if rel.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), rel.trim_start_matches('/'))
    }
}

fn destination(material: &MaterialConfig, working_dir: &str) -> String {
    join(working_dir, material.folder().unwrap_or(""))
}

/// Limpieza previa: sólo si hay varios materiales y todos declaran carpeta,
/// se borra del working dir todo lo que no sea una de esas carpetas.
pub fn cleanup_command(revisions: &[MaterialRevision], working_dir: &str) -> BuildCommand {
    if revisions.len() < 2 {
        return noop();
    }
    let folders: Option<Vec<String>> = revisions.iter()
                                                .map(|r| r.material.folder().map(str::to_string))
                                                .collect();
    match folders {
        Some(allowed) => cleandir(working_dir, allowed),
        None => noop(),
    }
}

/// Actualiza cada material a su revisión, en orden. Cualquier valor de
/// `secrets` que acabe en un argumento se declara antes de la actualización.
pub fn update_commands(revisions: &[MaterialRevision],
                       working_dir: &str,
                       secrets: &[&str])
                       -> Result<BuildCommand, ComposeError> {
    let updates = revisions.iter()
                           .map(|r| update_to(r, working_dir, secrets))
                           .collect::<Result<Vec<_>, _>>()?;
    Ok(compose(updates))
}

fn update_to(rev: &MaterialRevision, working_dir: &str, secrets: &[&str]) -> Result<BuildCommand, ComposeError> {
    let material = &rev.material;
    let dest = destination(material, working_dir);
    let mut steps = vec![echo_with_prefix(ConsoleTag::Prep,
                                          format!("Start updating files at revision {} from {}",
                                                  rev.revision,
                                                  material.display_location()))];
    match material {
        MaterialConfig::Git { url, branch, submodules, .. } => {
            // sin carpeta propia el destino es el working dir, que el prepare ya crea
            if material.folder().is_some() {
                steps.push(mkdirs(dest.clone()).with_test(test_path(TestFlag::NotDir, dest.clone())));
            }
            steps.push(exec("git", ["init"]).with_working_directory(dest.clone())
                                            .with_test(test_path(TestFlag::NotDir, join(&dest, ".git"))));
            steps.push(exec("git", ["fetch", url.as_str(), branch.as_str()]).with_working_directory(dest.clone()));
            steps.push(exec("git", ["reset", "--hard", rev.revision.as_str()]).with_working_directory(dest.clone()));
            if *submodules {
                steps.push(exec("git", ["submodule", "update", "--init"]).with_working_directory(dest));
            }
        }
        MaterialConfig::Hg { url, branch, .. } => {
            let mut clone_args = vec!["clone".to_string()];
            if let Some(b) = branch {
                clone_args.push(format!("--branch={b}"));
            }
            clone_args.push(url.clone());
            clone_args.push(dest.clone());
            steps.push(exec("hg", clone_args).with_working_directory(working_dir)
                                             .with_test(test_path(TestFlag::NotDir, join(&dest, ".hg"))));
            steps.push(exec("hg", ["pull", url.as_str()]).with_working_directory(dest.clone()));
            steps.push(exec("hg", ["update", "-C", rev.revision.as_str()]).with_working_directory(dest));
        }
        MaterialConfig::Svn { url, username, password, check_externals, .. } => {
            let mut auth = vec!["--non-interactive".to_string()];
            if let Some(u) = username.as_deref().filter(|u| !u.is_empty()) {
                auth.extend(["--username".to_string(), u.to_string()]);
            }
            if let Some(p) = password.as_deref().filter(|p| !p.is_empty()) {
                auth.extend(["--password".to_string(), p.to_string()]);
            }
            if !*check_externals {
                auth.push("--ignore-externals".to_string());
            }
            let svn_meta = join(&dest, ".svn");
            let checkout: Vec<String> = ["checkout".to_string()].into_iter()
                                                                 .chain(auth.iter().cloned())
                                                                 .chain(["-r".to_string(),
                                                                         rev.revision.clone(),
                                                                         url.clone(),
                                                                         dest.clone()])
                                                                 .collect();
            let update: Vec<String> = ["update".to_string()].into_iter()
                                                             .chain(auth)
                                                             .chain(["-r".to_string(), rev.revision.clone(), dest.clone()])
                                                             .collect();
            steps.push(exec("svn", checkout).with_working_directory(working_dir)
                                            .with_test(test_path(TestFlag::NotDir, svn_meta.clone())));
            steps.push(exec("svn", update).with_working_directory(working_dir)
                                          .with_test(test_path(TestFlag::Dir, svn_meta)));
        }
        MaterialConfig::Dependency { .. } => {}
        MaterialConfig::P4 { .. }
        | MaterialConfig::Tfs { .. }
        | MaterialConfig::Package { .. }
        | MaterialConfig::Plugin { .. } => {
            return Err(ComposeError::UnsupportedMaterial { kind: material.kind_name().to_string(),
                                                           name: material.name()
                                                                         .map(str::to_string)
                                                                         .unwrap_or_else(|| material.display_location()) });
        }
    }
    let mut declared = material.secure_values();
    for s in redact::carried(&compose(steps.clone()), secrets) {
        if !declared.contains(&s) {
            declared.push(s);
        }
    }
    Ok(compose(declared.into_iter().map(secret).chain(steps)))
}
