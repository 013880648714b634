use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::command::{TestFlag, TestProbe};

/// Momento en que llega la señal de cancelación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelTrigger {
    /// Antes de empezar la hoja número `n` (0-based) del árbol principal.
    BeforeLeaf(usize),
    /// Mientras corre el primer `Exec` cuya línea de comando contiene el texto.
    DuringExec(String),
}

/// Máquina simulada sobre la que se interpreta un árbol: sistema de ficheros
/// mínimo, comandos que fallan y señal de cancelación.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulatedHost {
    dirs: BTreeSet<String>,
    files: BTreeSet<String>,
    failing: Vec<String>,
    cancel: Option<CancelTrigger>,
}

impl SimulatedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dir(mut self, path: impl Into<String>) -> Self {
        self.dirs.insert(normalize(&path.into()));
        self
    }

    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        self.files.insert(normalize(&path.into()));
        self
    }

    /// Cualquier `Exec` o subida cuya descripción contenga `needle` falla.
    pub fn failing(mut self, needle: impl Into<String>) -> Self {
        self.failing.push(needle.into());
        self
    }

    pub fn cancel_on(mut self, trigger: CancelTrigger) -> Self {
        self.cancel = Some(trigger);
        self
    }

    pub fn cancel_trigger(&self) -> Option<&CancelTrigger> {
        self.cancel.as_ref()
    }

    pub fn has_dir(&self, path: &str) -> bool {
        self.dirs.contains(&normalize(path))
    }

    pub fn probe(&self, probe: &TestProbe) -> bool {
        let path = normalize(&probe.path);
        match probe.flag {
            TestFlag::Dir => self.dirs.contains(&path),
            TestFlag::NotDir => !self.dirs.contains(&path),
            TestFlag::File => self.files.contains(&path),
            TestFlag::NotFile => !self.files.contains(&path),
        }
    }

    pub(crate) fn should_fail(&self, line: &str) -> bool {
        self.failing.iter().any(|n| line.contains(n.as_str()))
    }

    pub(crate) fn mkdirs(&mut self, path: &str) {
        self.dirs.insert(normalize(path));
    }

    /// Vacía `path` conservando las entradas permitidas (relativas a `path`).
    pub(crate) fn cleandir(&mut self, path: &str, allowed: &[String]) {
        let root = normalize(path);
        let keep: Vec<String> = allowed.iter().map(|a| normalize(&format!("{root}/{a}"))).collect();
        let inside = |p: &String| p.starts_with(&format!("{root}/"));
        let kept = |p: &String| keep.iter().any(|k| p == k || p.starts_with(&format!("{k}/")));
        self.dirs.retain(|d| !inside(d) || kept(d));
        self.files.retain(|f| !inside(f) || kept(f));
    }
}

fn normalize(path: &str) -> String {
    let trimmed = path.replace('\\', "/");
    trimmed.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleandir_keeps_allowed_folders() {
        let mut host = SimulatedHost::new().with_dir("w")
                                           .with_dir("w/src")
                                           .with_dir("w/tmp")
                                           .with_file("w/src/main.rs")
                                           .with_file("w/tmp/x");
        host.cleandir("w", &["src".to_string()]);
        assert!(host.has_dir("w") && host.has_dir("w/src"));
        assert!(!host.has_dir("w/tmp"));
        assert!(host.probe(&TestProbe::new(TestFlag::File, "w/src/main.rs")));
        assert!(host.probe(&TestProbe::new(TestFlag::NotFile, "w/tmp/x")));
    }
}
