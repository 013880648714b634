//! Contexto de variables de entorno visible para un job.
//!
//! Conserva el orden de inserción (export determinista) y marca qué
//! variables son seguras. Invariante: una variable marcada como segura nunca
//! vuelve a ser no segura; redeclararla sólo actualiza su valor.

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::SECRET_MASK;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentVariable {
    pub value: String,
    pub secure: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentContext {
    vars: IndexMap<String, EnvironmentVariable>,
}

impl EnvironmentContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserta o actualiza `name`. Si ya existía como segura, sigue siéndolo.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>, secure: bool) {
        let name = name.into();
        let value = value.into();
        match self.vars.get_mut(&name) {
            Some(existing) => {
                if existing.secure && !secure {
                    debug!("env: '{name}' redeclared as plain, keeping secure flag");
                }
                existing.secure |= secure;
                existing.value = value;
            }
            None => {
                self.vars.insert(name, EnvironmentVariable { value, secure });
            }
        }
    }

    /// Mezcla `other` en orden, con la misma regla de `set`.
    pub fn add_all(&mut self, other: &EnvironmentContext) {
        for (name, var) in other.iter() {
            self.set(name, var.value.clone(), var.secure);
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(|v| v.value.as_str())
    }

    pub fn is_secure(&self, name: &str) -> bool {
        self.vars.get(name).is_some_and(|v| v.secure)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EnvironmentVariable)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    /// Valores seguros no vacíos, sin duplicados, en orden de inserción.
    pub fn secure_values(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for var in self.vars.values().filter(|v| v.secure && !v.value.is_empty()) {
            if !out.contains(&var.value.as_str()) {
                out.push(&var.value);
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Vista apta para logs: los valores seguros aparecen enmascarados.
    pub fn to_display_map(&self) -> IndexMap<String, String> {
        self.vars
            .iter()
            .map(|(k, v)| {
                let shown = if v.secure { SECRET_MASK.to_string() } else { v.value.clone() };
                (k.clone(), shown)
            })
            .collect()
    }
}
