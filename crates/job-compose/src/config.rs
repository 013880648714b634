//! Configuración del composer desde variables de entorno.
//! `JOBFLOW_SERVER_URL_VAR` y `JOBFLOW_TEST_REPORT_DIR`, ambas opcionales.

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // sin .env no pasa nada
});

pub const DEFAULT_SERVER_URL_VAR: &str = "GO_SERVER_URL";
pub const DEFAULT_TEST_REPORT_DIR: &str = "testoutput";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerConfig {
    /// Variable del agente re-exportada tal cual al inicio del build.
    pub server_url_variable: String,
    /// Directorio (relativo al working dir) del reporte de tests.
    pub test_report_dir: String,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self { server_url_variable: DEFAULT_SERVER_URL_VAR.to_string(),
               test_report_dir: DEFAULT_TEST_REPORT_DIR.to_string() }
    }
}

impl ComposerConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        let read = |key: &str, default: &str| {
            env::var(key).ok()
                         .map(|v| v.trim().to_string())
                         .filter(|v| !v.is_empty())
                         .unwrap_or_else(|| default.to_string())
        };
        Self { server_url_variable: read("JOBFLOW_SERVER_URL_VAR", DEFAULT_SERVER_URL_VAR),
               test_report_dir: read("JOBFLOW_TEST_REPORT_DIR", DEFAULT_TEST_REPORT_DIR) }
    }
}
