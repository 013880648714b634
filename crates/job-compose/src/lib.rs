//! job-compose: traduce un plan de job y su contexto de entorno al árbol de
//! instrucciones que interpreta el worker.
pub mod composer;
pub mod config;
pub mod errors;
pub mod materials;

pub use composer::{compose, Composer};
pub use config::ComposerConfig;
pub use errors::ComposeError;
