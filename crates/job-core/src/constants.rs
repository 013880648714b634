//! Constantes del compilador de jobs.
//!
//! `TREE_FORMAT_VERSION` forma parte del input del fingerprint: cambiar la
//! forma de un nodo sin cambiar esta versión produciría fingerprints que
//! colisionan entre árboles con semántica distinta.

/// Versión lógica del formato del árbol de instrucciones. Se incluye en el
/// fingerprint de cada árbol compuesto.
pub const TREE_FORMAT_VERSION: &str = "B1.0";

/// Texto con el que el intérprete sustituye valores secretos en consola.
pub const SECRET_MASK: &str = "******";
