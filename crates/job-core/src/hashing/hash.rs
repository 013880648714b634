//! Hash helpers – abstracción para poder cambiar de algoritmo sin tocar el
//! resto del core.

use blake3::Hasher;
use serde_json::{json, Value};

use super::canonical_json::to_canonical_json;
use crate::command::BuildCommand;
use crate::constants::TREE_FORMAT_VERSION;

/// Hashea un string y devuelve hex.
pub fn hash_str(input: &str) -> String {
    let mut h = Hasher::new();
    h.update(input.as_bytes());
    h.finalize().to_hex().to_string()
}

/// Hash del JSON canonicalizado (independiente del orden de claves).
pub fn hash_value(value: &Value) -> String {
    hash_str(&to_canonical_json(value))
}

/// Fingerprint estructural de un árbol de instrucciones. Dos composiciones
/// del mismo plan y contexto deben producir el mismo fingerprint.
pub fn fingerprint(tree: &BuildCommand) -> String {
    // derived Serialize never fails for this type
    let body = serde_json::to_value(tree).unwrap_or(Value::Null);
    hash_value(&json!({
        "format_version": TREE_FORMAT_VERSION,
        "tree": body,
    }))
}
