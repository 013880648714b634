//! Política de redacción de secretos.
//!
//! Un valor seguro nunca aparece en texto mostrable (echo, descripciones de
//! task, mensajes de acción) y cualquier otra aparición (argumentos de exec,
//! exports) debe ir precedida, en orden de ejecución, por un nodo `Secret`
//! que lo registre para que el worker lo enmascare.
//!
//! El composer pasa `mask_tree` antes de `verify`, de modo que un valor
//! seguro que coincide por casualidad con parte de un texto fijo queda
//! enmascarado en lugar de invalidar el árbol.

use crate::command::{BuildCommand, CommandKind};
use crate::constants::SECRET_MASK;
use crate::errors::CoreError;

/// Sustituye cada aparición de un secreto no vacío por la máscara. Los más
/// largos primero, para que un secreto que contiene a otro quede entero.
pub fn mask(text: &str, secrets: &[&str]) -> String {
    let mut ordered: Vec<&str> = secrets.iter().copied().filter(|s| !s.is_empty()).collect();
    ordered.sort_by_key(|s| std::cmp::Reverse(s.len()));
    let mut out = text.to_string();
    for s in ordered {
        if out.contains(s) {
            out = out.replace(s, SECRET_MASK);
        }
    }
    out
}

/// Enmascara el texto mostrable de todo el árbol, overrides incluidos.
pub fn mask_tree(tree: BuildCommand, secrets: &[&str]) -> BuildCommand {
    tree.map_displayable(&|text: &str| mask(text, secrets))
}

/// Secretos que aparecen en argumentos de `Exec` o valores de `Export` del
/// árbol principal, en orden de primera aparición y sin repetir.
pub fn carried<'s>(tree: &BuildCommand, secrets: &[&'s str]) -> Vec<&'s str> {
    let mut found: Vec<&'s str> = Vec::new();
    tree.walk(&mut |node| {
            let fields: Vec<&str> = match node.kind() {
                CommandKind::Exec { command, args } => {
                    std::iter::once(command.as_str()).chain(args.iter().map(String::as_str)).collect()
                }
                CommandKind::Export { value: Some(value), .. } => vec![value.as_str()],
                _ => Vec::new(),
            };
            for s in secrets.iter().copied().filter(|s| !s.is_empty()) {
                if !found.contains(&s) && fields.iter().any(|f| f.contains(s)) {
                    found.push(s);
                }
            }
        });
    found
}

/// Verifica la política sobre el árbol completo, incluidos los overrides de
/// cancelación (cada uno con los secretos declarados antes de su nodo).
pub fn verify(tree: &BuildCommand, secrets: &[&str]) -> Result<(), CoreError> {
    let secrets: Vec<&str> = secrets.iter().copied().filter(|s| !s.is_empty()).collect();
    if secrets.is_empty() {
        return Ok(());
    }
    let mut declared = Vec::new();
    visit(tree, &secrets, &mut declared)
}

fn visit(node: &BuildCommand, secrets: &[&str], declared: &mut Vec<String>) -> Result<(), CoreError> {
    let before = declared.clone();
    check_node(node, secrets, declared)?;
    for child in node.children() {
        visit(child, secrets, declared)?;
    }
    if let Some(cancel) = node.on_cancel() {
        let mut snapshot = before;
        visit(cancel, secrets, &mut snapshot)?;
    }
    Ok(())
}

fn check_node(node: &BuildCommand, secrets: &[&str], declared: &mut Vec<String>) -> Result<(), CoreError> {
    let kind = node.kind();
    if let Some(text) = kind.displayable_text() {
        if secrets.iter().any(|s| text.contains(s)) {
            return Err(CoreError::Redaction(format!("{} node shows a secure value", kind.name())));
        }
    }
    match kind {
        CommandKind::Secret { value } => {
            declared.push(value.clone());
        }
        CommandKind::Export { name, value: Some(value), secure } => {
            if *secure && !value.is_empty() && !declared.iter().any(|d| d == value) {
                return Err(CoreError::Redaction(format!("secure export '{name}' before its secret declaration")));
            }
            require_declared(value, secrets, declared, kind.name())?;
        }
        CommandKind::Exec { command, args } => {
            require_declared(command, secrets, declared, kind.name())?;
            for arg in args {
                require_declared(arg, secrets, declared, kind.name())?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn require_declared(field: &str, secrets: &[&str], declared: &[String], node: &str) -> Result<(), CoreError> {
    for s in secrets.iter().filter(|s| field.contains(**s)) {
        if !declared.iter().any(|d| d == s) {
            return Err(CoreError::Redaction(format!("{node} node carries an undeclared secure value")));
        }
    }
    Ok(())
}
