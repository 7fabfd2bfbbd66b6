//! Safe rename.
//!
//! Two-phase by design: `prepare` finds the symbol under the cursor and
//! returns what a host dialog needs to prompt for the new name; `rename_to`
//! takes the answer, validates it, and emits one replace per reference. The
//! one-call [`rename`] composes both for hosts that already have the name.

use crate::diagnostics::RefactorError;
use crate::edit::EditSet;
use crate::parser::ast::Program;
use crate::resolve::{self, ScopeTree, SymbolId, SymbolKind};
use crate::span::Span;

/// The symbol `prepare` found under the cursor, plus everything a host
/// prompt needs to describe it.
#[derive(Debug)]
pub struct RenameTarget {
    pub symbol: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub declaration_span: Span,
    pub reference_count: usize,
}

/// Find the renamable symbol at `cursor`.
///
/// The search is scope-local first, then ancestors; a declaration match wins
/// over a reference match. A local whose only occurrence is its own
/// declaration is refused — there is nothing meaningful to rename.
pub fn prepare(tree: &ScopeTree, cursor: usize) -> Result<RenameTarget, RefactorError> {
    let symbol = tree
        .symbol_at_reference(cursor)
        .ok_or_else(|| RefactorError::not_found("no renamable symbol at cursor"))?;
    let info = tree.symbol(symbol);

    if info.kind == SymbolKind::Local && info.references.len() <= 1 {
        return Err(RefactorError::not_found("not a renamable symbol kind"));
    }

    Ok(RenameTarget {
        symbol,
        name: info.name.clone(),
        kind: info.kind,
        declaration_span: info.declaration_span,
        reference_count: info.references.len(),
    })
}

/// Rename `target` to `new_name`, emitting one replace per reference.
///
/// The new name is normalized first: symbol kinds that carry the `&` sigil
/// get it prepended when missing, so a host dialog can accept either
/// spelling. A collision anywhere the symbol is visible — its scope, an
/// ancestor, a nested scope, or a reserved class-level name — is a hard
/// failure with zero edits queued.
pub fn rename_to(
    tree: &ScopeTree,
    target: &RenameTarget,
    new_name: &str,
) -> Result<EditSet, RefactorError> {
    let info = tree.symbol(target.symbol);
    let normalized = normalize_name(new_name, info.kind)?;

    let same_symbol = normalized.eq_ignore_ascii_case(&info.name);
    if !same_symbol && tree.is_name_bound(info.owner, &normalized) {
        return Err(RefactorError::collision(
            normalized,
            info.declaration_span,
        ));
    }

    // Reference spans are distinct token spans, so the replaces cannot
    // overlap; dedup guards against the same span recorded twice.
    let mut spans: Vec<Span> = tree.references_of(target.symbol).to_vec();
    spans.sort_by_key(|s| s.start);
    spans.dedup();

    let mut edits = EditSet::new();
    for span in spans {
        edits.replace(
            span.start,
            span.end,
            normalized.clone(),
            format!("rename {} to {}", info.name, normalized),
        );
    }
    Ok(edits)
}

/// One-call rename: resolve, find the symbol at `cursor`, rewrite every
/// reference to `new_name`.
pub fn rename(
    program: &Program,
    cursor: usize,
    new_name: &str,
) -> Result<EditSet, RefactorError> {
    let tree = resolve::resolve(program);
    let target = prepare(&tree, cursor)?;
    rename_to(&tree, &target, new_name)
}

fn normalize_name(new_name: &str, kind: SymbolKind) -> Result<String, RefactorError> {
    let name = new_name.trim();
    let normalized = if kind.requires_sigil() && !name.starts_with('&') {
        format!("&{name}")
    } else {
        name.to_string()
    };

    let bare = normalized.strip_prefix('&').unwrap_or(&normalized);
    let mut chars = bare.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };
    if !valid {
        return Err(RefactorError::malformed(format!(
            "'{name}' is not a valid identifier"
        )));
    }
    Ok(normalized)
}
