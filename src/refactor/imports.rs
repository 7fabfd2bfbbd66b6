//! Import resolution.
//!
//! Collects every fully qualified class path the program actually uses,
//! reconciles the set against the existing import block — keeping, expanding
//! or dropping wildcards per [`ImportOptions`] — and rewrites the block with
//! a single replace (or a single insert when no block exists yet). Stale
//! entries never survive: a retained import is either a wildcard covering at
//! least one used class or an explicit import of a used class.
//!
//! Wildcard coverage compares the colon-delimited package *segment lists*
//! case-insensitively. It is never a substring check, so `PKG:SUB2` can
//! never ride on a `PKG:SUB` wildcard.

use std::collections::HashSet;

use crate::diagnostics::RefactorError;
use crate::edit::EditSet;
use crate::parser::ast::{ImportDecl, Program, TypePath};
use crate::span::Spanned;
use crate::visit::{self, Visitor};

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Sort the final block by full path, case-insensitive, wildcards
    /// interleaved. When false, retained entries keep their relative order
    /// and new entries append at the end.
    pub sort_alphabetically: bool,
    /// Keep wildcards that cover at least one used class. When false, every
    /// wildcard is expanded into the explicit imports it covers.
    pub preserve_wildcards: bool,
}

/// A used qualified class reference, first spelling wins.
#[derive(Debug, Clone)]
struct UsedClass {
    segments: Vec<String>,
}

impl UsedClass {
    fn full_path(&self) -> String {
        self.segments.join(":")
    }

    fn key(&self) -> String {
        self.full_path().to_ascii_lowercase()
    }

    fn package_key(&self) -> String {
        self.segments[..self.segments.len() - 1]
            .join(":")
            .to_ascii_lowercase()
    }
}

/// One entry of the rewritten block: the rendered path, wildcard marker
/// included for package entries.
#[derive(Debug, Clone)]
struct Entry {
    path: String,
}

impl Entry {
    fn key(&self) -> String {
        self.path.to_ascii_lowercase()
    }
}

struct UsedCollector {
    used: Vec<UsedClass>,
    seen: HashSet<String>,
}

impl Visitor for UsedCollector {
    fn visit_type_path(&mut self, ty: &Spanned<TypePath>) {
        if ty.node.is_qualified() {
            let segments: Vec<String> =
                ty.node.segments.iter().map(|s| s.node.clone()).collect();
            let used = UsedClass { segments };
            if self.seen.insert(used.key()) {
                self.used.push(used);
            }
        }
        visit::walk_type_path(self, ty);
    }

    fn visit_expr(&mut self, expr: &Spanned<crate::parser::ast::Expr>) {
        if let crate::parser::ast::Expr::Path(path) = &expr.node
            && path.is_qualified()
        {
            let segments: Vec<String> =
                path.segments.iter().map(|s| s.node.clone()).collect();
            let used = UsedClass { segments };
            if self.seen.insert(used.key()) {
                self.used.push(used);
            }
        }
        visit::walk_expr(self, expr);
    }
}

/// Reconcile the import block against actual usage.
///
/// Returns an empty edit set when the program references no qualified class
/// (nothing to do) or when the rewritten block already matches the source
/// text byte for byte — which makes a second run a no-op by construction.
pub fn resolve_imports(
    program: &Program,
    source: &str,
    options: &ImportOptions,
) -> Result<EditSet, RefactorError> {
    let used = collect_used(program);
    let mut edits = EditSet::new();
    if used.is_empty() {
        return Ok(edits);
    }

    let entries = reconcile(&program.imports, &used, options);
    let block = entries
        .iter()
        .map(|e| format!("import {};", e.path))
        .collect::<Vec<_>>()
        .join("\n");

    match (program.imports.first(), program.imports.last()) {
        (Some(first), Some(last)) => {
            let start = first.span.start;
            let end = last.span.end;
            if &source[start..end] != block {
                edits.replace(start, end, block, "rewrite import block");
            }
        }
        _ => {
            // No block yet: imports must precede every declaration, so the
            // only always-valid anchor is the top of the buffer.
            edits.insert(0, format!("{block}\n\n"), "insert import block");
        }
    }

    Ok(edits)
}

fn collect_used(program: &Program) -> Vec<UsedClass> {
    let mut collector = UsedCollector { used: Vec::new(), seen: HashSet::new() };
    collector.visit_program(program);
    collector.used
}

fn reconcile(
    existing: &[Spanned<ImportDecl>],
    used: &[UsedClass],
    options: &ImportOptions,
) -> Vec<Entry> {
    let mut entries: Vec<Entry> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut push = |entries: &mut Vec<Entry>, entry: Entry| {
        if seen.insert(entry.key()) {
            entries.push(entry);
        }
    };

    let wildcard_package_key = |decl: &ImportDecl| -> String {
        decl.package().join(":").to_ascii_lowercase()
    };
    let covered_by = |decl: &ImportDecl| -> Vec<&UsedClass> {
        let package = wildcard_package_key(decl);
        used.iter().filter(|u| u.package_key() == package).collect()
    };
    let used_keys: HashSet<String> = used.iter().map(|u| u.key()).collect();

    if options.preserve_wildcards {
        // Packages covered by a wildcard that stays.
        let kept_packages: HashSet<String> = existing
            .iter()
            .filter(|e| e.node.wildcard && !covered_by(&e.node).is_empty())
            .map(|e| wildcard_package_key(&e.node))
            .collect();

        for decl in existing {
            let decl = &decl.node;
            if decl.wildcard {
                if !covered_by(decl).is_empty() {
                    push(&mut entries, Entry { path: decl.full_path() });
                }
            } else if used_keys.contains(&decl.full_path().to_ascii_lowercase()) {
                push(&mut entries, Entry { path: decl.full_path() });
            }
        }

        for u in used {
            if !kept_packages.contains(&u.package_key()) {
                push(&mut entries, Entry { path: u.full_path() });
            }
        }
    } else {
        for decl in existing {
            let decl = &decl.node;
            if decl.wildcard {
                let mut expanded = covered_by(decl);
                expanded.sort_by_key(|u| u.key());
                for u in expanded {
                    push(&mut entries, Entry { path: u.full_path() });
                }
            } else if used_keys.contains(&decl.full_path().to_ascii_lowercase()) {
                push(&mut entries, Entry { path: decl.full_path() });
            }
        }

        for u in used {
            push(&mut entries, Entry { path: u.full_path() });
        }
    }

    if options.sort_alphabetically {
        entries.sort_by_key(|e| e.key());
    }

    entries
}
