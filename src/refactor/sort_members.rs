//! Declaration-order reordering.
//!
//! Rewrites the class body so method/getter/setter implementations appear in
//! the order the class header declares them. Each implementation travels
//! with its leading comment block — the contiguous run of comment and blank
//! lines directly above it — and implementations the header does not declare
//! keep their original relative order at the end. The whole implementation
//! region is rewritten with one replace.

use crate::diagnostics::RefactorError;
use crate::edit::EditSet;
use crate::parser::ast::{MemberDecl, MemberImpl, Program};
use crate::span::LineIndex;

/// Ordering identity: header declarations and implementations pair up by
/// case-folded name *and* member kind, so a property's getter and setter
/// stay distinct keys.
#[derive(Debug, Clone, PartialEq, Eq)]
struct MemberKey {
    name: String,
    kind: MemberKeyKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberKeyKind {
    Method,
    Getter,
    Setter,
}

/// Reorder implementations to declaration order.
///
/// Fails with `AlreadyInOrder` when nothing would move — callers use that to
/// suppress a confirmation prompt, so it is a reported condition rather than
/// a silent no-op.
pub fn sort_implementations(
    program: &Program,
    source: &str,
) -> Result<EditSet, RefactorError> {
    let Some(class) = &program.class else {
        return Err(RefactorError::not_found(
            "no class with an implementation region",
        ));
    };
    if program.implementations.is_empty() {
        return Err(RefactorError::not_found("no implementations to sort"));
    }

    let header_keys = header_order(class.node.sections.iter().flat_map(|s| &s.members));
    let impl_keys: Vec<MemberKey> = program
        .implementations
        .iter()
        .map(|m| impl_key(&m.node))
        .collect();

    // Stable matching: each header key claims the first unclaimed
    // implementation with the same identity.
    let mut claimed = vec![false; impl_keys.len()];
    let mut order: Vec<usize> = Vec::with_capacity(impl_keys.len());
    for key in &header_keys {
        if let Some(idx) = impl_keys
            .iter()
            .enumerate()
            .position(|(i, k)| !claimed[i] && k == key)
        {
            claimed[idx] = true;
            order.push(idx);
        }
    }
    // Implementations the header never declared: original relative order.
    for (idx, was_claimed) in claimed.iter().enumerate() {
        if !*was_claimed {
            order.push(idx);
        }
    }

    if order.iter().enumerate().all(|(pos, &idx)| pos == idx) {
        return Err(RefactorError::AlreadyInOrder);
    }

    // Each implementation's text starts at its leading comment block. The
    // scan is floored at the previous implementation's end (or the class
    // terminator for the first), so it can never swallow unrelated text.
    let index = LineIndex::new(source);
    let mut block_starts = Vec::with_capacity(program.implementations.len());
    let mut floor = class.span.end;
    for member in &program.implementations {
        block_starts.push(leading_comment_start(source, &index, member.span.start, floor));
        floor = member.span.end;
    }

    let pieces: Vec<&str> = order
        .iter()
        .map(|&idx| {
            let start = block_starts[idx];
            let end = program.implementations[idx].span.end;
            &source[start..end]
        })
        .collect();
    let body = pieces.join("\n\n");

    let region_start = block_starts[0];
    let region_end = program
        .implementations
        .last()
        .map(|m| m.span.end)
        .unwrap_or(region_start);

    let mut edits = EditSet::new();
    edits.replace(
        region_start,
        region_end,
        body,
        "reorder implementations to declaration order",
    );
    Ok(edits)
}

fn header_order<'a, I>(members: I) -> Vec<MemberKey>
where
    I: Iterator<Item = &'a crate::span::Spanned<MemberDecl>>,
{
    let mut keys = Vec::new();
    for member in members {
        match &member.node {
            MemberDecl::Method(decl) => keys.push(MemberKey {
                name: decl.name.node.to_ascii_lowercase(),
                kind: MemberKeyKind::Method,
            }),
            MemberDecl::Property(decl) => {
                let name = decl.name.node.to_ascii_lowercase();
                if decl.has_get {
                    keys.push(MemberKey { name: name.clone(), kind: MemberKeyKind::Getter });
                }
                if decl.has_set {
                    keys.push(MemberKey { name, kind: MemberKeyKind::Setter });
                }
            }
            MemberDecl::Instance(_) | MemberDecl::Constant(_) => {}
        }
    }
    keys
}

fn impl_key(member: &MemberImpl) -> MemberKey {
    match member {
        MemberImpl::Method(m) => MemberKey {
            name: m.name.node.to_ascii_lowercase(),
            kind: MemberKeyKind::Method,
        },
        MemberImpl::Getter(a) => MemberKey {
            name: a.name.node.to_ascii_lowercase(),
            kind: MemberKeyKind::Getter,
        },
        MemberImpl::Setter(a) => MemberKey {
            name: a.name.node.to_ascii_lowercase(),
            kind: MemberKeyKind::Setter,
        },
    }
}

/// Where `impl_start`'s leading comment block begins: scan upward line by
/// line past blank lines and comments (`/* */` blocks, `/+ +/` annotations,
/// `rem ...;`), stopping at the first code line or at the floor. Returns the
/// line start of the topmost attached comment, or of the implementation
/// itself when nothing is attached.
fn leading_comment_start(
    source: &str,
    index: &LineIndex,
    impl_start: usize,
    floor: usize,
) -> usize {
    let impl_line = index.line_of(impl_start);
    let floor_line = index.line_of(floor);

    fn line_text<'a>(source: &'a str, index: &LineIndex, line: usize) -> &'a str {
        let start = index.line_start(line);
        let end = if line + 1 < index.line_count() {
            index.line_start(line + 1)
        } else {
            source.len()
        };
        source[start..end].trim()
    }

    let mut first_comment_line = None;
    let mut line = impl_line;
    // Set while scanning the interior of a multi-line comment, to the
    // opening marker still being looked for.
    let mut open_pending: Option<&str> = None;

    while line > 0 {
        let prev = line - 1;
        if prev <= floor_line {
            break;
        }
        let text = line_text(source, index, prev);

        if let Some(open) = open_pending {
            if text.starts_with(open) {
                open_pending = None;
                first_comment_line = Some(prev);
            }
            line = prev;
            continue;
        }

        if text.is_empty() {
            // Blank lines inside the run are crossable but never anchor it.
            line = prev;
            continue;
        }
        if text.starts_with("/*") || text.starts_with("/+") {
            first_comment_line = Some(prev);
            line = prev;
            continue;
        }
        if starts_with_rem(text) {
            first_comment_line = Some(prev);
            line = prev;
            continue;
        }
        if text.ends_with("*/") {
            open_pending = Some("/*");
            line = prev;
            continue;
        }
        if text.ends_with("+/") {
            open_pending = Some("/+");
            line = prev;
            continue;
        }
        break;
    }

    match first_comment_line {
        Some(line) => index.line_start(line),
        None => index.line_start(impl_line),
    }
}

fn starts_with_rem(text: &str) -> bool {
    let mut chars = text.chars();
    let prefix: String = chars.by_ref().take(3).collect();
    prefix.eq_ignore_ascii_case("rem")
        && text.chars().nth(3).is_none_or(|c| c.is_whitespace())
}
