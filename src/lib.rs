pub mod span;
pub mod diagnostics;
pub mod edit;
pub mod lexer;
pub mod parser;
pub mod visit;
pub mod resolve;
pub mod refactor;

use diagnostics::RefactorError;
use edit::EditSet;
use parser::ast::Program;

pub use refactor::imports::ImportOptions;

/// Lex and parse a source buffer (the front end ahead of every refactor).
pub fn parse_source(source: &str) -> Result<Program, RefactorError> {
    let tokens = lexer::lex(source)?;
    let mut parser = parser::Parser::new(&tokens, source);
    parser.parse_program()
}

/// Rename the symbol at `cursor` to `new_name` and apply the edits
/// (parse → resolve → rename → apply). Returns the rewritten buffer and the
/// remapped cursor.
pub fn rename_source(
    source: &str,
    cursor: usize,
    new_name: &str,
) -> Result<(String, usize), RefactorError> {
    let program = parse_source(source)?;
    let edits = refactor::rename::rename(&program, cursor, new_name)?;
    edits.apply(source, cursor)
}

/// Reconcile the import block against actual usage and apply the edits.
pub fn resolve_imports_source(
    source: &str,
    cursor: usize,
    options: &ImportOptions,
) -> Result<(String, usize), RefactorError> {
    let program = parse_source(source)?;
    let edits = refactor::imports::resolve_imports(&program, source, options)?;
    edits.apply(source, cursor)
}

/// Reorder implementations to declaration order and apply the edits.
pub fn sort_implementations_source(
    source: &str,
    cursor: usize,
) -> Result<(String, usize), RefactorError> {
    let program = parse_source(source)?;
    let edits = refactor::sort_members::sort_implementations(&program, source)?;
    edits.apply(source, cursor)
}

/// Queue the edits for a refactor without applying them, for hosts that
/// apply edits against their own buffer representation.
pub fn rename_edits(
    source: &str,
    cursor: usize,
    new_name: &str,
) -> Result<EditSet, RefactorError> {
    let program = parse_source(source)?;
    refactor::rename::rename(&program, cursor, new_name)
}

pub fn import_edits(
    source: &str,
    options: &ImportOptions,
) -> Result<EditSet, RefactorError> {
    let program = parse_source(source)?;
    refactor::imports::resolve_imports(&program, source, options)
}

pub fn sort_edits(source: &str) -> Result<EditSet, RefactorError> {
    let program = parse_source(source)?;
    refactor::sort_members::sort_implementations(&program, source)
}
