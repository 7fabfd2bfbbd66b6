//! Import resolution scenarios end to end.

use recast::ImportOptions;

const SORT_EXPAND: ImportOptions =
    ImportOptions { sort_alphabetically: true, preserve_wildcards: false };
const KEEP_WILDCARDS: ImportOptions =
    ImportOptions { sort_alphabetically: false, preserve_wildcards: true };

#[test]
fn explicit_reconciliation_sorted() {
    // Existing: PKG:A:Foo. Code also references PKG:A:Bar and PKG:B:Baz.
    let src = "import PKG:A:Foo;\n\nclass C\n   method Go();\nend-class;\n\nmethod Go\n   Local PKG:A:Foo &f = create PKG:A:Foo();\n   Local PKG:A:Bar &b = create PKG:A:Bar();\n   Local PKG:B:Baz &z = create PKG:B:Baz();\nend-method;\n";
    let (out, _) = recast::resolve_imports_source(src, 0, &SORT_EXPAND).unwrap();
    assert!(out.starts_with(
        "import PKG:A:Bar;\nimport PKG:A:Foo;\nimport PKG:B:Baz;\n\nclass C"
    ));
    assert_eq!(out.matches("import ").count(), 3);
}

#[test]
fn wildcard_already_covering_everything_is_untouched() {
    let src = "import PKG:A:*;\n\nLocal PKG:A:Foo &f;\nLocal PKG:A:Bar &b;\n";
    let edits = recast::import_edits(src, &KEEP_WILDCARDS).unwrap();
    assert!(edits.is_empty());
    let (out, _) = recast::resolve_imports_source(src, 0, &KEEP_WILDCARDS).unwrap();
    assert_eq!(out, src);
}

#[test]
fn wildcard_plus_outside_package_reference_adds_explicit_import() {
    let src = "import PKG:A:*;\n\nLocal PKG:A:Foo &f;\nLocal OTHER:Pkg:Thing &t;\n";
    let (out, _) = recast::resolve_imports_source(src, 0, &KEEP_WILDCARDS).unwrap();
    assert!(out.starts_with("import PKG:A:*;\nimport OTHER:Pkg:Thing;\n"));
}

#[test]
fn expand_wildcards_produces_one_entry_per_class() {
    let src = "import PKG:A:*;\n\nLocal PKG:A:Foo &f;\nLocal PKG:A:Bar &b;\n";
    let (out, _) = recast::resolve_imports_source(src, 0, &SORT_EXPAND).unwrap();
    assert!(out.starts_with("import PKG:A:Bar;\nimport PKG:A:Foo;\n"));
    assert!(!out.contains(":*"));
}

#[test]
fn no_import_block_inserts_before_declarations() {
    let src = "class C\n   method Go();\nend-class;\n\nmethod Go\n   Local PKG:A:Foo &f;\nend-method;\n";
    let (out, _) = recast::resolve_imports_source(src, 0, &SORT_EXPAND).unwrap();
    assert!(out.starts_with("import PKG:A:Foo;\n\nclass C\n"));
}

#[test]
fn no_qualified_usage_leaves_stale_imports_alone() {
    // Nothing is used: the refactor has nothing to reconcile against and
    // must not touch the buffer.
    let src = "import PKG:A:Foo;\n\n&x = 1;\n";
    let (out, _) = recast::resolve_imports_source(src, 0, &SORT_EXPAND).unwrap();
    assert_eq!(out, src);
}

#[test]
fn running_twice_is_idempotent() {
    let src = "import PKG:Z:Last;\nimport PKG:A:*;\n\nLocal PKG:A:Foo &f;\nLocal PKG:Z:Last &l;\nLocal PKG:B:Baz &z;\n";
    let (first, _) = recast::resolve_imports_source(src, 0, &SORT_EXPAND).unwrap();
    let edits = recast::import_edits(&first, &SORT_EXPAND).unwrap();
    assert!(edits.is_empty(), "second run queued edits over:\n{first}");
    let (second, _) = recast::resolve_imports_source(&first, 0, &SORT_EXPAND).unwrap();
    assert_eq!(first, second);
}

#[test]
fn preserve_mode_drops_covered_explicit_only_when_unused() {
    // An explicit import whose class is still used survives even under a
    // covering wildcard; stale explicits go away.
    let src = "import PKG:A:*;\nimport PKG:A:Foo;\nimport PKG:A:Gone;\n\nLocal PKG:A:Foo &f;\nLocal PKG:A:Bar &b;\n";
    let (out, _) = recast::resolve_imports_source(src, 0, &KEEP_WILDCARDS).unwrap();
    assert!(out.contains("import PKG:A:*;"));
    assert!(out.contains("import PKG:A:Foo;"));
    assert!(!out.contains("PKG:A:Gone"));
}

#[test]
fn sorted_mode_interleaves_wildcards_and_explicit_imports() {
    let src = "import PKG:B:*;\nimport PKG:A:Foo;\n\nLocal PKG:A:Foo &f;\nLocal PKG:B:Thing &t;\n";
    let options = ImportOptions { sort_alphabetically: true, preserve_wildcards: true };
    let (out, _) = recast::resolve_imports_source(src, 0, &options).unwrap();
    assert!(out.starts_with("import PKG:A:Foo;\nimport PKG:B:*;\n"));
}

#[test]
fn cursor_after_import_block_shifts_with_the_rewrite() {
    let src = "import PKG:A:Foo;\n\nLocal PKG:A:Foo &f;\nLocal PKG:A:Bar &b;\n";
    let cursor = src.find("Local").unwrap();
    let (out, new_cursor) = recast::resolve_imports_source(src, cursor, &SORT_EXPAND).unwrap();
    assert_eq!(&out[new_cursor..new_cursor + 5], "Local");
}
