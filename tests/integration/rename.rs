//! Rename scenarios end to end: parse → resolve → rename → apply.

use recast::diagnostics::RefactorError;
use recast::refactor::rename;
use recast::resolve;

fn cursor_at(source: &str, needle: &str) -> usize {
    source.find(needle).expect("needle present") + 1
}

#[test]
fn local_rename_rewrites_declaration_and_both_uses() {
    let src = "class Widget\n   method Bump();\nend-class;\n\nmethod Bump\n   Local number &x = 1;\n   &x = &x + 1;\nend-method;\n";
    let program = recast::parse_source(src).unwrap();
    let edits = rename::rename(&program, cursor_at(src, "&x"), "&y").unwrap();
    assert_eq!(edits.len(), 3);

    let (out, _) = edits.apply(src, 0).unwrap();
    assert_eq!(out.matches("&y").count(), 3);
    assert_eq!(out.matches("&x").count(), 0);
    assert_eq!(
        out,
        "class Widget\n   method Bump();\nend-class;\n\nmethod Bump\n   Local number &y = 1;\n   &y = &y + 1;\nend-method;\n"
    );
}

#[test]
fn rename_from_a_use_site_finds_the_same_symbol() {
    let src = "Local number &x = 1;\n&x = &x + 1;\n";
    let use_site = src.rfind("&x").unwrap() + 1;
    let (out, _) = recast::rename_source(src, use_site, "&y").unwrap();
    assert_eq!(out, "Local number &y = 1;\n&y = &y + 1;\n");
}

#[test]
fn collision_with_visible_name_fails_with_no_edits() {
    let src = "class C\n   method Go();\nprivate\n   instance number &count;\nend-class;\n\nmethod Go\n   Local number &x = 1;\n   &x = &x + &count;\nend-method;\n";
    let program = recast::parse_source(src).unwrap();
    let err = rename::rename(&program, cursor_at(src, "&x"), "&count").unwrap_err();
    assert!(matches!(err, RefactorError::Collision { .. }));
}

#[test]
fn collision_with_nested_shadowing_name_fails() {
    let src = "class C\n   method Go();\nend-class;\n\nmethod Go\n   Local number &outer = 1;\n   &outer = 2;\n   If true Then\n      Local number &inner = 3;\n      &inner = 4;\n   End-If;\nend-method;\n";
    let program = recast::parse_source(src).unwrap();
    let err = rename::rename(&program, cursor_at(src, "&outer"), "&inner").unwrap_err();
    assert!(matches!(err, RefactorError::Collision { .. }));
}

#[test]
fn collision_check_is_case_insensitive() {
    let src = "Local number &alpha = 1;\nLocal number &beta = &alpha;\n&beta = &beta + 1;\n";
    let program = recast::parse_source(src).unwrap();
    let err = rename::rename(&program, cursor_at(src, "&beta"), "&ALPHA").unwrap_err();
    assert!(matches!(err, RefactorError::Collision { .. }));
}

#[test]
fn missing_sigil_is_normalized_before_the_collision_check() {
    let src = "Local number &x = 1;\n&x = &x + 1;\n";
    let (out, _) = recast::rename_source(src, cursor_at(src, "&x"), "y").unwrap();
    assert_eq!(out, "Local number &y = 1;\n&y = &y + 1;\n");
}

#[test]
fn instance_variable_renames_across_all_method_bodies() {
    let src = "class Counter\n   method Bump();\n   method Reset();\nprivate\n   instance number &count;\nend-class;\n\nmethod Bump\n   &count = &count + 1;\nend-method;\n\nmethod Reset\n   &count = 0;\nend-method;\n";
    let (out, _) = recast::rename_source(src, cursor_at(src, "&count"), "&total").unwrap();
    assert_eq!(out.matches("&total").count(), 4);
    assert_eq!(out.matches("&count").count(), 0);
    assert!(out.contains("instance number &total;"));
}

#[test]
fn parameter_rename_rewrites_header_declaration_and_body_uses() {
    let src = "class C\n   method Add(&delta As number);\nprivate\n   instance number &total;\nend-class;\n\nmethod Add\n   &total = &total + &delta;\nend-method;\n";
    let (out, _) = recast::rename_source(src, cursor_at(src, "&delta"), "&amount").unwrap();
    assert!(out.contains("method Add(&amount As number);"));
    assert!(out.contains("&total + &amount;"));
    assert_eq!(out.matches("&delta").count(), 0);
}

#[test]
fn private_method_rename_covers_decl_impl_and_call_sites() {
    let src = "class C\n   method Run();\nprivate\n   method Helper();\nend-class;\n\nmethod Run\n   %This.Helper();\n   Helper();\nend-method;\n\nmethod Helper\n   Return;\nend-method;\n";
    let (out, _) = recast::rename_source(src, cursor_at(src, "Helper"), "Assist").unwrap();
    assert!(out.contains("method Assist();"));
    assert!(out.contains("%This.Assist();"));
    assert!(out.contains("Assist();"));
    assert!(out.contains("\nmethod Assist\n"));
    assert_eq!(out.matches("Helper").count(), 0);
}

#[test]
fn constant_rename() {
    let src = "class C\n   method Cap(&v As number) Returns number;\nprivate\n   constant &MAX = 10;\nend-class;\n\nmethod Cap\n   If &v > &MAX Then\n      Return &MAX;\n   End-If;\n   Return &v;\nend-method;\n";
    let (out, _) = recast::rename_source(src, cursor_at(src, "&MAX"), "&LIMIT").unwrap();
    assert_eq!(out.matches("&LIMIT").count(), 3);
    assert_eq!(out.matches("&MAX").count(), 0);
}

#[test]
fn rename_preserves_reference_count_after_reresolve() {
    let src = "Local number &x = 1;\n&x = &x + 1;\n";
    let program = recast::parse_source(src).unwrap();
    let tree = resolve::resolve(&program);
    let target = rename::prepare(&tree, cursor_at(src, "&x")).unwrap();
    let before = target.reference_count;

    let (out, _) = recast::rename_source(src, cursor_at(src, "&x"), "&renamed").unwrap();
    let program2 = recast::parse_source(&out).unwrap();
    let tree2 = resolve::resolve(&program2);
    let target2 = rename::prepare(&tree2, cursor_at(&out, "&renamed")).unwrap();
    assert_eq!(target2.reference_count, before);
    assert_eq!(target2.name, "&renamed");
}

#[test]
fn no_symbol_at_cursor_is_not_found() {
    let src = "Local number &x = 1;\n&x = &x + 1;\n";
    let err = recast::rename_source(src, src.find("number").unwrap(), "&y").unwrap_err();
    assert!(matches!(err, RefactorError::NotFound { .. }));
}

#[test]
fn renaming_a_shadowed_outer_local_leaves_inner_alone() {
    let src = "class C\n   method Go();\nend-class;\n\nmethod Go\n   Local number &x = 1;\n   &x = 5;\n   If true Then\n      Local string &y = \"\";\n      &y = \"set\";\n   End-If;\nend-method;\n";
    let (out, _) = recast::rename_source(src, cursor_at(src, "&x"), "&z").unwrap();
    assert!(out.contains("Local number &z = 1;"));
    assert!(out.contains("&z = 5;"));
    assert!(out.contains("Local string &y"));
}

#[test]
fn cursor_remaps_through_the_rename() {
    let src = "Local number &alpha = 1;\n&alpha = &alpha + 1;\n";
    // Cursor sits on the "1" at the very end of the buffer; "&alpha" ->
    // "&a" shrinks three spans of 6 bytes to 2 bytes each.
    let cursor = src.rfind('1').unwrap();
    let (out, new_cursor) = recast::rename_source(src, cursor, "&a").unwrap();
    assert_eq!(out, "Local number &a = 1;\n&a = &a + 1;\n");
    assert_eq!(&out[new_cursor..new_cursor + 1], "1");
}
