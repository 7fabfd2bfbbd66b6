//! Declaration-order reordering scenarios end to end.

use recast::diagnostics::RefactorError;

#[test]
fn reorders_to_declaration_order_with_comments_attached() {
    // Header order: Init, Process, Done. Body order: Done, Init, Process,
    // each with a one-line leading comment.
    let src = "\
class Job
   method Init();
   method Process();
   method Done();
end-class;

/* tear down */
method Done
   &state = 0;
end-method;

/* set up */
method Init
   &state = 1;
end-method;

/* main work */
method Process
   &state = 2;
end-method;
";
    let (out, _) = recast::sort_implementations_source(src, 0).unwrap();
    let expected = "\
class Job
   method Init();
   method Process();
   method Done();
end-class;

/* set up */
method Init
   &state = 1;
end-method;

/* main work */
method Process
   &state = 2;
end-method;

/* tear down */
method Done
   &state = 0;
end-method;
";
    assert_eq!(out, expected);
}

#[test]
fn already_sorted_reports_already_in_order() {
    let src = "class C\n   method A();\n   method B();\nend-class;\n\nmethod A\nend-method;\n\nmethod B\nend-method;\n";
    let err = recast::sort_implementations_source(src, 0).unwrap_err();
    assert!(matches!(err, RefactorError::AlreadyInOrder));
}

#[test]
fn second_run_is_a_reported_noop() {
    let src = "class C\n   method A();\n   method B();\nend-class;\n\nmethod B\nend-method;\n\nmethod A\nend-method;\n";
    let (first, _) = recast::sort_implementations_source(src, 0).unwrap();
    let err = recast::sort_implementations_source(&first, 0).unwrap_err();
    assert!(matches!(err, RefactorError::AlreadyInOrder));
}

#[test]
fn getters_and_setters_order_independently_of_methods() {
    let src = "\
class Acc
   method Deposit(&amt As number);
   property number Balance get set;
private
   instance number &balance;
end-class;

set Balance
   &balance = 0;
end-set;

get Balance
   return &balance;
end-get;

method Deposit
   &balance = &balance + &amt;
end-method;
";
    let (out, _) = recast::sort_implementations_source(src, 0).unwrap();
    let deposit = out.find("\nmethod Deposit").unwrap();
    let getter = out.find("get Balance").unwrap();
    let setter = out.find("set Balance").unwrap();
    assert!(deposit < getter && getter < setter, "wrong order:\n{out}");
}

#[test]
fn implementations_missing_from_header_go_last_in_original_order() {
    let src = "class C\n   method B();\n   method A();\nend-class;\n\nmethod A\nend-method;\n\nmethod Mystery\nend-method;\n\nmethod B\nend-method;\n";
    let (out, _) = recast::sort_implementations_source(src, 0).unwrap();
    let b = out.find("\nmethod B\n").unwrap();
    let a = out.find("\nmethod A\n").unwrap();
    let mystery = out.find("\nmethod Mystery\n").unwrap();
    assert!(b < a && a < mystery, "wrong order:\n{out}");
}

#[test]
fn multi_line_comment_blocks_travel_whole() {
    let src = "\
class C
   method A();
   method B();
end-class;

/* B first line
   B second line */
method B
end-method;

rem A note;
method A
end-method;
";
    let (out, _) = recast::sort_implementations_source(src, 0).unwrap();
    let a_comment = out.find("rem A note;").unwrap();
    let a_impl = out.find("method A\n").unwrap();
    let b_comment = out.find("/* B first line").unwrap();
    assert!(a_comment < a_impl && a_impl < b_comment, "wrong layout:\n{out}");
    // The multi-line block stayed contiguous.
    assert!(out.contains("/* B first line\n   B second line */\nmethod B"));
}

#[test]
fn no_implementations_is_not_found() {
    let src = "class C\n   method A() abstract;\nend-class;\n";
    let err = recast::sort_implementations_source(src, 0).unwrap_err();
    assert!(matches!(err, RefactorError::NotFound { .. }));
}

#[test]
fn cursor_inside_moved_method_stays_in_region() {
    let src = "class C\n   method A();\n   method B();\nend-class;\n\nmethod B\n   &b = 1;\nend-method;\n\nmethod A\n   &a = 2;\nend-method;\n";
    let cursor = src.find("&a").unwrap();
    let (out, new_cursor) = recast::sort_implementations_source(src, cursor).unwrap();
    // The whole region is one replace; a cursor inside it snaps to the
    // post-edit insertion point, the end of the rewritten region. Only the
    // final newline of the buffer lies past it.
    assert_eq!(new_cursor, out.len() - 1);
    assert_eq!(&out[new_cursor..], "\n");
}
