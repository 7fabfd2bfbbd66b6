//! Edit composition properties exercised through the public API.

use recast::diagnostics::RefactorError;
use recast::edit::EditSet;

#[test]
fn noop_apply_returns_text_and_cursor_unchanged() {
    for (text, cursor) in [("", 0), ("one line", 3), ("a\nb\nc", 5)] {
        let set = EditSet::new();
        let (out, c) = set.apply(text, cursor).unwrap();
        assert_eq!(out, text);
        assert_eq!(c, cursor);
    }
}

#[test]
fn replace_round_trip_matches_splice() {
    let text = "Local number &count = 0;";
    let start = text.find("&count").unwrap();
    let end = start + "&count".len();
    let mut set = EditSet::new();
    set.replace(start, end, "&total", "swap name");
    let (out, _) = set.apply(text, 0).unwrap();
    assert_eq!(out, format!("{}&total{}", &text[..start], &text[end..]));
}

#[test]
fn edits_against_original_offsets_compose() {
    // Three edits with different deltas, queued in buffer order. Every
    // offset refers to the original text; the composer handles the shifts.
    let text = "aa bb cc dd";
    let mut set = EditSet::new();
    set.replace(0, 2, "xxxx", "grow");
    set.delete(3, 5, "drop bb");
    set.replace(9, 11, "z", "shrink dd");
    let (out, _) = set.apply(text, 0).unwrap();
    assert_eq!(out, "xxxx  cc z");
}

#[test]
fn cursor_strictly_before_every_edit_is_invariant() {
    let text = "abcdefghij";
    let mut set = EditSet::new();
    set.replace(5, 7, "XYZ", "later");
    set.insert(9, "!", "even later");
    let (_, cursor) = set.apply(text, 2).unwrap();
    assert_eq!(cursor, 2);
}

#[test]
fn cursor_accumulates_deltas_of_all_preceding_edits() {
    let text = "0123456789";
    let mut set = EditSet::new();
    set.delete(0, 2, "minus two"); // delta -2
    set.insert(4, "+++", "plus three"); // delta +3
    let (out, cursor) = set.apply(text, 8).unwrap();
    assert_eq!(out, "23+++456789");
    assert_eq!(cursor, 9);
    assert_eq!(&out[cursor..cursor + 1], "8");
}

#[test]
fn cursor_inside_replaced_span_snaps_to_insertion_point() {
    let text = "0123456789";
    let mut set = EditSet::new();
    set.replace(3, 7, "ab", "shrink middle");
    let (out, cursor) = set.apply(text, 5).unwrap();
    assert_eq!(out, "012ab789");
    assert_eq!(cursor, 5); // 3 + len("ab")
}

#[test]
fn apply_consumes_the_set() {
    // EditSet::apply takes self by value: the one-shot lifecycle is a
    // compile-time property, so this test just documents the call shape.
    let mut set = EditSet::new();
    set.insert(0, "x", "once");
    let (out, _) = set.apply("abc", 0).unwrap();
    assert_eq!(out, "xabc");
}

#[test]
fn malformed_spans_fail_without_partial_output() {
    let mut set = EditSet::new();
    set.replace(0, 3, "ok", "fine");
    set.delete(7, 4, "inverted");
    let err = set.apply("0123456789", 0).unwrap_err();
    assert!(matches!(err, RefactorError::Malformed { .. }));
}

#[test]
fn edit_descriptions_survive_for_diagnostics() {
    let mut set = EditSet::new();
    set.replace(0, 1, "b", "swap first letter");
    assert_eq!(set.edits()[0].description, "swap first letter");
}
