//! Property tests for the edit composer laws.

use proptest::prelude::*;
use recast::edit::EditSet;

/// ASCII text plus two offsets clamped into it (start <= end).
fn text_and_span() -> impl Strategy<Value = (String, usize, usize)> {
    ("[ -~]{1,60}", any::<usize>(), any::<usize>()).prop_map(|(text, a, b)| {
        let len = text.len();
        let a = a % (len + 1);
        let b = b % (len + 1);
        (text, a.min(b), a.max(b))
    })
}

proptest! {
    #[test]
    fn empty_apply_is_identity(text in "[ -~]{0,60}", cursor in any::<usize>()) {
        let cursor = cursor % (text.len() + 1);
        let set = EditSet::new();
        let (out, c) = set.apply(&text, cursor).unwrap();
        prop_assert_eq!(out, text);
        prop_assert_eq!(c, cursor);
    }

    #[test]
    fn single_replace_round_trips(
        (text, start, end) in text_and_span(),
        replacement in "[ -~]{0,20}",
    ) {
        let mut set = EditSet::new();
        set.replace(start, end, replacement.clone(), "prop replace");
        let (out, _) = set.apply(&text, 0).unwrap();
        prop_assert_eq!(out, format!("{}{}{}", &text[..start], replacement, &text[end..]));
    }

    #[test]
    fn cursor_before_edit_is_invariant(
        (text, start, end) in text_and_span(),
        replacement in "[ -~]{0,20}",
        cursor in any::<usize>(),
    ) {
        prop_assume!(start > 0);
        let cursor = cursor % start;
        let mut set = EditSet::new();
        set.replace(start, end, replacement, "prop replace");
        let (_, c) = set.apply(&text, cursor).unwrap();
        prop_assert_eq!(c, cursor);
    }

    #[test]
    fn cursor_after_edit_shifts_by_delta(
        (text, start, end) in text_and_span(),
        replacement in "[ -~]{0,20}",
    ) {
        let cursor = text.len();
        let mut set = EditSet::new();
        set.replace(start, end, replacement.clone(), "prop replace");
        let (out, c) = set.apply(&text, cursor).unwrap();
        // A cursor at the end of the buffer lands at the end of the result.
        prop_assert_eq!(c, out.len());
        prop_assert_eq!(
            out.len() as i64 - text.len() as i64,
            replacement.len() as i64 - (end - start) as i64
        );
    }

    #[test]
    fn delete_then_reinsert_is_identity(
        (text, start, end) in text_and_span(),
    ) {
        let removed = text[start..end].to_string();
        let mut set = EditSet::new();
        set.delete(start, end, "cut");
        set.insert(start, removed, "paste back");
        let (out, _) = set.apply(&text, 0).unwrap();
        prop_assert_eq!(out, text);
    }

    #[test]
    fn disjoint_edits_commute_with_queue_order(
        text in "[ -~]{20,60}",
        a in 0usize..5,
        b in 10usize..15,
        left in "[ -~]{0,8}",
        right in "[ -~]{0,8}",
    ) {
        let mut forward = EditSet::new();
        forward.replace(a, a + 2, left.clone(), "left");
        forward.replace(b, b + 2, right.clone(), "right");
        let mut backward = EditSet::new();
        backward.replace(b, b + 2, right, "right");
        backward.replace(a, a + 2, left, "left");
        let (out1, _) = forward.apply(&text, 0).unwrap();
        let (out2, _) = backward.apply(&text, 0).unwrap();
        prop_assert_eq!(out1, out2);
    }
}
