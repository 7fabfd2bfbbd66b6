//! The refactor algorithms.
//!
//! Each entry point reads the parsed program (and the scope tree where it
//! needs one), queues edits into a fresh [`crate::edit::EditSet`], and
//! returns it ready for `apply`. Failure short-circuits before any edit is
//! built, so a failed refactor never queues anything — all-or-nothing is
//! structural, not a cleanup step.

pub mod rename;
pub mod imports;
pub mod sort_members;
