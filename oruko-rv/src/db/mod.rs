//! Database access layer for oruko-rv
//!
//! Thin typed queries over the shared schema. Every mutating statement that
//! acts on a claimed row carries `locked_by = ?` in its predicate - the lock
//! field pair is the only mutual exclusion this system has, so ownership is
//! re-checked on every write, not just at claim time.

pub mod names;
pub mod reviewers;
pub mod submissions;
