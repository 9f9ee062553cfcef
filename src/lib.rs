//! This crate provides SQL-style relational join operators over arbitrary
//! in-memory collections: hash join, group join, sort-merge join, and a
//! linear merge join for unique-key inputs.
//!
//! Collections are represented by the dynamic [`JoinValue`](value::JoinValue)
//! model, which covers sequences, insertion-ordered mappings, and strings
//! (enumerated as characters). Callers supply key selectors that map each
//! element to a join key and a result selector that projects each matched
//! pair (or group) into an output value; a `Null` projection suppresses the
//! pair. Each operation returns a freshly allocated result sequence and
//! never mutates or caches its inputs.
//!
//! Hash and group join compare keys by their canonical string form, while
//! merge and unique join compare keys under the native total order of
//! [`JoinValue`](value::JoinValue). The two regimes are deliberately
//! distinct: `1` and `"1"` join in a hash join but not in a merge join.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts
)]
#![warn(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_extern_crates
)]

pub mod collections;
pub mod error;
pub mod joins;
pub mod selectors;
pub mod value;

pub use joins::{
    group_join, hash_join, merge_join, unique_join, unique_join_checked, MergeOptions,
};
