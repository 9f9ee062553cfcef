//! This module provides the four join operations. All of them traverse
//! their operands through the [entries](crate::collections::entries)
//! adapter, project matches through the selectors of
//! [selectors](crate::selectors), and return a freshly allocated result
//! sequence in outer-major order.
//!
//! [hash_join] and [group_join] compare keys by canonical string form;
//! [merge_join] and [unique_join] compare keys under the native total order
//! of [JoinValue](crate::value::JoinValue).

/// Module defining the group join.
pub mod group;
/// Module defining the hash join.
pub mod hash;
/// Module defining the sort-merge join.
pub mod merge;
/// Module defining the linear unique-key join.
pub mod unique;

pub use group::group_join;
pub use hash::hash_join;
pub use merge::{merge_join, MergeOptions};
pub use unique::{unique_join, unique_join_checked};
