//! This module defines the selector types shared by all four joins: key
//! selectors that map a collection entry to its join key, and result
//! selectors that project a matched pair (or a matched group) into an
//! output value.
//!
//! A key selector is either the identity, a "pluck" shorthand extracting a
//! named record field, a "where" shorthand matching a template record, or
//! an arbitrary function. Context that the original design threaded through
//! receiver-binding arguments is expressed here through ordinary closure
//! capture.

use std::fmt;

use linked_hash_map::LinkedHashMap;

use crate::collections::EntryKey;
use crate::value::JoinValue;

/// A normalized key-selection function: `(value, position, collection)` to
/// join key.
pub type KeyFn<'a> = Box<dyn Fn(&JoinValue, &EntryKey, &JoinValue) -> JoinValue + 'a>;

/// A key selector in one of its accepted shapes. Applying a key selector
/// never fails; shapes that do not fit the element coerce permissively
/// (plucking a missing field yields `Null`).
pub enum KeySelector<'a> {
    /// The element itself is the key.
    Identity,
    /// "Pluck" shorthand: the key is the named field of the element.
    Field(String),
    /// "Where" shorthand: the key is `true` iff every template field is
    /// present in the element with an equal value, else `false`.
    Matches(LinkedHashMap<String, JoinValue>),
    /// An arbitrary key function.
    Func(KeyFn<'a>),
}

impl<'a> KeySelector<'a> {
    /// The identity selector.
    pub fn identity() -> Self {
        KeySelector::Identity
    }

    /// A pluck-style selector extracting the named field.
    pub fn field(name: impl Into<String>) -> Self {
        KeySelector::Field(name.into())
    }

    /// A where-style selector matching the given template fields.
    pub fn matches<N: Into<String>>(
        template: impl IntoIterator<Item = (N, JoinValue)>,
    ) -> Self {
        KeySelector::Matches(
            template
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// A selector backed by an arbitrary function.
    pub fn func(f: impl Fn(&JoinValue, &EntryKey, &JoinValue) -> JoinValue + 'a) -> Self {
        KeySelector::Func(Box::new(f))
    }

    /// Compute the join key of one collection entry.
    pub fn key(&self, value: &JoinValue, at: &EntryKey, collection: &JoinValue) -> JoinValue {
        match self {
            KeySelector::Identity => value.clone(),
            KeySelector::Field(name) => {
                value.get_field(name).cloned().unwrap_or(JoinValue::Null)
            }
            KeySelector::Matches(template) => JoinValue::Bool(
                template
                    .iter()
                    .all(|(name, expected)| value.get_field(name) == Some(expected)),
            ),
            KeySelector::Func(f) => f(value, at, collection),
        }
    }
}

impl Default for KeySelector<'_> {
    fn default() -> Self {
        KeySelector::Identity
    }
}

impl fmt::Debug for KeySelector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySelector::Identity => write!(f, "KeySelector::Identity"),
            KeySelector::Field(name) => write!(f, "KeySelector::Field({name:?})"),
            KeySelector::Matches(template) => write!(f, "KeySelector::Matches({template:?})"),
            KeySelector::Func(_) => write!(f, "KeySelector::Func(..)"),
        }
    }
}

/// One matched pair together with where both elements came from; the
/// argument of a [PairSelector] function.
#[derive(Debug, Clone, Copy)]
pub struct JoinedPair<'a> {
    /// The outer element.
    pub outer: &'a JoinValue,
    /// The inner element.
    pub inner: &'a JoinValue,
    /// Position of the outer element within the outer collection.
    pub outer_at: &'a EntryKey,
    /// Position of the inner element within the inner collection.
    pub inner_at: &'a EntryKey,
    /// The outer collection.
    pub outer_collection: &'a JoinValue,
    /// The inner collection.
    pub inner_collection: &'a JoinValue,
}

/// Result selector of the pair-producing joins (hash, merge, unique).
/// Projecting to `Null` drops the pair from the output.
pub enum PairSelector<'a> {
    /// Default projection: the sequence `[outer, inner]`.
    Pair,
    /// Ignore the pair and emit this value for every match.
    Constant(JoinValue),
    /// An arbitrary projection function.
    Func(Box<dyn Fn(&JoinedPair<'_>) -> JoinValue + 'a>),
}

impl<'a> PairSelector<'a> {
    /// A selector backed by an arbitrary function.
    pub fn func(f: impl Fn(&JoinedPair<'_>) -> JoinValue + 'a) -> Self {
        PairSelector::Func(Box::new(f))
    }

    /// Project one matched pair.
    pub fn apply(&self, pair: &JoinedPair<'_>) -> JoinValue {
        match self {
            PairSelector::Pair => {
                JoinValue::seq([pair.outer.clone(), pair.inner.clone()])
            }
            PairSelector::Constant(value) => value.clone(),
            PairSelector::Func(f) => f(pair),
        }
    }
}

impl Default for PairSelector<'_> {
    fn default() -> Self {
        PairSelector::Pair
    }
}

impl fmt::Debug for PairSelector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PairSelector::Pair => write!(f, "PairSelector::Pair"),
            PairSelector::Constant(value) => write!(f, "PairSelector::Constant({value:?})"),
            PairSelector::Func(_) => write!(f, "PairSelector::Func(..)"),
        }
    }
}

/// One outer element together with its matched (possibly empty) group; the
/// argument of a [GroupSelector] function.
#[derive(Debug, Clone, Copy)]
pub struct OuterGroup<'a> {
    /// The outer element.
    pub outer: &'a JoinValue,
    /// All inner elements sharing the outer element's key, in the order
    /// they were encountered in the inner collection.
    pub group: &'a [JoinValue],
    /// Position of the outer element within the outer collection.
    pub outer_at: &'a EntryKey,
    /// The outer collection.
    pub outer_collection: &'a JoinValue,
}

/// Result selector of the group join. Projecting to `Null` drops the row.
///
/// `Constant` is representable so that callers can hand any selector shape
/// to any join, but group join rejects it with
/// [Error::InvalidResultSelector](crate::error::Error::InvalidResultSelector).
pub enum GroupSelector<'a> {
    /// Default projection: the sequence `[outer, group]`.
    Pair,
    /// A constant projection; invalid for group join.
    Constant(JoinValue),
    /// An arbitrary projection function.
    Func(Box<dyn Fn(&OuterGroup<'_>) -> JoinValue + 'a>),
}

impl<'a> GroupSelector<'a> {
    /// A selector backed by an arbitrary function.
    pub fn func(f: impl Fn(&OuterGroup<'_>) -> JoinValue + 'a) -> Self {
        GroupSelector::Func(Box::new(f))
    }

    /// Project one outer element and its group.
    pub fn apply(&self, group: &OuterGroup<'_>) -> JoinValue {
        match self {
            GroupSelector::Pair => JoinValue::seq([
                group.outer.clone(),
                JoinValue::Seq(group.group.to_vec()),
            ]),
            GroupSelector::Constant(value) => value.clone(),
            GroupSelector::Func(f) => f(group),
        }
    }
}

impl Default for GroupSelector<'_> {
    fn default() -> Self {
        GroupSelector::Pair
    }
}

impl fmt::Debug for GroupSelector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupSelector::Pair => write!(f, "GroupSelector::Pair"),
            GroupSelector::Constant(value) => write!(f, "GroupSelector::Constant({value:?})"),
            GroupSelector::Func(_) => write!(f, "GroupSelector::Func(..)"),
        }
    }
}
