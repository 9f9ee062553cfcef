//! This module implements the sort-merge join: bring both collections into
//! ascending key order (or trust a caller's assertion that a sequence
//! already is), then merge-scan the two sides, expanding the cartesian
//! product of the runs that share a key.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::collections::{entries, EntryKey};
use crate::selectors::{JoinedPair, KeySelector, PairSelector};
use crate::value::JoinValue;

/// Configuration of [merge_join]. Both flags default to `false`.
///
/// A sorted flag asserts that the corresponding operand is a true sequence
/// already sorted ascending by its key under the native value order; the
/// sort step is then skipped for that side. The flag is ignored for
/// operands that are not sequences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    /// The outer collection is a sequence sorted ascending by its key.
    pub outer_sorted: bool,
    /// The inner collection is a sequence sorted ascending by its key.
    pub inner_sorted: bool,
}

impl MergeOptions {
    /// Options declaring both operands pre-sorted.
    pub fn presorted() -> Self {
        MergeOptions {
            outer_sorted: true,
            inner_sorted: true,
        }
    }
}

/// One element of a sort-materialized side: its key, the element, and the
/// element's position in the source collection.
#[derive(Debug)]
struct SortedEntry<'a> {
    key: JoinValue,
    value: Cow<'a, JoinValue>,
    at: EntryKey,
}

/// A key-ordered view of one operand. A pre-sorted sequence is used
/// directly, with keys recomputed on demand and positions equal to scan
/// positions; anything else is materialized as sorted [SortedEntry] rows.
#[derive(Debug)]
enum SortedLookup<'a> {
    Presorted(&'a [JoinValue]),
    Built(Vec<SortedEntry<'a>>),
}

impl<'a> SortedLookup<'a> {
    fn build(
        collection: &'a JoinValue,
        selector: &KeySelector<'_>,
        declared_sorted: bool,
    ) -> Self {
        if declared_sorted {
            if let Some(elements) = collection.as_seq() {
                return SortedLookup::Presorted(elements);
            }
        }
        let mut rows: Vec<SortedEntry<'a>> = entries(collection)
            .map(|(at, value)| SortedEntry {
                key: selector.key(value.as_ref(), &at, collection),
                value,
                at,
            })
            .collect();
        // Stable, so duplicate keys keep their encounter order.
        rows.sort_by(|left, right| left.key.cmp(&right.key));
        SortedLookup::Built(rows)
    }

    fn len(&self) -> usize {
        match self {
            SortedLookup::Presorted(elements) => elements.len(),
            SortedLookup::Built(rows) => rows.len(),
        }
    }

    fn key(&self, index: usize, selector: &KeySelector<'_>, collection: &JoinValue) -> JoinValue {
        match self {
            SortedLookup::Presorted(elements) => {
                selector.key(&elements[index], &EntryKey::Index(index), collection)
            }
            SortedLookup::Built(rows) => rows[index].key.clone(),
        }
    }

    fn value(&self, index: usize) -> &JoinValue {
        match self {
            SortedLookup::Presorted(elements) => &elements[index],
            SortedLookup::Built(rows) => rows[index].value.as_ref(),
        }
    }

    fn at(&self, index: usize) -> EntryKey {
        match self {
            SortedLookup::Presorted(_) => EntryKey::Index(index),
            SortedLookup::Built(rows) => rows[index].at.clone(),
        }
    }
}

/// Inner-join two collections by merging them in native key order.
///
/// Work is `O(N log N + M log M + R)` in general and `O(N + M + R)` when
/// `options` declares both sequences pre-sorted, with `R` the number of
/// matched pairs. When a key occurs on both sides, the full cartesian
/// product of the two equal-key runs is emitted, outer-run-major. Keys are
/// compared under the native total order, so `Int(1)` does not match
/// `String("1")` here. A result projected to `Null` is dropped.
pub fn merge_join(
    outer: &JoinValue,
    inner: &JoinValue,
    outer_key: &KeySelector<'_>,
    inner_key: &KeySelector<'_>,
    result: &PairSelector<'_>,
    options: MergeOptions,
) -> Vec<JoinValue> {
    // A sorted assertion only holds for true sequences.
    let outer_sorted = options.outer_sorted && outer.as_seq().is_some();
    let inner_sorted = options.inner_sorted && inner.as_seq().is_some();

    let outer_lookup = SortedLookup::build(outer, outer_key, outer_sorted);
    let inner_lookup = SortedLookup::build(inner, inner_key, inner_sorted);
    let outer_len = outer_lookup.len();
    let inner_len = inner_lookup.len();
    if outer_len == 0 || inner_len == 0 {
        return Vec::new();
    }
    log::trace!(
        "merge join over {outer_len}x{inner_len} rows (outer_sorted={outer_sorted}, inner_sorted={inner_sorted})"
    );

    let mut results = Vec::new();
    let mut outer_index = 0;
    let mut inner_index = 0;
    let mut outer_current = outer_lookup.key(0, outer_key, outer);
    let mut inner_current = inner_lookup.key(0, inner_key, inner);

    while outer_index < outer_len && inner_index < inner_len {
        match inner_current.cmp(&outer_current) {
            Ordering::Less => {
                inner_index += 1;
                if inner_index < inner_len {
                    inner_current = inner_lookup.key(inner_index, inner_key, inner);
                }
            }
            Ordering::Greater => {
                outer_index += 1;
                if outer_index < outer_len {
                    outer_current = outer_lookup.key(outer_index, outer_key, outer);
                }
            }
            Ordering::Equal => {
                // Find the maximal equal-key runs on both sides; they are
                // contiguous because both lookups are key-ordered.
                let mut outer_end = outer_index + 1;
                while outer_end < outer_len
                    && outer_lookup.key(outer_end, outer_key, outer) == outer_current
                {
                    outer_end += 1;
                }
                let mut inner_end = inner_index + 1;
                while inner_end < inner_len
                    && inner_lookup.key(inner_end, inner_key, inner) == inner_current
                {
                    inner_end += 1;
                }

                for o in outer_index..outer_end {
                    let outer_at = outer_lookup.at(o);
                    let outer_value = outer_lookup.value(o);
                    for i in inner_index..inner_end {
                        let inner_at = inner_lookup.at(i);
                        let value = result.apply(&JoinedPair {
                            outer: outer_value,
                            inner: inner_lookup.value(i),
                            outer_at: &outer_at,
                            inner_at: &inner_at,
                            outer_collection: outer,
                            inner_collection: inner,
                        });
                        if !value.is_null() {
                            results.push(value);
                        }
                    }
                }

                outer_index = outer_end;
                if outer_index < outer_len {
                    outer_current = outer_lookup.key(outer_index, outer_key, outer);
                }
                inner_index = inner_end;
                if inner_index < inner_len {
                    inner_current = inner_lookup.key(inner_index, inner_key, inner);
                }
            }
        }
    }
    results
}

#[cfg(test)]
mod test {
    use test_log::test;

    use super::{merge_join, MergeOptions};
    use crate::selectors::{KeySelector, PairSelector};
    use crate::value::JoinValue;

    fn ints(values: &[i64]) -> JoinValue {
        JoinValue::seq(values.iter().map(|&v| JoinValue::Int(v)))
    }

    fn pairs(results: &[(i64, i64)]) -> Vec<JoinValue> {
        results
            .iter()
            .map(|&(l, r)| JoinValue::seq([JoinValue::Int(l), JoinValue::Int(r)]))
            .collect()
    }

    #[test]
    fn joins_unsorted_collections() {
        let actual = merge_join(
            &ints(&[1, 2, 3]),
            &ints(&[3, 1, 2]),
            &KeySelector::identity(),
            &KeySelector::identity(),
            &PairSelector::default(),
            MergeOptions::default(),
        );
        assert_eq!(actual, pairs(&[(1, 1), (2, 2), (3, 3)]));
    }

    #[test]
    fn duplicate_keys_expand_to_cartesian_products() {
        let actual = merge_join(
            &ints(&[1, 3, 5, 7]),
            &ints(&[3, 3, 4, 5, 6, 7, 7, 8]),
            &KeySelector::identity(),
            &KeySelector::identity(),
            &PairSelector::func(|pair| {
                if pair.outer == pair.inner {
                    pair.outer.clone()
                } else {
                    JoinValue::Null
                }
            }),
            MergeOptions::default(),
        );
        assert_eq!(
            actual,
            vec![
                JoinValue::Int(3),
                JoinValue::Int(3),
                JoinValue::Int(5),
                JoinValue::Int(7),
                JoinValue::Int(7),
            ]
        );
    }

    #[test]
    fn duplicate_runs_emit_outer_major() {
        let actual = merge_join(
            &ints(&[2, 2]),
            &ints(&[2, 2, 2]),
            &KeySelector::identity(),
            &KeySelector::identity(),
            &PairSelector::default(),
            MergeOptions::default(),
        );
        assert_eq!(actual.len(), 6);
        assert_eq!(actual, pairs(&[(2, 2); 6]));
    }

    #[test]
    fn presorted_flags_skip_the_sort() {
        let actual = merge_join(
            &ints(&[1, 2]),
            &ints(&[1, 2]),
            &KeySelector::identity(),
            &KeySelector::identity(),
            &PairSelector::default(),
            MergeOptions::presorted(),
        );
        assert_eq!(actual, pairs(&[(1, 1), (2, 2)]));
    }

    #[test]
    fn presorted_positions_are_scan_positions() {
        let actual = merge_join(
            &ints(&[10, 20]),
            &ints(&[10, 20]),
            &KeySelector::identity(),
            &KeySelector::identity(),
            &PairSelector::func(|pair| {
                JoinValue::seq([
                    JoinValue::Int(pair.outer_at.as_index().expect("sequence") as i64),
                    JoinValue::Int(pair.inner_at.as_index().expect("sequence") as i64),
                ])
            }),
            MergeOptions::presorted(),
        );
        assert_eq!(actual, pairs(&[(0, 0), (1, 1)]));
    }

    #[test]
    fn sorted_flags_are_ignored_for_non_sequences() {
        let outer = JoinValue::record([("a", JoinValue::Int(2)), ("b", JoinValue::Int(1))]);
        let actual = merge_join(
            &outer,
            &ints(&[1, 2]),
            &KeySelector::identity(),
            &KeySelector::identity(),
            &PairSelector::default(),
            MergeOptions::presorted(),
        );
        // The record side is sorted anyway, so the merge still matches.
        assert_eq!(actual, pairs(&[(1, 1), (2, 2)]));
    }

    #[test]
    fn native_keys_do_not_join_numbers_with_strings() {
        let outer = JoinValue::seq([JoinValue::Int(1)]);
        let inner = JoinValue::seq([JoinValue::string("1")]);
        let actual = merge_join(
            &outer,
            &inner,
            &KeySelector::identity(),
            &KeySelector::identity(),
            &PairSelector::default(),
            MergeOptions::default(),
        );
        assert!(actual.is_empty());
    }

    #[test]
    fn stable_sort_keeps_encounter_order_within_equal_keys() {
        let people = JoinValue::seq([
            JoinValue::record([
                ("name", JoinValue::string("John")),
                ("surname", JoinValue::string("Tyler")),
            ]),
            JoinValue::record([
                ("name", JoinValue::string("John")),
                ("surname", JoinValue::string("Smith")),
            ]),
        ]);
        let actual = merge_join(
            &people,
            &people,
            &KeySelector::field("name"),
            &KeySelector::field("name"),
            &PairSelector::func(|pair| {
                JoinValue::string(format!(
                    "{}-{}",
                    pair.outer.get_field("surname").expect("present"),
                    pair.inner.get_field("surname").expect("present"),
                ))
            }),
            MergeOptions::default(),
        );
        assert_eq!(
            actual,
            vec![
                JoinValue::string("Tyler-Tyler"),
                JoinValue::string("Tyler-Smith"),
                JoinValue::string("Smith-Tyler"),
                JoinValue::string("Smith-Smith"),
            ]
        );
    }

    #[test]
    fn empty_operand_short_circuits() {
        let actual = merge_join(
            &ints(&[]),
            &ints(&[1, 2]),
            &KeySelector::identity(),
            &KeySelector::identity(),
            &PairSelector::default(),
            MergeOptions::default(),
        );
        assert!(actual.is_empty());
    }
}
