//! This module implements the hash join: build a grouped lookup of the
//! inner collection keyed by canonical string form, then probe it once per
//! outer element.

use std::borrow::Cow;

use hashbrown::HashMap;

use crate::collections::{entries, EntryKey};
use crate::selectors::{JoinedPair, KeySelector, PairSelector};
use crate::value::JoinValue;

/// All inner elements sharing one string key, in encounter order, each with
/// its position in the inner collection.
type KeyGroup<'a> = Vec<(Cow<'a, JoinValue>, EntryKey)>;

/// Group a collection's entries by the string form of their key.
fn grouped_lookup<'a>(
    collection: &'a JoinValue,
    selector: &KeySelector<'_>,
) -> HashMap<String, KeyGroup<'a>> {
    let mut groups: HashMap<String, KeyGroup<'a>> = HashMap::new();
    for (at, value) in entries(collection) {
        let key = selector.key(value.as_ref(), &at, collection).key_string();
        groups.entry(key).or_default().push((value, at));
    }
    groups
}

/// Inner-join two collections by equality of the string form of their keys.
///
/// Expected time is linear in the sizes of both collections plus the number
/// of matches. Results are emitted in outer traversal order; within one
/// outer element they follow the inner group's encounter order. An outer
/// element whose key has no group contributes nothing, and a result
/// projected to `Null` is dropped.
pub fn hash_join(
    outer: &JoinValue,
    inner: &JoinValue,
    outer_key: &KeySelector<'_>,
    inner_key: &KeySelector<'_>,
    result: &PairSelector<'_>,
) -> Vec<JoinValue> {
    let groups = grouped_lookup(inner, inner_key);
    log::trace!("hash join probe over {} distinct inner keys", groups.len());

    let mut results = Vec::new();
    for (outer_at, outer_value) in entries(outer) {
        let key = outer_key
            .key(outer_value.as_ref(), &outer_at, outer)
            .key_string();
        let Some(group) = groups.get(&key) else {
            continue;
        };
        for (inner_value, inner_at) in group {
            let value = result.apply(&JoinedPair {
                outer: outer_value.as_ref(),
                inner: inner_value.as_ref(),
                outer_at: &outer_at,
                inner_at,
                outer_collection: outer,
                inner_collection: inner,
            });
            if !value.is_null() {
                results.push(value);
            }
        }
    }
    results
}
