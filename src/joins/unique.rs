//! This module implements the unique-key linear join: a single merge pass
//! over two already-sorted sequences, with no grouping or sorting of its
//! own. It is the cheapest of the four joins when its preconditions hold.

use std::cmp::Ordering;

use crate::collections::EntryKey;
use crate::error::{Error, Result};
use crate::selectors::{JoinedPair, KeySelector, PairSelector};
use crate::value::JoinValue;

/// Key of the sequence element at `index` under `selector`.
fn key_at(
    selector: &KeySelector<'_>,
    elements: &[JoinValue],
    index: usize,
    collection: &JoinValue,
) -> JoinValue {
    selector.key(&elements[index], &EntryKey::Index(index), collection)
}

/// Inner-join two pre-sorted sequences in one linear pass.
///
/// The caller must guarantee that both sequences are sorted ascending by
/// their native-order keys and that the outer sequence has at most one
/// element per key. Neither guarantee is verified here (see
/// [unique_join_checked]); violating them silently produces wrong results.
/// On a key match only the inner cursor advances, so one outer element
/// pairs with every element of a duplicate-key inner run in order.
///
/// # Errors
/// Fails with [Error::SequenceRequired] when either operand is not a true
/// sequence.
pub fn unique_join(
    outer: &JoinValue,
    inner: &JoinValue,
    outer_key: &KeySelector<'_>,
    inner_key: &KeySelector<'_>,
    result: &PairSelector<'_>,
) -> Result<Vec<JoinValue>> {
    let outer_elements = outer
        .as_seq()
        .ok_or(Error::SequenceRequired("unique join"))?;
    let inner_elements = inner
        .as_seq()
        .ok_or(Error::SequenceRequired("unique join"))?;
    let outer_len = outer_elements.len();
    let inner_len = inner_elements.len();
    if outer_len == 0 || inner_len == 0 {
        return Ok(Vec::new());
    }

    let mut results = Vec::new();
    let mut outer_index = 0;
    let mut inner_index = 0;
    let mut outer_current = key_at(outer_key, outer_elements, 0, outer);
    let mut inner_current = key_at(inner_key, inner_elements, 0, inner);

    while outer_index < outer_len && inner_index < inner_len {
        match inner_current.cmp(&outer_current) {
            Ordering::Less => {
                inner_index += 1;
                if inner_index < inner_len {
                    inner_current = key_at(inner_key, inner_elements, inner_index, inner);
                }
            }
            Ordering::Greater => {
                outer_index += 1;
                if outer_index < outer_len {
                    outer_current = key_at(outer_key, outer_elements, outer_index, outer);
                }
            }
            Ordering::Equal => {
                let outer_at = EntryKey::Index(outer_index);
                let inner_at = EntryKey::Index(inner_index);
                let value = result.apply(&JoinedPair {
                    outer: &outer_elements[outer_index],
                    inner: &inner_elements[inner_index],
                    outer_at: &outer_at,
                    inner_at: &inner_at,
                    outer_collection: outer,
                    inner_collection: inner,
                });
                if !value.is_null() {
                    results.push(value);
                }
                // The outer cursor stays put so a run of duplicate inner
                // keys pairs with the same outer element.
                inner_index += 1;
                if inner_index < inner_len {
                    inner_current = key_at(inner_key, inner_elements, inner_index, inner);
                }
            }
        }
    }
    Ok(results)
}

/// [unique_join] behind a validating prepass.
///
/// Verifies in one linear scan that the outer keys are strictly increasing
/// (which implies both sortedness and uniqueness) and the inner keys
/// non-decreasing, then delegates. Use this wrapper when the input contract
/// is not under the caller's control; the plain [unique_join] keeps the
/// checks off its hot path.
///
/// # Errors
/// Fails with [Error::ContractViolation] naming the first out-of-order
/// position, or with [Error::SequenceRequired] for non-sequence operands.
pub fn unique_join_checked(
    outer: &JoinValue,
    inner: &JoinValue,
    outer_key: &KeySelector<'_>,
    inner_key: &KeySelector<'_>,
    result: &PairSelector<'_>,
) -> Result<Vec<JoinValue>> {
    let outer_elements = outer
        .as_seq()
        .ok_or(Error::SequenceRequired("unique join"))?;
    let inner_elements = inner
        .as_seq()
        .ok_or(Error::SequenceRequired("unique join"))?;

    let mut previous: Option<JoinValue> = None;
    for (index, element) in outer_elements.iter().enumerate() {
        let key = outer_key.key(element, &EntryKey::Index(index), outer);
        if let Some(previous) = &previous {
            if *previous >= key {
                return Err(Error::ContractViolation(format!(
                    "outer keys must be strictly increasing, violated at index {index}"
                )));
            }
        }
        previous = Some(key);
    }

    let mut previous: Option<JoinValue> = None;
    for (index, element) in inner_elements.iter().enumerate() {
        let key = inner_key.key(element, &EntryKey::Index(index), inner);
        if let Some(previous) = &previous {
            if *previous > key {
                return Err(Error::ContractViolation(format!(
                    "inner keys must be sorted ascending, violated at index {index}"
                )));
            }
        }
        previous = Some(key);
    }

    unique_join(outer, inner, outer_key, inner_key, result)
}
