//! This module implements the group join: pair every outer element with
//! the complete (possibly empty) group of inner elements sharing its key.

use hashbrown::HashMap;

use crate::collections::entries;
use crate::error::{Error, Result};
use crate::selectors::{GroupSelector, KeySelector, OuterGroup};
use crate::value::JoinValue;

/// Join each outer element against the group of inner elements whose string
/// key equals its own.
///
/// The group handed to the result selector is in inner encounter order and
/// is empty, not absent, when nothing matches, so the output has one row
/// per outer element unless the selector projects a row to `Null`.
///
/// # Errors
/// Fails with [Error::InvalidResultSelector] when given a
/// [GroupSelector::Constant]; a constant cannot fold a group into a value.
pub fn group_join(
    outer: &JoinValue,
    inner: &JoinValue,
    outer_key: &KeySelector<'_>,
    inner_key: &KeySelector<'_>,
    result: &GroupSelector<'_>,
) -> Result<Vec<JoinValue>> {
    if matches!(result, GroupSelector::Constant(_)) {
        return Err(Error::InvalidResultSelector);
    }

    let mut groups: HashMap<String, Vec<JoinValue>> = HashMap::new();
    for (at, value) in entries(inner) {
        let key = inner_key.key(value.as_ref(), &at, inner).key_string();
        groups.entry(key).or_default().push(value.into_owned());
    }
    log::trace!("group join over {} distinct inner keys", groups.len());

    let mut results = Vec::new();
    for (outer_at, outer_value) in entries(outer) {
        let key = outer_key
            .key(outer_value.as_ref(), &outer_at, outer)
            .key_string();
        let group = groups.get(&key).map(Vec::as_slice).unwrap_or(&[]);
        let value = result.apply(&OuterGroup {
            outer: outer_value.as_ref(),
            group,
            outer_at: &outer_at,
            outer_collection: outer,
        });
        if !value.is_null() {
            results.push(value);
        }
    }
    Ok(results)
}
